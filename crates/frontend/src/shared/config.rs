use contracts::projections::p900_catalog_view::{
    ALLOWED_PAGE_SIZES, DEFAULT_ITEMS_PER_PAGE, DEFAULT_PRICE_RANGE,
};
use serde::Deserialize;

use super::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub storage: StorageConfig,
    pub seed: SeedConfig,
    pub view: ViewConfig,
}

/// Ключи двух сохраняемых записей
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub products_key: String,
    pub filters_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            products_key: "producthub_products".to_string(),
            filters_key: "producthub_filters".to_string(),
        }
    }
}

/// Удалённый источник начальных данных
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    pub base_url: String,
    pub limit: u32,
    /// Цены загруженных товаров выбираются из `price_min..price_max`
    pub price_min: u32,
    pub price_max: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            limit: 12,
            price_min: 10,
            price_max: 110,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub default_items_per_page: u32,
    pub allowed_page_sizes: Vec<u32>,
    /// Верхняя граница ценового диапазона по умолчанию
    pub price_ceiling: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            allowed_page_sizes: ALLOWED_PAGE_SIZES.to_vec(),
            price_ceiling: DEFAULT_PRICE_RANGE.1,
        }
    }
}

/// Конфигурация по умолчанию, встроенная в сборку
const DEFAULT_CONFIG: &str = r#"
[storage]
products_key = "producthub_products"
filters_key = "producthub_filters"

[seed]
base_url = "https://jsonplaceholder.typicode.com"
limit = 12
price_min = 10
price_max = 110

[view]
default_items_per_page = 12
allowed_page_sizes = [6, 12, 24]
price_ceiling = 10000.0
"#;

/// Id необязательного элемента `<script type="application/toml">` с переопределениями
pub const CONFIG_ELEMENT_ID: &str = "catalog-config";

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.products_key.is_empty() || self.storage.filters_key.is_empty() {
            return Err(ConfigError::Invalid("storage keys must not be empty".into()));
        }
        if self.storage.products_key == self.storage.filters_key {
            return Err(ConfigError::Invalid("storage keys must differ".into()));
        }
        if self.seed.limit == 0 {
            return Err(ConfigError::Invalid("seed.limit must be positive".into()));
        }
        if self.seed.price_min >= self.seed.price_max {
            return Err(ConfigError::Invalid(
                "seed.price_min must be below seed.price_max".into(),
            ));
        }
        if self.view.allowed_page_sizes.iter().any(|&n| n == 0) {
            return Err(ConfigError::Invalid("page sizes must be positive".into()));
        }
        if !self
            .view
            .allowed_page_sizes
            .contains(&self.view.default_items_per_page)
        {
            return Err(ConfigError::Invalid(format!(
                "default_items_per_page {} is not an allowed page size",
                self.view.default_items_per_page
            )));
        }
        if !self.view.price_ceiling.is_finite() || self.view.price_ceiling <= 0.0 {
            return Err(ConfigError::Invalid("price_ceiling must be positive".into()));
        }
        Ok(())
    }
}

/// Разобрать и проверить TOML. Отсутствующие ключи получают значения по умолчанию.
pub fn parse_config(src: &str) -> Result<CatalogConfig, ConfigError> {
    let config: CatalogConfig = toml::from_str(src)?;
    config.validate()?;
    Ok(config)
}

/// Загрузить конфигурацию
///
/// Порядок поиска:
/// 1. Документ-переопределение, если задан и корректен
/// 2. Встроенная конфигурация по умолчанию
pub fn load_config(override_src: Option<&str>) -> CatalogConfig {
    if let Some(src) = override_src {
        match parse_config(src) {
            Ok(config) => {
                log::info!("Loaded catalog config override");
                return config;
            }
            Err(e) => log::warn!("Ignoring catalog config override: {}", e),
        }
    }

    log::debug!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!("Embedded config is invalid: {}", e);
        CatalogConfig::default()
    })
}

/// Текст элемента с переопределением конфигурации на странице, если он есть
pub fn page_config_override() -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)?
        .text_content()
        .filter(|text| !text.trim().is_empty())
}
