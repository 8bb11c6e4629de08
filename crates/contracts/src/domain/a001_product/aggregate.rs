use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, Origin};

/// Префикс идентификаторов товаров, полученных из удалённого источника.
/// Не пересекается с UUID пользовательских товаров.
pub const REMOTE_ID_PREFIX: &str = "api-";

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор товара (непрозрачная строка)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Новый идентификатор для товара, созданного пользователем
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Идентификатор товара из удалённого источника (`api-<n>`)
    pub fn remote(n: u64) -> Self {
        Self(format!("{}{}", REMOTE_ID_PREFIX, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_remote(&self) -> bool {
        self.0.starts_with(REMOTE_ID_PREFIX)
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.clone()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("Product id must not be empty".into());
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Товар каталога
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// URL изображения
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub is_favorite: bool,
    /// Момент создания (строка с датой/временем, не меняется после создания)
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub source: Origin,
}

impl Product {
    /// Отметка времени создания в миллисекундах, если строку удалось разобрать
    pub fn created_at_millis(&self) -> Option<i64> {
        parse_timestamp_millis(&self.created_at)
    }

    /// Совпадение с поисковой строкой, уже приведённой к нижнему регистру
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }

    pub fn is_user_created(&self) -> bool {
        self.source == Origin::User
    }
}

/// Разбор отметки времени: RFC 3339, дата-время без зоны (UTC) или просто дата.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Формат `createdAt` для новых записей
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Данные формы создания/редактирования товара
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductFormData {
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductFormData {
    /// Валидация полей формы
    pub fn validate(&self) -> Result<(), String> {
        let title_len = self.title.chars().count();
        if title_len < 3 {
            return Err("Title must be at least 3 characters".into());
        }
        if title_len > 100 {
            return Err("Title must not exceed 100 characters".into());
        }

        let description_len = self.description.chars().count();
        if description_len < 10 {
            return Err("Description must be at least 10 characters".into());
        }
        if description_len > 1000 {
            return Err("Description must not exceed 1000 characters".into());
        }

        if !self.price.is_finite() || self.price <= 0.0 {
            return Err("Price must be a positive number".into());
        }

        if self.image.trim().is_empty() {
            return Err("Image URL is required".into());
        }
        match url::Url::parse(&self.image) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
            _ => return Err("Must be a valid URL".into()),
        }

        Ok(())
    }

    /// Категория без пробелов по краям; пустая строка означает "без категории"
    pub fn normalized_category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    /// Новый пользовательский товар с заданным ID и моментом создания
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        let category = self.normalized_category();
        Product {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            price: self.price,
            is_favorite: false,
            created_at: format_timestamp(created_at),
            category,
            source: Origin::User,
        }
    }

    /// Новый пользовательский товар: свежий UUID, время создания — сейчас
    pub fn into_new_product(self) -> Product {
        self.into_product(ProductId::new_v4(), Utc::now())
    }

    /// Изменённая копия товара. ID, дата создания, источник и избранное не меняются.
    pub fn apply_to(&self, product: &Product) -> Product {
        Product {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            price: self.price,
            category: self.normalized_category(),
            ..product.clone()
        }
    }
}

impl From<&Product> for ProductFormData {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price,
            category: product.category.clone(),
        }
    }
}
