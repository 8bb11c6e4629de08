use serde::{Deserialize, Serialize};

/// Диапазон цен по умолчанию
pub const DEFAULT_PRICE_RANGE: (f64, f64) = (0.0, 10000.0);

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 12;

/// Допустимые размеры страницы
pub const ALLOWED_PAGE_SIZES: [u32; 3] = [6, 12, 24];

/// Порядок сортировки списка товаров
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    Name,
    PriceAsc,
    PriceDesc,
    #[default]
    DateNew,
    DateOld,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::PriceAsc => "price-asc",
            SortBy::PriceDesc => "price-desc",
            SortBy::DateNew => "date-new",
            SortBy::DateOld => "date-old",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|sort| sort.as_str() == s)
    }

    /// Подпись для выпадающего списка
    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::Name => "Name (A-Z)",
            SortBy::PriceAsc => "Price (Low-High)",
            SortBy::PriceDesc => "Price (High-Low)",
            SortBy::DateNew => "Newest",
            SortBy::DateOld => "Oldest",
        }
    }

    pub fn all() -> [SortBy; 5] {
        [
            SortBy::DateNew,
            SortBy::DateOld,
            SortBy::Name,
            SortBy::PriceAsc,
            SortBy::PriceDesc,
        ]
    }
}

/// Настройки представления каталога: фильтры, сортировка, пагинация.
/// Сохраняется целиком как отдельная запись в локальном хранилище.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub show_favorites_only: bool,
    /// `[low, high]`, всегда low <= high
    pub price_range: (f64, f64),
    pub selected_category: Option<String>,
    pub sort_by: SortBy,
    /// Номер страницы, начиная с 1
    pub current_page: u32,
    pub items_per_page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_RANGE.1, DEFAULT_ITEMS_PER_PAGE)
    }
}

impl FilterState {
    pub fn new(price_ceiling: f64, items_per_page: u32) -> Self {
        Self {
            search_term: String::new(),
            show_favorites_only: false,
            price_range: (0.0, price_ceiling),
            selected_category: None,
            sort_by: SortBy::default(),
            current_page: 1,
            items_per_page,
        }
    }

    pub fn price_low(&self) -> f64 {
        self.price_range.0
    }

    pub fn price_high(&self) -> f64 {
        self.price_range.1
    }

    /// Отличается ли выборка от полной (для кнопки "Clear All")
    pub fn has_active_filters(&self, max_price: f64) -> bool {
        !self.search_term.is_empty()
            || self.show_favorites_only
            || self.price_range.0 > 0.0
            || self.price_range.1 < max_price
            || self.selected_category.is_some()
    }
}
