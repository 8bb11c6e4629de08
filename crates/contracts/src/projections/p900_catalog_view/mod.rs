//! Представление каталога: настройки фильтра, сортировки и страниц и вычисленная страница.

pub mod derive;
pub mod filter;
pub mod pagination;

pub use derive::{derive_view, DerivedView};
pub use filter::{
    FilterState, SortBy, ALLOWED_PAGE_SIZES, DEFAULT_ITEMS_PER_PAGE, DEFAULT_PRICE_RANGE,
};
pub use pagination::{clamp_page, range_label, total_pages, visible_pages, PageSlot};
