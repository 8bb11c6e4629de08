use std::cmp::Ordering;

use crate::domain::a001_product::Product;

use super::filter::{FilterState, SortBy};
use super::pagination;

/// Страница каталога, которую отображает UI
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedView {
    pub page_items: Vec<Product>,
    /// Количество после фильтрации, до пагинации
    pub total_count: usize,
}

impl DerivedView {
    pub fn total_pages(&self, items_per_page: u32) -> usize {
        pagination::total_pages(self.total_count, items_per_page)
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Фильтрация -> сортировка -> пагинация. Чистая функция от двух снимков состояния.
pub fn derive_view(products: &[Product], filters: &FilterState) -> DerivedView {
    let needle = filters.search_term.to_lowercase();
    let (low, high) = filters.price_range;

    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|p| p.matches_search(&needle))
        .filter(|p| !filters.show_favorites_only || p.is_favorite)
        .filter(|p| p.price >= low && p.price <= high)
        .filter(|p| match &filters.selected_category {
            Some(category) => p.category.as_deref() == Some(category.as_str()),
            None => true,
        })
        .collect();

    sort_products(&mut matched, filters.sort_by);

    let total_count = matched.len();
    let page = filters.current_page.max(1) as usize;
    let size = filters.items_per_page as usize;
    let start = (page - 1).saturating_mul(size).min(total_count);
    let end = start.saturating_add(size).min(total_count);

    DerivedView {
        page_items: matched[start..end].iter().map(|p| (*p).clone()).collect(),
        total_count,
    }
}

fn sort_products(items: &mut [&Product], sort_by: SortBy) {
    match sort_by {
        SortBy::Name => items.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortBy::PriceAsc => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortBy::PriceDesc => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
        // None < Some: неразобранные даты уходят в конец при сортировке от новых
        SortBy::DateNew => {
            items.sort_by(|a, b| b.created_at_millis().cmp(&a.created_at_millis()))
        }
        SortBy::DateOld => {
            items.sort_by(|a, b| a.created_at_millis().cmp(&b.created_at_millis()))
        }
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
