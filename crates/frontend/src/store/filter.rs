use contracts::projections::p900_catalog_view::{FilterState, SortBy};

use crate::shared::config::ViewConfig;

/// Мутации настроек представления
#[derive(Clone, Debug, PartialEq)]
pub enum FilterAction {
    SetSearchTerm(String),
    SetShowFavoritesOnly(bool),
    SetPriceRange(f64, f64),
    SetPriceMin(f64),
    SetPriceMax(f64),
    SetSelectedCategory(Option<String>),
    SetSortBy(SortBy),
    SetCurrentPage(u32),
    SetItemsPerPage(u32),
    ResetFilters,
}

/// Применить действие.
///
/// Всё, что меняет состав выборки (поиск, избранное, цена, категория,
/// размер страницы), возвращает на первую страницу. Сортировка и переход
/// по страницам текущую страницу не трогают.
pub fn reduce(state: &mut FilterState, action: FilterAction, rules: &ViewConfig) {
    match action {
        FilterAction::SetSearchTerm(term) => {
            state.search_term = term;
            state.current_page = 1;
        }
        FilterAction::SetShowFavoritesOnly(flag) => {
            state.show_favorites_only = flag;
            state.current_page = 1;
        }
        FilterAction::SetPriceRange(low, high) => {
            let (Some(low), Some(high)) = (price_bound(low), price_bound(high)) else {
                log::warn!("Ignoring non-finite price range [{}, {}]", low, high);
                return;
            };
            state.price_range = (low, high.max(low));
            state.current_page = 1;
        }
        FilterAction::SetPriceMin(low) => {
            let Some(low) = price_bound(low) else {
                log::warn!("Ignoring non-finite price bound {}", low);
                return;
            };
            state.price_range = (low, state.price_range.1.max(low));
            state.current_page = 1;
        }
        FilterAction::SetPriceMax(high) => {
            let Some(high) = price_bound(high) else {
                log::warn!("Ignoring non-finite price bound {}", high);
                return;
            };
            state.price_range = (state.price_range.0.min(high), high);
            state.current_page = 1;
        }
        FilterAction::SetSelectedCategory(category) => {
            state.selected_category = category.filter(|c| !c.is_empty());
            state.current_page = 1;
        }
        FilterAction::SetSortBy(sort_by) => {
            state.sort_by = sort_by;
        }
        FilterAction::SetCurrentPage(page) => {
            state.current_page = page.max(1);
        }
        FilterAction::SetItemsPerPage(size) => {
            if !rules.allowed_page_sizes.contains(&size) {
                log::warn!(
                    "Page size {} is not one of {:?}, ignored",
                    size,
                    rules.allowed_page_sizes
                );
                return;
            }
            state.items_per_page = size;
            state.current_page = 1;
        }
        FilterAction::ResetFilters => {
            let items_per_page = state.items_per_page;
            *state = FilterState::new(rules.price_ceiling, items_per_page);
        }
    }
}

/// Конечная неотрицательная граница цены
fn price_bound(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut FilterState, action: FilterAction) {
        reduce(state, action, &ViewConfig::default());
    }

    fn on_page_three() -> FilterState {
        let mut state = FilterState::default();
        apply(&mut state, FilterAction::SetCurrentPage(3));
        state
    }

    #[test]
    fn composition_changes_reset_to_first_page() {
        let actions = vec![
            FilterAction::SetSearchTerm("x".into()),
            FilterAction::SetShowFavoritesOnly(true),
            FilterAction::SetPriceRange(1.0, 2.0),
            FilterAction::SetPriceMin(5.0),
            FilterAction::SetPriceMax(500.0),
            FilterAction::SetSelectedCategory(Some("kitchen".into())),
            FilterAction::SetItemsPerPage(24),
            FilterAction::ResetFilters,
        ];
        for action in actions {
            let mut state = on_page_three();
            apply(&mut state, action.clone());
            assert_eq!(state.current_page, 1, "{:?} kept the page", action);
        }
    }

    #[test]
    fn sort_and_page_changes_keep_the_page() {
        let mut state = on_page_three();
        apply(&mut state, FilterAction::SetSortBy(SortBy::Name));
        assert_eq!(state.current_page, 3);
        assert_eq!(state.sort_by, SortBy::Name);
        apply(&mut state, FilterAction::SetCurrentPage(5));
        assert_eq!(state.current_page, 5);
    }

    #[test]
    fn current_page_never_drops_below_one() {
        let mut state = on_page_three();
        apply(&mut state, FilterAction::SetCurrentPage(0));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn raising_low_bound_lifts_high_bound() {
        let mut state = FilterState::default();
        apply(&mut state, FilterAction::SetPriceMax(100.0));
        apply(&mut state, FilterAction::SetPriceMin(150.0));
        assert_eq!(state.price_range, (150.0, 150.0));
    }

    #[test]
    fn lowering_high_bound_drags_low_bound() {
        let mut state = FilterState::default();
        apply(&mut state, FilterAction::SetPriceMin(300.0));
        apply(&mut state, FilterAction::SetPriceMax(200.0));
        assert_eq!(state.price_range, (200.0, 200.0));
    }

    #[test]
    fn price_range_never_inverts_in_any_order() {
        let bounds = [0.0, 5.0, 50.0, 500.0, 10000.0];
        for &a in &bounds {
            for &b in &bounds {
                let mut state = FilterState::default();
                apply(&mut state, FilterAction::SetPriceMin(a));
                apply(&mut state, FilterAction::SetPriceMax(b));
                assert!(state.price_low() <= state.price_high());

                let mut state = FilterState::default();
                apply(&mut state, FilterAction::SetPriceMax(b));
                apply(&mut state, FilterAction::SetPriceMin(a));
                assert!(state.price_low() <= state.price_high());

                let mut state = FilterState::default();
                apply(&mut state, FilterAction::SetPriceRange(a, b));
                assert!(state.price_low() <= state.price_high());
            }
        }
    }

    #[test]
    fn price_bounds_are_sanitized() {
        let mut state = FilterState::default();
        apply(&mut state, FilterAction::SetPriceRange(-5.0, 40.0));
        assert_eq!(state.price_range, (0.0, 40.0));

        state.current_page = 2;
        apply(&mut state, FilterAction::SetPriceMin(f64::NAN));
        assert_eq!(state.price_range, (0.0, 40.0));
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn disallowed_page_size_is_ignored() {
        let mut state = on_page_three();
        apply(&mut state, FilterAction::SetItemsPerPage(7));
        assert_eq!(state.items_per_page, 12);
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn reset_restores_defaults_except_page_size() {
        let mut state = FilterState::default();
        apply(&mut state, FilterAction::SetItemsPerPage(6));
        apply(&mut state, FilterAction::SetSearchTerm("mug".into()));
        apply(&mut state, FilterAction::SetShowFavoritesOnly(true));
        apply(&mut state, FilterAction::SetPriceRange(5.0, 10.0));
        apply(&mut state, FilterAction::SetSelectedCategory(Some("kitchen".into())));
        apply(&mut state, FilterAction::SetSortBy(SortBy::PriceDesc));
        apply(&mut state, FilterAction::SetCurrentPage(4));

        apply(&mut state, FilterAction::ResetFilters);

        let expected = FilterState {
            items_per_page: 6,
            ..FilterState::default()
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn empty_category_means_unset() {
        let mut state = FilterState::default();
        apply(&mut state, FilterAction::SetSelectedCategory(Some(String::new())));
        assert_eq!(state.selected_category, None);
    }
}
