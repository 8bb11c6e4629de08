//! Корневой контейнер состояния каталога.
//!
//! `Catalog` владеет хранилищем товаров и настройками представления.
//! Каждая мутация проходит через [`Catalog::dispatch`]: сначала применяется
//! редьюсер, затем по порядку вызываются хуки (сохранение, уведомление UI).

use contracts::domain::a001_product::{Product, ProductFormData, ProductId};
use contracts::projections::p900_catalog_view::{derive_view, DerivedView, FilterState, SortBy};

use super::filter::{self, FilterAction};
use super::products::{self, ProductsAction, ProductsState};
use crate::shared::config::ViewConfig;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Products(ProductsAction),
    Filter(FilterAction),
}

impl From<ProductsAction> for Action {
    fn from(action: ProductsAction) -> Self {
        Action::Products(action)
    }
}

impl From<FilterAction> for Action {
    fn from(action: FilterAction) -> Self {
        Action::Filter(action)
    }
}

/// Снимок обоих хранилищ
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    pub products: ProductsState,
    pub filters: FilterState,
}

/// Хук, вызываемый синхронно после каждого перехода состояния
pub trait StoreHook {
    fn after_mutation(&mut self, action: &Action, state: &CatalogState);
}

impl<F> StoreHook for F
where
    F: FnMut(&Action, &CatalogState),
{
    fn after_mutation(&mut self, action: &Action, state: &CatalogState) {
        self(action, state)
    }
}

pub struct Catalog {
    state: CatalogState,
    rules: ViewConfig,
    hooks: Vec<Box<dyn StoreHook>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl Catalog {
    pub fn new(rules: ViewConfig) -> Self {
        let filters = FilterState::new(rules.price_ceiling, rules.default_items_per_page);
        Self {
            state: CatalogState {
                products: ProductsState::default(),
                filters,
            },
            rules,
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: impl StoreHook + 'static) -> Self {
        self.add_hook(hook);
        self
    }

    pub fn add_hook(&mut self, hook: impl StoreHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn products(&self) -> &ProductsState {
        &self.state.products
    }

    pub fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    pub fn rules(&self) -> &ViewConfig {
        &self.rules
    }

    /// Текущая страница каталога
    pub fn view(&self) -> DerivedView {
        derive_view(&self.state.products.items, &self.state.filters)
    }

    pub fn get_product(&self, id: &ProductId) -> Option<&Product> {
        self.state.products.get(id)
    }

    /// Единственная точка изменения состояния
    pub fn dispatch(&mut self, action: impl Into<Action>) {
        let action = self.resolve(action.into());
        log::debug!("dispatch {:?}", ActionName(&action));

        match action.clone() {
            Action::Products(a) => products::reduce(&mut self.state.products, a),
            Action::Filter(a) => filter::reduce(&mut self.state.filters, a, &self.rules),
        }

        for hook in self.hooks.iter_mut() {
            hook.after_mutation(&action, &self.state);
        }
    }

    /// Категория фильтра должна существовать среди товаров
    fn resolve(&self, action: Action) -> Action {
        match action {
            Action::Filter(FilterAction::SetSelectedCategory(Some(category)))
                if !self.state.products.has_category(&category) =>
            {
                log::warn!("Unknown category '{}', filter cleared", category);
                Action::Filter(FilterAction::SetSelectedCategory(None))
            }
            other => other,
        }
    }

    // ========================================================================
    // Товары
    // ========================================================================

    pub fn set_products(&mut self, items: Vec<Product>) {
        self.dispatch(ProductsAction::SetProducts(items));
    }

    pub fn set_loading(&mut self, flag: bool) {
        self.dispatch(ProductsAction::SetLoading(flag));
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.dispatch(ProductsAction::SetError(message));
    }

    pub fn add_product(&mut self, product: Product) {
        self.dispatch(ProductsAction::AddProduct(product));
    }

    pub fn delete_product(&mut self, id: ProductId) {
        self.dispatch(ProductsAction::DeleteProduct(id));
    }

    pub fn update_product(&mut self, product: Product) {
        self.dispatch(ProductsAction::UpdateProduct(product));
    }

    pub fn toggle_favorite(&mut self, id: ProductId) {
        self.dispatch(ProductsAction::ToggleFavorite(id));
    }

    pub fn toggle_selection(&mut self, id: ProductId) {
        self.dispatch(ProductsAction::ToggleSelection(id));
    }

    pub fn select_all(&mut self, ids: Vec<ProductId>) {
        self.dispatch(ProductsAction::SelectAll(ids));
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(ProductsAction::ClearSelection);
    }

    pub fn delete_selected(&mut self) {
        self.dispatch(ProductsAction::DeleteSelected);
    }

    /// Флажок "выбрать все" на странице: если выбрана ровно эта страница — снять выбор
    pub fn toggle_select_page(&mut self, page_ids: Vec<ProductId>) {
        let selected = &self.state.products.selected_ids;
        let whole_page = !selected.is_empty()
            && selected.len() == page_ids.len()
            && page_ids.iter().all(|id| selected.contains(id));
        if whole_page {
            self.clear_selection();
        } else {
            self.select_all(page_ids);
        }
    }

    /// Создать товар из формы. Возвращает ID нового товара.
    pub fn create_product(&mut self, form: ProductFormData) -> Result<ProductId, String> {
        form.validate()?;
        let product = form.into_new_product();
        let id = product.id.clone();
        self.add_product(product);
        Ok(id)
    }

    /// Изменить товар из формы. Отсутствующий ID — не ошибка, просто ничего не меняется.
    pub fn edit_product(&mut self, id: &ProductId, form: &ProductFormData) -> Result<(), String> {
        form.validate()?;
        let Some(updated) = self.get_product(id).map(|p| form.apply_to(p)) else {
            log::debug!("edit of missing product {} ignored", id);
            return Ok(());
        };
        self.update_product(updated);
        Ok(())
    }

    // ========================================================================
    // Фильтры
    // ========================================================================

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.dispatch(FilterAction::SetSearchTerm(term.into()));
    }

    pub fn set_show_favorites_only(&mut self, flag: bool) {
        self.dispatch(FilterAction::SetShowFavoritesOnly(flag));
    }

    pub fn set_price_range(&mut self, low: f64, high: f64) {
        self.dispatch(FilterAction::SetPriceRange(low, high));
    }

    pub fn set_price_min(&mut self, low: f64) {
        self.dispatch(FilterAction::SetPriceMin(low));
    }

    pub fn set_price_max(&mut self, high: f64) {
        self.dispatch(FilterAction::SetPriceMax(high));
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        self.dispatch(FilterAction::SetSelectedCategory(category));
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.dispatch(FilterAction::SetSortBy(sort_by));
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.dispatch(FilterAction::SetCurrentPage(page));
    }

    pub fn set_items_per_page(&mut self, size: u32) {
        self.dispatch(FilterAction::SetItemsPerPage(size));
    }

    pub fn reset_filters(&mut self) {
        self.dispatch(FilterAction::ResetFilters);
    }
}

/// Короткое имя действия для лога (без содержимого товаров)
struct ActionName<'a>(&'a Action);

impl std::fmt::Debug for ActionName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Action::Products(ProductsAction::SetProducts(items)) => {
                write!(f, "SetProducts({} items)", items.len())
            }
            Action::Products(ProductsAction::AddProduct(p)) => write!(f, "AddProduct({})", p.id),
            Action::Products(ProductsAction::UpdateProduct(p)) => {
                write!(f, "UpdateProduct({})", p.id)
            }
            Action::Products(other) => write!(f, "{:?}", other),
            Action::Filter(other) => write!(f, "{:?}", other),
        }
    }
}
