//! Реактивная обёртка каталога для Leptos.
//!
//! Сам `Catalog` хранится локально (не `Send`), а UI подписывается на
//! сигналы, которые обновляет [`SignalHook`] после каждой мутации.

use contracts::projections::p900_catalog_view::{derive_view, DerivedView, FilterState};
use leptos::prelude::*;

use super::bootstrap::seed_completion;
use super::catalog::{Action, Catalog, CatalogState, StoreHook};
use super::products::{ProductsAction, ProductsState};
use crate::domain::a001_product::api::{fetch_products, HttpSeedSource};
use crate::shared::config::SeedConfig;

/// Переносит новые снимки в сигналы
struct SignalHook {
    products: RwSignal<ProductsState>,
    filters: RwSignal<FilterState>,
}

impl StoreHook for SignalHook {
    fn after_mutation(&mut self, action: &Action, state: &CatalogState) {
        match action {
            Action::Products(_) => self.products.set(state.products.clone()),
            Action::Filter(_) => self.filters.set(state.filters.clone()),
        }
    }
}

#[derive(Clone, Copy)]
pub struct CatalogContext {
    catalog: StoredValue<Catalog, LocalStorage>,
    pub products: RwSignal<ProductsState>,
    pub filters: RwSignal<FilterState>,
    /// Текущая страница; пересчитывается только при изменении входов
    pub view: Memo<DerivedView>,
}

impl CatalogContext {
    pub fn new(mut catalog: Catalog) -> Self {
        let products = RwSignal::new(catalog.products().clone());
        let filters = RwSignal::new(catalog.filters().clone());
        catalog.add_hook(SignalHook { products, filters });

        let view = Memo::new(move |_| {
            products.with(|p| filters.with(|f| derive_view(&p.items, f)))
        });

        Self {
            catalog: StoredValue::new_local(catalog),
            products,
            filters,
            view,
        }
    }

    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        self.catalog.update_value(|catalog| catalog.dispatch(action));
    }

    /// Доступ к каталогу для операций, которым нужен результат
    pub fn with_catalog<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> Option<R> {
        self.catalog.try_update_value(f)
    }

    /// Запустить однократную загрузку начальных данных
    pub fn spawn_seed(self, config: SeedConfig) {
        self.dispatch(ProductsAction::SetLoading(true));
        let source = HttpSeedSource::new(&config);
        log::info!("Fetching seed products from {}", source.url());
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_products(&source, &config).await;
            self.dispatch(seed_completion(result));
        });
    }
}

pub fn provide_catalog(ctx: CatalogContext) {
    provide_context(ctx);
}

pub fn use_catalog() -> CatalogContext {
    expect_context::<CatalogContext>()
}
