//! Холодный старт: восстановление из хранилища, затем (при необходимости)
//! однократная загрузка начальных данных.

use contracts::domain::a001_product::Product;

use super::catalog::Catalog;
use super::persistence::{restore, RestoreOutcome};
use super::products::ProductsAction;
use crate::domain::a001_product::api::{fetch_products, SeedSource, SEED_FAILURE_MESSAGE};
use crate::shared::config::CatalogConfig;
use crate::shared::error::FetchError;
use crate::shared::storage::KeyValueStorage;

/// Нужна ли загрузка: записи товаров нет и хранилище пусто
pub fn needs_seed(outcome: RestoreOutcome, catalog: &Catalog) -> bool {
    !outcome.products_restored && catalog.products().items.is_empty()
}

/// Действие, завершающее загрузку. Ошибка превращается в одно сообщение для UI.
pub fn seed_completion(result: Result<Vec<Product>, FetchError>) -> ProductsAction {
    match result {
        Ok(products) => ProductsAction::SetProducts(products),
        Err(e) => {
            log::error!("Error fetching products: {}", e);
            ProductsAction::SetError(Some(SEED_FAILURE_MESSAGE.to_string()))
        }
    }
}

/// Загрузить начальные данные в каталог. Повторных попыток нет.
pub async fn seed_catalog<S>(catalog: &mut Catalog, source: &S, config: &CatalogConfig)
where
    S: SeedSource + ?Sized,
{
    catalog.set_loading(true);
    let result = fetch_products(source, &config.seed).await;
    catalog.dispatch(seed_completion(result));
}

/// Полная последовательность холодного старта
pub async fn cold_start<S>(
    catalog: &mut Catalog,
    storage: &dyn KeyValueStorage,
    source: &S,
    config: &CatalogConfig,
) -> RestoreOutcome
where
    S: SeedSource + ?Sized,
{
    let outcome = restore(catalog, storage, &config.storage);
    if needs_seed(outcome, catalog) {
        seed_catalog(catalog, source, config).await;
    } else {
        log::debug!("Persisted products found, seed fetch skipped");
    }
    outcome
}
