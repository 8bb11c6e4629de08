//! Сохранение состояния каталога в локальное хранилище.
//!
//! Две записи под фиксированными ключами:
//! * товары — `{ "items": [...], "selectedIds": [...] }`
//! * настройки представления — `FilterState` целиком.
//!
//! После каждой мутации пишутся обе записи. Исключение: флаги загрузки
//! (`SetLoading`/`SetError`) не пишут ничего, а запись товаров не создаётся,
//! пока хранилище товаров ни разу не заполнялось. Иначе неудачная загрузка
//! оставила бы пустую запись и перезагрузка не повторила бы её.
//!
//! Запись best-effort: ошибки пишутся в лог и не прерывают мутацию.

use std::collections::HashSet;
use std::rc::Rc;

use contracts::domain::a001_product::{Product, ProductId};
use contracts::domain::common::AggregateId;
use contracts::projections::p900_catalog_view::{FilterState, SortBy};
use serde::Serialize;
use serde_json::Value;

use super::catalog::{Action, Catalog, CatalogState, StoreHook};
use crate::shared::config::StorageConfig;
use crate::shared::error::StorageError;
use crate::shared::storage::KeyValueStorage;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductsRecord<'a> {
    items: &'a [Product],
    selected_ids: &'a [ProductId],
}

/// Хук, сохраняющий снимок после каждой мутации
pub struct PersistenceHook<S: KeyValueStorage> {
    storage: Rc<S>,
    keys: StorageConfig,
    /// Хранилище товаров хотя бы раз заполнено (загрузка, восстановление или правка)
    products_live: bool,
}

impl<S: KeyValueStorage> PersistenceHook<S> {
    pub fn new(storage: Rc<S>, keys: StorageConfig) -> Self {
        Self {
            storage,
            keys,
            products_live: false,
        }
    }

    fn write_products(&self, state: &CatalogState) -> Result<(), StorageError> {
        let record = ProductsRecord {
            items: &state.products.items,
            selected_ids: &state.products.selected_ids,
        };
        self.write(&self.keys.products_key, &record)
    }

    fn write_filters(&self, state: &CatalogState) -> Result<(), StorageError> {
        self.write(&self.keys.filters_key, &state.filters)
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.storage.set_item(key, &raw)
    }
}

impl<S: KeyValueStorage> StoreHook for PersistenceHook<S> {
    fn after_mutation(&mut self, action: &Action, state: &CatalogState) {
        match action {
            Action::Products(a) if !a.touches_persisted() => return,
            Action::Products(_) => self.products_live = true,
            Action::Filter(_) => {}
        }

        if self.products_live {
            if let Err(e) = self.write_products(state) {
                log::error!("Failed to save products to localStorage: {}", e);
            }
        }
        if let Err(e) = self.write_filters(state) {
            log::error!("Failed to save filter state to localStorage: {}", e);
        }
    }
}

/// Результат восстановления
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreOutcome {
    /// Найдена (и разобрана) запись товаров
    pub products_restored: bool,
    /// Найдена (и разобрана) запись настроек
    pub filters_restored: bool,
}

/// Прочитать обе записи и применить их через обычные операции хранилищ.
/// Каждое отсутствующее или повреждённое поле получает значение по умолчанию.
///
/// Обе записи читаются до применения: хуки перезаписывают их по ходу.
pub fn restore(
    catalog: &mut Catalog,
    storage: &dyn KeyValueStorage,
    keys: &StorageConfig,
) -> RestoreOutcome {
    let products = read_record(storage, &keys.products_key);
    let filters = read_record(storage, &keys.filters_key);
    let outcome = RestoreOutcome {
        products_restored: products.is_some(),
        filters_restored: filters.is_some(),
    };

    if let Some(record) = products {
        apply_products_record(catalog, &record);
    }
    if let Some(record) = filters {
        apply_filters_record(catalog, &record);
    }

    log::info!(
        "Restored catalog state: products={}, filters={}",
        outcome.products_restored,
        outcome.filters_restored
    );
    outcome
}

fn read_record(storage: &dyn KeyValueStorage, key: &str) -> Option<Value> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            log::error!("Failed to load persisted state: {}", e);
            return None;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Persisted record '{}' is not valid JSON: {}", key, e);
            None
        }
    }
}

fn apply_products_record(catalog: &mut Catalog, record: &Value) {
    let mut seen: HashSet<ProductId> = HashSet::new();
    let items: Vec<Product> = record
        .get("items")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match serde_json::from_value::<Product>(entry.clone()) {
                    Ok(product) if is_restorable(&product) => Some(product),
                    Ok(product) => {
                        log::warn!("Skipping invalid persisted product '{}'", product.id);
                        None
                    }
                    Err(e) => {
                        log::warn!("Skipping malformed persisted product: {}", e);
                        None
                    }
                })
                .filter(|product| seen.insert(product.id.clone()))
                .collect()
        })
        .unwrap_or_default();

    let selected: Vec<ProductId> = record
        .get("selectedIds")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .filter_map(|id| ProductId::from_string(id).ok())
                .collect()
        })
        .unwrap_or_default();

    catalog.set_products(items);
    if !selected.is_empty() {
        catalog.select_all(selected);
    }
}

/// Товар из записи должен иметь непустой id и конечную неотрицательную цену
fn is_restorable(product: &Product) -> bool {
    ProductId::from_string(product.id.as_str()).is_ok()
        && product.price.is_finite()
        && product.price >= 0.0
}

fn apply_filters_record(catalog: &mut Catalog, record: &Value) {
    let defaults = FilterState::new(
        catalog.rules().price_ceiling,
        catalog.rules().default_items_per_page,
    );

    let search_term = record
        .get("searchTerm")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let favorites_only = record
        .get("showFavoritesOnly")
        .and_then(Value::as_bool)
        .unwrap_or(defaults.show_favorites_only);

    let (low, high) = record
        .get("priceRange")
        .and_then(Value::as_array)
        .and_then(|bounds| match bounds.as_slice() {
            [low, high] => Some((low.as_f64()?, high.as_f64()?)),
            _ => None,
        })
        .unwrap_or(defaults.price_range);

    let category = record
        .get("selectedCategory")
        .and_then(Value::as_str)
        .map(str::to_string);

    let sort_by = record
        .get("sortBy")
        .and_then(Value::as_str)
        .and_then(SortBy::parse)
        .unwrap_or(defaults.sort_by);

    let items_per_page = record
        .get("itemsPerPage")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| catalog.rules().allowed_page_sizes.contains(n))
        .unwrap_or(defaults.items_per_page);

    let current_page = record
        .get("currentPage")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n >= 1)
        .unwrap_or(defaults.current_page);

    catalog.set_search_term(search_term);
    catalog.set_show_favorites_only(favorites_only);
    catalog.set_price_range(low, high);
    catalog.set_selected_category(category);
    catalog.set_sort_by(sort_by);
    // Размер страницы сбрасывает номер страницы, поэтому номер — последним
    catalog.set_items_per_page(items_per_page);
    catalog.set_current_page(current_page);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::ViewConfig;
    use crate::shared::storage::MemoryStorage;
    use contracts::domain::a001_product::ProductFormData;
    use serde_json::json;

    fn keys() -> StorageConfig {
        StorageConfig::default()
    }

    fn persisted_catalog(storage: &Rc<MemoryStorage>) -> Catalog {
        Catalog::new(ViewConfig::default())
            .with_hook(PersistenceHook::new(storage.clone(), keys()))
    }

    fn form(title: &str, category: Option<&str>) -> ProductFormData {
        ProductFormData {
            title: title.into(),
            description: "Long enough description".into(),
            image: "https://example.com/x.png".into(),
            price: 15.0,
            category: category.map(str::to_string),
        }
    }

    fn stored(storage: &MemoryStorage, key: &str) -> Value {
        serde_json::from_str(&storage.get_item(key).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn mutations_write_snapshots() {
        let storage = Rc::new(MemoryStorage::new());
        let mut catalog = persisted_catalog(&storage);

        let id = catalog.create_product(form("Mug", None)).unwrap();
        catalog.toggle_selection(id.clone());
        catalog.set_search_term("mu");

        let products = stored(&storage, "producthub_products");
        assert_eq!(products["items"][0]["id"], id.as_str());
        assert_eq!(products["selectedIds"], json!([id.as_str()]));

        let filters = stored(&storage, "producthub_filters");
        assert_eq!(filters["searchTerm"], "mu");
        assert_eq!(filters["currentPage"], 1);
    }

    #[test]
    fn loading_flags_do_not_create_a_products_record() {
        let storage = Rc::new(MemoryStorage::new());
        let mut catalog = persisted_catalog(&storage);
        catalog.set_loading(true);
        catalog.set_error(Some("offline".into()));
        assert_eq!(storage.get_item("producthub_products").unwrap(), None);
    }

    #[test]
    fn product_mutation_also_refreshes_filters_record() {
        let storage = Rc::new(MemoryStorage::new());
        let mut catalog = persisted_catalog(&storage);
        let a = catalog.create_product(form("Mug", None)).unwrap();
        catalog.create_product(form("Cup", None)).unwrap();
        catalog.set_search_term("mug");

        // Запись настроек потеряна (например, отказ по квоте)
        storage.set_item("producthub_filters", "{}").unwrap();
        catalog.delete_product(a);

        assert_eq!(stored(&storage, "producthub_filters")["searchTerm"], "mug");
        let mut restored = Catalog::new(ViewConfig::default());
        restore(&mut restored, &*storage, &keys());
        assert_eq!(restored.filters().search_term, "mug");
        assert_eq!(restored.products().items.len(), 1);
    }

    #[test]
    fn rejected_filters_write_is_retried_by_next_mutation() {
        let storage = Rc::new(MemoryStorage::new());
        let mut sizing = persisted_catalog(&storage);
        let a = sizing.create_product(form("Mug", None)).unwrap();
        sizing.create_product(form("Cup", None)).unwrap();
        let two_items = storage.get_item("producthub_products").unwrap().unwrap().len();
        let filters = storage.get_item("producthub_filters").unwrap().unwrap().len();

        let storage = Rc::new(MemoryStorage::with_quota(two_items + filters + 2));
        let mut catalog = persisted_catalog(&storage);
        catalog.set_products(sizing.products().items.clone());
        catalog.set_search_term("mug");
        assert_eq!(stored(&storage, "producthub_filters")["searchTerm"], "");

        catalog.delete_product(a);

        assert_eq!(stored(&storage, "producthub_filters")["searchTerm"], "mug");
    }

    #[test]
    fn filter_changes_before_any_products_leave_no_products_record() {
        let storage = Rc::new(MemoryStorage::new());
        let mut catalog = persisted_catalog(&storage);
        catalog.set_search_term("mug");
        catalog.set_loading(true);
        catalog.set_error(Some("offline".into()));

        assert_eq!(storage.get_item("producthub_products").unwrap(), None);
        assert_eq!(stored(&storage, "producthub_filters")["searchTerm"], "mug");
    }

    #[test]
    fn restore_with_hook_attached_keeps_persisted_filters() {
        let storage = Rc::new(MemoryStorage::new());
        let mut first = persisted_catalog(&storage);
        first.create_product(form("Mug", Some("kitchen"))).unwrap();
        first.set_sort_by(SortBy::PriceAsc);
        first.set_selected_category(Some("kitchen".into()));

        let mut second = persisted_catalog(&storage);
        restore(&mut second, &*storage, &keys());

        assert_eq!(second.filters(), first.filters());
        assert_eq!(stored(&storage, "producthub_filters")["sortBy"], "price-asc");
    }

    #[test]
    fn write_failures_never_block_the_mutation() {
        let storage = Rc::new(MemoryStorage::with_quota(16));
        let mut catalog = persisted_catalog(&storage);

        let id = catalog.create_product(form("Too big to store", None)).unwrap();

        assert!(catalog.get_product(&id).is_some());
        assert_eq!(storage.get_item("producthub_products").unwrap(), None);
    }

    #[test]
    fn snapshot_round_trips_through_restore() {
        let storage = Rc::new(MemoryStorage::new());
        let mut original = persisted_catalog(&storage);
        for i in 0..30 {
            original
                .create_product(form(&format!("Item {i}"), Some("kitchen")))
                .unwrap();
        }
        let favorite = original.products().items[3].id.clone();
        original.toggle_favorite(favorite.clone());
        original.toggle_selection(favorite.clone());
        original.set_items_per_page(6);
        original.set_selected_category(Some("kitchen".into()));
        original.set_price_range(5.0, 500.0);
        original.set_sort_by(SortBy::Name);
        original.set_current_page(3);

        let mut restored = Catalog::new(ViewConfig::default());
        let outcome = restore(&mut restored, &*storage, &keys());

        assert!(outcome.products_restored);
        assert!(outcome.filters_restored);
        assert_eq!(restored.products().items, original.products().items);
        assert_eq!(restored.products().selected_ids, vec![favorite]);
        assert_eq!(restored.filters(), original.filters());
        assert_eq!(restored.filters().current_page, 3);
    }

    #[test]
    fn missing_records_restore_nothing() {
        let storage = MemoryStorage::new();
        let mut catalog = Catalog::default();
        let outcome = restore(&mut catalog, &storage, &keys());
        assert_eq!(outcome, RestoreOutcome::default());
        assert!(catalog.products().items.is_empty());
        assert_eq!(catalog.filters(), &FilterState::default());
    }

    #[test]
    fn malformed_fields_fall_back_one_by_one() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                "producthub_products",
                &json!({
                    "items": [
                        {"id": "1", "title": "Good", "description": "d", "image": "i",
                         "price": 5, "createdAt": "2024-01-01", "source": "api"},
                        {"id": "2", "title": 42},
                        {"id": "1", "title": "Duplicate", "description": "d", "image": "i",
                         "price": 5, "createdAt": "2024-01-01"}
                    ],
                    "selectedIds": "oops"
                })
                .to_string(),
            )
            .unwrap();
        storage
            .set_item(
                "producthub_filters",
                &json!({
                    "searchTerm": 7,
                    "showFavoritesOnly": true,
                    "priceRange": [1, "x"],
                    "sortBy": "price-desc",
                    "currentPage": 0,
                    "itemsPerPage": 13
                })
                .to_string(),
            )
            .unwrap();

        let mut catalog = Catalog::default();
        restore(&mut catalog, &storage, &keys());

        let items = &catalog.products().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Good");
        assert!(catalog.products().selected_ids.is_empty());

        let expected = FilterState {
            show_favorites_only: true,
            sort_by: SortBy::PriceDesc,
            ..FilterState::default()
        };
        assert_eq!(catalog.filters(), &expected);
    }

    #[test]
    fn invalid_prices_and_blank_ids_are_skipped() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                "producthub_products",
                &json!({
                    "items": [
                        {"id": "1", "title": "Negative", "description": "d", "image": "i",
                         "price": -5, "createdAt": "2024-01-01"},
                        {"id": " ", "title": "Blank", "description": "d", "image": "i",
                         "price": 5, "createdAt": "2024-01-01"},
                        {"id": "2", "title": "Free", "description": "d", "image": "i",
                         "price": 0, "createdAt": "2024-01-01"}
                    ],
                    "selectedIds": ["", "2"]
                })
                .to_string(),
            )
            .unwrap();

        let mut catalog = Catalog::default();
        restore(&mut catalog, &storage, &keys());

        let items = &catalog.products().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Free");
        assert_eq!(catalog.products().selected_ids, vec![ProductId::from("2")]);
    }

    #[test]
    fn unparseable_record_counts_as_missing() {
        let storage = MemoryStorage::new();
        storage.set_item("producthub_products", "{not json").unwrap();
        let mut catalog = Catalog::default();
        let outcome = restore(&mut catalog, &storage, &keys());
        assert!(!outcome.products_restored);
    }

    #[test]
    fn restored_category_must_exist() {
        let storage = MemoryStorage::new();
        storage
            .set_item("producthub_products", &json!({"items": []}).to_string())
            .unwrap();
        storage
            .set_item(
                "producthub_filters",
                &json!({"selectedCategory": "garden"}).to_string(),
            )
            .unwrap();
        let mut catalog = Catalog::default();
        restore(&mut catalog, &storage, &keys());
        assert_eq!(catalog.filters().selected_category, None);
    }
}
