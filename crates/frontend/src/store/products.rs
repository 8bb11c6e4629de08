use std::collections::{BTreeSet, HashSet};

use contracts::domain::a001_product::{Product, ProductId};

/// Нижняя граница максимума для ползунка цены
const MIN_PRICE_SLIDER_MAX: f64 = 1000.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductsState {
    /// Новые пользовательские товары идут первыми
    pub items: Vec<Product>,

    // Флаги загрузки начальных данных
    pub loading: bool,
    pub error: Option<String>,

    /// Множественный выбор: только ID из `items`, без повторов
    pub selected_ids: Vec<ProductId>,
}

/// Мутации хранилища товаров
#[derive(Clone, Debug, PartialEq)]
pub enum ProductsAction {
    SetProducts(Vec<Product>),
    SetLoading(bool),
    SetError(Option<String>),
    AddProduct(Product),
    DeleteProduct(ProductId),
    UpdateProduct(Product),
    ToggleFavorite(ProductId),
    ToggleSelection(ProductId),
    SelectAll(Vec<ProductId>),
    ClearSelection,
    DeleteSelected,
}

impl ProductsAction {
    /// Меняет ли действие поля, которые попадают в сохранённую запись
    pub fn touches_persisted(&self) -> bool {
        !matches!(self, Self::SetLoading(_) | Self::SetError(_))
    }
}

impl ProductsState {
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.items.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_selected(&self, id: &ProductId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Уникальные непустые категории, по алфавиту
    pub fn categories(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.items
            .iter()
            .any(|p| p.category.as_deref() == Some(category))
    }

    /// Максимум для ползунка цены: наибольшая цена, но не меньше 1000
    pub fn max_price(&self) -> f64 {
        self.items
            .iter()
            .map(|p| p.price)
            .fold(MIN_PRICE_SLIDER_MAX, f64::max)
    }

    fn prune_selection(&mut self) {
        let known: HashSet<&ProductId> = self.items.iter().map(|p| &p.id).collect();
        self.selected_ids.retain(|id| known.contains(id));
    }
}

/// Применить действие. Действие над отсутствующим ID ничего не меняет.
pub fn reduce(state: &mut ProductsState, action: ProductsAction) {
    match action {
        ProductsAction::SetProducts(items) => {
            state.items = items;
            state.loading = false;
            state.error = None;
            state.prune_selection();
        }
        ProductsAction::SetLoading(flag) => {
            state.loading = flag;
        }
        ProductsAction::SetError(message) => {
            state.error = message;
            state.loading = false;
        }
        ProductsAction::AddProduct(product) => {
            if state.contains(&product.id) {
                log::warn!("Product {} already exists, add ignored", product.id);
                return;
            }
            state.items.insert(0, product);
        }
        ProductsAction::DeleteProduct(id) => {
            state.items.retain(|p| p.id != id);
            state.selected_ids.retain(|s| s != &id);
        }
        ProductsAction::UpdateProduct(product) => {
            if let Some(slot) = state.items.iter_mut().find(|p| p.id == product.id) {
                *slot = product;
            }
        }
        ProductsAction::ToggleFavorite(id) => {
            if let Some(product) = state.items.iter_mut().find(|p| p.id == id) {
                product.is_favorite = !product.is_favorite;
            }
        }
        ProductsAction::ToggleSelection(id) => {
            if let Some(pos) = state.selected_ids.iter().position(|s| s == &id) {
                state.selected_ids.remove(pos);
            } else if state.contains(&id) {
                state.selected_ids.push(id);
            }
        }
        ProductsAction::SelectAll(ids) => {
            let mut selected: Vec<ProductId> = Vec::with_capacity(ids.len());
            for id in ids {
                if state.contains(&id) && !selected.contains(&id) {
                    selected.push(id);
                }
            }
            state.selected_ids = selected;
        }
        ProductsAction::ClearSelection => {
            state.selected_ids.clear();
        }
        ProductsAction::DeleteSelected => {
            let selected: HashSet<ProductId> = state.selected_ids.drain(..).collect();
            state.items.retain(|p| !selected.contains(&p.id));
        }
    }
}
