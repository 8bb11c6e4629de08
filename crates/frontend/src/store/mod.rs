//! Состояние каталога: хранилища, хуки после мутаций и холодный старт.

pub mod bootstrap;
pub mod catalog;
pub mod context;
pub mod filter;
pub mod persistence;
pub mod products;

pub use catalog::{Action, Catalog, CatalogState, StoreHook};
pub use context::{provide_catalog, use_catalog, CatalogContext};
pub use filter::FilterAction;
pub use products::{ProductsAction, ProductsState};
