pub mod app;
pub mod domain;
pub mod shared;
pub mod store;

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::app::App;
use crate::shared::config::{load_config, page_config_override};
use crate::shared::storage::BrowserStorage;
use crate::store::bootstrap::needs_seed;
use crate::store::persistence::{restore, PersistenceHook, RestoreOutcome};
use crate::store::{Catalog, CatalogContext};

#[wasm_bindgen]
pub fn hydrate() {
    // логирование через крейт `log`
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    let config = load_config(page_config_override().as_deref());
    let mut catalog = Catalog::new(config.view.clone());

    // Восстановление до первого рендера; без хранилища каталог живёт только в памяти
    let outcome = match BrowserStorage::local() {
        Ok(storage) => {
            let storage = Rc::new(storage);
            catalog.add_hook(PersistenceHook::new(storage.clone(), config.storage.clone()));
            restore(&mut catalog, &*storage, &config.storage)
        }
        Err(e) => {
            log::error!("Persistence disabled: {}", e);
            RestoreOutcome::default()
        }
    };

    let seed = needs_seed(outcome, &catalog);
    let ctx = CatalogContext::new(catalog);
    if seed {
        ctx.spawn_seed(config.seed.clone());
    }

    leptos::mount::mount_to_body(move || view! { <App ctx=ctx /> });
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
