use contracts::projections::p900_catalog_view::range_label;
use leptos::prelude::*;

use crate::store::{provide_catalog, use_catalog, CatalogContext};

#[component]
pub fn App(ctx: CatalogContext) -> impl IntoView {
    // Каталог доступен всему приложению через контекст
    provide_catalog(ctx);

    view! {
        <CatalogStatus />
    }
}

/// Строка состояния каталога: загрузка, ошибка или сводка по выборке
#[component]
fn CatalogStatus() -> impl IntoView {
    let catalog = use_catalog();

    move || {
        let (loading, error, total_items) = catalog
            .products
            .with(|p| (p.loading, p.error.clone(), p.items.len()));

        if loading {
            return view! { <p class="catalog-status">"Loading products..."</p> }.into_any();
        }
        if let Some(message) = error {
            return view! { <p class="catalog-status catalog-status--error">{message}</p> }
                .into_any();
        }

        let matched = catalog.view.with(|v| v.total_count);
        let (page, per_page) = catalog
            .filters
            .with(|f| (f.current_page, f.items_per_page));
        let summary = format!(
            "{} of {} products, {}",
            matched,
            total_items,
            range_label(page, per_page, matched)
        );
        view! { <p class="catalog-status">{summary}</p> }.into_any()
    }
}
