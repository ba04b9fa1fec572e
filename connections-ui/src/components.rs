use connection_tree::page::page_status_text;
use connection_tree::render::{connections_label, marker, points_label};
use connection_tree::{
    activate, load_page, ConnectionTree, NodeKey, PageState, RenderRow, TreeHandle,
};
use dioxus::prelude::*;

use crate::api::HttpFetcher;

const INDENT_PX: usize = 28;

/// Reaches the loaded tree through the page signal, for as long as the
/// component owning the signal is alive.
#[derive(Clone, Copy)]
struct PageSignal(Signal<PageState>);

impl TreeHandle for PageSignal {
    fn with_tree<R>(&self, f: impl FnOnce(&mut ConnectionTree) -> R) -> Option<R> {
        let mut signal = self.0;
        let mut page = signal.try_write().ok()?;
        let result = page.tree_mut().map(f);
        result
    }
}

#[component]
pub fn BusinessConnections() -> Element {
    let mut page = use_signal(PageState::default);

    // Load identity, then the root of the tree, on mount
    use_effect(move || {
        spawn(async move {
            let fetcher = HttpFetcher::from_location();
            page.set(load_page(&fetcher).await);
        });
    });

    let on_activate = use_callback(move |key: NodeKey| {
        // Cancelled with the component; a dropped view never sees the result
        spawn(async move {
            let fetcher = HttpFetcher::from_location();
            match activate(PageSignal(page), &fetcher, key).await {
                Ok(report) => {
                    dioxus_logger::tracing::debug!("Activated node {}: {:?}", key, report);
                }
                Err(e) => {
                    dioxus_logger::tracing::error!("Failed to activate node: {}", e);
                }
            }
        });
    });

    let status = page_status_text(&page.read());
    let color = status_color(&page.read());
    let rows = page.read().tree().map(|tree| tree.rows()).unwrap_or_default();

    if let Some(status) = status {
        return rsx! {
            div {
                class: "connections-status",
                style: "padding: 1.5rem; color: {color};",
                "{status}"
            }
        };
    }

    rsx! {
        div {
            class: "business-connections",
            style: "padding: 1.5rem; overflow-x: auto;",

            h2 {
                style: "font-size: 1.125rem; font-weight: 600; color: #1f2937; margin-bottom: 2rem; text-align: center;",
                "🌐 My Business Connections"
            }

            div {
                class: "connections-tree",
                style: "display: flex; flex-direction: column; gap: 0.75rem; max-width: 100%;",
                for row in rows {
                    ConnectionCard { key: "{row.key}", row: row.clone(), on_activate }
                }
            }
        }
    }
}

fn status_color(state: &PageState) -> &'static str {
    match state {
        PageState::NotFound => "#ef4444",
        _ => "#6b7280",
    }
}

#[component]
pub fn ConnectionCard(row: RenderRow, on_activate: Callback<NodeKey>) -> Element {
    let key = row.key;
    let indent = row.depth * INDENT_PX;
    let points = points_label(&row.profile);
    let connections = connections_label(&row.profile);
    let cursor = if row.expandable { "pointer" } else { "default" };
    let border = if row.depth > 0 {
        "border-left: 1px solid #d1d5db; padding-left: 0.75rem;"
    } else {
        ""
    };

    rsx! {
        div {
            style: "margin-left: {indent}px; {border}",

            div {
                class: "connection-card",
                style: "display: flex; align-items: center; gap: 0.75rem; padding: 0.75rem; background: white; border: 1px solid #e5e7eb; border-radius: 12px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); cursor: {cursor};",
                onclick: move |_| on_activate.call(key),

                img {
                    src: "{row.profile.profile_image_path}",
                    alt: "{row.profile.display_name}",
                    style: "width: 3.5rem; height: 3.5rem; border-radius: 9999px; border: 1px solid #e5e7eb; object-fit: cover;",
                }

                div {
                    style: "flex: 1; min-width: 0;",
                    h4 {
                        style: "font-size: 0.875rem; font-weight: 600; color: #1f2937;",
                        "{row.profile.display_name}"
                    }
                    p {
                        style: "font-size: 0.75rem; color: #6b7280;",
                        "{points}"
                    }
                    p {
                        style: "font-size: 0.625rem; color: #9ca3af; margin-top: 0.25rem;",
                        "{connections}"
                    }
                }

                if let Some(logo) = row.profile.company_logo.clone() {
                    img {
                        src: "{logo}",
                        alt: "company logo",
                        style: "width: 2rem; height: 2rem; object-fit: contain;",
                    }
                }

                if row.expandable {
                    span {
                        style: "color: #6b7280;",
                        {marker(&row)}
                    }
                }
            }

            if row.loading {
                div {
                    style: "font-size: 0.75rem; color: #6b7280; margin: 0.5rem 0 0 {INDENT_PX}px;",
                    "Loading..."
                }
            }
        }
    }
}
