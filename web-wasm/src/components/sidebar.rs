//! サイドバー（ページ切替）

use leptos::prelude::*;

/// 表示ページ
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dropzone,
    Evaluation,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dropzone => "Dropzone",
            Page::Evaluation => "Evaluation",
        }
    }
}

#[component]
pub fn Sidebar(page: ReadSignal<Page>, set_page: WriteSignal<Page>) -> impl IntoView {
    let nav_button = move |target: Page| {
        view! {
            <button
                class=move || {
                    if page.get() == target { "btn btn-primary" } else { "btn btn-outline" }
                }
                on:click=move |_| set_page.set(target)
            >
                {target.label()}
            </button>
        }
    };

    view! {
        <nav class="sidebar">
            <h2 class="sidebar-title">"Image Similarity"</h2>
            <div class="sidebar-links">
                {nav_button(Page::Dropzone)}
                {nav_button(Page::Evaluation)}
            </div>
        </nav>
    }
}
