//! Theme Toggle

use leptos::*;

use crate::state::SiteState;

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let theme = state.theme.clone();
    let current = state.theme.theme;

    view! {
        <button
            id="theme-toggle"
            class="fixed top-4 right-4 z-[150] p-2 rounded-full text-gray-500 hover:text-gray-700 dark:text-gray-400 dark:hover:text-gray-200"
            aria-label="Toggle dark mode"
            on:click=move |_| theme.toggle()
        >
            {move || if current.get().is_dark() { "☀" } else { "☾" }}
        </button>
    }
}
