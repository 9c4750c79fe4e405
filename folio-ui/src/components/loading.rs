//! Loading Component
//!
//! Spinners and the chat typing indicator.

use leptos::*;

/// Centered loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}

/// Three bouncing dots shown while the assistant is replying
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="flex space-x-1 px-4 py-3 typing-indicator">
            {(0..3).map(|i| view! {
                <span
                    class="w-2 h-2 bg-gray-400 rounded-full animate-bounce"
                    style=format!("animation-delay: {}ms", i * 150)
                />
            }).collect_view()}
        </div>
    }
}
