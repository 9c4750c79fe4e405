//! Chat Widget Component
//!
//! Floating assistant chat. Replies with an audio url get a play button
//! that goes through the shared audio player.

use leptos::*;

use folio::chat::{ChatMessage, Speaker};

use super::loading::TypingIndicator;
use crate::state::SiteState;

#[component]
pub fn ChatWidget() -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let chat = state.chat.clone();
    let audio = state.audio.clone();
    let open = state.chat.open;
    let messages = state.chat.messages;
    let typing = state.chat.typing;

    let (input, set_input) = create_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if chat.send(&input.get_untracked()) {
            set_input.set(String::new());
        }
    };

    view! {
        <div class="fixed bottom-4 right-4 z-[150]">
            <button
                id="chat-toggle"
                class="w-14 h-14 rounded-full bg-blue-600 hover:bg-blue-700 text-white shadow-lg"
                aria-label="Chat"
                on:click=move |_| {
                    // closing the window silences any reply still playing
                    if open.get_untracked() {
                        audio.stop();
                    }
                    open.update(|o| *o = !*o);
                }
            >
                {move || if open.get() { "✕" } else { "💬" }}
            </button>

            <div
                id="chat-window"
                class="absolute bottom-16 right-0 w-80 h-[28rem] flex flex-col rounded-lg shadow-xl bg-white dark:bg-[#1a1a1a] text-gray-900 dark:text-white"
                class:hidden=move || !open.get()
            >
                <div id="chat-messages" class="flex-1 overflow-y-auto p-4 space-y-3">
                    <For
                        each=move || messages.get().into_iter().enumerate()
                        key=|(i, m)| (*i, m.text.clone())
                        children=|(_, message)| view! { <Bubble message=message /> }
                    />
                    {move || typing.get().then(|| view! { <TypingIndicator /> })}
                </div>

                <form on:submit=on_submit class="flex border-t border-gray-200 dark:border-gray-800">
                    <input
                        id="chat-input"
                        type="text"
                        class="flex-1 px-3 py-2 bg-transparent outline-none"
                        placeholder="Ask me anything..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                    />
                    <button type="submit" class="px-4 text-blue-600 dark:text-blue-400">
                        "Send"
                    </button>
                </form>
            </div>
        </div>
    }
}

#[component]
fn Bubble(message: ChatMessage) -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let audio = state.audio.clone();

    let class = match (message.speaker, message.is_error) {
        (_, true) => "mr-8 rounded-lg px-3 py-2 bg-red-100 text-red-700 dark:bg-red-900/40 dark:text-red-300",
        (Speaker::User, false) => "ml-8 rounded-lg px-3 py-2 bg-blue-600 text-white",
        (Speaker::Ai, false) => "mr-8 rounded-lg px-3 py-2 bg-gray-100 dark:bg-gray-800",
    };

    let play = message.audio_url.clone().map(|url| {
        view! {
            <button
                class="ml-2 text-xs text-blue-600 dark:text-blue-400"
                aria-label="Play reply"
                on:click=move |_| audio.play(&url)
            >
                "▶"
            </button>
        }
    });

    view! {
        <div class=class>
            <span>{message.text}</span>
            {play}
        </div>
    }
}
