//! Global Site State
//!
//! Stores provided to all components through context.

use leptos::*;

use super::audio::AudioPlayer;
use super::chat::ChatStore;
use super::dom::load_config;
use super::overlay::OverlayStore;
use super::panel::PanelStore;
use super::theme::ThemeState;

#[derive(Clone)]
pub struct SiteState {
    pub overlay: OverlayStore,
    pub theme: ThemeState,
    pub audio: AudioPlayer,
    pub chat: ChatStore,
    pub panel: PanelStore,
}

/// Build the stores and provide them to the component tree
pub fn provide_site_state() -> SiteState {
    let config = load_config();
    let theme = ThemeState::new();

    let state = SiteState {
        overlay: OverlayStore::new(&config),
        audio: AudioPlayer::new(),
        chat: ChatStore::new(&config),
        panel: PanelStore::new(&config, theme.theme.get_untracked()),
        theme,
    };

    // Charts and the booking embed follow the theme
    let panel = state.panel.clone();
    let theme_signal = state.theme.theme;
    create_effect(move |_| panel.set_theme(theme_signal.get()));

    provide_context(state.clone());
    state
}
