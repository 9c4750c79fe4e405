//! Weather Panel Store

use gloo_timers::callback::{Interval, Timeout};
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use folio::config::Config;
use folio::theme::Theme;
use folio::weather::{fetch_report, PanelContent, PanelView, WeatherPanel};

use super::dom::timer_ms;
use crate::api::GlooWeatherSource;

#[derive(Clone)]
pub struct PanelStore {
    panel: Rc<RefCell<WeatherPanel>>,
    source: Rc<GlooWeatherSource>,
    clock_timer: Rc<RefCell<Option<Interval>>>,
    exit_ms: u32,
    /// Shell present in the document
    pub mounted: RwSignal<bool>,
    /// Exit animation running
    pub closing: RwSignal<bool>,
    pub view: RwSignal<PanelView>,
    pub content: RwSignal<PanelContent>,
    pub clock: RwSignal<Option<String>>,
    /// Bumped whenever charts must be redrawn
    pub redraw: RwSignal<u32>,
}

impl PanelStore {
    pub fn new(config: &Config, theme: Theme) -> Self {
        Self {
            panel: Rc::new(RefCell::new(WeatherPanel::from_config(config, theme))),
            source: Rc::new(GlooWeatherSource::new(config.weather.clone())),
            clock_timer: Rc::new(RefCell::new(None)),
            exit_ms: timer_ms(config.overlay.animation_ms),
            mounted: create_rw_signal(false),
            closing: create_rw_signal(false),
            view: create_rw_signal(PanelView::default()),
            content: create_rw_signal(PanelContent::Loading),
            clock: create_rw_signal(None),
            redraw: create_rw_signal(0),
        }
    }

    pub fn location(&self) -> String {
        self.panel.borrow().location().to_string()
    }

    fn render(&self) {
        let now = chrono::Utc::now();
        let (view, content, clock) = {
            let panel = self.panel.borrow();
            (panel.view(), panel.content(now), panel.clock(now))
        };
        self.view.set(view);
        self.content.set(content);
        self.clock.set(clock);
    }

    fn fetch_if_needed(&self, needed: bool) {
        if !needed || !self.panel.borrow_mut().begin_fetch() {
            return;
        }
        self.render();

        let store = self.clone();
        spawn_local(async move {
            let result = fetch_report(store.source.as_ref()).await;
            store.panel.borrow_mut().finish_fetch(result);
            store.render();
        });
    }

    pub fn open(&self) {
        let needed = self.panel.borrow_mut().open();
        self.closing.set(false);
        self.mounted.set(true);
        self.render();
        self.start_clock();
        self.fetch_if_needed(needed);
    }

    pub fn switch_view(&self, view: PanelView) {
        let needed = self.panel.borrow_mut().switch_view(view);
        self.render();
        self.fetch_if_needed(needed);
    }

    pub fn set_theme(&self, theme: Theme) {
        if self.panel.borrow_mut().set_theme(theme) {
            self.render();
            self.redraw.update(|n| *n += 1);
        }
    }

    /// Stop the clock, play the exit animation, then unmount
    pub fn close(&self) {
        if !self.mounted.get_untracked() || self.closing.get_untracked() {
            return;
        }
        self.panel.borrow_mut().close();
        self.clock_timer.borrow_mut().take();
        self.closing.set(true);

        let store = self.clone();
        Timeout::new(self.exit_ms, move || {
            // reopened during the animation
            if store.panel.borrow().is_open() {
                return;
            }
            store.mounted.set(false);
            store.closing.set(false);
        })
        .forget();
    }

    fn start_clock(&self) {
        let store = self.clone();
        let interval = Interval::new(1000, move || {
            let clock = store.panel.borrow().clock(chrono::Utc::now());
            store.clock.set(clock);
        });
        *self.clock_timer.borrow_mut() = Some(interval);
    }
}
