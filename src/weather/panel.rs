use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::model::{CurrentSummary, WeatherReport};
use super::series::{local_time, WeatherCharts};
use super::{fetch_report, WeatherError, WeatherSource};
use crate::config::Config;
use crate::schedule::BookingEmbed;
use crate::theme::Theme;

pub const LOAD_ERROR: &str = "Failed to load weather data";
pub const DISPLAY_ERROR: &str = "Error displaying weather data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelView {
    #[default]
    Weather,
    Schedule,
}

impl PanelView {
    pub fn as_str(self) -> &'static str {
        match self {
            PanelView::Weather => "weather",
            PanelView::Schedule => "schedule",
        }
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weather" => Ok(PanelView::Weather),
            "schedule" => Ok(PanelView::Schedule),
            other => Err(format!("unknown panel view: {}", other)),
        }
    }
}

/// Everything the weather view renders
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDisplay {
    pub location: String,
    pub local_time: String,
    pub summary: CurrentSummary,
    pub charts: WeatherCharts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    Weather(Box<WeatherDisplay>),
    Schedule { url: String },
    Error(String),
}

/// Weather/schedule panel state. Weather data is fetched at most once per
/// panel; failures are not cached so the next visit retries.
#[derive(Debug, Clone)]
pub struct WeatherPanel {
    view: PanelView,
    open: bool,
    report: Option<WeatherReport>,
    fetching: bool,
    load_failed: bool,
    theme: Theme,
    location: String,
    embed: BookingEmbed,
}

impl WeatherPanel {
    pub fn new(location: impl Into<String>, embed: BookingEmbed, theme: Theme) -> Self {
        Self {
            view: PanelView::default(),
            open: false,
            report: None,
            fetching: false,
            load_failed: false,
            theme,
            location: location.into(),
            embed,
        }
    }

    pub fn from_config(config: &Config, theme: Theme) -> Self {
        Self::new(
            config.weather.location_label.clone(),
            BookingEmbed::from_config(&config.schedule),
            theme,
        )
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn view(&self) -> PanelView {
        self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    /// Show the panel on its current view. Returns whether a fetch is needed.
    pub fn open(&mut self) -> bool {
        self.open = true;
        tracing::info!("Weather panel opened on {} view", self.view);
        self.needs_fetch()
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns whether a fetch is needed
    pub fn switch_view(&mut self, view: PanelView) -> bool {
        if view != self.view {
            tracing::debug!("Weather panel view {} -> {}", self.view, view);
            self.view = view;
        }
        self.needs_fetch()
    }

    /// Returns whether anything on screen depends on the theme
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if theme == self.theme {
            return false;
        }
        self.theme = theme;
        self.open
    }

    pub fn needs_fetch(&self) -> bool {
        self.open && self.view == PanelView::Weather && self.report.is_none() && !self.fetching
    }

    /// Mark a fetch in flight. False when nothing needs fetching.
    pub fn begin_fetch(&mut self) -> bool {
        if !self.needs_fetch() {
            return false;
        }
        self.fetching = true;
        self.load_failed = false;
        true
    }

    pub fn finish_fetch(&mut self, result: Result<WeatherReport, WeatherError>) {
        self.fetching = false;
        match result {
            Ok(report) => {
                tracing::info!("Weather data cached ({} forecast entries)", report.forecast.list.len());
                self.report = Some(report);
            }
            Err(e) => {
                tracing::warn!("Error fetching weather data: {}", e);
                self.load_failed = true;
            }
        }
    }

    /// Fetch if needed, then render the current view
    pub async fn load<S: WeatherSource + ?Sized>(&mut self, source: &S, now: DateTime<Utc>) -> PanelContent {
        if self.begin_fetch() {
            let result = fetch_report(source).await;
            self.finish_fetch(result);
        }
        self.content(now)
    }

    pub fn content(&self, now: DateTime<Utc>) -> PanelContent {
        match self.view {
            PanelView::Schedule => PanelContent::Schedule {
                url: self.embed.url(self.theme),
            },
            PanelView::Weather => {
                if self.fetching {
                    return PanelContent::Loading;
                }
                match &self.report {
                    Some(report) => match report.summary() {
                        Ok(summary) => {
                            let offset = report.utc_offset();
                            PanelContent::Weather(Box::new(WeatherDisplay {
                                location: self.location.clone(),
                                local_time: local_time(now, offset),
                                summary,
                                charts: WeatherCharts::from_forecast(&report.forecast, offset),
                            }))
                        }
                        Err(e) => {
                            tracing::warn!("Error displaying weather data: {}", e);
                            PanelContent::Error(DISPLAY_ERROR.to_string())
                        }
                    },
                    None if self.load_failed => PanelContent::Error(LOAD_ERROR.to_string()),
                    None => PanelContent::Loading,
                }
            }
        }
    }

    /// Header clock at the forecast location, once its offset is known
    pub fn clock(&self, now: DateTime<Utc>) -> Option<String> {
        self.report
            .as_ref()
            .map(|report| local_time(now, report.utc_offset()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{weather_report, StubWeather};
    use chrono::TimeZone;

    fn panel() -> WeatherPanel {
        WeatherPanel::from_config(&Config::default(), Theme::Light)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 4, 20, 5, 0).unwrap()
    }

    #[tokio::test]
    async fn test_weather_is_fetched_once() {
        let source = StubWeather::ok(weather_report());
        let mut panel = panel();

        assert!(panel.open());
        let content = panel.load(&source, now()).await;
        let PanelContent::Weather(display) = content else {
            panic!("expected weather, got {:?}", content);
        };
        assert_eq!(display.location, "Austin, Texas");
        assert_eq!(display.local_time, "3:05 PM");
        assert_eq!(display.summary.icon_class, "wi-day-sunny");

        panel.close();
        assert!(!panel.open());
        panel.load(&source, now()).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_caches_nothing() {
        let source = StubWeather::failing();
        let mut panel = panel();
        panel.open();

        assert_eq!(
            panel.load(&source, now()).await,
            PanelContent::Error(LOAD_ERROR.to_string())
        );
        assert!(panel.report().is_none());

        // next visit retries
        panel.close();
        assert!(panel.open());
        panel.load(&source, now()).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_bad_shape_shows_display_error() {
        let mut report = weather_report();
        report.current.weather.clear();
        let source = StubWeather::ok(report);
        let mut panel = panel();
        panel.open();

        assert_eq!(
            panel.load(&source, now()).await,
            PanelContent::Error(DISPLAY_ERROR.to_string())
        );
    }

    #[tokio::test]
    async fn test_schedule_view_skips_fetch_and_follows_theme() {
        let source = StubWeather::ok(weather_report());
        let mut panel = panel();

        assert!(!panel.switch_view(PanelView::Schedule));
        assert!(!panel.open());
        let PanelContent::Schedule { url } = panel.load(&source, now()).await else {
            panic!("expected schedule");
        };
        assert!(url.contains("theme=light"));
        assert_eq!(source.calls(), 0);

        assert!(panel.set_theme(Theme::Dark));
        let PanelContent::Schedule { url } = panel.content(now()) else {
            panic!("expected schedule");
        };
        assert!(url.contains("theme=dark"));
    }

    #[test]
    fn test_theme_change_on_closed_panel_needs_no_redraw() {
        let mut panel = panel();
        assert!(!panel.set_theme(Theme::Dark));
        assert!(!panel.set_theme(Theme::Dark));
    }

    #[test]
    fn test_loading_while_fetching() {
        let mut panel = panel();
        panel.open();
        assert!(panel.begin_fetch());
        assert!(!panel.begin_fetch());
        assert_eq!(panel.content(now()), PanelContent::Loading);
        assert!(panel.clock(now()).is_none());

        panel.finish_fetch(Ok(weather_report()));
        assert_eq!(panel.clock(now()).as_deref(), Some("3:05 PM"));
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("Schedule".parse::<PanelView>(), Ok(PanelView::Schedule));
        assert!("radar".parse::<PanelView>().is_err());
    }
}
