//! Weather/Schedule Panel Component

use leptos::*;

use folio::weather::{PanelContent, PanelView, WeatherDisplay};

use super::chart::{ChartKind, Series, SeriesChart};
use super::loading::Loading;
use crate::state::SiteState;

/// Header clock that opens the panel
#[component]
pub fn ClockButton() -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let panel = state.panel.clone();
    let clock = state.panel.clock;
    let location = state.panel.location();

    view! {
        <button
            id="weather-clock"
            class="block font-light text-gray-600 hover:text-gray-900 dark:text-gray-400 dark:hover:text-white"
            on:click=move |_| panel.open()
        >
            {move || clock.get().unwrap_or_else(|| location.clone())}
        </button>
    }
}

#[component]
pub fn WeatherPanelView() -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let store = state.panel.clone();
    let mounted = store.mounted;
    let closing = store.closing;
    let location = store.location();

    move || {
        if !mounted.get() {
            return view! {}.into_view();
        }
        let close_store = store.clone();
        let location = location.clone();
        let sheet_class = move || {
            if closing.get() {
                "absolute inset-y-0 right-0 w-full bg-white dark:bg-[#111111] text-gray-900 dark:text-white overflow-y-auto overlay-slide-down"
            } else {
                "absolute inset-y-0 right-0 w-full bg-white dark:bg-[#111111] text-gray-900 dark:text-white overflow-y-auto overlay-slide-up"
            }
        };

        view! {
            <div class="fixed inset-0 bg-black/50 z-[200]" id="weather-schedule-overlay">
                <div class=sheet_class>
                    <div class="sticky top-0 z-10 bg-white dark:bg-[#111111] border-b border-gray-200 dark:border-gray-800">
                        <div class="flex justify-between items-center px-6 py-4">
                            <h1 class="font-light text-[1.2rem]">{location}</h1>
                            <button
                                class="text-gray-500 hover:text-gray-700 dark:text-gray-400 dark:hover:text-gray-200"
                                aria-label="Close"
                                on:click=move |_| close_store.close()
                            >
                                "✕"
                            </button>
                        </div>
                    </div>

                    <div class="px-6 py-2 flex space-x-4">
                        <ViewToggle view=PanelView::Weather label="Weather" />
                        <ViewToggle view=PanelView::Schedule label="Schedule" />
                    </div>

                    <div class="pt-0 px-6 pb-6">
                        <PanelBody />
                    </div>
                </div>
            </div>
        }
        .into_view()
    }
}

#[component]
fn ViewToggle(view: PanelView, label: &'static str) -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let store = state.panel.clone();
    let current = state.panel.view;

    view! {
        <button
            class=move || {
                let base = "px-4 py-2 rounded-full text-sm font-medium transition-colors";
                if current.get() == view {
                    format!("{} bg-blue-600 dark:bg-blue-900 text-white dark:text-blue-100", base)
                } else {
                    format!("{} text-gray-500 hover:text-gray-700 dark:text-gray-400 dark:hover:text-gray-200", base)
                }
            }
            on:click=move |_| store.switch_view(view)
        >
            {label}
        </button>
    }
}

#[component]
fn PanelBody() -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let content = state.panel.content;

    move || match content.get() {
        PanelContent::Loading => view! { <Loading /> }.into_view(),
        PanelContent::Error(message) => view! {
            <div class="py-12 text-center text-red-500">{message}</div>
        }
        .into_view(),
        PanelContent::Schedule { url } => view! {
            <iframe
                src=url
                class="w-full min-h-[800px] border-0"
                loading="lazy"
                allowfullscreen=true
            />
        }
        .into_view(),
        PanelContent::Weather(display) => view! { <WeatherView display=*display /> }.into_view(),
    }
}

#[component]
fn WeatherView(display: WeatherDisplay) -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let theme = state.theme.theme;
    let dark = Signal::derive(move || theme.get().is_dark());
    let redraw = state.panel.redraw;

    let summary = display.summary;
    let charts = display.charts;

    let forecast_labels = charts.daily.iter().map(|d| d.weekday.clone()).collect::<Vec<_>>();
    let forecast_series = vec![
        Series { label: "High (°F)", color: "#EF4444", values: charts.daily.iter().map(|d| d.high as f64).collect() },
        Series { label: "Low (°F)", color: "#3B82F6", values: charts.daily.iter().map(|d| d.low as f64).collect() },
    ];

    let precip_labels = charts.precipitation.iter().map(|p| p.label.clone()).collect::<Vec<_>>();
    let precip_series = vec![Series {
        label: "Precipitation (%)",
        color: "#3B82F6",
        values: charts.precipitation.iter().map(|p| p.value as f64).collect(),
    }];

    let today_labels = charts.temperature.iter().map(|p| p.label.clone()).collect::<Vec<_>>();
    let today_series = vec![Series {
        label: "Temperature (°F)",
        color: "#3B82F6",
        values: charts.temperature.iter().map(|p| p.value as f64).collect(),
    }];

    let history_labels = charts.temperature_history.iter().map(|p| p.label.clone()).collect::<Vec<_>>();
    let history_series = vec![Series {
        label: "Temperature (°F)",
        color: "#3B82F6",
        values: charts.temperature_history.iter().map(|p| p.value as f64).collect(),
    }];

    let rain_labels = history_labels.clone();
    let rain_series = vec![Series {
        label: "Rain Volume (mm)",
        color: "#3B82F6",
        values: charts.rain_history.iter().map(|p| p.value).collect(),
    }];

    view! {
        <div class="space-y-8 overlay-content-slide">
            <div class="flex items-start gap-6">
                <div class="text-[96px]">
                    <i class=format!("wi {}", summary.icon_class) />
                </div>
                <div class="space-y-2">
                    <div class="text-4xl font-light">{display.local_time}</div>
                    <div class="flex items-center gap-2">
                        <div class="text-5xl font-light">{format!("{}°F", summary.temp)}</div>
                        <div class="text-xl text-gray-600 dark:text-gray-400">{summary.condition}</div>
                    </div>
                    <div class="text-sm text-gray-600 dark:text-gray-400">
                        {format!("Feels like {}°F • Humidity {}%", summary.feels_like, summary.humidity)}
                    </div>
                </div>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <ChartCard title="5-Day Forecast">
                    <SeriesChart
                        kind=ChartKind::Line
                        labels=forecast_labels
                        series=forecast_series
                        dark=dark
                        redraw=redraw
                    />
                </ChartCard>
                <ChartCard title="Precipitation">
                    <SeriesChart
                        kind=ChartKind::Bar
                        labels=precip_labels
                        series=precip_series
                        max=100.0
                        dark=dark
                        redraw=redraw
                    />
                </ChartCard>
                <ChartCard title="Next 24 Hours">
                    <SeriesChart
                        kind=ChartKind::Line
                        labels=today_labels
                        series=today_series
                        dark=dark
                        redraw=redraw
                    />
                </ChartCard>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <ChartCard title="Temperature History">
                    <SeriesChart
                        kind=ChartKind::Line
                        labels=history_labels
                        series=history_series
                        dark=dark
                        redraw=redraw
                    />
                </ChartCard>
                <ChartCard title="Rain History">
                    <SeriesChart
                        kind=ChartKind::Bar
                        labels=rain_labels
                        series=rain_series
                        dark=dark
                        redraw=redraw
                    />
                </ChartCard>
            </div>
        </div>
    }
}

#[component]
fn ChartCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="bg-gray-100 dark:bg-[#1a1a1a] rounded-lg p-4">
            <h3 class="text-lg font-medium mb-4">{title}</h3>
            {children()}
        </div>
    }
}
