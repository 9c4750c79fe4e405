use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

use super::model::{round, Forecast, ForecastEntry};

/// Forecast entries are 3 hours apart
const ENTRIES_PER_DAY: usize = 8;
const OUTLOOK_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub weekday: String,
    pub high: i32,
    pub low: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint<T> {
    pub label: String,
    pub value: T,
}

/// Everything the weather view plots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCharts {
    pub daily: Vec<DailyPoint>,
    /// Percent chance, next 24 hours
    pub precipitation: Vec<HourlyPoint<u32>>,
    /// Next 24 hours
    pub temperature: Vec<HourlyPoint<i32>>,
    pub temperature_history: Vec<HourlyPoint<i32>>,
    /// Rain volume in mm
    pub rain_history: Vec<HourlyPoint<f64>>,
}

impl WeatherCharts {
    pub fn from_forecast(forecast: &Forecast, utc_offset: i32) -> Self {
        let zone = zone(utc_offset);
        let next_day: Vec<&ForecastEntry> = forecast.list.iter().take(ENTRIES_PER_DAY).collect();
        let history: Vec<&ForecastEntry> = next_day.iter().rev().copied().collect();

        let daily = forecast
            .list
            .iter()
            .step_by(ENTRIES_PER_DAY)
            .take(OUTLOOK_DAYS)
            .map(|entry| DailyPoint {
                weekday: format_at(entry.dt, &zone, "%a"),
                high: round(entry.main.temp_max),
                low: round(entry.main.temp_min),
            })
            .collect();

        let precipitation = hourly(&next_day, &zone, |e| round(e.pop * 100.0).max(0) as u32);
        let temperature = hourly(&next_day, &zone, |e| round(e.main.temp));
        let temperature_history = hourly(&history, &zone, |e| round(e.main.temp));
        let rain_history = hourly(&history, &zone, ForecastEntry::rain_volume);

        Self {
            daily,
            precipitation,
            temperature,
            temperature_history,
            rain_history,
        }
    }
}

/// Wall-clock time at the forecast location, e.g. `3:07 PM`
pub fn local_time(now: DateTime<Utc>, utc_offset: i32) -> String {
    now.with_timezone(&zone(utc_offset))
        .format("%-I:%M %p")
        .to_string()
}

fn hourly<T>(
    entries: &[&ForecastEntry],
    zone: &FixedOffset,
    value: impl Fn(&ForecastEntry) -> T,
) -> Vec<HourlyPoint<T>> {
    entries
        .iter()
        .map(|entry| HourlyPoint {
            label: format_at(entry.dt, zone, "%-I %p"),
            value: value(entry),
        })
        .collect()
}

fn zone(utc_offset: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset).unwrap_or_else(|| {
        tracing::debug!("Ignoring out of range UTC offset {}", utc_offset);
        Utc.fix()
    })
}

fn format_at(timestamp: i64, zone: &FixedOffset, pattern: &str) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(zone).format(pattern).to_string())
        .unwrap_or_default()
}
