use serde::{Deserialize, Serialize};

use super::WeatherError;

/// One entry of the `weather` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
}

/// The `main` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: u32,
}

/// Response of `/weather`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub main: Option<Readings>,
    /// Seconds east of UTC
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rain {
    #[serde(rename = "3h", default)]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds
    pub dt: i64,
    pub main: Readings,
    /// Probability of precipitation, 0..=1
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<Rain>,
}

impl ForecastEntry {
    pub fn rain_volume(&self) -> f64 {
        self.rain
            .as_ref()
            .and_then(|r| r.three_hours)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timezone: i32,
}

/// Response of `/forecast`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<City>,
}

/// Both documents, fetched together and cached together
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

/// Headline numbers for the current-conditions block
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSummary {
    pub icon_class: &'static str,
    pub condition: String,
    pub temp: i32,
    pub feels_like: i32,
    pub humidity: u32,
}

impl WeatherReport {
    /// Current conditions need a `weather` entry and a `main` block
    pub fn summary(&self) -> Result<CurrentSummary, WeatherError> {
        let condition = self
            .current
            .weather
            .first()
            .ok_or_else(|| WeatherError::InvalidShape("no weather entry".into()))?;
        let readings = self
            .current
            .main
            .as_ref()
            .ok_or_else(|| WeatherError::InvalidShape("missing main block".into()))?;

        Ok(CurrentSummary {
            icon_class: icon_class(&condition.icon),
            condition: condition.main.clone(),
            temp: round(readings.temp),
            feels_like: round(readings.feels_like),
            humidity: readings.humidity,
        })
    }

    /// Offset of the forecast location, preferring the current-conditions value
    pub fn utc_offset(&self) -> i32 {
        if self.current.timezone != 0 {
            return self.current.timezone;
        }
        self.forecast.city.as_ref().map(|c| c.timezone).unwrap_or(0)
    }
}

/// Weather Icons class for an OpenWeatherMap icon code
pub fn icon_class(code: &str) -> &'static str {
    match code {
        "01d" => "wi-day-sunny",
        "01n" => "wi-night-clear",
        "02d" => "wi-day-cloudy",
        "02n" => "wi-night-alt-cloudy",
        "03d" | "03n" => "wi-cloud",
        "04d" | "04n" => "wi-cloudy",
        "09d" | "09n" => "wi-showers",
        "10d" => "wi-day-rain",
        "10n" => "wi-night-alt-rain",
        "11d" | "11n" => "wi-thunderstorm",
        "13d" | "13n" => "wi-snow",
        "50d" | "50n" => "wi-fog",
        _ => "wi-cloud",
    }
}

/// Half-up rounding, so -0.5 becomes 0 rather than -1
pub(crate) fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
