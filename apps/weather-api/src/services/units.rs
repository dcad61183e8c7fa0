use serde::Serialize;

use crate::error::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
pub enum TemperatureScale {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureScale {
    /// Absent or blank input means Celsius.
    pub fn parse(raw: Option<&str>) -> Result<Self, WeatherError> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(TemperatureScale::Celsius);
        };
        match raw.to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureScale::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureScale::Fahrenheit),
            _ => Err(WeatherError::InvalidInput(format!(
                "Invalid scale '{raw}'. Use 'C' or 'F'."
            ))),
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "°C",
            TemperatureScale::Fahrenheit => "°F",
        }
    }

    /// Converts a Celsius reading for display; the input is never stored back.
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    pub fn format(self, celsius: f64) -> String {
        format!("{:.1} {}", self.from_celsius(celsius), self.unit())
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn format_wind_speed(mps: f64) -> String {
    format!("{mps:.1} m/s")
}

pub fn format_wind_direction(degrees: f64) -> String {
    format!("{degrees:.0}°")
}

pub fn format_precipitation(mm: f64) -> String {
    format!("{mm:.1} mm")
}
