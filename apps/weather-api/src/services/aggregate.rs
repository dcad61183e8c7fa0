use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::error::WeatherError;
use crate::services::timeseries::{
    ForecastDocument, TimeSeriesEntry, PARAM_PRECIPITATION_MEAN, PARAM_TEMPERATURE,
    PARAM_WIND_DIRECTION, PARAM_WIND_SPEED,
};
use crate::services::units::{
    format_precipitation, format_wind_direction, format_wind_speed, TemperatureScale,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeatherParameter {
    Temperature,
    WindSpeed,
    WindDirection,
    Precipitation,
}

impl WeatherParameter {
    pub const ALL: [WeatherParameter; 4] = [
        WeatherParameter::Temperature,
        WeatherParameter::WindSpeed,
        WeatherParameter::WindDirection,
        WeatherParameter::Precipitation,
    ];

    /// Absent or blank input means "every parameter".
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, WeatherError> {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let parameter = match key.as_str() {
            "temperature" | "t" => WeatherParameter::Temperature,
            "windspeed" | "ws" => WeatherParameter::WindSpeed,
            "winddirection" | "wd" => WeatherParameter::WindDirection,
            "precipitation" | "pmean" => WeatherParameter::Precipitation,
            _ => {
                return Err(WeatherError::InvalidInput(format!(
                    "Invalid parameter '{raw}'. Use temperature, windspeed, winddirection or precipitation."
                )))
            }
        };
        Ok(Some(parameter))
    }

    pub fn code(self) -> &'static str {
        match self {
            WeatherParameter::Temperature => PARAM_TEMPERATURE,
            WeatherParameter::WindSpeed => PARAM_WIND_SPEED,
            WeatherParameter::WindDirection => PARAM_WIND_DIRECTION,
            WeatherParameter::Precipitation => PARAM_PRECIPITATION_MEAN,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherParameter::Temperature => "temperature",
            WeatherParameter::WindSpeed => "wind speed",
            WeatherParameter::WindDirection => "wind direction",
            WeatherParameter::Precipitation => "precipitation",
        }
    }

    pub fn unit(self, scale: TemperatureScale) -> &'static str {
        match self {
            WeatherParameter::Temperature => scale.unit(),
            WeatherParameter::WindSpeed => "m/s",
            WeatherParameter::WindDirection => "°",
            WeatherParameter::Precipitation => "mm",
        }
    }
}

/// Strict `yyyy-MM-dd`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, WeatherError> {
    let raw = raw.trim();
    let invalid = || {
        WeatherError::InvalidDateFormat(format!(
            "Invalid date format '{raw}'. Please use yyyy-MM-dd."
        ))
    };
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// Entries whose written date equals `date`, optionally at or after
/// `from_hour`, truncated to the first `limit` matches in document order.
pub fn select_by_date<'a>(
    doc: &'a ForecastDocument,
    date: &str,
    from_hour: Option<u32>,
    limit: Option<usize>,
) -> Result<Vec<&'a TimeSeriesEntry>, WeatherError> {
    let date = parse_date(date)?;
    let limit = limit.unwrap_or(usize::MAX);
    let mut selected = Vec::new();
    for entry in &doc.time_series {
        if selected.len() >= limit {
            break;
        }
        let valid_time = entry.valid_time()?;
        if valid_time.date() != date {
            continue;
        }
        if from_hour.is_some_and(|hour| valid_time.hour() < hour) {
            continue;
        }
        selected.push(entry);
    }
    Ok(selected)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryReading {
    pub valid_time: NaiveDateTime,
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

impl EntryReading {
    pub fn from_entry(entry: &TimeSeriesEntry) -> Result<Self, WeatherError> {
        Ok(Self {
            valid_time: entry.valid_time()?,
            temperature_c: entry.value(PARAM_TEMPERATURE),
            wind_speed_mps: entry.value(PARAM_WIND_SPEED),
            wind_direction_deg: entry.value(PARAM_WIND_DIRECTION),
            precipitation_mm: entry.value(PARAM_PRECIPITATION_MEAN),
        })
    }

    pub fn get(&self, parameter: WeatherParameter) -> Option<f64> {
        match parameter {
            WeatherParameter::Temperature => self.temperature_c,
            WeatherParameter::WindSpeed => self.wind_speed_mps,
            WeatherParameter::WindDirection => self.wind_direction_deg,
            WeatherParameter::Precipitation => self.precipitation_mm,
        }
    }
}

pub fn readings(entries: &[&TimeSeriesEntry]) -> Result<Vec<EntryReading>, WeatherError> {
    entries
        .iter()
        .map(|entry| EntryReading::from_entry(entry))
        .collect()
}

fn format_value(parameter: WeatherParameter, value: Option<f64>, scale: TemperatureScale) -> String {
    let Some(value) = value else {
        return "n/a".to_string();
    };
    match parameter {
        WeatherParameter::Temperature => scale.format(value),
        WeatherParameter::WindSpeed => format_wind_speed(value),
        WeatherParameter::WindDirection => format_wind_direction(value),
        WeatherParameter::Precipitation => format_precipitation(value),
    }
}

/// One listing line, e.g. `2024-06-01 08:00: 15.0 °C` for a single parameter.
pub fn format_reading(
    reading: &EntryReading,
    parameter: Option<WeatherParameter>,
    scale: TemperatureScale,
) -> String {
    let stamp = reading.valid_time.format("%Y-%m-%d %H:%M");
    match parameter {
        Some(parameter) => format!(
            "{stamp}: {}",
            format_value(parameter, reading.get(parameter), scale)
        ),
        None => {
            let parts: Vec<String> = WeatherParameter::ALL
                .iter()
                .map(|p| format!("{} {}", p.label(), format_value(*p, reading.get(*p), scale)))
                .collect();
            format!("{stamp}: {}", parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageValues {
    pub count: usize,
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DailyAverages {
    NoData,
    Values(AverageValues),
}

/// Per-parameter means over the entries that carry the parameter. Wind
/// direction is not averaged.
pub fn averages(entries: &[&TimeSeriesEntry]) -> DailyAverages {
    if entries.is_empty() {
        return DailyAverages::NoData;
    }
    DailyAverages::Values(AverageValues {
        count: entries.len(),
        temperature_c: mean(entries, PARAM_TEMPERATURE),
        wind_speed_mps: mean(entries, PARAM_WIND_SPEED),
        precipitation_mm: mean(entries, PARAM_PRECIPITATION_MEAN),
    })
}

fn mean(entries: &[&TimeSeriesEntry], name: &str) -> Option<f64> {
    let (sum, count) = entries
        .iter()
        .filter_map(|entry| entry.value(name))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn format_averages(date: &str, averages: &DailyAverages, scale: TemperatureScale) -> String {
    match averages {
        DailyAverages::NoData => format!("No data available for {date}."),
        DailyAverages::Values(values) => [
            format!(
                "Average temperature: {}",
                format_value(WeatherParameter::Temperature, values.temperature_c, scale)
            ),
            format!(
                "Average wind speed: {}",
                format_value(WeatherParameter::WindSpeed, values.wind_speed_mps, scale)
            ),
            format!(
                "Average precipitation: {}",
                format_value(WeatherParameter::Precipitation, values.precipitation_mm, scale)
            ),
        ]
        .join("\n"),
    }
}
