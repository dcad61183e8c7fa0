use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::error::WeatherError;

pub const PARAM_TEMPERATURE: &str = "t";
pub const PARAM_WIND_SPEED: &str = "ws";
pub const PARAM_WIND_DIRECTION: &str = "wd";
pub const PARAM_PRECIPITATION_MEAN: &str = "pmean";

/// SMHI point forecast document (`pmp3g` data.json).
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDocument {
    #[serde(rename = "approvedTime", default)]
    pub approved_time: Option<String>,
    #[serde(rename = "referenceTime", default)]
    pub reference_time: Option<String>,
    #[serde(rename = "timeSeries")]
    pub time_series: Vec<TimeSeriesEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesEntry {
    #[serde(rename = "validTime")]
    pub valid_time: String,
    #[serde(default)]
    pub parameters: Vec<ForecastParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastParameter {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

pub fn parse_forecast(raw: &str) -> Result<ForecastDocument, WeatherError> {
    let document: ForecastDocument = serde_json::from_str(raw)?;
    Ok(document)
}

impl ForecastDocument {
    pub fn first_entry(&self) -> Option<&TimeSeriesEntry> {
        self.time_series.first()
    }
}

impl TimeSeriesEntry {
    /// First value of the first parameter called `name`, if any.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|param| param.name == name)
            .and_then(|param| param.values.first().copied())
    }

    /// Wall-clock timestamp exactly as written in `validTime`; the offset is
    /// dropped, not normalized.
    pub fn valid_time(&self) -> Result<NaiveDateTime, WeatherError> {
        parse_valid_time(&self.valid_time).ok_or_else(|| {
            WeatherError::Parse(format!("invalid validTime {:?}", self.valid_time))
        })
    }
}

/// Legacy extraction: a missing parameter reads as `0.0`.
pub fn extract(entry: &TimeSeriesEntry, name: &str) -> f64 {
    entry.value(name).unwrap_or(0.0)
}

fn parse_valid_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use serde_json::json;

    fn sample_document() -> String {
        json!({
            "approvedTime": "2024-06-01T05:05:00Z",
            "referenceTime": "2024-06-01T05:00:00Z",
            "geometry": { "type": "Point", "coordinates": [[18.0686, 59.3293]] },
            "timeSeries": [
                {
                    "validTime": "2024-06-01T06:00:00Z",
                    "parameters": [
                        { "name": "msl", "levelType": "hmsl", "level": 0, "unit": "hPa", "values": [1012.1] },
                        { "name": "t", "levelType": "hl", "level": 2, "unit": "Cel", "values": [14.2] },
                        { "name": "ws", "levelType": "hl", "level": 10, "unit": "m/s", "values": [3.4] }
                    ]
                },
                {
                    "validTime": "2024-06-01T07:00:00Z",
                    "parameters": [
                        { "name": "t", "values": [15.0, 99.0] },
                        { "name": "t", "values": [42.0] },
                        { "name": "pmean", "values": [] }
                    ]
                }
            ]
        })
        .to_string()
    }

    #[test]
    fn parses_time_series_in_document_order() {
        let doc = parse_forecast(&sample_document()).unwrap();
        assert_eq!(doc.time_series.len(), 2);
        assert_eq!(doc.approved_time.as_deref(), Some("2024-06-01T05:05:00Z"));
        assert_eq!(doc.time_series[0].valid_time, "2024-06-01T06:00:00Z");
        assert_eq!(doc.time_series[0].parameters[1].unit.as_deref(), Some("Cel"));
    }

    #[test]
    fn rejects_malformed_json_and_missing_time_series() {
        assert!(matches!(
            parse_forecast("not json"),
            Err(WeatherError::Parse(_))
        ));
        assert!(matches!(
            parse_forecast(r#"{"approvedTime":"2024-06-01T05:05:00Z"}"#),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn malformed_timestamps_parse_but_fail_on_access() {
        let doc = parse_forecast(r#"{"timeSeries":[{"validTime":"yesterday","parameters":[]}]}"#)
            .unwrap();
        assert!(matches!(
            doc.time_series[0].valid_time(),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn extract_returns_first_value_of_first_match() {
        let doc = parse_forecast(&sample_document()).unwrap();
        assert_eq!(extract(&doc.time_series[0], PARAM_TEMPERATURE), 14.2);
        assert_eq!(extract(&doc.time_series[1], PARAM_TEMPERATURE), 15.0);
        assert_eq!(extract(&doc.time_series[0], PARAM_WIND_SPEED), 3.4);
    }

    #[test]
    fn extract_defaults_to_zero_when_absent_or_empty() {
        let doc = parse_forecast(&sample_document()).unwrap();
        assert_eq!(extract(&doc.time_series[0], PARAM_WIND_DIRECTION), 0.0);
        assert_eq!(extract(&doc.time_series[1], PARAM_PRECIPITATION_MEAN), 0.0);
        assert_eq!(doc.time_series[1].value(PARAM_PRECIPITATION_MEAN), None);
        assert_eq!(doc.time_series[0].value(PARAM_WIND_DIRECTION), None);
    }

    #[test]
    fn valid_time_keeps_wall_clock_of_the_written_offset() {
        let entry = TimeSeriesEntry {
            valid_time: "2024-06-01T23:30:00+02:00".to_string(),
            parameters: Vec::new(),
        };
        let parsed = entry.valid_time().unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(parsed.hour(), 23);

        let entry = TimeSeriesEntry {
            valid_time: "2024-06-02T08:00:00".to_string(),
            parameters: Vec::new(),
        };
        assert_eq!(entry.valid_time().unwrap().hour(), 8);
    }
}
