use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{AppError, AppResult, WeatherError};
use crate::services::aggregate::{
    self, format_averages, format_reading, DailyAverages, WeatherParameter,
};
use crate::services::locations::{self, LocationMatch};
use crate::services::timeseries::{extract, PARAM_TEMPERATURE};
use crate::services::units::TemperatureScale;
use crate::state::AppState;

const MISSING_LOCATION: &str = "Please provide a location in the body!";
const MISSING_LOCATION_AND_DATE: &str = "Please provide both 'location' and 'date' in the body.";

/// Shared body for all three operations; each one reads the fields it needs.
#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct WeatherRequest {
    #[serde(default)]
    location: Option<String>,
    /// `yyyy-MM-dd`
    #[serde(default)]
    date: Option<String>,
    /// temperature, windspeed, winddirection or precipitation
    #[serde(default)]
    parameters: Option<String>,
    /// `C` (default) or `F`
    #[serde(default)]
    scale: Option<String>,
    /// `json` (default) or `text`
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseFormat {
    Json,
    Text,
}

impl ResponseFormat {
    fn parse(raw: Option<&str>) -> Result<Self, WeatherError> {
        match raw.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(ResponseFormat::Json),
            Some(value) if value.eq_ignore_ascii_case("json") => Ok(ResponseFormat::Json),
            Some(value) if value.eq_ignore_ascii_case("text") => Ok(ResponseFormat::Text),
            Some(value) => Err(WeatherError::InvalidInput(format!(
                "Invalid format '{value}'. Use 'json' or 'text'."
            ))),
        }
    }

    fn respond<T: Serialize>(self, body: T, text: String) -> Response {
        match self {
            ResponseFormat::Json => Json(body).into_response(),
            ResponseFormat::Text => text.into_response(),
        }
    }
}

/// Flattened into every structured body.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub(crate) struct ResolvedLocation {
    location: String,
    latitude: f64,
    longitude: f64,
    /// True when the requested name was unknown and the default location was used.
    fallback_location: bool,
}

impl From<&LocationMatch> for ResolvedLocation {
    fn from(matched: &LocationMatch) -> Self {
        Self {
            location: matched.name.to_string(),
            latitude: matched.coordinate.latitude,
            longitude: matched.coordinate.longitude,
            fallback_location: matched.fallback,
        }
    }
}

/// Display unit per parameter; parameters left out of the body have none.
#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub(crate) struct ParameterUnits {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precipitation: Option<String>,
}

impl ParameterUnits {
    fn of<I>(parameters: I, scale: TemperatureScale) -> Self
    where
        I: IntoIterator<Item = WeatherParameter>,
    {
        let mut units = Self::default();
        for parameter in parameters {
            let unit = Some(parameter.unit(scale).to_string());
            match parameter {
                WeatherParameter::Temperature => units.temperature = unit,
                WeatherParameter::WindSpeed => units.wind_speed = unit,
                WeatherParameter::WindDirection => units.wind_direction = unit,
                WeatherParameter::Precipitation => units.precipitation = unit,
            }
        }
        units
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub(crate) struct TemperatureNowResponse {
    #[serde(flatten)]
    place: ResolvedLocation,
    approved_time: Option<String>,
    valid_time: Option<String>,
    temperature: f64,
    scale: TemperatureScale,
    unit: String,
    text: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub(crate) struct ForecastEntryRead {
    /// `validTime` as published by SMHI.
    valid_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wind_direction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precipitation: Option<f64>,
    text: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub(crate) struct TemperatureForDateResponse {
    #[serde(flatten)]
    place: ResolvedLocation,
    approved_time: Option<String>,
    date: String,
    parameter: Option<WeatherParameter>,
    scale: TemperatureScale,
    /// Unit of the requested parameter; `null` when every parameter is listed.
    unit: Option<String>,
    units: ParameterUnits,
    count: usize,
    entries: Vec<ForecastEntryRead>,
    text: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub(crate) struct DailyAveragesResponse {
    #[serde(flatten)]
    place: ResolvedLocation,
    approved_time: Option<String>,
    date: String,
    scale: TemperatureScale,
    /// Number of forecast entries on the date; 0 means no data.
    count: usize,
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    precipitation: Option<f64>,
    /// Temperature unit for the requested scale.
    unit: String,
    units: ParameterUnits,
    text: String,
}

fn parse_request(body: &Bytes) -> AppResult<WeatherRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(WeatherRequest::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        tracing::warn!(error = %err, "invalid weather request body");
        AppError::bad_request("Request body must be a JSON object.")
    })
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[utoipa::path(
    post,
    path = "/api/GetTemperatureNow",
    tag = "weather",
    request_body = WeatherRequest,
    responses(
        (status = 200, description = "Current temperature", body = TemperatureNowResponse),
        (status = 400, description = "Missing input or upstream failure")
    )
)]
pub(crate) async fn temperature_now(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Response> {
    tracing::info!("Processing weather request.");
    let request = parse_request(&body)?;
    let Some(location) = required(&request.location) else {
        return Err(WeatherError::MissingInput(MISSING_LOCATION.to_string()).into());
    };
    let scale = TemperatureScale::parse(request.scale.as_deref())?;
    let format = ResponseFormat::parse(request.format.as_deref())?;

    let matched = locations::lookup(location);
    let document = state.smhi.forecast(matched.coordinate).await?;

    // An empty series reads as 0.0, same as a missing "t" parameter.
    let first = document.first_entry();
    let celsius = first.map_or(0.0, |entry| extract(entry, PARAM_TEMPERATURE));
    let text = scale.format(celsius);

    let body = TemperatureNowResponse {
        place: ResolvedLocation::from(&matched),
        approved_time: document.approved_time.clone(),
        valid_time: first.map(|entry| entry.valid_time.clone()),
        temperature: round1(scale.from_celsius(celsius)),
        scale,
        unit: scale.unit().to_string(),
        text: text.clone(),
    };
    Ok(format.respond(body, text))
}

#[utoipa::path(
    post,
    path = "/api/GetTemperatureForSelectedDate",
    tag = "weather",
    request_body = WeatherRequest,
    responses(
        (status = 200, description = "Forecast entries for the date", body = TemperatureForDateResponse),
        (status = 400, description = "Missing input, invalid date or upstream failure")
    )
)]
pub(crate) async fn temperature_for_date(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Response> {
    tracing::info!("Processing temperature request for a specific date.");
    let request = parse_request(&body)?;
    let (Some(location), Some(date)) = (required(&request.location), required(&request.date))
    else {
        return Err(WeatherError::MissingInput(MISSING_LOCATION_AND_DATE.to_string()).into());
    };
    aggregate::parse_date(date)?;
    let parameter = WeatherParameter::parse(request.parameters.as_deref())?;
    let scale = TemperatureScale::parse(request.scale.as_deref())?;
    let format = ResponseFormat::parse(request.format.as_deref())?;

    let matched = locations::lookup(location);
    let document = state.smhi.forecast(matched.coordinate).await?;
    let selected = aggregate::select_by_date(
        &document,
        date,
        Some(state.config.day_start_hour),
        Some(state.config.day_max_entries),
    )?;
    let readings = aggregate::readings(&selected)?;

    let wanted = |p: WeatherParameter| parameter.is_none() || parameter == Some(p);
    let value = |reading: &aggregate::EntryReading, p: WeatherParameter| {
        reading.get(p).filter(|_| wanted(p)).map(|v| match p {
            WeatherParameter::Temperature => round1(scale.from_celsius(v)),
            _ => round1(v),
        })
    };
    let entries: Vec<ForecastEntryRead> = selected
        .iter()
        .zip(&readings)
        .map(|(entry, reading)| ForecastEntryRead {
            valid_time: entry.valid_time.clone(),
            temperature: value(reading, WeatherParameter::Temperature),
            wind_speed: value(reading, WeatherParameter::WindSpeed),
            wind_direction: value(reading, WeatherParameter::WindDirection),
            precipitation: value(reading, WeatherParameter::Precipitation),
            text: format_reading(reading, parameter, scale),
        })
        .collect();

    let text = if entries.is_empty() {
        format!("No data available for {date}.")
    } else {
        entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = TemperatureForDateResponse {
        place: ResolvedLocation::from(&matched),
        approved_time: document.approved_time.clone(),
        date: date.to_string(),
        parameter,
        scale,
        unit: parameter.map(|p| p.unit(scale).to_string()),
        units: ParameterUnits::of(
            WeatherParameter::ALL.into_iter().filter(|p| wanted(*p)),
            scale,
        ),
        count: entries.len(),
        entries,
        text: text.clone(),
    };
    Ok(format.respond(body, text))
}

#[utoipa::path(
    post,
    path = "/api/GetDailyAverages",
    tag = "weather",
    request_body = WeatherRequest,
    responses(
        (status = 200, description = "Daily averages for the date", body = DailyAveragesResponse),
        (status = 400, description = "Missing input, invalid date or upstream failure")
    )
)]
pub(crate) async fn daily_averages(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Response> {
    tracing::info!("Processing daily averages request.");
    let request = parse_request(&body)?;
    let (Some(location), Some(date)) = (required(&request.location), required(&request.date))
    else {
        return Err(WeatherError::MissingInput(MISSING_LOCATION_AND_DATE.to_string()).into());
    };
    aggregate::parse_date(date)?;
    let scale = TemperatureScale::parse(request.scale.as_deref())?;
    let format = ResponseFormat::parse(request.format.as_deref())?;

    let matched = locations::lookup(location);
    let document = state.smhi.forecast(matched.coordinate).await?;
    let selected = aggregate::select_by_date(&document, date, None, None)?;
    let averages = aggregate::averages(&selected);
    let text = format_averages(date, &averages, scale);

    let (count, temperature, wind_speed, precipitation) = match &averages {
        DailyAverages::NoData => (0, None, None, None),
        DailyAverages::Values(values) => (
            values.count,
            values.temperature_c.map(|c| round1(scale.from_celsius(c))),
            values.wind_speed_mps.map(round1),
            values.precipitation_mm.map(round1),
        ),
    };

    let body = DailyAveragesResponse {
        place: ResolvedLocation::from(&matched),
        approved_time: document.approved_time.clone(),
        date: date.to_string(),
        scale,
        count,
        temperature,
        wind_speed,
        precipitation,
        unit: scale.unit().to_string(),
        units: ParameterUnits::of(
            [
                WeatherParameter::Temperature,
                WeatherParameter::WindSpeed,
                WeatherParameter::Precipitation,
            ],
            scale,
        ),
        text: text.clone(),
    };
    Ok(format.respond(body, text))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/GetTemperatureNow", post(temperature_now))
        .route("/GetTemperatureForSelectedDate", post(temperature_for_date))
        .route("/GetDailyAverages", post(daily_averages))
}
