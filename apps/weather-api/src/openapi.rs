use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::routes::{health, weather};
use crate::services::aggregate::WeatherParameter;
use crate::services::units::TemperatureScale;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "weather-api",
        description = "Point forecasts from SMHI open data for a named Swedish location."
    ),
    paths(
        health::healthz_handler,
        weather::temperature_now,
        weather::temperature_for_date,
        weather::daily_averages,
    ),
    components(schemas(
        health::HealthResponse,
        weather::WeatherRequest,
        weather::ResolvedLocation,
        weather::ParameterUnits,
        weather::TemperatureNowResponse,
        weather::ForecastEntryRead,
        weather::TemperatureForDateResponse,
        weather::DailyAveragesResponse,
        TemperatureScale,
        WeatherParameter,
    )),
    tags(
        (name = "weather", description = "Current temperature, per-date listings and daily averages"),
        (name = "health", description = "Liveness check")
    )
)]
pub struct ApiDoc;

pub fn openapi_json() -> serde_json::Value {
    serde_json::to_value(ApiDoc::openapi()).unwrap_or_default()
}

async fn openapi_handler() -> Json<serde_json::Value> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}
