use reqwest::Client;

use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::services::locations::Coordinate;
use crate::services::timeseries::{parse_forecast, ForecastDocument};

/// Client for the SMHI open-data point forecast API.
#[derive(Debug, Clone)]
pub struct SmhiClient {
    http: Client,
    base_url: String,
    category: String,
    version: String,
}

impl SmhiClient {
    pub fn new(http: Client, config: &WeatherConfig) -> Self {
        Self {
            http,
            base_url: config.smhi_base_url.trim_end_matches('/').to_string(),
            category: config.smhi_category.clone(),
            version: config.smhi_version.clone(),
        }
    }

    /// SMHI accepts at most four decimals; `{:.4}` always renders a decimal
    /// point regardless of locale.
    pub fn build_url(&self, category: &str, version: &str, lon: f64, lat: f64) -> String {
        format!(
            "{}/api/category/{}/version/{}/geotype/point/lon/{:.4}/lat/{:.4}/data.json",
            self.base_url, category, version, lon, lat
        )
    }

    /// One GET, no retry. Returns the raw body on a success status.
    pub async fn fetch(
        &self,
        category: &str,
        version: &str,
        lon: f64,
        lat: f64,
    ) -> Result<String, WeatherError> {
        let url = self.build_url(category, version, lon, lat);
        tracing::debug!(%url, "fetching SMHI forecast");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Fetches with the configured category/version and parses the document.
    pub async fn forecast(&self, coordinate: Coordinate) -> Result<ForecastDocument, WeatherError> {
        let raw = self
            .fetch(
                &self.category,
                &self.version,
                coordinate.longitude,
                coordinate.latitude,
            )
            .await?;
        parse_forecast(&raw)
    }
}
