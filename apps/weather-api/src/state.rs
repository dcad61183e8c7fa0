use crate::config::WeatherConfig;
use crate::services::smhi::SmhiClient;

#[derive(Clone)]
pub struct AppState {
    pub config: WeatherConfig,
    pub smhi: SmhiClient,
}

impl AppState {
    pub fn new(config: WeatherConfig, http: reqwest::Client) -> Self {
        let smhi = SmhiClient::new(http, &config);
        Self { config, smhi }
    }
}
