use crate::config::{
    WeatherConfig, DEFAULT_SMHI_BASE_URL, DEFAULT_SMHI_CATEGORY, DEFAULT_SMHI_VERSION,
};
use crate::state::AppState;

pub fn test_config() -> WeatherConfig {
    WeatherConfig {
        smhi_base_url: DEFAULT_SMHI_BASE_URL.to_string(),
        smhi_category: DEFAULT_SMHI_CATEGORY.to_string(),
        smhi_version: DEFAULT_SMHI_VERSION.to_string(),
        day_start_hour: 8,
        day_max_entries: 14,
    }
}

/// State whose SMHI client points at `base_url` (usually a loopback stub).
pub fn test_state_with_upstream(base_url: &str) -> AppState {
    let mut config = test_config();
    config.smhi_base_url = base_url.to_string();
    AppState::new(config, reqwest::Client::new())
}
