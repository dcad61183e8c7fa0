use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_SMHI_BASE_URL: &str = "https://opendata-download-metfcst.smhi.se";
pub const DEFAULT_SMHI_CATEGORY: &str = "pmp3g";
pub const DEFAULT_SMHI_VERSION: &str = "2";

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub smhi_base_url: String,
    pub smhi_category: String,
    pub smhi_version: String,
    /// First hour of day included in per-date listings.
    pub day_start_hour: u32,
    /// Maximum number of entries in a per-date listing.
    pub day_max_entries: usize,
}

impl WeatherConfig {
    pub fn from_env() -> Result<Self> {
        let smhi_base_url = env_string("WEATHER_SMHI_BASE_URL", DEFAULT_SMHI_BASE_URL);
        validate_base_url(&smhi_base_url)?;
        let smhi_category = env_string("WEATHER_SMHI_CATEGORY", DEFAULT_SMHI_CATEGORY);
        let smhi_version = env_string("WEATHER_SMHI_VERSION", DEFAULT_SMHI_VERSION);
        let day_start_hour = env_u32("WEATHER_DAY_START_HOUR", 8).min(23);
        let day_max_entries = env_u32("WEATHER_DAY_MAX_ENTRIES", 14).clamp(1, 96) as usize;

        Ok(Self {
            smhi_base_url,
            smhi_category,
            smhi_version,
            day_start_hour,
            day_max_entries,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("invalid WEATHER_SMHI_BASE_URL {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("WEATHER_SMHI_BASE_URL must be an http(s) URL");
    }
    if url.host_str().is_none() {
        anyhow::bail!("WEATHER_SMHI_BASE_URL is missing a host");
    }
    Ok(())
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_base_urls() {
        assert!(validate_base_url(DEFAULT_SMHI_BASE_URL).is_ok());
        assert!(validate_base_url("http://127.0.0.1:7072").is_ok());
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(validate_base_url("ftp://opendata-download-metfcst.smhi.se").is_err());
        assert!(validate_base_url("opendata-download-metfcst.smhi.se").is_err());
        assert!(validate_base_url("").is_err());
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        assert_eq!(
            env_string("WEATHER_TEST_UNSET_STRING_VARIABLE", "fallback"),
            "fallback"
        );
        assert_eq!(env_u32("WEATHER_TEST_UNSET_NUMBER_VARIABLE", 14), 14);
    }
}
