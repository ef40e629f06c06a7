use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::infrastructure::messaging::feishu::DEFAULT_BASE_URL;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub log_level: String,
    pub app_id: String,
    pub app_secret: String,
    pub base_url: String,
    pub api_token: Option<String>,
    pub rate_limit_per_second: usize,
    pub rate_limit_headroom: usize,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub max_concurrent_deliveries: usize,
    pub request_timeout: Duration,
    pub token_refresh_margin: Duration,
}

impl Config {
    pub fn try_parse() -> Result<Config, String> {
        let _ = dotenv();

        Ok(Config {
            port: parsed_or("PORT", 8080)?,
            scheme: var("SCHEME").unwrap_or_else(|_| "http".to_string()),
            host: var("HOST").unwrap_or_else(|_| "localhost".to_string()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            app_id: required("FEISHU_APP_ID")?,
            app_secret: required("FEISHU_APP_SECRET")?,
            base_url: var("FEISHU_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_token: var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            rate_limit_per_second: parsed_or("RATE_LIMIT_PER_SECOND", 50)?,
            rate_limit_headroom: parsed_or("RATE_LIMIT_HEADROOM", 5)?,
            max_attempts: parsed_or("MAX_ATTEMPTS", 3)?,
            retry_delay: Duration::from_millis(parsed_or("RETRY_DELAY_MS", 1000)?),
            max_concurrent_deliveries: parsed_or("MAX_CONCURRENT_DELIVERIES", 64)?,
            request_timeout: Duration::from_secs(parsed_or("REQUEST_TIMEOUT_SECS", 10)?),
            token_refresh_margin: Duration::from_secs(parsed_or("TOKEN_REFRESH_MARGIN_SECS", 300)?),
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, String> {
    match var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("An error occured while getting {name} env param")),
    }
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("An error occured while parsing {name} env param")),
        Err(_) => Ok(default),
    }
}
