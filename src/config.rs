use std::env;
use std::time::Duration;

const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search.json";
const DEFAULT_DB_PATH: &str = "data/brands.sqlite";

#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_api_key: Option<String>,
    pub serpapi_url: String,
    pub db_path: String,
    pub port: u16,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serpapi_api_key: None,
            serpapi_url: DEFAULT_SERPAPI_URL.to_string(),
            db_path: DEFAULT_DB_PATH.to_string(),
            port: 8000,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Read settings from the environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            serpapi_api_key: env::var("SERPAPI_API_KEY").ok().filter(|k| !k.is_empty()),
            serpapi_url: env::var("SERPAPI_URL").unwrap_or(defaults.serpapi_url),
            db_path: env::var("DB_PATH").unwrap_or(defaults.db_path),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            fetch_timeout: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}
