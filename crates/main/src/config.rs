use superhero_pdf::client::DEFAULT_BASE_URL;
use superhero_pdf::logging::LogConfig;

/// Settings read from the environment, optionally through a `.env` file.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub log: LogConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // a missing .env is fine

        Config {
            base_url: std::env::var("SUPERHERO_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            log: LogConfig::from_env(),
        }
    }
}
