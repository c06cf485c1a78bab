use std::env;

use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_env")]
    pub env: String, // file / server
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_env() -> String {
    "file".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Where the values came from, for logging once the subscriber is up.
    pub fn source(&self) -> &'static str {
        if self.env == "file" {
            ".env file"
        } else {
            "server environment"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: default_env(),
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            request_timeout: default_request_timeout(),
            export_dir: default_export_dir(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
        }
    }
}

pub fn get_config() -> anyhow::Result<Config> {
    let env_var = env::var("env").unwrap_or("file".to_string());
    // runs before logging is installed, so the source is kept on the config
    if env_var == "file" {
        let _ = dotenvy::dotenv();
    }
    let mut config = envy::from_env::<Config>()?;
    config.env = env_var;
    if config.page_size == 0 {
        anyhow::bail!("PAGE_SIZE must be greater than zero");
    }
    config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
    Ok(config)
}
