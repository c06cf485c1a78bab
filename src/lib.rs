use crate::core::http::ApiClient;

use settings::Config;

pub mod cli;
pub mod core;
#[cfg(test)]
pub mod factory;
pub mod model;
pub mod repository;
pub mod schema;
pub mod settings;
pub mod view;

pub fn init_api_client(config: &Config) -> anyhow::Result<ApiClient> {
    tracing::info!("Init API client on {}", config.api_base_url);
    Ok(ApiClient::from_config(config)?)
}
