pub mod app_config;
pub mod config;
pub mod posts;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use posts::{
    derive_date_hour, parse_timestamp, Identity, Metric, NormalizedPost, PostDataset, PostMetrics,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
