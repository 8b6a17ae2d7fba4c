use std::path::PathBuf;

/// Runtime configuration for one acquisition cycle.
///
/// Built by [`crate::load_app_config`]; the bearer token is redacted from
/// `Debug` output.
#[derive(Clone)]
pub struct AppConfig {
    /// `None` when `POSTPULSE_HANDLE` is unset; the CLI may supply one.
    pub handle: Option<String>,
    /// Required by `collect`; `report` works offline without it.
    pub bearer_token: Option<String>,
    pub max_results: u32,
    pub data_dir: PathBuf,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// When set, a successful fetch with zero posts is handled like a failed
    /// fetch and the persisted snapshot is served instead.
    pub empty_fetch_fallback: bool,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("handle", &self.handle)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("max_results", &self.max_results)
            .field("data_dir", &self.data_dir)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("empty_fetch_fallback", &self.empty_fetch_fallback)
            .field("log_level", &self.log_level)
            .finish()
    }
}
