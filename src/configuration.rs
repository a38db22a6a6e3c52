use crate::api_client::ApiClient;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://reqres.in";
pub const DEFAULT_TIMEOUT_MILLISECONDS: u64 = 5_000;
pub const DEFAULT_USER_ID: u64 = 5;
pub const DEFAULT_BAD_USER_ID: u64 = 23;
pub const DEFAULT_MAX_PROBES: u32 = 10;
pub const DEFAULT_DELAY_SECONDS: u64 = 3;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub target: TargetSettings,
    pub suite: SuiteSettings,
}

/// Where the service under test lives and how long we wait for it.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct TargetSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl TargetSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(self) -> Result<ApiClient, reqwest::Error> {
        let timeout = self.timeout();
        ApiClient::new(self.base_url, timeout)
    }
}

/// Identifiers and bounds the scenarios work with.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SuiteSettings {
    /// A user that is part of the service's fixture dataset.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub user_id: u64,
    /// First id probed when looking for a user that does not exist.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub bad_user_id: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_probes: u32,
    /// Server-side delay requested by the delayed list scenario.
    /// It doubles as the upper bound for the observed response time.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub delay_seconds: u64,
}

impl SuiteSettings {
    pub fn latency_bound(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID,
            bad_user_id: DEFAULT_BAD_USER_ID,
            max_probes: DEFAULT_MAX_PROBES,
            delay_seconds: DEFAULT_DELAY_SECONDS,
        }
    }
}

/// Load the settings.
///
/// Every value has a built-in default, so no file or environment variable is
/// needed to run against the public service. `configuration/base.yaml` (if
/// present) and `APP_`-prefixed environment variables override them, e.g.
/// `APP_TARGET__BASE_URL=http://127.0.0.1:8080`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let settings = config::Config::builder()
        .set_default("target.base_url", DEFAULT_BASE_URL)?
        .set_default("target.timeout_milliseconds", DEFAULT_TIMEOUT_MILLISECONDS)?
        .set_default("suite.user_id", DEFAULT_USER_ID)?
        .set_default("suite.bad_user_id", DEFAULT_BAD_USER_ID)?
        .set_default("suite.max_probes", i64::from(DEFAULT_MAX_PROBES))?
        .set_default("suite.delay_seconds", DEFAULT_DELAY_SECONDS)?
        .add_source(
            config::File::from(configuration_directory.join("base.yaml")).required(false),
        )
        // E.g. `APP_SUITE__USER_ID=7` would set `Settings.suite.user_id`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
