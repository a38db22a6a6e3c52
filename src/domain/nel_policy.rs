use serde::{Deserialize, Serialize};

/// A Network Error Logging policy, as carried by the `NEL` response header.
///
/// The service fronts every response with the same policy; we only ever
/// compare it for equality. `success_fraction` is a float in the NEL
/// grammar, so `0` and `0.0` decode to the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NelPolicy {
    pub success_fraction: f64,
    pub report_to: String,
    pub max_age: u64,
}

impl NelPolicy {
    pub fn from_header(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }
}
