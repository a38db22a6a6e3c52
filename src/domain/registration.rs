use serde::{Deserialize, Serialize};

/// The only address the service lets register
pub const REGISTERED_EMAIL: &str = "eve.holt@reqres.in";

pub const ERROR_MISSING_EMAIL: &str = "Missing email or username";
pub const ERROR_MISSING_PASSWORD: &str = "Missing password";
pub const ERROR_UNDEFINED_USER: &str = "Note: Only defined users succeed registration";

/// Body of `POST /api/register/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationToken {
    pub id: u64,
    pub token: String,
}

/// Body the service returns alongside a 400.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// The error message the service answers `request` with, or `None` when the
/// registration is expected to succeed.
///
/// The checks run in a fixed order: a missing email wins over a missing
/// password, which wins over an unknown email.
pub fn expected_registration_error(request: &RegistrationRequest<'_>) -> Option<&'static str> {
    if request.email.is_empty() {
        Some(ERROR_MISSING_EMAIL)
    } else if request.password.is_empty() {
        Some(ERROR_MISSING_PASSWORD)
    } else if request.email != REGISTERED_EMAIL {
        Some(ERROR_UNDEFINED_USER)
    } else {
        None
    }
}
