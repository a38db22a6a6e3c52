//! Request payloads and expected response fragments the suite is built around

use crate::domain::{
    ERROR_MISSING_EMAIL, ERROR_MISSING_PASSWORD, ERROR_UNDEFINED_USER, NelPolicy,
    RegistrationRequest, RegistrationToken, UserPayload,
};

pub use crate::domain::REGISTERED_EMAIL;

/// `Content-Type` of every JSON response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";


pub const NEW_USER: UserPayload<'static> = UserPayload {
    name: "Ivan",
    job: "leader",
};

/// Must differ from [`NEW_USER`] in both fields
pub const UPDATED_USER: UserPayload<'static> = UserPayload {
    name: "Peter",
    job: "NOTleader",
};

pub const REGISTRATION: RegistrationRequest<'static> = RegistrationRequest {
    email: REGISTERED_EMAIL,
    password: "pistol",
};

pub const REGISTRATION_TOKEN_ID: u64 = 4;
pub const REGISTRATION_TOKEN: &str = "QpwL5tke4Pnpja7X4";

pub fn expected_registration_token() -> RegistrationToken {
    RegistrationToken {
        id: REGISTRATION_TOKEN_ID,
        token: REGISTRATION_TOKEN.to_string(),
    }
}

pub fn expected_nel_policy() -> NelPolicy {
    NelPolicy {
        success_fraction: 0.0,
        report_to: "cf-nel".to_string(),
        max_age: 604_800,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InvalidRegistration {
    pub body: RegistrationRequest<'static>,
    pub error: &'static str,
}

pub const INVALID_REGISTRATIONS: [InvalidRegistration; 4] = [
    InvalidRegistration {
        body: RegistrationRequest {
            email: "",
            password: "",
        },
        error: ERROR_MISSING_EMAIL,
    },
    InvalidRegistration {
        body: RegistrationRequest {
            email: REGISTERED_EMAIL,
            password: "",
        },
        error: ERROR_MISSING_PASSWORD,
    },
    InvalidRegistration {
        body: RegistrationRequest {
            email: "1",
            password: "1",
        },
        error: ERROR_UNDEFINED_USER,
    },
    InvalidRegistration {
        body: RegistrationRequest {
            email: "",
            password: "pistol",
        },
        error: ERROR_MISSING_EMAIL,
    },
];
