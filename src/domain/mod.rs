mod nel_policy;
mod registration;
mod user;
mod user_email_address;

pub use nel_policy::NelPolicy;
pub use registration::{
    ApiErrorBody, ERROR_MISSING_EMAIL, ERROR_MISSING_PASSWORD, ERROR_UNDEFINED_USER,
    REGISTERED_EMAIL, RegistrationRequest, RegistrationToken, expected_registration_error,
};
pub use user::{CreatedUser, SingleUser, UpdatedUser, UserPage, UserPayload, UserRecord};
pub use user_email_address::UserEmailAddress;
