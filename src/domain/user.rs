use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_string_from_number;

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserPayload<'a> {
    pub name: &'a str,
    pub job: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub avatar: String,
}

/// One page of `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPage {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<UserRecord>,
}

/// Body of `GET /api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SingleUser {
    pub data: UserRecord,
}

/// Echo of a user creation.
///
/// The service hands out ids as strings, but we accept numbers too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedUser {
    pub name: String,
    pub job: String,
    #[serde(deserialize_with = "deserialize_string_from_number")]
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Echo of a user update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatedUser {
    pub name: String,
    pub job: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}
