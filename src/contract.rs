//! Assertions encoding the observable contract of the service

use crate::api_client::{ApiResponse, CONTENT_LENGTH, CONTENT_TYPE, NEL};
use crate::domain::{NelPolicy, UserEmailAddress, UserPage, UserRecord};
use crate::fixtures::{JSON_CONTENT_TYPE, expected_nel_policy};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A single unmet expectation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("Expected status {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },
    #[error("The `{0}` header is missing")]
    MissingHeader(&'static str),
    #[error("The `{name}` header is {actual:?}, expected {expected:?}")]
    HeaderMismatch {
        name: &'static str,
        expected: String,
        actual: String,
    },
    #[error("The `NEL` header {header:?} is not a NEL policy: {reason}")]
    MalformedNel { header: String, reason: String },
    #[error("The `NEL` policy is {actual:?}, expected {expected:?}")]
    NelMismatch {
        expected: NelPolicy,
        actual: NelPolicy,
    },
    #[error("The body {body:?} is not the expected JSON document: {reason}")]
    MalformedBody { body: String, reason: String },
    #[error("`{field}`: {detail}")]
    BodyMismatch { field: &'static str, detail: String },
    #[error("{message} (took {elapsed:?}, bound {bound:?})")]
    TooSlow {
        message: String,
        elapsed: Duration,
        bound: Duration,
    },
    #[error("Every probed id from {first_id} on answered with a user ({attempts} probes)")]
    NoMissingUser { first_id: u64, attempts: u32 },
}

impl ContractViolation {
    pub fn body_mismatch(field: &'static str, detail: impl Into<String>) -> Self {
        Self::BodyMismatch {
            field,
            detail: detail.into(),
        }
    }
}

/// Fail with a body mismatch on `field` unless `condition` holds.
pub fn ensure(
    condition: bool,
    field: &'static str,
    detail: impl FnOnce() -> String,
) -> Result<(), ContractViolation> {
    if condition {
        Ok(())
    } else {
        Err(ContractViolation::body_mismatch(field, detail()))
    }
}

pub fn check_status(response: &ApiResponse, expected: StatusCode) -> Result<(), ContractViolation> {
    if response.status == expected {
        Ok(())
    } else {
        Err(ContractViolation::UnexpectedStatus {
            expected: expected.as_u16(),
            actual: response.status.as_u16(),
        })
    }
}

pub fn check_header(
    response: &ApiResponse,
    name: &'static str,
    expected: &str,
) -> Result<(), ContractViolation> {
    let actual = response
        .header(name)
        .ok_or(ContractViolation::MissingHeader(name))?;
    if actual == expected {
        Ok(())
    } else {
        Err(ContractViolation::HeaderMismatch {
            name,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

pub fn check_json_content_type(response: &ApiResponse) -> Result<(), ContractViolation> {
    check_header(response, CONTENT_TYPE, JSON_CONTENT_TYPE)
}

/// The `NEL` header must be present and decode to the fixed policy.
pub fn check_nel(response: &ApiResponse) -> Result<(), ContractViolation> {
    let header = response
        .header(NEL)
        .ok_or(ContractViolation::MissingHeader(NEL))?;
    compare_nel(header)
}

/// Same as [`check_nel`], but a response without the header passes.
pub fn check_nel_if_present(response: &ApiResponse) -> Result<(), ContractViolation> {
    match response.header(NEL) {
        Some(header) => compare_nel(header),
        None => Ok(()),
    }
}

fn compare_nel(header: &str) -> Result<(), ContractViolation> {
    let actual =
        NelPolicy::from_header(header).map_err(|e| ContractViolation::MalformedNel {
            header: header.to_string(),
            reason: e.to_string(),
        })?;
    let expected = expected_nel_policy();
    if actual == expected {
        Ok(())
    } else {
        Err(ContractViolation::NelMismatch { expected, actual })
    }
}

pub fn parse_json<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ContractViolation> {
    response
        .json()
        .map_err(|e| ContractViolation::MalformedBody {
            body: response.text(),
            reason: e.to_string(),
        })
}

/// A 404 from the service carries `{}` and nothing else.
pub fn check_empty_json_object(response: &ApiResponse) -> Result<(), ContractViolation> {
    check_header(response, CONTENT_LENGTH, "2")?;
    let body: serde_json::Value = parse_json(response)?;
    ensure(
        body.as_object().is_some_and(|object| object.is_empty()),
        "body",
        || format!("expected an empty object, got {}", body),
    )
}

pub fn check_empty_body(response: &ApiResponse) -> Result<(), ContractViolation> {
    ensure(response.body.is_empty(), "body", || {
        format!("expected no content, got {:?}", response.text())
    })
}

/// Pagination bookkeeping of the first page.
///
/// `total / per_page` has to come out even and match `total_pages`.
pub fn check_user_page(page: &UserPage) -> Result<(), ContractViolation> {
    ensure(page.total > 0, "total", || {
        format!("expected a positive total, got {}", page.total)
    })?;
    ensure(
        page.per_page > 0
            && page.total % page.per_page == 0
            && page.total / page.per_page == page.total_pages,
        "total_pages",
        || {
            format!(
                "{} users at {} per page do not make {} pages",
                page.total, page.per_page, page.total_pages
            )
        },
    )?;
    ensure(
        page.data.len() as u64 == page.per_page,
        "data",
        || {
            format!(
                "expected {} records, got {}",
                page.per_page,
                page.data.len()
            )
        },
    )?;
    let first = page
        .data
        .first()
        .ok_or_else(|| ContractViolation::body_mismatch("data", "the page is empty"))?;
    ensure(first.id > 0, "data[0].id", || {
        format!("expected a positive id, got {}", first.id)
    })?;
    check_email(&first.email)
}

/// A record fetched by id.
pub fn check_user_record(record: &UserRecord, expected_id: u64) -> Result<(), ContractViolation> {
    ensure(record.id == expected_id, "data.id", || {
        format!("expected {}, got {}", expected_id, record.id)
    })?;
    check_email(&record.email)?;
    ensure(!record.avatar.is_empty(), "data.avatar", || {
        "expected an avatar url, got an empty string".to_string()
    })
}

pub fn check_email(email: &str) -> Result<(), ContractViolation> {
    let email = UserEmailAddress::parse(email.to_string())
        .map_err(|e| ContractViolation::body_mismatch("email", e))?;
    tracing::trace!(email = email.as_ref(), "Email has the expected shape");
    Ok(())
}

/// The first ten characters of an ISO-8601 timestamp must be `today`.
pub fn check_date_is(
    field: &'static str,
    timestamp: &str,
    today: NaiveDate,
) -> Result<(), ContractViolation> {
    let expected = today.format("%Y-%m-%d").to_string();
    ensure(
        timestamp.get(..10) == Some(expected.as_str()),
        field,
        || format!("expected a timestamp on {}, got {:?}", expected, timestamp),
    )
}

/// The response head must have arrived strictly before `bound`.
pub fn check_elapsed_below(
    response: &ApiResponse,
    bound: Duration,
) -> Result<(), ContractViolation> {
    if response.elapsed < bound {
        Ok(())
    } else {
        Err(ContractViolation::TooSlow {
            message: format!("Response time is more than {} sec.", bound.as_secs()),
            elapsed: response.elapsed,
            bound,
        })
    }
}
