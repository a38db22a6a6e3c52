//! One function per contract scenario.
//!
//! Every scenario talks to the service through an [`ApiClient`] and returns
//! as soon as the first expectation is not met.

use crate::api_client::ApiClient;
use crate::configuration::SuiteSettings;
use crate::contract::{
    ContractViolation, check_date_is, check_elapsed_below, check_empty_body,
    check_empty_json_object, check_json_content_type, check_nel, check_nel_if_present,
    check_status, check_user_page, check_user_record, ensure, parse_json,
};
use crate::domain::{
    ApiErrorBody, CreatedUser, RegistrationToken, SingleUser, UpdatedUser, UserPage,
};
use crate::fixtures::{
    INVALID_REGISTRATIONS, NEW_USER, REGISTRATION, UPDATED_USER, expected_registration_token,
};
use crate::telemetry::error_chain_fmt;
use chrono::Utc;
use reqwest::StatusCode;

#[derive(thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Violation(#[from] ContractViolation),
    #[error("The request did not complete")]
    Transport(#[from] reqwest::Error),
}

impl std::fmt::Debug for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// GET /api/users: the first page and its pagination bookkeeping.
#[tracing::instrument(skip_all)]
pub async fn list_users(client: &ApiClient) -> Result<UserPage, ScenarioError> {
    let response = client.list_users(None).await?;
    check_status(&response, StatusCode::OK)?;
    check_json_content_type(&response)?;
    check_nel(&response)?;
    let page: UserPage = parse_json(&response)?;
    check_user_page(&page)?;
    Ok(page)
}

/// Listing twice in a row without a mutation in between yields the same page.
#[tracing::instrument(skip_all)]
pub async fn list_users_is_stable(client: &ApiClient) -> Result<(), ScenarioError> {
    let first = list_users(client).await?;
    let second = list_users(client).await?;
    ensure(first.total == second.total, "total", || {
        format!("{} changed to {}", first.total, second.total)
    })?;
    ensure(first.total_pages == second.total_pages, "total_pages", || {
        format!("{} changed to {}", first.total_pages, second.total_pages)
    })?;
    let first_id = first.data.first().map(|record| record.id);
    let second_id = second.data.first().map(|record| record.id);
    ensure(first_id == second_id, "data[0].id", || {
        format!("{:?} changed to {:?}", first_id, second_id)
    })?;
    Ok(())
}

/// GET /api/users/{id} for a user of the fixture dataset.
#[tracing::instrument(skip_all, fields(user_id = settings.user_id))]
pub async fn get_user(client: &ApiClient, settings: &SuiteSettings) -> Result<(), ScenarioError> {
    let response = client.get_user(settings.user_id).await?;
    check_status(&response, StatusCode::OK)?;
    check_json_content_type(&response)?;
    check_nel(&response)?;
    let user: SingleUser = parse_json(&response)?;
    check_user_record(&user.data, settings.user_id)?;
    Ok(())
}

/// Find an id the service does not know.
///
/// Starts at `bad_user_id` and steps by `bad_user_id + 100` for as long as
/// the service keeps answering with something other than a 404.
#[tracing::instrument(skip_all, fields(first_id = settings.bad_user_id))]
pub async fn probe_missing_user_id(
    client: &ApiClient,
    settings: &SuiteSettings,
) -> Result<u64, ScenarioError> {
    let give_up = |attempts| ContractViolation::NoMissingUser {
        first_id: settings.bad_user_id,
        attempts,
    };
    let step = settings
        .bad_user_id
        .checked_add(100)
        .ok_or_else(|| give_up(0))?;
    let mut candidate = settings.bad_user_id;
    for attempt in 1..=settings.max_probes {
        let response = client.get_user(candidate).await?;
        check_nel_if_present(&response)?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(candidate);
        }
        if attempt == settings.max_probes {
            break;
        }
        // Ids past u64::MAX cannot be probed
        let next = candidate
            .checked_add(step)
            .ok_or_else(|| give_up(attempt))?;
        tracing::debug!(
            "User {} exists (probe {}/{}), trying {}",
            candidate,
            attempt,
            settings.max_probes,
            next
        );
        candidate = next;
    }
    Err(give_up(settings.max_probes).into())
}

/// GET /api/users/{id} for an id that does not exist.
#[tracing::instrument(skip_all)]
pub async fn get_missing_user(
    client: &ApiClient,
    settings: &SuiteSettings,
) -> Result<(), ScenarioError> {
    let missing_id = probe_missing_user_id(client, settings).await?;
    let response = client.get_user(missing_id).await?;
    check_status(&response, StatusCode::NOT_FOUND)?;
    check_nel_if_present(&response)?;
    check_empty_json_object(&response)?;
    Ok(())
}

/// Create a user from [`NEW_USER`] and hand back what the service echoed.
pub async fn create_new_user(client: &ApiClient) -> Result<CreatedUser, ScenarioError> {
    let response = client.create_user(&NEW_USER).await?;
    check_status(&response, StatusCode::CREATED)?;
    check_nel_if_present(&response)?;
    let created: CreatedUser = parse_json(&response)?;
    Ok(created)
}

/// POST /api/users.
#[tracing::instrument(skip_all)]
pub async fn create_user(client: &ApiClient) -> Result<(), ScenarioError> {
    let response = client.create_user(&NEW_USER).await?;
    check_status(&response, StatusCode::CREATED)?;
    check_json_content_type(&response)?;
    check_nel(&response)?;
    let created: CreatedUser = parse_json(&response)?;
    ensure(created.name == NEW_USER.name, "name", || {
        format!("expected {:?}, got {:?}", NEW_USER.name, created.name)
    })?;
    ensure(created.job == NEW_USER.job, "job", || {
        format!("expected {:?}, got {:?}", NEW_USER.job, created.job)
    })?;
    ensure(!created.id.is_empty(), "id", || {
        "expected an id, got an empty string".to_string()
    })?;
    check_date_is("createdAt", &created.created_at, Utc::now().date_naive())?;
    Ok(())
}

/// PUT /api/users/{id} on a freshly created user.
///
/// The values before the update are the ones the creation echoed.
#[tracing::instrument(skip_all)]
pub async fn update_user(client: &ApiClient) -> Result<(), ScenarioError> {
    let original = create_new_user(client).await?;
    let response = client.update_user(&original.id, &UPDATED_USER).await?;
    check_status(&response, StatusCode::OK)?;
    check_json_content_type(&response)?;
    check_nel(&response)?;
    let updated: UpdatedUser = parse_json(&response)?;
    ensure(updated.name == UPDATED_USER.name, "name", || {
        format!("expected {:?}, got {:?}", UPDATED_USER.name, updated.name)
    })?;
    ensure(updated.job == UPDATED_USER.job, "job", || {
        format!("expected {:?}, got {:?}", UPDATED_USER.job, updated.job)
    })?;
    ensure(updated.name != original.name, "name", || {
        format!("still {:?} after the update", original.name)
    })?;
    ensure(updated.job != original.job, "job", || {
        format!("still {:?} after the update", original.job)
    })?;
    check_date_is("updatedAt", &updated.updated_at, Utc::now().date_naive())?;
    Ok(())
}

/// DELETE /api/users/{id} on a freshly created user, then make sure it is gone.
#[tracing::instrument(skip_all)]
pub async fn delete_user(client: &ApiClient) -> Result<(), ScenarioError> {
    let created = create_new_user(client).await?;
    let response = client.delete_user(&created.id).await?;
    check_status(&response, StatusCode::NO_CONTENT)?;
    check_nel(&response)?;
    check_empty_body(&response)?;

    let response = client.get_user(&created.id).await?;
    check_status(&response, StatusCode::NOT_FOUND)?;
    check_nel_if_present(&response)?;
    Ok(())
}

/// POST /api/register/ with the one user the service lets register.
#[tracing::instrument(skip_all)]
pub async fn register_user(client: &ApiClient) -> Result<(), ScenarioError> {
    let response = client.register(&REGISTRATION).await?;
    check_status(&response, StatusCode::OK)?;
    check_nel(&response)?;
    let token: RegistrationToken = parse_json(&response)?;
    let expected = expected_registration_token();
    ensure(token == expected, "body", || {
        format!("expected {:?}, got {:?}", expected, token)
    })?;
    Ok(())
}

/// POST /api/register/ with each malformed body.
#[tracing::instrument(skip_all)]
pub async fn register_user_rejects_invalid_payloads(
    client: &ApiClient,
) -> Result<(), ScenarioError> {
    for case in INVALID_REGISTRATIONS {
        let response = client.register(&case.body).await?;
        check_status(&response, StatusCode::BAD_REQUEST)?;
        check_nel(&response)?;
        let body: ApiErrorBody = parse_json(&response)?;
        ensure(body.error == case.error, "error", || {
            format!(
                "expected {:?} for {:?}, got {:?}",
                case.error, case.body, body.error
            )
        })?;
    }
    Ok(())
}

/// GET /api/users?delay=N must still answer in under N seconds.
#[tracing::instrument(skip_all, fields(delay_seconds = settings.delay_seconds))]
pub async fn delayed_list_users(
    client: &ApiClient,
    settings: &SuiteSettings,
) -> Result<(), ScenarioError> {
    let response = client.list_users(Some(settings.delay_seconds)).await?;
    check_status(&response, StatusCode::OK)?;
    check_json_content_type(&response)?;
    check_nel(&response)?;
    check_elapsed_below(&response, settings.latency_bound())?;
    Ok(())
}
