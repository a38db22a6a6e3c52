use crate::domain::{RegistrationRequest, UserPayload};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::time::{Duration, Instant};

pub const CONTENT_TYPE: &str = "content-type";
pub const CONTENT_LENGTH: &str = "content-length";
pub const NEL: &str = "nel";

/// HTTP client for the users and registration endpoints.
///
/// The timeout bounds every request as a whole; nothing is retried.
/// Any HTTP status is a successful call here, judging it is up to the caller.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
}

/// Everything a scenario gets to look at once a request has completed.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Time until the response head arrived, body download excluded.
    pub elapsed: Duration,
}

impl ApiResponse {
    /// Value of a header, `None` if it is absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(name = "Listing users", skip(self))]
    pub async fn list_users(&self, delay: Option<u64>) -> Result<ApiResponse, reqwest::Error> {
        let mut request = self.http_client.get(format!("{}/api/users", self.base_url));
        if let Some(delay) = delay {
            request = request.query(&[("delay", delay)]);
        }
        self.execute(request).await
    }

    #[tracing::instrument(name = "Fetching user", skip_all, fields(user_id = %id))]
    pub async fn get_user(&self, id: impl Display) -> Result<ApiResponse, reqwest::Error> {
        let request = self
            .http_client
            .get(format!("{}/api/users/{}", self.base_url, id));
        self.execute(request).await
    }

    #[tracing::instrument(name = "Creating user", skip(self))]
    pub async fn create_user(
        &self,
        payload: &UserPayload<'_>,
    ) -> Result<ApiResponse, reqwest::Error> {
        let request = self
            .http_client
            .post(format!("{}/api/users", self.base_url))
            .json(payload);
        self.execute(request).await
    }

    #[tracing::instrument(name = "Updating user", skip(self, id), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: impl Display,
        payload: &UserPayload<'_>,
    ) -> Result<ApiResponse, reqwest::Error> {
        let request = self
            .http_client
            .put(format!("{}/api/users/{}", self.base_url, id))
            .json(payload);
        self.execute(request).await
    }

    #[tracing::instrument(name = "Deleting user", skip_all, fields(user_id = %id))]
    pub async fn delete_user(&self, id: impl Display) -> Result<ApiResponse, reqwest::Error> {
        let request = self
            .http_client
            .delete(format!("{}/api/users/{}", self.base_url, id));
        self.execute(request).await
    }

    /// The service only routes registrations with the trailing slash.
    #[tracing::instrument(name = "Registering user", skip_all, fields(email = %registration.email))]
    pub async fn register(
        &self,
        registration: &RegistrationRequest<'_>,
    ) -> Result<ApiResponse, reqwest::Error> {
        let request = self
            .http_client
            .post(format!("{}/api/register/", self.base_url))
            .json(registration);
        self.execute(request).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse, reqwest::Error> {
        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed: {:?}", e);
            e
        })?;
        let elapsed = started.elapsed();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Received response"
        );
        Ok(ApiResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }
}
