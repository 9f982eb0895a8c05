//! Remote user collection: the four REST operations the store builds on.

use async_trait::async_trait;
use reqwest::{header::CONTENT_LENGTH, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NewUser, User, UserId},
    error::ApiError,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::ClientSettings,
    error::{ConfigError, TransportError},
};

#[async_trait]
pub trait UserCollection: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, TransportError>;
    /// `None` when the server acknowledged with an empty success.
    async fn create(&self, user: &NewUser) -> Result<Option<User>, TransportError>;
    /// Full replacement of the record with `user.id`.
    async fn update(&self, user: &User) -> Result<Option<User>, TransportError>;
    async fn delete(&self, id: UserId) -> Result<(), TransportError>;
}

/// [`UserCollection`] over HTTP: `GET/POST /users`, `PUT/DELETE /users/{id}`.
pub struct HttpUserCollection {
    http: Client,
    base_url: String,
}

impl HttpUserCollection {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::HttpClient)?;
        Self::with_client(http, &settings.base_url)
    }

    fn with_client(http: Client, base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        let parsed = Url::parse(trimmed).map_err(|source| ConfigError::BaseUrl {
            value: trimmed.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
        }

        Ok(Self {
            http,
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/users/{id}", self.base_url)
    }

    async fn fetch_all(&self) -> Result<Vec<User>, TransportError> {
        let response = self.http.get(self.users_url()).send().await?;
        match read_body(response).await? {
            Some(body) => decode(&body),
            None => Ok(Vec::new()),
        }
    }

    async fn post_user(&self, user: &NewUser) -> Result<Option<User>, TransportError> {
        let response = self.http.post(self.users_url()).json(user).send().await?;
        decode_optional(read_body(response).await?)
    }

    async fn put_user(&self, user: &User) -> Result<Option<User>, TransportError> {
        let response = self
            .http
            .put(self.user_url(user.id))
            .json(user)
            .send()
            .await?;
        decode_optional(read_body(response).await?)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), TransportError> {
        let response = self.http.delete(self.user_url(id)).send().await?;
        read_body(response).await?;
        Ok(())
    }
}

#[async_trait]
impl UserCollection for HttpUserCollection {
    async fn list(&self) -> Result<Vec<User>, TransportError> {
        log_outcome("list", self.fetch_all().await)
    }

    async fn create(&self, user: &NewUser) -> Result<Option<User>, TransportError> {
        log_outcome("create", self.post_user(user).await)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, TransportError> {
        log_outcome("update", self.put_user(user).await)
    }

    async fn delete(&self, id: UserId) -> Result<(), TransportError> {
        log_outcome("delete", self.delete_user(id).await)
    }
}

/// Returns `None` for an empty success (204, `Content-Length: 0` or no body).
async fn read_body(response: Response) -> Result<Option<Vec<u8>>, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await.ok();
        let api_error = body.and_then(|bytes| serde_json::from_slice::<ApiError>(&bytes).ok());
        return Err(TransportError::from_status(
            status.as_u16(),
            status.canonical_reason(),
            api_error,
        ));
    }

    let empty_length = response
        .headers()
        .get(CONTENT_LENGTH)
        .is_some_and(|value| value.as_bytes() == b"0");
    if status == StatusCode::NO_CONTENT || empty_length {
        return Ok(None);
    }

    let body = response.bytes().await?;
    Ok((!body.is_empty()).then(|| body.to_vec()))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, TransportError> {
    Ok(serde_json::from_slice(body)?)
}

fn decode_optional<T: DeserializeOwned>(
    body: Option<Vec<u8>>,
) -> Result<Option<T>, TransportError> {
    body.as_deref().map(decode).transpose()
}

fn log_outcome<T>(
    operation: &'static str,
    result: Result<T, TransportError>,
) -> Result<T, TransportError> {
    match &result {
        Ok(_) => debug!(operation, "users: remote call succeeded"),
        Err(err) => warn!(
            operation,
            status = err.status(),
            "users: remote call failed: {err}"
        ),
    }
    result
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
