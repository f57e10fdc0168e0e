//! Client for the remote student records backend.
//!
//! Thin wrapper over reqwest: every authenticated call carries the session's
//! bearer token, JSON bodies go through `.json()`, and non-success statuses
//! are folded into [`ApiError`]. No retries, no timeouts, no caching.

mod types;

pub use types::{
    Credentials, ListQuery, LoginReply, SortDir, SortField, Student, StudentPage, StudentPayload,
};

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401 or 403: bad credentials on login, an expired
    /// or revoked token everywhere else.
    #[error("not authorized by the backend")]
    Unauthorized,
    #[error("backend returned status {0}")]
    Status(StatusCode),
    #[error("failed to reach backend")]
    Network(#[source] reqwest::Error),
    #[error("unexpected backend response shape")]
    Decode(#[source] reqwest::Error),
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginReply, ApiError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(ApiError::Network)?;

        decode(check_status(response)?).await
    }

    /// Fetch one page of students. The keyword parameter is omitted entirely
    /// when blank.
    pub async fn list_students(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> Result<StudentPage, ApiError> {
        let mut request = self
            .http
            .get(self.url("/api/students"))
            .bearer_auth(token)
            .query(&[
                ("page", query.page.to_string()),
                ("size", query.size.to_string()),
                ("sortField", query.sort_field.as_str().to_string()),
                ("sortDir", query.sort_dir.as_str().to_string()),
            ]);

        let keyword = query.keyword.trim();
        if !keyword.is_empty() {
            request = request.query(&[("keyword", keyword)]);
        }

        let response = request.send().await.map_err(ApiError::Network)?;
        decode(check_status(response)?).await
    }

    pub async fn get_student(&self, token: &str, id: i64) -> Result<Student, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/students/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Network)?;

        decode(check_status(response)?).await
    }

    pub async fn create_student(
        &self,
        token: &str,
        payload: &StudentPayload,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/api/students"))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(ApiError::Network)?;

        check_status(response).map(|_| ())
    }

    pub async fn update_student(
        &self,
        token: &str,
        id: i64,
        payload: &StudentPayload,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/students/{id}")))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(ApiError::Network)?;

        check_status(response).map(|_| ())
    }

    pub async fn delete_student(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/students/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Network)?;

        // The backend answers with a short text body; only the status matters.
        check_status(response).map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
        status if !status.is_success() => Err(ApiError::Status(status)),
        _ => Ok(response),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json().await.map_err(ApiError::Decode)
}
