//! reqwest-backed client implementations.
//!
//! Error mapping at this boundary: transport failures become
//! `NetworkUnreachable`, HTTP 409 from the account service becomes
//! `AccountAlreadyExists`, any other non-2xx becomes `ServerRejected` with
//! the response body surfaced verbatim.

use async_trait::async_trait;
use reqwest::StatusCode;

use models::signup::AccountSignupRequest;
use models::tenant::StagedTenantPayload;

use super::{AccountClient, ResetDispatcher, TenantProvisioner};
use crate::errors::ServiceError;

fn transport_error(e: reqwest::Error) -> ServiceError {
    ServiceError::NetworkUnreachable(e.to_string())
}

async fn rejection(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if body.trim().is_empty() {
        ServiceError::ServerRejected(status.to_string())
    } else {
        ServiceError::ServerRejected(body)
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

pub struct HttpAccountClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAccountClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }
}

#[async_trait]
impl AccountClient for HttpAccountClient {
    async fn create_account(&self, req: &AccountSignupRequest) -> Result<(), ServiceError> {
        let resp = self
            .http
            .post(join(&self.base_url, "/accounts"))
            .json(req)
            .send()
            .await
            .map_err(transport_error)?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(ServiceError::AccountAlreadyExists),
            _ => Err(rejection(resp).await),
        }
    }
}

pub struct HttpTenantProvisioner {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTenantProvisioner {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }
}

#[async_trait]
impl TenantProvisioner for HttpTenantProvisioner {
    async fn create_tenant(&self, payload: &StagedTenantPayload) -> Result<(), ServiceError> {
        let resp = self
            .http
            .post(join(&self.base_url, "/tenants"))
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(rejection(resp).await)
        }
    }
}

pub struct HttpResetDispatcher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpResetDispatcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }
}

#[async_trait]
impl ResetDispatcher for HttpResetDispatcher {
    async fn send_reset_email(&self, email: &str) -> Result<(), ServiceError> {
        let resp = self
            .http
            .post(join(&self.base_url, "/password-resets"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(transport_error)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(rejection(resp).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_join_tolerates_trailing_slash() {
        assert_eq!(join("http://a/", "/accounts"), "http://a/accounts");
        assert_eq!(join("http://a", "/accounts"), "http://a/accounts");
    }
}
