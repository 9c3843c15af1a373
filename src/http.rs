//! HTTP plumbing shared by every endpoint
//!
//! All requests flow through [`Http`]: it owns the base URL and the reqwest
//! client, attaches configured credentials, and applies one uniform response
//! classification. Classification and error-body parsing are plain functions
//! of the status and body so they can be tested without a transport.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Result, VectraError};

#[derive(Clone)]
pub(crate) struct Http {
    base_url: String,
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl Http {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            base_url: config.base_url(),
            client,
            credentials,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::GET, path, None::<&()>).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn get_text(&self, path: &str) -> Result<String> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::POST, path, Some(body)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::POST, path, None::<&()>).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    /// Issue one request and hand the body through [`classify`]
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("{} responded {}", url, status.as_u16());

        classify(status, body)
    }
}

/// Uniform response classification: 2xx passes the body through, anything
/// else becomes an API error carrying the status and decoded message.
pub(crate) fn classify(status: StatusCode, body: String) -> Result<String> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(VectraError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Extract `"{error}: {message}"` from a JSON error body, `"{error}"` when
/// there is no message, or the raw body when it is not the expected shape.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    let error = value.get("error").and_then(|e| e.as_str());
    let message = value.get("message").and_then(|m| m.as_str());
    match (error, message) {
        (Some(error), Some(message)) => format!("{}: {}", error, message),
        (Some(error), None) => error.to_string(),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn test_error_message_concatenates_error_and_message() {
        let body = r#"{"error": "InvalidArgumentError", "message": "dimension mismatch"}"#;
        assert_eq!(error_message(body), "InvalidArgumentError: dimension mismatch");
    }

    #[test]
    fn test_error_message_without_message_field() {
        let body = r#"{"error": "UniqueConstraintError"}"#;
        assert_eq!(error_message(body), "UniqueConstraintError");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
        assert_eq!(error_message(r#"{"detail": "nope"}"#), r#"{"detail": "nope"}"#);
    }

    #[test]
    fn test_classify_success_passes_body_through() {
        let body = classify(status(200), r#"{"ok":true}"#.to_string()).unwrap();
        assert_eq!(body, r#"{"ok":true}"#);
    }

    #[test]
    fn test_classify_non_2xx_is_an_api_error() {
        let error = classify(
            status(400),
            r#"{"error": "InvalidArgumentError", "message": "dimension mismatch"}"#.to_string(),
        )
        .unwrap_err();

        match error {
            VectraError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "InvalidArgumentError: dimension mismatch");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_not_found() {
        let error = classify(status(404), String::new()).unwrap_err();
        assert!(error.is_not_found());
    }
}
