use std::time::Instant;

use reqwest::{
    Method, RequestBuilder,
    multipart::{Form, Part},
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::AppConfig,
    dto::upload::UploadForm,
    error::{ClientError, ClientResult},
    response::error_message,
    session::Session,
};

pub mod auth;
pub mod dashboard;
pub mod discounts;
pub mod gateways;
pub mod products;
pub mod profile;
pub mod workshops;

/// Shared HTTP client for the seller API. Attaches the session's bearer token
/// to every request and turns non-2xx responses into structured errors.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Session) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(&config.api_url, session, http))
    }

    pub fn with_client(base_url: &str, session: Session, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_json(&self, path: &str) -> ClientResult<Value> {
        self.execute(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Value> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(method, path, builder).await
    }

    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> ClientResult<Value> {
        self.send_json::<Value>(method, path, None).await
    }

    pub(crate) async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        upload: UploadForm,
    ) -> ClientResult<Value> {
        let mut form = Form::new();
        for (name, value) in upload.fields {
            form = form.text(name, value);
        }
        for (name, file) in upload.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part(name, part);
        }
        let builder = self.request(method.clone(), path).multipart(form);
        self.execute(method, path, builder).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ClientResult<Value> {
        let started = Instant::now();
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(%method, path, error = %err, "request failed");
            ClientError::Network(err)
        })?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            %method,
            path,
            status = %status,
            ms = %started.elapsed().as_millis(),
            "request finished"
        );

        if !status.is_success() {
            let err = ClientError::from_status(status, error_message(&body));
            tracing::warn!(%method, path, status = %status, error = %err, "api error");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Percent-encodes a path segment such as an id.
pub(crate) fn segment(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = ApiClient::with_client(
            "http://localhost:3000/api/",
            Session::in_memory(),
            reqwest::Client::new(),
        );
        assert_eq!(
            client.url("/seller/discounts"),
            "http://localhost:3000/api/seller/discounts"
        );
        assert_eq!(client.url("users/profile"), "http://localhost:3000/api/users/profile");
    }

    #[test]
    fn ids_are_escaped_in_paths() {
        assert_eq!(segment("abc-123"), "abc-123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
