use reqwest::Method;

use super::ApiClient;
use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::ClientResult,
    response::normalize_entity,
};

impl ApiClient {
    /// Logs in and stores the returned token in the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = self
            .send_json(Method::POST, "/auth/login", Some(&payload))
            .await?;
        let login: LoginResponse = normalize_entity(body, "login")?;
        self.session().set_token(&login.token, login.expires_at)?;
        tracing::info!(email, "logged in");
        Ok(login)
    }

    /// Local logout; the API keeps no server-side session for the token.
    pub fn logout(&self) -> ClientResult<()> {
        self.session().clear()
    }
}
