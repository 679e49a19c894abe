use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    client::ApiClient,
    config::GatewayMode,
    error::{ClientError, ClientResult},
    models::GatewayId,
    validation::is_valid_otp,
};

/// Provider behind the gateway connection wizard. Selected by configuration,
/// never by anything the user types.
#[async_trait]
pub trait PaymentGatewayProvider: Send + Sync {
    /// Ask the provider to send a one-time password to `phone`.
    async fn request_otp(&self, gateway: GatewayId, phone: &str) -> ClientResult<()>;

    /// Returns `Ok(false)` when the provider rejects the code.
    async fn verify_otp(&self, gateway: GatewayId, phone: &str, otp: &str) -> ClientResult<bool>;

    fn mode(&self) -> GatewayMode;
}

/// Test double that accepts any well-formed 6-digit code after a short delay.
#[derive(Debug, Clone)]
pub struct SandboxGateway {
    latency: Duration,
}

impl SandboxGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for SandboxGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl PaymentGatewayProvider for SandboxGateway {
    async fn request_otp(&self, gateway: GatewayId, phone: &str) -> ClientResult<()> {
        tokio::time::sleep(self.latency).await;
        tracing::info!(%gateway, phone, "sandbox otp issued");
        Ok(())
    }

    async fn verify_otp(&self, gateway: GatewayId, _phone: &str, otp: &str) -> ClientResult<bool> {
        tokio::time::sleep(self.latency).await;
        let accepted = is_valid_otp(otp);
        tracing::info!(%gateway, accepted, "sandbox otp checked");
        Ok(accepted)
    }

    fn mode(&self) -> GatewayMode {
        GatewayMode::Sandbox
    }
}

/// Routes the OTP exchange through the seller API.
#[derive(Debug, Clone)]
pub struct LiveGateway {
    client: ApiClient,
}

impl LiveGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGatewayProvider for LiveGateway {
    async fn request_otp(&self, gateway: GatewayId, phone: &str) -> ClientResult<()> {
        self.client.request_gateway_otp(gateway, phone).await
    }

    async fn verify_otp(&self, gateway: GatewayId, phone: &str, otp: &str) -> ClientResult<bool> {
        match self.client.verify_gateway_otp(gateway, phone, otp).await {
            Ok(connected) => Ok(connected),
            Err(ClientError::Api { status: 400, .. }) | Err(ClientError::Api { status: 422, .. }) => {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn mode(&self) -> GatewayMode {
        GatewayMode::Live
    }
}

pub fn provider_for(mode: GatewayMode, client: &ApiClient) -> Arc<dyn PaymentGatewayProvider> {
    match mode {
        GatewayMode::Sandbox => Arc::new(SandboxGateway::default()),
        GatewayMode::Live => Arc::new(LiveGateway::new(client.clone())),
    }
}
