use reqwest::Method;

use super::ApiClient;
use crate::{
    dto::gateways::{OtpRequest, VerifyOtpRequest, VerifyOtpResponse},
    error::ClientResult,
    models::GatewayId,
    response::normalize_entity,
};

impl ApiClient {
    pub async fn request_gateway_otp(&self, gateway: GatewayId, phone: &str) -> ClientResult<()> {
        let path = format!("/seller/payment-gateways/{}/otp", gateway.as_str());
        let payload = OtpRequest {
            phone: phone.to_string(),
        };
        self.send_json(Method::POST, &path, Some(&payload)).await?;
        Ok(())
    }

    pub async fn verify_gateway_otp(
        &self,
        gateway: GatewayId,
        phone: &str,
        otp: &str,
    ) -> ClientResult<bool> {
        let path = format!("/seller/payment-gateways/{}/verify", gateway.as_str());
        let payload = VerifyOtpRequest {
            phone: phone.to_string(),
            otp: otp.to_string(),
        };
        let body = self.send_json(Method::POST, &path, Some(&payload)).await?;
        let verified: VerifyOtpResponse = normalize_entity(body, "verification")?;
        Ok(verified.connected)
    }
}
