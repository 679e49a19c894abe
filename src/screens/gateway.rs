use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{ClientError, ClientResult},
    models::{GatewayConnection, GatewayId},
    scope::ViewScope,
    services::payment_gateway::PaymentGatewayProvider,
    session::Session,
    validation::{is_valid_otp, is_valid_ph_mobile},
};

#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    CollectPhone,
    VerifyOtp { phone: String },
    Success { connection: GatewayConnection },
}

/// `collect-phone -> verify-otp -> success` for one payment gateway.
/// The connection is written to the session only on success.
pub struct GatewayWizard {
    gateway: GatewayId,
    provider: Arc<dyn PaymentGatewayProvider>,
    session: Session,
    scope: ViewScope,
    step: WizardStep,
}

impl GatewayWizard {
    pub fn new(
        gateway: GatewayId,
        provider: Arc<dyn PaymentGatewayProvider>,
        session: Session,
    ) -> Self {
        Self {
            gateway,
            provider,
            session,
            scope: ViewScope::new(),
            step: WizardStep::CollectPhone,
        }
    }

    pub fn gateway(&self) -> GatewayId {
        self.gateway
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn submit_phone(&mut self, phone: &str) -> ClientResult<&WizardStep> {
        if !matches!(self.step, WizardStep::CollectPhone) {
            return Err(ClientError::validation("Phone number was already submitted"));
        }
        let phone = phone.trim();
        if !is_valid_ph_mobile(phone) {
            return Err(ClientError::validation(
                "Enter a valid Philippine mobile number (e.g. 09171234567)",
            ));
        }
        self.scope
            .run(self.provider.request_otp(self.gateway, phone))
            .await?;
        tracing::info!(gateway = %self.gateway, "otp requested");
        self.step = WizardStep::VerifyOtp {
            phone: phone.to_string(),
        };
        Ok(&self.step)
    }

    pub async fn resend_otp(&self) -> ClientResult<()> {
        let WizardStep::VerifyOtp { phone } = &self.step else {
            return Err(ClientError::validation("No OTP has been requested yet"));
        };
        self.scope
            .run(self.provider.request_otp(self.gateway, phone))
            .await
    }

    pub async fn submit_otp(&mut self, otp: &str) -> ClientResult<&WizardStep> {
        let WizardStep::VerifyOtp { phone } = &self.step else {
            return Err(ClientError::validation("Submit a phone number first"));
        };
        let phone = phone.clone();
        let otp = otp.trim();
        if !is_valid_otp(otp) {
            return Err(ClientError::validation("OTP must be exactly 6 digits"));
        }
        let accepted = self
            .scope
            .run(self.provider.verify_otp(self.gateway, &phone, otp))
            .await?;
        if !accepted {
            tracing::info!(gateway = %self.gateway, "otp rejected");
            return Err(ClientError::validation("The OTP you entered is incorrect"));
        }

        let connection = GatewayConnection {
            gateway: self.gateway,
            connected: true,
            phone,
            connected_at: Utc::now(),
        };
        self.session.connect_gateway(connection.clone())?;
        tracing::info!(gateway = %self.gateway, mode = ?self.provider.mode(), "gateway connected");
        self.step = WizardStep::Success { connection };
        Ok(&self.step)
    }

    /// Back from OTP entry to phone entry.
    pub fn back(&mut self) {
        if matches!(self.step, WizardStep::VerifyOtp { .. }) {
            self.step = WizardStep::CollectPhone;
        }
    }
}

pub fn disconnect(session: &Session, gateway: GatewayId) -> ClientResult<bool> {
    let removed = session.disconnect_gateway(gateway)?;
    if removed {
        tracing::info!(%gateway, "gateway disconnected");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::payment_gateway::SandboxGateway;

    fn wizard(session: &Session) -> GatewayWizard {
        GatewayWizard::new(
            GatewayId::Gcash,
            Arc::new(SandboxGateway::instant()),
            session.clone(),
        )
    }

    #[tokio::test]
    async fn phone_then_otp_connects_the_gateway() {
        let session = Session::in_memory();
        let mut wizard = wizard(&session);

        let step = wizard.submit_phone("09171234567").await.unwrap();
        assert_eq!(
            step,
            &WizardStep::VerifyOtp {
                phone: "09171234567".into()
            }
        );

        let step = wizard.submit_otp("123456").await.unwrap().clone();
        assert!(matches!(step, WizardStep::Success { .. }));
        let stored = session.gateway(GatewayId::Gcash).expect("persisted");
        assert!(stored.connected);
        assert_eq!(stored.phone, "09171234567");
    }

    #[tokio::test]
    async fn invalid_phone_stays_on_step_one() {
        let session = Session::in_memory();
        let mut wizard = wizard(&session);
        assert!(wizard.submit_phone("08123456789").await.is_err());
        assert_eq!(wizard.step(), &WizardStep::CollectPhone);
    }

    #[tokio::test]
    async fn malformed_otp_is_rejected_and_nothing_is_stored() {
        let session = Session::in_memory();
        let mut wizard = wizard(&session);
        wizard.submit_phone("+639123456789").await.unwrap();
        assert!(wizard.submit_otp("12345").await.is_err());
        assert!(matches!(wizard.step(), WizardStep::VerifyOtp { .. }));
        assert!(session.gateway(GatewayId::Gcash).is_none());

        wizard.back();
        assert_eq!(wizard.step(), &WizardStep::CollectPhone);
    }

    #[tokio::test]
    async fn otp_before_phone_is_an_error() {
        let session = Session::in_memory();
        let mut wizard = wizard(&session);
        assert!(wizard.submit_otp("123456").await.is_err());
    }

    #[tokio::test]
    async fn disconnect_removes_the_flag() {
        let session = Session::in_memory();
        let mut wizard = wizard(&session);
        wizard.submit_phone("09171234567").await.unwrap();
        wizard.submit_otp("654321").await.unwrap();

        assert!(disconnect(&session, GatewayId::Gcash).unwrap());
        assert!(!disconnect(&session, GatewayId::Gcash).unwrap());
        assert!(session.gateway(GatewayId::Gcash).is_none());
    }
}
