use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct OtpRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyOtpResponse {
    pub connected: bool,
}
