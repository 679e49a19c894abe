use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::bail;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_COMMISSION_RATE: f64 = 0.02;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEV_JWT_SECRET: &str = "craftconnect-sandbox-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayMode {
    #[default]
    Sandbox,
    Live,
}

impl FromStr for GatewayMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "test" => Ok(GatewayMode::Sandbox),
            "live" => Ok(GatewayMode::Live),
            other => bail!("unknown gateway mode `{other}` (expected sandbox or live)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub session_file: Option<PathBuf>,
    pub gateway_mode: GatewayMode,
    pub commission_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: None,
            gateway_mode: GatewayMode::Sandbox,
            commission_rate: DEFAULT_COMMISSION_RATE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url =
            env::var("CRAFTCONNECT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = env::var("CRAFTCONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let session_file = env::var("CRAFTCONNECT_SESSION_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let gateway_mode = match env::var("CRAFTCONNECT_GATEWAY_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => GatewayMode::Sandbox,
        };
        let commission_rate = env::var("CRAFTCONNECT_COMMISSION_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_COMMISSION_RATE);
        if !(0.0..=1.0).contains(&commission_rate) {
            bail!("CRAFTCONNECT_COMMISSION_RATE must be between 0 and 1");
        }

        Ok(Self {
            api_url,
            timeout,
            session_file,
            gateway_mode,
            commission_rate,
        })
    }
}

#[derive(Clone)]
pub struct SandboxConfig {
    pub host: String,
    pub port: u16,
    jwt_secret: String,
}

impl std::fmt::Debug for SandboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

impl SandboxConfig {
    pub fn new(host: impl Into<String>, port: u16, jwt_secret: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure sandbox default");
            DEV_JWT_SECRET.to_string()
        });
        let host = env::var("SANDBOX_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SANDBOX_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Self::new(host, port, jwt_secret)
    }

    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
