#![allow(dead_code)]

use std::net::SocketAddr;

use craftconnect_seller::{
    client::ApiClient,
    config::{AppConfig, SandboxConfig},
    sandbox::{
        self, SandboxState,
        state::{SEED_EMAIL, SEED_PASSWORD, seed_store},
    },
    session::Session,
};

pub struct TestApi {
    pub addr: SocketAddr,
    pub state: SandboxState,
}

impl TestApi {
    pub async fn start() -> anyhow::Result<Self> {
        let state = SandboxState::new(
            SandboxConfig::new("127.0.0.1", 0, "integration-test-secret"),
            seed_store(),
        );
        let (addr, _handle) = sandbox::spawn(state.clone()).await?;
        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn client(&self) -> anyhow::Result<ApiClient> {
        let config = AppConfig {
            api_url: self.base_url(),
            ..Default::default()
        };
        Ok(ApiClient::new(&config, Session::in_memory())?)
    }

    pub async fn signed_in(&self) -> anyhow::Result<ApiClient> {
        let client = self.client()?;
        client.login(SEED_EMAIL, SEED_PASSWORD).await?;
        Ok(client)
    }
}
