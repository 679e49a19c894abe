use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use craftconnect_seller::{
    config::SandboxConfig,
    sandbox::{self, SandboxState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,craftconnect_seller=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SandboxConfig::from_env();
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let state = SandboxState::seeded(config);
    tracing::info!(
        email = sandbox::state::SEED_EMAIL,
        password = sandbox::state::SEED_PASSWORD,
        "seeded seller account"
    );

    sandbox::serve(listener, state).await
}
