use std::net::SocketAddr;
use std::time::Duration;

use internship_portal::{
    config::{default_log_directive, get_config, init_config, Config, LogFormat},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config);

    if config.otp_demo_code.is_some() {
        tracing::warn!("OTP_DEMO_CODE is set; every login uses the same one-time code");
    }

    let app_state = AppState::new(config)?;

    {
        let state = app_state.clone();
        let interval = Duration::from_secs(config.sweep_interval_secs.max(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let (otps, sessions) = state.sweep_expired().await;
                let pending_otps = state.otp_store.len().await;
                let active_sessions = state.session_service.active_count().await;
                tracing::debug!(
                    evicted_otps = otps,
                    evicted_sessions = sessions,
                    pending_otps,
                    active_sessions,
                    "expired entries swept"
                );
            }
        });
    }

    let app = routes::router(app_state, config);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
