use std::io::Error;
use std::sync::Arc;

use feishu_dispatch::{
    application::{
        handlers::message_dispatcher::{MessageDispatchHandler, RetryPolicy},
        services::{
            credentials::TokenCache, platform::PlatformApi, progress::LogProgress,
            rate_limiter::AdmissionGate,
        },
        usecases::{
            resolve_recipients::ResolveRecipientsUseCase,
            send_batch::{SendBatchConfig, SendBatchUseCase},
            send_message::SendMessageUseCase,
        },
    },
    config::Config,
    domain::models::Credentials,
    infrastructure::messaging::feishu::FeishuClient,
    presentation::http::{
        endpoints::root::{ApiState, app},
        security::ApiKey,
    },
};
use poem::{Server, listener::TcpListener};
use tokio::main;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[main]
async fn main() -> Result<(), Error> {
    let config = Config::try_parse().map_err(Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();

    let shutdown = CancellationToken::new();
    let state = Arc::new(build_state(&config, shutdown.clone()).map_err(Error::other)?);

    let server_url = config.server_url();
    info!(url = %server_url, "starting server");

    let app = app(state, server_url);

    let signal = shutdown.clone();
    Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)))
        .run_with_graceful_shutdown(
            app,
            async move {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutdown requested, cancelling in-flight deliveries");
                signal.cancel();
            },
            None,
        )
        .await
}

fn build_state(config: &Config, shutdown: CancellationToken) -> anyhow::Result<ApiState> {
    let platform: Arc<dyn PlatformApi> =
        Arc::new(FeishuClient::new(config.base_url.clone(), config.request_timeout)?);
    let tokens = Arc::new(TokenCache::new(
        platform.clone(),
        Credentials::new(config.app_id.clone(), config.app_secret.clone()),
        config.token_refresh_margin,
    ));
    let gate =
        AdmissionGate::from_rate_ceiling(config.rate_limit_per_second, config.rate_limit_headroom);
    info!(
        capacity = gate.capacity(),
        max_attempts = config.max_attempts,
        "dispatch engine configured"
    );

    let dispatcher = Arc::new(MessageDispatchHandler::new(
        platform.clone(),
        tokens.clone(),
        gate.clone(),
        RetryPolicy {
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
        },
    ));

    Ok(ApiState {
        send_message_usecase: Arc::new(SendMessageUseCase::new(dispatcher.clone())),
        send_batch_usecase: Arc::new(SendBatchUseCase::new(
            dispatcher,
            Arc::new(LogProgress),
            SendBatchConfig {
                max_concurrent_deliveries: config.max_concurrent_deliveries,
            },
        )),
        resolve_recipients_usecase: Arc::new(ResolveRecipientsUseCase::new(
            platform,
            tokens,
            gate.clone(),
        )),
        gate,
        api_key: ApiKey::new(config.api_token.clone()),
        shutdown,
    })
}
