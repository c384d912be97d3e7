//! todo-api バイナリのエントリポイント
//! 設定を環境変数から読み込み、HTTP サーバを起動します。

use anyhow::Context;
use shared::{init_tracing, Config, TokenService};
use todo_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG 環境変数で制御可能
    init_tracing().context("failed to initialise tracing")?;

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    let state = AppState::new(TokenService::from_config(&config));
    let addr = config.socket_addr();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server starting");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // シグナルを待てない場合は停止せずに動き続ける
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
