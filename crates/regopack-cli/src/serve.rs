use crate::http::{SharedContext, create_router};
use anyhow::Context;
use std::io::Write;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Serve the analyzer until interrupted.
///
/// The bound port is written to stdout on its own line before any request is
/// accepted; the host engine reads it to connect.
pub async fn serve(
    ctx: SharedContext,
    listen: SocketAddr,
    host: Option<String>,
) -> anyhow::Result<()> {
    let router = create_router(ctx.clone()).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("could not serve on {listen}"))?;
    let addr = listener.local_addr().context("read bound address")?;

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", addr.port()).context("write port")?;
    stdout.flush().context("write port")?;

    tracing::info!(
        %addr,
        host = host.as_deref().unwrap_or("-"),
        pack = %ctx.pack().name,
        "analyzer listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("plugin exit")?;

    ctx.close();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not install interrupt handler");
        std::future::pending::<()>().await;
    }
}
