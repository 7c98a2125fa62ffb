//! HTTP server lifecycle

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::prelude::*;

/// Bind the configured address and serve until Ctrl-C or `cancel` fires
pub async fn serve(app: App, router: Router, cancel: CancellationToken) -> RvResult<()> {
	let listener = TcpListener::bind(app.opts.listen.as_ref()).await.inspect_err(|e| {
		error!("FATAL: Cannot bind {}: {}", app.opts.listen, e);
	})?;
	serve_on(app, router, listener, cancel).await
}

/// Serve on an already bound listener
pub async fn serve_on(
	app: App,
	router: Router,
	listener: TcpListener,
	cancel: CancellationToken,
) -> RvResult<()> {
	info!("Listening on HTTP {}", listener.local_addr()?);

	let sweeper = app.rate_limiter.as_ref().map(|limiter| limiter.spawn_sweeper(cancel.child_token()));

	let result = axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(shutdown_signal(cancel.clone()))
		.await;

	// Stop background tasks whatever the reason the server returned
	cancel.cancel();
	if let Some(sweeper) = sweeper
		&& let Err(e) = sweeper.await
	{
		warn!("Idle sweeper terminated abnormally: {}", e);
	}

	if let Err(e) = &result {
		error!("HTTP server stopped unexpectedly: {}", e);
	} else {
		info!("Server stopped");
	}
	result.map_err(Into::into)
}

async fn shutdown_signal(cancel: CancellationToken) {
	tokio::select! {
		res = tokio::signal::ctrl_c() => {
			match res {
				Ok(()) => info!("Shutdown requested"),
				Err(e) => {
					warn!("Cannot listen for Ctrl-C: {}", e);
					cancel.cancelled().await;
				}
			}
		}
		() = cancel.cancelled() => {}
	}
}

// vim: ts=4
