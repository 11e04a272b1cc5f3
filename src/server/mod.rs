//! HTTP surface over the lifecycle controller.
//!
//! Every endpoint answers `{"message": <string>}`; failures use the same
//! shape with a conventional status code.

mod error;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use routes::{
    BuildFlexibleRequest, MessageBody, StatusBody, TipRequest, UpdateTasksRequest, router,
};
pub use state::{AppContext, DesktopContext, StartupError};

use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    tracing::info!(%address, "http server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
