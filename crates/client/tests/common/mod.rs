//! Shared helpers for client integration tests: a throwaway stub
//! backend served on an ephemeral local port.

use axum::Router;

/// Serve `app` on `127.0.0.1:0` and return the reachable base URL.
///
/// The server task is detached; it dies with the test runtime.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener
        .local_addr()
        .expect("listener should expose its address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("stub server should keep running");
    });

    format!("http://{addr}")
}
