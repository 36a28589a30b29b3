//! Test utilities for adprofit-core
//!
//! Provides a mock published spreadsheet that serves a fixed CSV body, for
//! exercising the revenue URL source without network access.

use std::net::SocketAddr;

use axum::{http::header, response::IntoResponse, routing::get, Router};
use tokio::sync::oneshot;

/// Mock published-sheet server for tests
pub struct MockSheetServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockSheetServer {
    /// Start the mock server on an available port, serving `csv` at `/export`
    pub async fn start(csv: &str) -> Self {
        let body = csv.to_string();
        let app = Router::new().route(
            "/export",
            get(move || {
                let body = body.clone();
                async move {
                    ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of the CSV export
    pub fn csv_url(&self) -> String {
        format!("{}/export", self.url())
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockSheetServer {
    fn drop(&mut self) {
        self.stop();
    }
}
