// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP server exposing the metrics endpoint and a landing page.

use std::io;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{body::Incoming, header, http, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tracing::{debug, error, info};

use crate::exporter::Exporter;
use crate::exposition::{PrometheusSink, TEXT_FORMAT};

/// Errors fatal to the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind listener: {0}")]
    Bind(io::Error),

    #[error("accept failed: {0}")]
    Accept(io::Error),
}

/// Serves the scrape endpoint. Each request to the metrics path drives one
/// collection cycle through the exporter and renders the resulting snapshot.
pub struct MetricsServer {
    listen_address: String,
    metrics_path: String,
    exporter: Arc<Exporter>,
}

impl MetricsServer {
    pub fn new(listen_address: String, metrics_path: String, exporter: Arc<Exporter>) -> Self {
        MetricsServer {
            listen_address,
            metrics_path,
            exporter,
        }
    }

    pub async fn run(self) -> Result<(), ServerError> {
        let listener = tokio::net::TcpListener::bind(&self.listen_address)
            .await
            .map_err(ServerError::Bind)?;
        info!("Listening on {}", self.listen_address);

        let state = Arc::new(self);
        let server = hyper::server::conn::http1::Builder::new();
        let mut joinset = tokio::task::JoinSet::new();

        loop {
            let conn = tokio::select! {
                con_res = listener.accept() => match con_res {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::ConnectionAborted
                                | io::ErrorKind::ConnectionReset
                                | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        error!("Server error: {e}");
                        return Err(ServerError::Accept(e));
                    }
                    Ok((conn, _)) => conn,
                },
                finished = async {
                    match joinset.join_next().await {
                        Some(finished) => finished,
                        None => std::future::pending().await,
                    }
                } => match finished {
                    Err(e) if e.is_panic() => {
                        // Don't kill the server on panic - log and continue
                        error!("Connection handler panicked: {:?}", e);
                        continue;
                    },
                    Ok(()) | Err(_) => continue,
                },
            };

            let conn = TokioIo::new(conn);
            let server = server.clone();
            let state = Arc::clone(&state);
            joinset.spawn(async move {
                let service = service_fn(move |req| {
                    let state = Arc::clone(&state);
                    async move { state.handle(req).await }
                });
                if let Err(e) = server.serve_connection(conn, service).await {
                    error!("Connection error: {e}");
                }
            });
        }
    }

    async fn handle(&self, req: Request<Incoming>) -> http::Result<Response<Full<Bytes>>> {
        match (req.method(), req.uri().path()) {
            (&Method::GET, path) if path == self.metrics_path => self.scrape().await,
            (&Method::GET, "/") => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Full::new(Bytes::from(landing_page(&self.metrics_path)))),
            _ => {
                let mut not_found = Response::default();
                *not_found.status_mut() = StatusCode::NOT_FOUND;
                Ok(not_found)
            }
        }
    }

    async fn scrape(&self) -> http::Result<Response<Full<Bytes>>> {
        debug!("Scrape request received");
        let sink = match PrometheusSink::new(self.exporter.describe()) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                return log_and_create_http_response(
                    &format!("Error building metrics sink: {e}"),
                    StatusCode::INTERNAL_SERVER_ERROR,
                );
            }
        };

        self.exporter
            .collect(Arc::clone(&sink) as Arc<dyn crate::emitter::MetricSink>)
            .await;

        match sink.render() {
            Ok(body) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, TEXT_FORMAT)
                .body(Full::new(Bytes::from(body))),
            Err(e) => log_and_create_http_response(
                &format!("Error rendering metrics: {e}"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        }
    }
}

/// Logs the given message and returns it as the body of a plain-text
/// response with the given status code.
fn log_and_create_http_response(
    message: &str,
    status: StatusCode,
) -> http::Result<Response<Full<Bytes>>> {
    if status.is_success() {
        debug!("{message}");
    } else {
        error!("{message}");
    }
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(message.to_string())))
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>AWS Logs Exporter</title></head>\n\
         <body>\n\
         <h1>AWS Logs Exporter</h1>\n\
         <p><a href='{metrics_path}'>Metrics</a></p>\n\
         </body>\n\
         </html>"
    )
}
