use crate::config::ServerConfig;
use crate::error::FrameworkError;
use crate::http::{collect_body, HttpResponse, Request};
use crate::middleware::Pipeline;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::Instrument;

pub struct Server {
    pipeline: Arc<Pipeline>,
    host: String,
    port: u16,
    max_body_size: usize,
}

impl Server {
    pub fn new(pipeline: Pipeline, config: &ServerConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            host: config.host.clone(),
            port: config.port,
            max_body_size: config.max_body_size,
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bind the listener without accepting yet
    ///
    /// Port `0` picks a free port; read it back with
    /// [`BoundServer::local_addr`].
    pub async fn bind(self) -> Result<BoundServer, FrameworkError> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        Ok(BoundServer {
            listener,
            pipeline: self.pipeline,
            max_body_size: self.max_body_size,
        })
    }

    pub async fn run(self) -> Result<(), FrameworkError> {
        self.bind().await?.serve().await
    }
}

/// A server whose listener is bound and ready to accept
pub struct BoundServer {
    listener: TcpListener,
    pipeline: Arc<Pipeline>,
    max_body_size: usize,
}

impl BoundServer {
    pub fn local_addr(&self) -> Result<SocketAddr, FrameworkError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the process is stopped
    pub async fn serve(self) -> Result<(), FrameworkError> {
        let addr = self.local_addr()?;
        tracing::info!(%addr, "Talabat API listening on http://{}", addr);

        let pipeline = self.pipeline;
        let max_body_size = self.max_body_size;

        loop {
            let (stream, peer) = self.listener.accept().await?;
            let io = TokioIo::new(stream);
            let pipeline = pipeline.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let pipeline = pipeline.clone();
                    async move {
                        Ok::<_, Infallible>(handle_request(pipeline, max_body_size, req).await)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%peer, error = %err, "connection closed with error");
                }
            });
        }
    }
}

async fn handle_request(
    pipeline: Arc<Pipeline>,
    max_body_size: usize,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let span = tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let started = Instant::now();
        let (parts, body) = req.into_parts();

        let response = match collect_body(body, max_body_size).await {
            Ok(bytes) => {
                let request = Request::new(http::Request::from_parts(parts, bytes));
                pipeline.handle(request).await
            }
            Err(e) => HttpResponse::from(e),
        };

        tracing::info!(
            status = response.status_code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        response.into_hyper()
    }
    .instrument(span)
    .await
}
