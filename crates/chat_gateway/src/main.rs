use chat_gateway::handlers::chat::chat_proxy;
use chat_gateway::upstream::UpstreamClient;
use chat_gateway::utils::tracing::init_tracing;
use common::configuration::GatewayConfig;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config_path = env::var("CHATGW_CONFIG").ok().map(PathBuf::from);
    let config = GatewayConfig::load(config_path.as_deref())?;

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; chat requests will be rejected until it is configured");
    }

    let upstream = Arc::new(UpstreamClient::new(
        config.upstream_endpoint.clone(),
        config.upstream_timeout(),
    )?);
    let config = Arc::new(config);

    let listener = TcpListener::bind(&config.listen_address).await?;
    info!(addr = %config.listen_address, upstream = %upstream.endpoint(), "chat gateway listening");

    loop {
        let (stream, _) = listener.accept().await?;
        let peer_addr = stream.peer_addr()?;
        let io = TokioIo::new(stream);

        let config = Arc::clone(&config);
        let upstream = Arc::clone(&upstream);

        // The inbound contract has no path component (the fronting platform
        // owns routing), so every request goes through the chat handler.
        let service = service_fn(move |req| {
            chat_proxy(req, Arc::clone(&config), Arc::clone(&upstream))
        });

        tokio::task::spawn(async move {
            debug!(peer = ?peer_addr, "accepted connection");
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(error = ?err, "error serving connection");
            }
        });
    }
}
