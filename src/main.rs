use anyhow::anyhow;
use clap::Parser;
use distcache::config::{DEFAULT_CACHE_BYTES, DEFAULT_REPLICAS, PoolOptions};
use distcache::group::GroupRegistry;
use distcache::group::handlers::api_router;
use distcache::peers::protocol::DEFAULT_BASE_PATH;
use distcache::peers::{HttpPool, PeerPicker};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A distcache node serving the demo `scores` group.
#[derive(Debug, Parser)]
#[command(name = "distcache", version)]
struct Args {
    /// Address the peer protocol listens on.
    #[arg(long, env = "DISTCACHE_BIND", default_value = "127.0.0.1:8001")]
    bind: SocketAddr,

    /// Address other nodes use to reach this one (defaults to http://<bind>).
    #[arg(long, env = "DISTCACHE_SELF")]
    advertise: Option<String>,

    /// Every node of the cache, this one included. Repeat or comma-separate.
    #[arg(long = "peer", env = "DISTCACHE_PEERS", value_delimiter = ',')]
    peers: Vec<String>,

    /// Also serve the front-end API on this address.
    #[arg(long, env = "DISTCACHE_API")]
    api: Option<SocketAddr>,

    #[arg(long, env = "DISTCACHE_CACHE_BYTES", default_value_t = DEFAULT_CACHE_BYTES)]
    cache_bytes: usize,

    #[arg(long, env = "DISTCACHE_REPLICAS", default_value_t = DEFAULT_REPLICAS)]
    replicas: usize,

    #[arg(long, env = "DISTCACHE_BASE_PATH", default_value = DEFAULT_BASE_PATH)]
    base_path: String,

    /// Timeout of a single peer fetch, in milliseconds.
    #[arg(long, env = "DISTCACHE_REQUEST_TIMEOUT_MS", default_value_t = 3000)]
    request_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 1. Groups:
    let registry = GroupRegistry::new();
    let db: Arc<HashMap<&'static str, &'static str>> =
        Arc::new(HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]));

    let scores = registry.new_group("scores", args.cache_bytes, move |key: String| {
        let db = db.clone();
        async move {
            tracing::info!("[SlowDB] search key {}", key);
            db.get(key.as_str())
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow!("{} not exist", key))
        }
    });

    // 2. Peers:
    let self_addr = args
        .advertise
        .clone()
        .unwrap_or_else(|| format!("http://{}", args.bind));
    let options = PoolOptions::default()
        .with_base_path(&args.base_path)
        .with_replicas(args.replicas)
        .with_request_timeout(Duration::from_millis(args.request_timeout_ms));
    let pool = HttpPool::new(self_addr.as_str(), options)?;

    let peers = if args.peers.is_empty() {
        vec![self_addr.clone()]
    } else {
        args.peers.clone()
    };
    pool.set_peers(&peers)?;

    let picker: Arc<dyn PeerPicker> = pool.clone();
    scores.register_peers(picker)?;

    tracing::info!("Node {} joined a cache of {} peer(s)", pool.self_addr(), peers.len());

    // 3. Front-end API:
    if let Some(api_addr) = args.api {
        let app = api_router(scores.clone());
        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        tracing::info!("Front-end API listening on {}", api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Front-end API stopped: {}", e);
            }
        });
    }

    // 4. Peer server:
    let app = pool.router(registry.clone());
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("Peer server listening on {}{}", args.bind, pool.base_path());
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
