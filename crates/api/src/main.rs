#[cfg(feature = "rocksdb")]
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use filwatch_api::{create_router, ApiState};
#[cfg(not(feature = "rocksdb"))]
use filwatch_storage::InMemoryStore;
#[cfg(feature = "rocksdb")]
use filwatch_storage::RocksDbStore;
use filwatch_watcher::{ChainHeadPoller, HeadScheduler, WatcherConfig};

fn get_bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}

#[cfg(feature = "rocksdb")]
fn get_storage_path() -> PathBuf {
    std::env::var("STORAGE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"))
}

fn init_storage() -> Result<Arc<dyn filwatch_storage::ObservationStore>, Box<dyn std::error::Error>>
{
    #[cfg(feature = "rocksdb")]
    {
        let path = get_storage_path();
        std::fs::create_dir_all(&path)
            .map_err(|e| format!("Failed to create storage directory: {}", e))?;

        tracing::info!("initializing RocksDB storage at: {}", path.display());
        let store = RocksDbStore::open(&path)
            .map_err(|e| format!("Failed to open RocksDB storage: {:?}", e))?;

        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "rocksdb"))]
    {
        tracing::info!("using in-memory observation store (RocksDB not enabled)");
        Ok(Arc::new(InMemoryStore::new()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = WatcherConfig::from_env()?;
    tracing::info!(
        "watching {} producer(s) via {} every {}s",
        config.watched_producers.len(),
        config.rpc_url,
        config.poll_interval_seconds
    );

    let store = init_storage()?;

    let poller = ChainHeadPoller::new(&config)?;
    let scheduler = Arc::new(HeadScheduler::new(
        poller,
        store.clone(),
        config.poll_interval(),
    ));

    // The periodic loop is started here, under this process's control, so it
    // can be aborted cleanly; nothing starts polling at construction time.
    let runner = scheduler.clone();
    let scheduler_handle = tokio::spawn(async move { runner.run().await });

    let api_state = Arc::new(ApiState {
        scheduler: scheduler.clone(),
        store: store.clone(),
    });
    let app = create_router(api_state);

    let bind_addr = get_bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("filwatch API listening on http://{}", bind_addr);

    let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

    tokio::select! {
        result = server_handle => {
            result??;
        }
        _ = scheduler_handle => {
            tracing::error!("head scheduler stopped unexpectedly");
        }
    }

    Ok(())
}
