use log::{info, warn};
use std::env;
use std::sync::Arc;

use moviepoll::app;
use moviepoll::config::{AppConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use moviepoll::sheets::SheetsStore;
use moviepoll::store::{MemoryStore, RecordStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config_path =
        env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!("no usable config at {} ({}); using defaults", config_path, e);
            AppConfig::default()
        }
    };

    // The store client is built here and handed to the web layer; nothing
    // else owns a connection handle
    let store: Arc<dyn RecordStore> = match &config.sheets {
        Some(sheets) => match SheetsStore::connect(sheets).await {
            Ok(store) => {
                info!("connected to remote sheet {}", sheets.spreadsheet_id);
                Arc::new(store)
            }
            Err(e) => {
                warn!("sheet connection failed ({}); records will stay in memory", e);
                Arc::new(MemoryStore::new())
            }
        },
        None => {
            warn!("no sheet configured; records will stay in memory");
            Arc::new(MemoryStore::new())
        }
    };

    app::run(&config.bind_addr, store).await
}
