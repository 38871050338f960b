use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use closetheloop::configuration::Config;
use closetheloop::generation::client::GeminiClient;
use closetheloop::storage::database_storage::DatabaseStorage;
use closetheloop::storage::file_store::FileStore;
use closetheloop::web_interface::WebServer;

#[tokio::main]
async fn main() {
    // Example how to log
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
 ██████╗██╗      ██████╗ ███████╗███████╗████████╗██╗  ██╗███████╗██╗      ██████╗  ██████╗ ██████╗
██╔════╝██║     ██╔═══██╗██╔════╝██╔════╝╚══██╔══╝██║  ██║██╔════╝██║     ██╔═══██╗██╔═══██╗██╔══██╗
██║     ██║     ██║   ██║███████╗█████╗     ██║   ███████║█████╗  ██║     ██║   ██║██║   ██║██████╔╝
██║     ██║     ██║   ██║╚════██║██╔══╝     ██║   ██╔══██║██╔══╝  ██║     ██║   ██║██║   ██║██╔═══╝
╚██████╗███████╗╚██████╔╝███████║███████╗   ██║   ██║  ██║███████╗███████╗╚██████╔╝╚██████╔╝██║
 ╚═════╝╚══════╝ ╚═════╝ ╚══════╝╚══════╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝ ╚═════╝  ╚═════╝ ╚═╝
===================================================================================================
            Lecture sessions, KAU suggestions, and assignment feedback over HTTP v0.1.0
===================================================================================================
"
    );

    info!("Importing configuration");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration imported successfully");

    if config.generation_api_key.is_empty() {
        info!("No generation API key configured, generation calls will be rejected upstream");
    }

    let storage = match DatabaseStorage::new_file(config.database_file.clone()).await {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            error!("Unable to open the database: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    let files = match FileStore::new(config.files_dir.clone()) {
        Ok(files) => Arc::new(files),
        Err(e) => {
            error!("Unable to open the file store: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    let generation = Arc::new(GeminiClient::new(
        config.generation_endpoint.clone(),
        config.generation_model.clone(),
        config.generation_api_key.clone(),
        Duration::from_secs(config.generation_timeout_secs),
    ));

    let server = WebServer::new(storage, files, generation);
    server.start(config.port).await;
}
