use axum::{Router, routing};
use gogs_build_hook::build::DocumentBuilder;
use gogs_build_hook::error::HookError;
use gogs_build_hook::handlers::handle_hook;
use gogs_build_hook::{AppConfig, AppState};
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{self, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "hook_config.toml";

/// Load, parse, and validate the configuration file
fn load_config(path: &str) -> Result<AppConfig, HookError> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        HookError::ConfigError(format!("Failed to read config file '{}': {}", path, e))
    })?;

    let config: AppConfig = toml::from_str(&config_str).map_err(|e| {
        HookError::ConfigError(format!("Failed to parse config file '{}': {}", path, e))
    })?;

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config_path =
        std::env::var("HOOK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind_address = config.bind_address();
    let ssl_enable = config.ssl_enable;
    let ssl_crt = config.ssl_crt.clone();
    let ssl_key = config.ssl_key.clone();

    let state = Arc::new(AppState {
        config,
        builder: Arc::new(DocumentBuilder),
    });

    let app = Router::new()
        .route("/hook", routing::any(handle_hook))
        .with_state(state);

    info!("Listening on {}", bind_address);
    info!("Using config at {:?}", config_path);
    info!("TLS enabled: {}", ssl_enable);

    if ssl_enable {
        let rustls_config =
            match axum_server::tls_rustls::RustlsConfig::from_pem_file(&ssl_crt, &ssl_key).await {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("TLS configuration error: {}", e);
                    std::process::exit(1);
                }
            };
        let addr: SocketAddr = bind_address.parse().unwrap();
        axum_server::bind_rustls(addr, rustls_config)
            .serve(app.into_make_service())
            .await
            .unwrap();
    } else {
        let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
        axum::serve(listener, app).await.unwrap();
    }
}
