use std::net::{IpAddr, SocketAddr};

use anyhow::Result;
use axum_server::tls_rustls::RustlsConfig;
use dotenvy::dotenv;
use saaskit::{config::config::Config, core::server::create_server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load_envs()?;

    let server_ip: IpAddr = config.server_ip.parse().unwrap_or(IpAddr::from([0, 0, 0, 0]));
    let addr = SocketAddr::new(server_ip, config.port);
    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));

    let app = create_server(config).await?;

    let result = match tls_paths {
        Some((cert, key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!("Server starting on https://{}", addr);
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!("Server starting on http://{}", addr);
            axum_server::bind(addr).serve(app.into_make_service()).await
        }
    };

    if let Err(e) = result {
        error!("Server failed: {}", e);
    }

    Ok(())
}
