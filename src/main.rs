use std::{error::Error, net::SocketAddr, sync::Arc};

use axum_server::tls_rustls::RustlsConfig;
use tracing::info;

use phishguard::{api::ApiClient, preferences::Preferences, routes};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let prefs = Preferences::from_env()?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_level(true)
        .with_max_level(prefs.log_level()?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let api = ApiClient::new(prefs.api_base())?;
    info!("Verification backend at {}", api.base());
    let app = routes::router(Arc::new(api));

    let addr: SocketAddr = format!("{}:{}", prefs.http_ip(), prefs.port()).parse()?;
    match prefs.tls_paths() {
        Some((cert, key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!("Serving https://{addr}");
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Serving http://{addr}");
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
