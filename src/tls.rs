use crate::config::TlsCredentials;
use axum_server::tls_rustls::RustlsConfig;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
#[error("cannot load TLS credentials from {cert} and {key}: {source}")]
pub struct TlsError {
    pub cert: String,
    pub key: String,
    #[source]
    pub source: io::Error,
}

/// Read the PEM certificate chain and key into a listener config
pub async fn load(credentials: &TlsCredentials) -> Result<RustlsConfig, TlsError> {
    // ring is the only provider compiled in; a second install is a no-op error
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = RustlsConfig::from_pem_file(&credentials.cert_path, &credentials.key_path)
        .await
        .map_err(|source| TlsError {
            cert: display(&credentials.cert_path),
            key: display(&credentials.key_path),
            source,
        })?;

    info!(cert = %credentials.cert_path.display(), "Loaded TLS credentials");
    Ok(config)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
