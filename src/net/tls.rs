//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;

/// Certificate and key paths for a TLS-terminating listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(files: &TlsFiles) -> Result<RustlsConfig, std::io::Error> {
    ensure_exists(&files.cert_path, "Certificate")?;
    ensure_exists(&files.key_path, "Private key")?;

    RustlsConfig::from_pem_file(&files.cert_path, &files.key_path).await
}

fn ensure_exists(path: &Path, what: &str) -> Result<(), std::io::Error> {
    if path.exists() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{what} file not found: {}", path.display()),
        ))
    }
}
