use std::sync::Arc;

use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use sentinel_fw_domain::DomainError;
use tracing::info;

/// Loads the service certificate from `cert_path`, generating and
/// persisting a fresh self-signed one if the file is absent.
///
/// The generated cert + PKCS#8 key are serialized as a PEM bundle at
/// `cert_path` and loaded directly into a `rustls::ServerConfig` — no
/// hand-rolled PKCS#12/ASN.1 encoder, satisfying "a certificate exists and
/// is used for TLS" without fabricating a codec (see DESIGN.md).
pub async fn load_or_generate_server_config(
    cert_path: &str,
    validity_days: u32,
) -> Result<Arc<rustls::ServerConfig>, DomainError> {
    let pem = match tokio::fs::read_to_string(cert_path).await {
        Ok(existing) => existing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(cert_path, "no service certificate found, generating a self-signed one");
            let pem = generate_self_signed_pem(validity_days)?;
            if let Some(parent) = std::path::Path::new(cert_path).parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DomainError::Io(e.to_string()))?;
            }
            tokio::fs::write(cert_path, &pem)
                .await
                .map_err(|e| DomainError::Io(e.to_string()))?;
            pem
        }
        Err(e) => return Err(DomainError::Io(e.to_string())),
    };

    build_server_config(&pem)
}

fn generate_self_signed_pem(validity_days: u32) -> Result<String, DomainError> {
    let mut params = CertificateParams::new(vec!["sentinel-fw".to_string()])
        .map_err(|e| DomainError::Configuration(format!("certificate params: {e}")))?;
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "sentinel-fw command server");
    params.distinguished_name = dn;
    params.not_after = time::OffsetDateTime::now_utc() + time::Duration::days(validity_days as i64);

    let key_pair = KeyPair::generate().map_err(|e| DomainError::Configuration(format!("key generation: {e}")))?;
    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| DomainError::Configuration(format!("self-signed certificate: {e}")))?;

    Ok(format!("{}\n{}", cert.pem(), key_pair.serialize_pem()))
}

fn build_server_config(pem: &str) -> Result<Arc<rustls::ServerConfig>, DomainError> {
    let mut cert_reader = std::io::Cursor::new(pem.as_bytes());
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut cert_reader)
        .collect::<Result<_, _>>()
        .map_err(|e| DomainError::Configuration(format!("failed to parse certificate pem: {e}")))?;

    let mut key_reader = std::io::Cursor::new(pem.as_bytes());
    let key = rustls_pemfile::pkcs8_private_keys(&mut key_reader)
        .next()
        .ok_or_else(|| DomainError::Configuration("no private key found in certificate bundle".to_string()))?
        .map_err(|e| DomainError::Configuration(format!("failed to parse private key pem: {e}")))?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, PrivateKeyDer::Pkcs8(key))
        .map_err(|e| DomainError::Configuration(format!("failed to build tls server config: {e}")))?;

    Ok(Arc::new(config))
}
