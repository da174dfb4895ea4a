use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sentinel_fw_domain::Config;
use sentinel_fw_infrastructure::export::AesKeyMaterial;
use toml_edit::DocumentMut;
use tracing::info;
use uuid::Uuid;

/// Loads the AES-CBC key/IV pair backing the command channel's inner
/// payload layer and `exportlogs`, generating and persisting one back to
/// `config_path` on first boot if the config file doesn't already carry it.
///
/// Reuses `uuid`'s CSPRNG-backed `Uuid::new_v4` rather than pulling in a
/// dedicated `rand` dependency: two v4 UUIDs give the 32 key bytes, one
/// gives the 16 IV bytes.
pub async fn ensure_aes_key_material(config_path: &str, config: &mut Config) -> anyhow::Result<AesKeyMaterial> {
    if let (Some(key_b64), Some(iv_b64)) = (
        config.tls.aes_key_base64.clone(),
        config.tls.aes_iv_base64.clone(),
    ) {
        return Ok(AesKeyMaterial::from_base64(&key_b64, &iv_b64)?);
    }

    info!("no AES payload key configured, generating one for first boot");

    let mut key = [0u8; 32];
    key[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    key[16..].copy_from_slice(Uuid::new_v4().as_bytes());
    let iv = *Uuid::new_v4().as_bytes();

    let key_b64 = STANDARD.encode(key);
    let iv_b64 = STANDARD.encode(iv);

    config.tls.aes_key_base64 = Some(key_b64.clone());
    config.tls.aes_iv_base64 = Some(iv_b64.clone());

    persist_aes_material(config_path, &key_b64, &iv_b64).await?;

    Ok(AesKeyMaterial::from_base64(&key_b64, &iv_b64)?)
}

async fn persist_aes_material(config_path: &str, key_b64: &str, iv_b64: &str) -> anyhow::Result<()> {
    let mut doc = match tokio::fs::read_to_string(config_path).await {
        Ok(contents) => contents.parse::<DocumentMut>()?,
        Err(_) => DocumentMut::new(),
    };

    if doc.get("tls").is_none() {
        doc["tls"] = toml_edit::table();
    }
    doc["tls"]["aes_key_base64"] = toml_edit::value(key_b64);
    doc["tls"]["aes_iv_base64"] = toml_edit::value(iv_b64);

    if let Some(parent) = std::path::Path::new(config_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(config_path, doc.to_string()).await?;
    info!(config_path, "persisted generated AES payload key to config file");
    Ok(())
}
