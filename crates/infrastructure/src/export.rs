use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use sentinel_fw_domain::DomainError;

use sentinel_fw_application::ports::{ConnectionLogPort, ExportPort};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Symmetric key material for the command server's `exportlogs` payload
/// layer — the same AES-CBC algorithm used to wrap command-channel bytes
/// inside TLS, reused here for data at rest.
#[derive(Clone)]
pub struct AesKeyMaterial {
    pub key: [u8; 32],
    pub iv: [u8; 16],
}

impl AesKeyMaterial {
    pub fn from_base64(key_b64: &str, iv_b64: &str) -> Result<Self, DomainError> {
        let key_bytes = STANDARD
            .decode(key_b64)
            .map_err(|e| DomainError::Configuration(format!("invalid aes key: {e}")))?;
        let iv_bytes = STANDARD
            .decode(iv_b64)
            .map_err(|e| DomainError::Configuration(format!("invalid aes iv: {e}")))?;
        let key: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| DomainError::Configuration("aes key must be 32 bytes".to_string()))?;
        let iv: [u8; 16] = iv_bytes
            .try_into()
            .map_err(|_| DomainError::Configuration("aes iv must be 16 bytes".to_string()))?;
        Ok(Self { key, iv })
    }
}

/// Backs the `exportlogs` command: snapshots the current log tail as JSON,
/// encrypts it under the configured AES-CBC key/IV, and writes the result to
/// `<SecureExportPath>/<name>`.
pub struct FileExport {
    export_dir: PathBuf,
    connection_log: Arc<dyn ConnectionLogPort>,
    key_material: AesKeyMaterial,
}

impl FileExport {
    pub fn new(
        export_dir: impl Into<PathBuf>,
        connection_log: Arc<dyn ConnectionLogPort>,
        key_material: AesKeyMaterial,
    ) -> Self {
        Self {
            export_dir: export_dir.into(),
            connection_log,
            key_material,
        }
    }
}

#[async_trait]
impl ExportPort for FileExport {
    async fn export_logs(&self, name: &str) -> Result<String, DomainError> {
        let lines = self.connection_log.tail(10_000).await;
        let payload = serde_json::to_vec(&lines)
            .map_err(|e| DomainError::Configuration(format!("failed to serialize log export: {e}")))?;

        let encryptor = Aes256CbcEnc::new(&self.key_material.key.into(), &self.key_material.iv.into());
        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(&payload);

        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| DomainError::Io(e.to_string()))?;
        let path = self.export_dir.join(name);
        tokio::fs::write(&path, ciphertext)
            .await
            .map_err(|e| DomainError::Io(e.to_string()))?;

        Ok(path.display().to_string())
    }
}
