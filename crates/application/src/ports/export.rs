use sentinel_fw_domain::DomainError;

/// Backs the `exportlogs` command: encrypts a JSON array of log lines under
/// the configured AES-CBC key/IV and writes it under
/// `<SecureExportPath>/<name>`.
#[async_trait::async_trait]
pub trait ExportPort: Send + Sync {
    /// Returns the exported file name relative to the secure export
    /// directory.
    async fn export_logs(&self, name: &str) -> Result<String, DomainError>;
}
