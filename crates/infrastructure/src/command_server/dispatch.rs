use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use sentinel_fw_application::commands::{CommandContext, CommandRegistry};

use crate::export::AesKeyMaterial;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Runs the one-line-in, one-response-out command protocol over any
/// `AsyncRead + AsyncWrite` stream (plaintext loopback socket or the
/// plaintext side of an already-negotiated TLS session).
///
/// When `aes` is present, every line is base64 ciphertext: decrypted before
/// dispatch, the response re-encrypted before being written back — the
/// AES-CBC layer rides inside TLS rather than replacing it.
pub async fn serve_connection<S>(
    stream: S,
    registry: Arc<CommandRegistry>,
    ctx: Arc<CommandContext>,
    aes: Option<AesKeyMaterial>,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, "command connection read error");
                break;
            }
        };
        let _ = bytes_read;

        let raw = line.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            continue;
        }

        let decoded = match &aes {
            Some(key_material) => match decrypt_line(raw, key_material) {
                Ok(plain) => plain,
                Err(e) => {
                    warn!(error = %e, "failed to decrypt command payload");
                    continue;
                }
            },
            None => raw.to_string(),
        };

        let mut tokens = decoded.split_whitespace();
        let Some(name) = tokens.next() else { continue };
        let args: Vec<String> = tokens.map(|s| s.to_string()).collect();

        let response = match registry.get_by_name(name) {
            Some(command) => command.execute(&args, &ctx).await,
            None => format!("unknown command: {name}"),
        };

        let outgoing = match &aes {
            Some(key_material) => encrypt_line(&response, key_material),
            None => response,
        };

        if write_half.write_all(outgoing.as_bytes()).await.is_err()
            || write_half.write_all(b"\n").await.is_err()
        {
            break;
        }
    }
}

fn encrypt_line(plaintext: &str, key_material: &AesKeyMaterial) -> String {
    let encryptor = Aes256CbcEnc::new(&key_material.key.into(), &key_material.iv.into());
    let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    STANDARD.encode(ciphertext)
}

fn decrypt_line(line: &str, key_material: &AesKeyMaterial) -> Result<String, String> {
    let ciphertext = STANDARD.decode(line).map_err(|e| e.to_string())?;
    let decryptor = Aes256CbcDec::new(&key_material.key.into(), &key_material.iv.into());
    let plaintext = decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|e| e.to_string())?;
    String::from_utf8(plaintext).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_material() -> AesKeyMaterial {
        AesKeyMaterial {
            key: [7u8; 32],
            iv: [9u8; 16],
        }
    }

    #[test]
    fn encrypt_then_decrypt_round_trips_command_lines() {
        let key_material = key_material();
        let ciphertext = encrypt_line("list\n", &key_material);
        let plaintext = decrypt_line(&ciphertext, &key_material).unwrap();
        assert_eq!(plaintext, "list\n");
    }

    #[test]
    fn decrypt_rejects_non_base64_input() {
        assert!(decrypt_line("not valid base64!!", &key_material()).is_err());
    }

    #[test]
    fn decrypt_with_wrong_key_fails_rather_than_returning_garbage() {
        let encrypted = encrypt_line("block 1.2.3.4\n", &key_material());
        let wrong_key = AesKeyMaterial {
            key: [1u8; 32],
            iv: [9u8; 16],
        };
        assert!(decrypt_line(&encrypted, &wrong_key).is_err());
    }
}
