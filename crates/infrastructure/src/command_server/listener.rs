use std::net::SocketAddr;
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sentinel_fw_application::commands::{CommandContext, CommandRegistry};

use crate::export::AesKeyMaterial;

use super::dispatch::serve_connection;

/// Accepts connections for the command server: loopback peers (and any
/// peer when `allow_plaintext_commands` is set) speak the plain line
/// protocol directly, everyone else is routed through a TLS 1.3 handshake
/// with the AES-CBC payload layer riding inside it.
pub struct CommandServer {
    bind_address: String,
    command_port: u16,
    allow_plaintext_commands: bool,
    tls_config: Arc<rustls::ServerConfig>,
    aes: Option<AesKeyMaterial>,
    registry: Arc<CommandRegistry>,
    ctx: Arc<CommandContext>,
}

impl CommandServer {
    pub fn new(
        bind_address: String,
        command_port: u16,
        allow_plaintext_commands: bool,
        tls_config: Arc<rustls::ServerConfig>,
        aes: Option<AesKeyMaterial>,
        registry: Arc<CommandRegistry>,
        ctx: Arc<CommandContext>,
    ) -> Self {
        Self {
            bind_address,
            command_port,
            allow_plaintext_commands,
            tls_config,
            aes,
            registry,
            ctx,
        }
    }

    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) -> std::io::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.bind_address, self.command_port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{e}")))?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(128)?;
        socket.set_nonblocking(true)?;
        let std_listener: std::net::TcpListener = socket.into();
        let listener = TcpListener::from_std(std_listener)?;

        info!(bind_address = %addr, "command server listening");
        let acceptor = TlsAcceptor::from(self.tls_config.clone());

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("command server shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!(error = %e, "failed to accept command connection");
                            continue;
                        }
                    };

                    let plaintext = self.allow_plaintext_commands || peer.ip().is_loopback();
                    let registry = self.registry.clone();
                    let ctx = self.ctx.clone();
                    let aes = self.aes.clone();
                    let acceptor = acceptor.clone();

                    tokio::spawn(async move {
                        if plaintext {
                            // Plaintext mode skips the AES payload layer entirely —
                            // it rides inside the TLS branch only.
                            serve_connection(stream, registry, ctx, None).await;
                        } else {
                            match acceptor.accept(stream).await {
                                Ok(tls_stream) => serve_connection(tls_stream, registry, ctx, aes).await,
                                Err(e) => error!(error = %e, %peer, "tls handshake failed"),
                            }
                        }
                    });
                }
            }
        }
    }
}
