//! sentinel-fw — host-based network firewall daemon.
//!
//! Composition root: parses CLI overrides, loads and validates configuration,
//! wires every adapter/use-case/command behind [`di::FirewallContext`], runs
//! startup reconciliation, then spawns the syslog tailer, the command
//! server, and the periodic job set under one root cancellation token.

mod bootstrap;
mod di;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use sentinel_fw_application::ports::SchedulerPort;
use sentinel_fw_domain::CliOverrides;
use sentinel_fw_infrastructure::command_server::CommandServer;
use sentinel_fw_infrastructure::syslog_tail::SyslogTailer;
use sentinel_fw_jobs::{JobRunner, MonitorConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use di::FirewallContext;

#[derive(Parser, Debug)]
#[command(name = "sentinel-fw")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Host-based network firewall daemon: syslog-driven rate/geo blocking with a TLS command surface")]
struct Cli {
    /// Path to the TOML configuration file. Defaults to ./firewall.toml.
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Override server.bind_address.
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Override server.command_port.
    #[arg(short = 'p', long)]
    command_port: Option<u16>,

    /// Override logging.level.
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Override database.path.
    #[arg(long)]
    database_path: Option<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(|| "./firewall.toml".to_string());

    let mut config = bootstrap::load_config(
        Some(&config_path),
        CliOverrides {
            bind_address: cli.bind,
            command_port: cli.command_port,
            log_level: cli.log_level,
            database_path: cli.database_path,
        },
    )?;

    bootstrap::init_logging(&config);
    info!("sentinel-fw starting up");

    let aes = bootstrap::ensure_aes_key_material(&config_path, &mut config).await?;
    let (write_pool, read_pool) = bootstrap::init_database(&config.database.path, &config.database).await?;

    // One hierarchical token: the scheduler hands every job a child of it,
    // `exit` cancels it directly, and Ctrl-C cancels it from the outside.
    let root = CancellationToken::new();

    let ctx = FirewallContext::build(
        &config,
        write_pool,
        read_pool,
        root.clone(),
        root.clone(),
        aes.clone(),
    )
    .await?;

    // Must complete before the syslog tail starts, otherwise a connection
    // observed mid-reconciliation could be classified against a
    // half-restored blocked set.
    ctx.use_cases.reconcile_on_startup.execute().await?;
    info!("startup reconciliation complete");

    let syslog_tailer = Arc::new(SyslogTailer::new(
        config.syslog.syslog_path.clone(),
        Duration::from_secs(config.syslog.poll_interval_secs),
        ctx.engine.clone(),
        ctx.repos.connection_log.clone(),
        root.clone(),
    ));
    syslog_tailer.spawn();

    let command_server = Arc::new(CommandServer::new(
        config.server.bind_address.clone(),
        config.server.command_port,
        config.server.allow_plaintext_commands,
        ctx.repos.tls_config.clone(),
        Some(aes),
        ctx.registry.clone(),
        ctx.command_ctx.clone(),
    ));
    let command_server_task = {
        let command_server = command_server.clone();
        let shutdown = root.clone();
        tokio::spawn(async move { command_server.run(shutdown).await })
    };

    let job_ids = JobRunner::new(ctx.repos.scheduler.clone())
        .with_sweep_expired(ctx.use_cases.sweep_expired.clone(), Duration::from_secs(30))
        .with_periodic_reload(
            ctx.repos.reload.clone(),
            ctx.repos.packet_filter.clone(),
            Duration::from_secs(3600),
        )
        .with_cert_expiry_watch(
            PathBuf::from(&config.paths.certificate_path),
            30,
            Duration::from_secs(86_400),
        )
        .with_security_monitors(
            ctx.repos.connection_log.clone(),
            ctx.repos.event_bus.clone(),
            ctx.use_cases.block.clone(),
            MonitorConfig::default(),
            Duration::from_secs(60),
        )
        .start();
    info!(count = job_ids.len(), "periodic jobs registered");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
        }
        _ = root.cancelled() => {
            info!("shutdown requested over the command channel");
        }
    }

    root.cancel();
    ctx.repos.scheduler.cancel_all();

    match command_server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "command server exited with an error"),
        Err(e) => warn!(error = %e, "command server task panicked or was cancelled"),
    }

    info!("sentinel-fw stopped");
    Ok(())
}
