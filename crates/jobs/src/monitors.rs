use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sentinel_fw_application::ports::{ConnectionLogPort, EventPublisherPort, SchedulerPort};
use sentinel_fw_application::use_cases::blocking::BlockAddressUseCase;
use sentinel_fw_domain::{Event, JobId};
use tracing::{info, warn};

/// Tuning for the periodic security-monitor sweep. All three heuristics ride
/// the same periodic pass over the plaintext connection log's recent tail
/// (available only when `plaintext_logs_enabled` is set) rather than three
/// separate subsystems.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Distinct destination ports from one address within the tail window
    /// that counts as a port scan.
    pub port_scan_distinct_ports: usize,
    /// Total attempts from one address within the tail window that counts
    /// as excessive — the available proxy for byte-level bandwidth, since
    /// the connection log format carries no byte counts (see DESIGN.md).
    pub bandwidth_attempt_ceiling: usize,
    /// Attempts against an HTTP(S) port from one address within the tail
    /// window that counts as brute-forcing.
    pub http_bruteforce_attempts: usize,
    /// How many of the most recent log lines each sweep inspects.
    pub tail_lines: usize,
    pub default_block_duration_seconds: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port_scan_distinct_ports: 8,
            bandwidth_attempt_ceiling: 500,
            http_bruteforce_attempts: 20,
            tail_lines: 2_000,
            default_block_duration_seconds: 3600,
        }
    }
}

const HTTP_PORTS: [u16; 4] = [80, 443, 8080, 8443];

struct ParsedLine {
    address: IpAddr,
    dst_port: u16,
}

fn parse_log_line(line: &str) -> Option<ParsedLine> {
    let fields: Vec<&str> = line.split('|').collect();
    // ts|addr|pid|tid|addr|rdns|country|sport|dport|attempts=N|window=X
    if fields.len() < 9 {
        return None;
    }
    let address = fields[1].parse().ok()?;
    let dst_port = fields[8].parse().ok()?;
    Some(ParsedLine { address, dst_port })
}

/// Periodic security monitors: runs the port-scan, bandwidth-proxy, and
/// HTTP-bruteforce heuristics over the recent connection-log tail, issuing
/// blocks through the block-list manager and publishing events for each.
pub fn schedule_security_monitors(
    scheduler: &dyn SchedulerPort,
    connection_log: Arc<dyn ConnectionLogPort>,
    events: Arc<dyn EventPublisherPort>,
    block: Arc<BlockAddressUseCase>,
    config: MonitorConfig,
    interval: Duration,
) -> JobId {
    scheduler.schedule_recurring(
        Utc::now() + chrono::Duration::from_std(interval).unwrap_or_default(),
        interval,
        Arc::new(move || {
            let connection_log = connection_log.clone();
            let events = events.clone();
            let block = block.clone();
            Box::pin(async move {
                run_once(&connection_log, &events, &block, config).await;
            })
        }),
    )
}

async fn run_once(
    connection_log: &Arc<dyn ConnectionLogPort>,
    events: &Arc<dyn EventPublisherPort>,
    block: &Arc<BlockAddressUseCase>,
    config: MonitorConfig,
) {
    let lines = connection_log.tail(config.tail_lines).await;
    if lines.is_empty() {
        return;
    }

    let mut ports_by_address: HashMap<IpAddr, std::collections::HashSet<u16>> = HashMap::new();
    let mut attempts_by_address: HashMap<IpAddr, usize> = HashMap::new();
    let mut http_attempts_by_address: HashMap<IpAddr, usize> = HashMap::new();

    for line in &lines {
        let Some(parsed) = parse_log_line(line) else { continue };
        ports_by_address.entry(parsed.address).or_default().insert(parsed.dst_port);
        *attempts_by_address.entry(parsed.address).or_insert(0) += 1;
        if HTTP_PORTS.contains(&parsed.dst_port) {
            *http_attempts_by_address.entry(parsed.address).or_insert(0) += 1;
        }
    }

    for (address, ports) in &ports_by_address {
        if ports.len() >= config.port_scan_distinct_ports {
            warn!(%address, distinct_ports = ports.len(), "port scan detected");
            events.publish(Event::PortScanDetected {
                address: *address,
                distinct_ports: ports.len(),
                time: Utc::now(),
            });
            install_block(block, *address, config.default_block_duration_seconds).await;
        }
    }

    for (address, attempts) in &attempts_by_address {
        if *attempts >= config.bandwidth_attempt_ceiling {
            warn!(%address, attempts, "connection volume exceeded bandwidth ceiling");
            // `bytes` carries the attempt count, not an actual byte total —
            // the connection log format this monitor reads has no size
            // field, so attempt volume is the best available proxy.
            events.publish(Event::BandwidthExceeded {
                address: *address,
                bytes: *attempts as u64,
                time: Utc::now(),
            });
            install_block(block, *address, config.default_block_duration_seconds).await;
        }
    }

    for (address, attempts) in &http_attempts_by_address {
        if *attempts >= config.http_bruteforce_attempts {
            warn!(%address, attempts, "repeated HTTP(S) connection attempts, treating as brute force");
            install_block(block, *address, config.default_block_duration_seconds).await;
        }
    }
}

async fn install_block(block: &Arc<BlockAddressUseCase>, address: IpAddr, duration_seconds: i64) {
    match block.execute(address, Some(duration_seconds)).await {
        Ok(()) => info!(%address, "monitor-triggered block installed"),
        Err(e) => warn!(%address, error = %e, "monitor-triggered block failed"),
    }
}
