use std::net::IpAddr;
use std::str::FromStr;

/// Common test addresses used across the enforcement scenarios below.
pub struct TestAddresses;

impl TestAddresses {
    pub fn rate_offender() -> IpAddr {
        IpAddr::from_str("1.2.3.4").unwrap()
    }

    pub fn whitelisted() -> IpAddr {
        IpAddr::from_str("8.8.8.8").unwrap()
    }

    pub fn geo_blocked() -> IpAddr {
        IpAddr::from_str("203.0.113.5").unwrap()
    }

    pub fn expired_block() -> IpAddr {
        IpAddr::from_str("10.0.0.1").unwrap()
    }

    pub fn loopback() -> IpAddr {
        IpAddr::from_str("127.0.0.1").unwrap()
    }
}

/// Enforcement tuning used by the rate-block-at-threshold scenario:
/// threshold_attempts=3, threshold_seconds=10, default_duration=60.
pub struct TestEnforcement;

impl TestEnforcement {
    pub fn threshold_attempts() -> usize {
        3
    }

    pub fn threshold_seconds() -> i64 {
        10
    }

    pub fn default_duration_seconds() -> i64 {
        60
    }
}

/// Fixed loopback port for the command-server protocol tests. A fixed port
/// (rather than an ephemeral one) is used because `CommandServer::run` never
/// hands its bound address back to the caller.
pub fn command_server_test_port() -> u16 {
    58842
}
