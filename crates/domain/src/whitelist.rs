use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// An address that is never accepted as input to the block path; manual
/// block requests against it are rejected with a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub address: IpAddr,
}

impl WhitelistEntry {
    pub fn new(address: IpAddr) -> Self {
        Self { address }
    }
}

/// Parse a seed-list file's contents (blocklist.txt / whitelist.txt /
/// blocked_countries.txt): blank lines and `#`-comments are ignored.
pub fn parse_seed_lines(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_lines_skip_comments_and_blanks() {
        let input = "# comment\n\n203.0.113.5\n  \n198.51.100.9\n";
        assert_eq!(parse_seed_lines(input), vec!["203.0.113.5", "198.51.100.9"]);
    }
}
