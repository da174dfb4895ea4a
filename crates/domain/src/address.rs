use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// Stable synthetic identifier minted the first time an address is observed.
///
/// Never recycled: once minted for an [`IpAddr`] the mapping is kept for the
/// lifetime of the process (see [`crate::DomainError`] for what happens when
/// a caller asks about an address that was never observed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressId(pub Uuid);

impl AddressId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AddressId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AddressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AddressId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(AddressId)
    }
}

/// A source address together with the identifier minted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub ip: IpAddr,
}

impl Address {
    pub fn new(id: AddressId, ip: IpAddr) -> Self {
        Self { id, ip }
    }
}

pub fn validate_ip_literal(raw: &str) -> Result<IpAddr, String> {
    raw.trim()
        .parse::<IpAddr>()
        .map_err(|e| format!("invalid address literal '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_id_roundtrips_through_display_and_parse() {
        let id = AddressId::new();
        let parsed: AddressId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn validate_ip_literal_accepts_v4_and_v6() {
        assert!(validate_ip_literal("203.0.113.5").is_ok());
        assert!(validate_ip_literal("2001:db8::1").is_ok());
        assert!(validate_ip_literal("not-an-ip").is_err());
    }
}
