// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Static configuration of a transmitter instance

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransmitterError};
use crate::protocol::Domain;

/// Environment variable holding the local domain id
pub const LOCAL_DOMAIN_ENV: &str = "CCTP_LOCAL_DOMAIN";
/// Environment variable holding the message format version
pub const MESSAGE_VERSION_ENV: &str = "CCTP_MESSAGE_VERSION";

/// Identity of the ledger running the transmitter.
///
/// # Examples
///
/// ```rust
/// use cctp_transmitter::{Domain, TransmitterConfig};
///
/// let config = TransmitterConfig::builder()
///     .local_domain(Domain::NOBLE)
///     .build();
/// assert_eq!(config.message_version(), 0);
/// ```
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmitterConfig {
    /// Domain id of this ledger; stamped on sends, required on receives
    local_domain: Domain,
    /// Message format version; stamped on sends, required on receives
    #[builder(default)]
    message_version: u32,
}

impl TransmitterConfig {
    pub fn local_domain(&self) -> Domain {
        self.local_domain
    }

    pub fn message_version(&self) -> u32 {
        self.message_version
    }

    /// Loads configuration from the process environment, reading a `.env` file first if present.
    ///
    /// `CCTP_LOCAL_DOMAIN` is required; `CCTP_MESSAGE_VERSION` defaults to 0.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let local_domain = lookup(LOCAL_DOMAIN_ENV)
            .ok_or_else(|| TransmitterError::InvalidConfig(format!("{LOCAL_DOMAIN_ENV} is not set")))
            .and_then(|raw| parse_u32(LOCAL_DOMAIN_ENV, &raw))?;

        let message_version = match lookup(MESSAGE_VERSION_ENV) {
            Some(raw) => parse_u32(MESSAGE_VERSION_ENV, &raw)?,
            None => 0,
        };

        Ok(Self {
            local_domain: Domain::new(local_domain),
            message_version,
        })
    }
}

fn parse_u32(name: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|e| TransmitterError::InvalidConfig(format!("{name}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = TransmitterConfig::builder()
            .local_domain(Domain::ETHEREUM)
            .build();
        assert_eq!(config.local_domain(), Domain::ETHEREUM);
        assert_eq!(config.message_version(), 0);
    }

    #[test]
    fn test_from_lookup() {
        let config = TransmitterConfig::from_lookup(lookup(&[
            (LOCAL_DOMAIN_ENV, "4"),
            (MESSAGE_VERSION_ENV, " 1 "),
        ]))
        .unwrap();
        assert_eq!(config.local_domain(), Domain::NOBLE);
        assert_eq!(config.message_version(), 1);
    }

    #[test]
    fn test_from_lookup_missing_domain() {
        let err = TransmitterConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, TransmitterError::InvalidConfig(ref m) if m.contains(LOCAL_DOMAIN_ENV)));
    }

    #[test]
    fn test_from_lookup_malformed_version() {
        let err = TransmitterConfig::from_lookup(lookup(&[
            (LOCAL_DOMAIN_ENV, "4"),
            (MESSAGE_VERSION_ENV, "two"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TransmitterError::InvalidConfig(_)));
    }
}
