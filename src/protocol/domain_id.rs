// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP domain identifiers
//!
//! Every ledger participating in the protocol is identified by a 32-bit domain
//! id. The transmitter core treats domains as opaque integers: decoding never
//! rejects an unknown domain, because new domains join the protocol without a
//! code change on existing ledgers. Well-known domains get named constants and
//! a display name.
//!
//! Reference: <https://developers.circle.com/stablecoins/supported-domains>

use serde::{Deserialize, Serialize};
use std::fmt;

/// CCTP domain identifier
///
/// # Example
///
/// ```rust
/// use cctp_transmitter::Domain;
///
/// let noble = Domain::NOBLE;
/// assert_eq!(noble.as_u32(), 4);
/// assert_eq!(noble.name(), Some("Noble"));
/// assert_eq!(Domain::new(999).name(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(u32);

impl Domain {
    pub const ETHEREUM: Self = Self(0);
    pub const AVALANCHE: Self = Self(1);
    pub const OPTIMISM: Self = Self(2);
    pub const ARBITRUM: Self = Self(3);
    pub const NOBLE: Self = Self(4);
    pub const SOLANA: Self = Self(5);
    pub const BASE: Self = Self(6);
    pub const POLYGON: Self = Self(7);
    pub const SUI: Self = Self(8);
    pub const APTOS: Self = Self(9);
    pub const UNICHAIN: Self = Self(10);
    pub const LINEA: Self = Self(11);

    /// Wraps a raw domain id
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric domain id
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Big-endian bytes, as used in the message header and in state keys
    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Returns the display name for well-known domains
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Ethereum"),
            1 => Some("Avalanche"),
            2 => Some("Optimism"),
            3 => Some("Arbitrum"),
            4 => Some("Noble"),
            5 => Some("Solana"),
            6 => Some("Base"),
            7 => Some("Polygon"),
            8 => Some("Sui"),
            9 => Some("Aptos"),
            10 => Some("Unichain"),
            11 => Some("Linea"),
            _ => None,
        }
    }
}

impl From<u32> for Domain {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Domain> for u32 {
    #[inline]
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "domain {}", self.0),
        }
    }
}
