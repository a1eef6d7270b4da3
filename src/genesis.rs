// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Initial state import and export
//!
//! A [`GenesisState`] seeds a fresh store with roles, attesters, threshold and
//! counters, and is produced again by [`export_genesis`] for chain upgrades.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use crate::error::{Result, TransmitterError};
use crate::protocol::Domain;
use crate::roles::{Role, Roles};
use crate::state::{keys, NonceRecord, PauseState, StateExt};
use crate::traits::StateStore;

/// Next outbound nonce for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNonce {
    pub domain: Domain,
    pub next_nonce: u64,
}

/// A consumed inbound `(source_domain, nonce)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedNonce {
    pub source_domain: Domain,
    pub nonce: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisState {
    pub owner: Option<Address>,
    pub attester_manager: Option<Address>,
    pub pauser: Option<Address>,
    pub attesters: Vec<Address>,
    pub signature_threshold: Option<u32>,
    pub pause_state: PauseState,
    pub max_message_body_size: Option<u64>,
    pub outbound_nonces: Vec<OutboundNonce>,
    pub used_nonces: Vec<UsedNonce>,
}

impl GenesisState {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the same liveness rules the attester manager enforces at runtime.
    ///
    /// Attesters without a threshold are accepted: the attester manager can
    /// enable attesters before setting one, and receives fail until it does.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(TransmitterError::InvalidGenesis(reason));

        for (role, holder) in [
            (Role::Owner, self.owner),
            (Role::AttesterManager, self.attester_manager),
            (Role::Pauser, self.pauser),
        ] {
            if holder.is_some_and(|a| a.is_zero()) {
                return invalid(format!("{} cannot be the zero address", role.name()));
            }
        }

        let mut seen = BTreeSet::new();
        for attester in &self.attesters {
            if attester.is_zero() {
                return invalid("attester cannot be the zero address".to_string());
            }
            if !seen.insert(attester) {
                return invalid(format!("duplicate attester {attester}"));
            }
        }

        match (self.signature_threshold, self.attesters.len()) {
            (None, _) => {}
            (Some(0), _) => return invalid("signature threshold must be at least 1".to_string()),
            (Some(m), n) if m as usize > n => {
                return invalid(format!("signature threshold {m} exceeds {n} attesters"))
            }
            _ => {}
        }

        let mut domains = BTreeSet::new();
        for entry in &self.outbound_nonces {
            if !domains.insert(entry.domain) {
                return invalid(format!("duplicate outbound nonce for {}", entry.domain));
            }
        }

        Ok(())
    }
}

/// Validates `genesis` and writes it into `store`.
pub fn init_genesis<S: StateStore + ?Sized>(store: &mut S, genesis: &GenesisState) -> Result<()> {
    genesis.validate()?;

    for (role, holder) in [
        (Role::Owner, genesis.owner),
        (Role::AttesterManager, genesis.attester_manager),
        (Role::Pauser, genesis.pauser),
    ] {
        if let Some(holder) = holder {
            store.set_role(role, holder)?;
        }
    }
    for attester in &genesis.attesters {
        store.set_attester(*attester)?;
    }
    if let Some(threshold) = genesis.signature_threshold {
        store.set_signature_threshold(threshold)?;
    }
    store.set_pause_state(&genesis.pause_state)?;
    if let Some(max) = genesis.max_message_body_size {
        store.set_max_message_body_size(max)?;
    }
    for entry in &genesis.outbound_nonces {
        store.set_next_available_nonce(entry.domain, entry.next_nonce)?;
    }
    for used in &genesis.used_nonces {
        store.mark_nonce_used(used.source_domain, used.nonce)?;
    }

    info!(
        attesters = genesis.attesters.len(),
        signature_threshold = genesis.signature_threshold,
        used_nonces = genesis.used_nonces.len(),
        event = "genesis_initialized"
    );
    Ok(())
}

/// Reads the complete protocol state back out of `store`.
pub fn export_genesis<S: StateStore + ?Sized>(store: &S) -> Result<GenesisState> {
    let roles = Roles::load(store)?;

    let outbound_nonces = store
        .prefix_iterator(keys::OUTBOUND_NONCE_PREFIX)
        .map(|(key, value)| {
            let domain = read_domain(&key[keys::OUTBOUND_NONCE_PREFIX.len()..])?;
            let record: NonceRecord = serde_json::from_slice(&value)?;
            Ok(OutboundNonce {
                domain,
                next_nonce: record.next_nonce,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let used_nonces = store
        .prefix_iterator(keys::USED_NONCE_PREFIX)
        .map(|(key, _)| {
            let suffix = &key[keys::USED_NONCE_PREFIX.len()..];
            if suffix.len() != 12 {
                return Err(TransmitterError::InvalidGenesis(format!(
                    "malformed used nonce key of {} bytes",
                    key.len()
                )));
            }
            let mut nonce = [0u8; 8];
            nonce.copy_from_slice(&suffix[4..]);
            Ok(UsedNonce {
                source_domain: read_domain(&suffix[..4])?,
                nonce: u64::from_be_bytes(nonce),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GenesisState {
        owner: roles.owner,
        attester_manager: roles.attester_manager,
        pauser: roles.pauser,
        attesters: store.attesters()?.into_iter().collect(),
        signature_threshold: store.signature_threshold()?.map(|t| t.amount),
        pause_state: store.pause_state()?,
        max_message_body_size: store.max_message_body_size()?.map(|m| m.amount),
        outbound_nonces,
        used_nonces,
    })
}

fn read_domain(bytes: &[u8]) -> Result<Domain> {
    match bytes {
        [a, b, c, d] => Ok(Domain::new(u32::from_be_bytes([*a, *b, *c, *d]))),
        _ => Err(TransmitterError::InvalidGenesis(format!(
            "malformed domain key suffix of {} bytes",
            bytes.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use alloy_primitives::address;

    const OWNER: Address = address!("1000000000000000000000000000000000000001");
    const A: Address = address!("a000000000000000000000000000000000000001");
    const B: Address = address!("b000000000000000000000000000000000000002");

    fn sample() -> GenesisState {
        GenesisState {
            owner: Some(OWNER),
            attester_manager: Some(OWNER),
            pauser: Some(OWNER),
            attesters: vec![A, B],
            signature_threshold: Some(2),
            pause_state: PauseState {
                send_paused: false,
                receive_paused: true,
            },
            max_message_body_size: Some(8 * 1024),
            outbound_nonces: vec![OutboundNonce {
                domain: Domain::NOBLE,
                next_nonce: 42,
            }],
            used_nonces: vec![
                UsedNonce {
                    source_domain: Domain::ETHEREUM,
                    nonce: 7,
                },
                UsedNonce {
                    source_domain: Domain::BASE,
                    nonce: 1,
                },
            ],
        }
    }

    #[test]
    fn test_init_then_export() {
        let genesis = sample();
        let mut store = InMemoryStore::new();
        init_genesis(&mut store, &genesis).unwrap();

        assert_eq!(export_genesis(&store).unwrap(), genesis);
        assert!(store.is_nonce_used(Domain::BASE, 1));
        assert_eq!(store.next_available_nonce(Domain::NOBLE).unwrap(), 42);
    }

    #[test]
    fn test_json_uses_defaults_for_missing_fields() {
        let genesis = GenesisState::from_json(
            r#"{
                "attesters": ["0xa000000000000000000000000000000000000001"],
                "signature_threshold": 1
            }"#,
        )
        .unwrap();

        assert_eq!(genesis.attesters, vec![A]);
        assert_eq!(genesis.pause_state, PauseState::default());
        assert!(genesis.owner.is_none());
        assert!(genesis.validate().is_ok());

        let reparsed = GenesisState::from_json(&genesis.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, genesis);
    }

    #[test]
    fn test_bad_hex_address_is_a_json_error() {
        let err = GenesisState::from_json(r#"{"attesters": ["0xnothex"]}"#).unwrap_err();
        assert!(matches!(err, TransmitterError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_attesters_enabled_before_threshold_survive_export() {
        const MANAGER: Address = address!("2000000000000000000000000000000000000002");
        let mut store = InMemoryStore::new();
        init_genesis(
            &mut store,
            &GenesisState {
                attester_manager: Some(MANAGER),
                ..GenesisState::default()
            },
        )
        .unwrap();
        crate::attesters::enable_attester(&mut store, MANAGER, Address::repeat_byte(0x07)).unwrap();

        let exported = export_genesis(&store).unwrap();
        assert_eq!(exported.attesters, vec![Address::repeat_byte(0x07)]);
        assert_eq!(exported.signature_threshold, None);

        let mut fresh = InMemoryStore::new();
        init_genesis(&mut fresh, &exported).unwrap();
        assert_eq!(fresh, store);
        assert_eq!(export_genesis(&fresh).unwrap(), exported);
    }

    #[test]
    fn test_validate_rejects_broken_liveness() {
        let cases = [
            GenesisState {
                signature_threshold: Some(3),
                ..sample()
            },
            GenesisState {
                signature_threshold: Some(0),
                ..sample()
            },
            GenesisState {
                attesters: vec![A, A],
                signature_threshold: Some(1),
                ..sample()
            },
            GenesisState {
                pauser: Some(Address::ZERO),
                ..sample()
            },
        ];

        for genesis in cases {
            let mut store = InMemoryStore::new();
            assert!(matches!(
                init_genesis(&mut store, &genesis).unwrap_err(),
                TransmitterError::InvalidGenesis(_)
            ));
            assert!(store.is_empty());
        }
    }
}
