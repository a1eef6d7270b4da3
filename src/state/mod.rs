// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Typed access to the protocol's persistent records
//!
//! Records are JSON-encoded values under the keys in [`keys`]. [`StateExt`]
//! is implemented for every [`StateStore`], so typed accessors are available
//! directly on the host's store and on the transmitter's write overlay.

pub mod keys;

use alloy_primitives::Address;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::Result;
use crate::protocol::Domain;
use crate::roles::Role;
use crate::traits::StateStore;

/// A registered attester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attester {
    pub attester: Address,
}

/// Minimum number of distinct attester signatures required (the `m` in m-of-n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureThreshold {
    pub amount: u32,
}

/// The send/receive pause switches; both off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    pub send_paused: bool,
    pub receive_paused: bool,
}

/// Upper bound on outbound message body length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxMessageBodySize {
    pub amount: u64,
}

/// Next outbound nonce for one source domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceRecord {
    pub next_nonce: u64,
}

/// Typed record accessors over any [`StateStore`]
pub trait StateExt: StateStore {
    fn read<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&mut self, key: &[u8], value: &T) -> Result<()> {
        self.set(key, serde_json::to_vec(value)?);
        Ok(())
    }

    fn attester(&self, address: &Address) -> Result<Option<Attester>> {
        self.read(&keys::attester(address))
    }

    fn set_attester(&mut self, address: Address) -> Result<()> {
        self.write(&keys::attester(&address), &Attester { attester: address })
    }

    fn delete_attester(&mut self, address: &Address) {
        self.delete(&keys::attester(address));
    }

    /// All registered attesters, in address order
    fn attesters(&self) -> Result<BTreeSet<Address>> {
        self.prefix_iterator(keys::ATTESTER_PREFIX)
            .map(|(_, value)| {
                let record: Attester = serde_json::from_slice(&value)?;
                Ok(record.attester)
            })
            .collect()
    }

    fn signature_threshold(&self) -> Result<Option<SignatureThreshold>> {
        self.read(keys::SIGNATURE_THRESHOLD)
    }

    fn set_signature_threshold(&mut self, amount: u32) -> Result<()> {
        self.write(keys::SIGNATURE_THRESHOLD, &SignatureThreshold { amount })
    }

    fn pause_state(&self) -> Result<PauseState> {
        Ok(self.read(keys::SEND_RECEIVE_PAUSED)?.unwrap_or_default())
    }

    fn set_pause_state(&mut self, state: &PauseState) -> Result<()> {
        self.write(keys::SEND_RECEIVE_PAUSED, state)
    }

    fn role(&self, role: Role) -> Result<Option<Address>> {
        self.read(role.key())
    }

    fn set_role(&mut self, role: Role, address: Address) -> Result<()> {
        self.write(role.key(), &address)
    }

    fn max_message_body_size(&self) -> Result<Option<MaxMessageBodySize>> {
        self.read(keys::MAX_MESSAGE_BODY_SIZE)
    }

    fn set_max_message_body_size(&mut self, amount: u64) -> Result<()> {
        self.write(keys::MAX_MESSAGE_BODY_SIZE, &MaxMessageBodySize { amount })
    }

    /// Next unallocated outbound nonce; zero before the first send
    fn next_available_nonce(&self, domain: Domain) -> Result<u64> {
        Ok(self
            .read::<NonceRecord>(&keys::outbound_nonce(domain))?
            .map_or(0, |record| record.next_nonce))
    }

    fn set_next_available_nonce(&mut self, domain: Domain, next_nonce: u64) -> Result<()> {
        self.write(&keys::outbound_nonce(domain), &NonceRecord { next_nonce })
    }

    fn is_nonce_used(&self, domain: Domain, nonce: u64) -> bool {
        self.has(&keys::used_nonce(domain, nonce))
    }

    fn mark_nonce_used(&mut self, domain: Domain, nonce: u64) -> Result<()> {
        self.write(&keys::used_nonce(domain, nonce), &true)
    }
}

impl<S: StateStore + ?Sized> StateExt for S {}
