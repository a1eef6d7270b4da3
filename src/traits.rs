// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Core trait abstractions for the transmitter's external collaborators.
//!
//! The transmitter owns no storage, publishes nothing itself and performs no
//! token movements. Durable state, event publishing and message delivery are
//! injected through these traits so the host ledger can back them with its own
//! machinery, and tests can back them with the fakes in [`crate::testing`].
//!
//! # Example: Implementing a Store
//!
//! ```rust
//! use cctp_transmitter::StateStore;
//! use std::collections::BTreeMap;
//!
//! #[derive(Default)]
//! struct MapStore(BTreeMap<Vec<u8>, Vec<u8>>);
//!
//! impl StateStore for MapStore {
//!     fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
//!         self.0.get(key).cloned()
//!     }
//!
//!     fn set(&mut self, key: &[u8], value: Vec<u8>) {
//!         self.0.insert(key.to_vec(), value);
//!     }
//!
//!     fn delete(&mut self, key: &[u8]) {
//!         self.0.remove(key);
//!     }
//!
//!     fn prefix_iterator<'a>(
//!         &'a self,
//!         prefix: &[u8],
//!     ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
//!         let prefix = prefix.to_vec();
//!         Box::new(
//!             self.0
//!                 .range(prefix.clone()..)
//!                 .take_while(move |(k, _)| k.starts_with(&prefix))
//!                 .map(|(k, v)| (k.clone(), v.clone())),
//!         )
//!     }
//! }
//! ```

use alloy_primitives::{Address, Bytes, B256};

use crate::events::ProtocolEvent;
use crate::protocol::Domain;

/// Key-value access to the protocol's persistent records.
///
/// Implementations must be deterministic. [`StateStore::prefix_iterator`] yields
/// records in ascending key order; attester listings and pagination rely on it.
pub trait StateStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &[u8], value: Vec<u8>);

    /// Removes `key`. Removing an absent key is a no-op.
    fn delete(&mut self, key: &[u8]);

    /// Iterates all records whose key starts with `prefix`, in ascending key order.
    fn prefix_iterator<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

    /// Returns true if a value is stored under `key`.
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Publish-only sink for protocol notifications.
///
/// Events reach the sink only after the operation that produced them has
/// committed its state writes. The core never retries a publish.
pub trait EventSink {
    fn publish(&mut self, event: ProtocolEvent);
}

/// Delivery target for received messages.
///
/// Invoked after the attestation has verified and the nonce has been consumed.
/// Returning an error aborts the receive and rolls back the nonce consumption.
pub trait MessageHandler {
    /// Applies the effect of a verified inbound message (mint, deliver, ...).
    ///
    /// # Errors
    ///
    /// Implementations report rejection as a string reason; the transmitter
    /// surfaces it as [`crate::TransmitterError::HandlerRejected`].
    fn handle_receive_message(
        &mut self,
        source_domain: Domain,
        sender: B256,
        recipient: B256,
        message_body: &Bytes,
    ) -> std::result::Result<(), String>;
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn publish(&mut self, event: ProtocolEvent) {
        (**self).publish(event)
    }
}

/// Accepts every message without side effects.
///
/// Useful for hosts where the delivered body is consumed from the
/// `MessageReceived` event rather than through a callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl MessageHandler for NoopHandler {
    fn handle_receive_message(
        &mut self,
        _source_domain: Domain,
        _sender: B256,
        _recipient: B256,
        _message_body: &Bytes,
    ) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// The authorization seam: who is asking.
///
/// Address-format decoding (bech32 and friends) is the host's concern; the
/// core only ever sees the raw 20-byte account.
pub type Caller = Address;
