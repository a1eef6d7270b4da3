// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Test utilities and fake implementations of the transmitter's collaborators
//!
//! These fakes stand in for the host ledger in unit and integration tests:
//! an ordered in-memory store, a sink that records published events, and a
//! message handler that records deliveries and can be told to reject.

use alloy_primitives::{Bytes, B256};
use std::collections::BTreeMap;

use crate::events::ProtocolEvent;
use crate::protocol::Domain;
use crate::traits::{EventSink, MessageHandler, StateStore};

// ============================================================================
// In-memory store
// ============================================================================

/// An ordered in-memory [`StateStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryStore {
    records: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.records.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.records.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.records.remove(key);
    }

    fn prefix_iterator<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        let prefix = prefix.to_vec();
        Box::new(
            self.records
                .range(prefix.clone()..)
                .take_while(move |(key, _)| key.starts_with(&prefix))
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }
}

// ============================================================================
// Recording event sink
// ============================================================================

/// Collects every published event in order
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Vec<ProtocolEvent>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProtocolEvent] {
        &self.events
    }

    /// Event signatures in publish order, handy for asserting sequences
    pub fn signatures(&self) -> Vec<&'static str> {
        self.events.iter().map(ProtocolEvent::signature).collect()
    }

    pub fn last(&self) -> Option<&ProtocolEvent> {
        self.events.last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&mut self, event: ProtocolEvent) {
        self.events.push(event);
    }
}

// ============================================================================
// Recording message handler
// ============================================================================

/// A delivered message as seen by [`RecordingHandler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub source_domain: Domain,
    pub sender: B256,
    pub recipient: B256,
    pub message_body: Bytes,
}

/// Records deliveries; optionally rejects every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    deliveries: Vec<Delivery>,
    reject_with: Option<String>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that rejects every delivery with `reason`
    pub fn rejecting(reason: &str) -> Self {
        Self {
            deliveries: Vec::new(),
            reject_with: Some(reason.to_string()),
        }
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }
}

impl MessageHandler for RecordingHandler {
    fn handle_receive_message(
        &mut self,
        source_domain: Domain,
        sender: B256,
        recipient: B256,
        message_body: &Bytes,
    ) -> std::result::Result<(), String> {
        if let Some(reason) = &self.reject_with {
            return Err(reason.clone());
        }
        self.deliveries.push(Delivery {
            source_domain,
            sender,
            recipient,
            message_body: message_body.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// Deterministic attester keys
// ============================================================================

#[cfg(test)]
pub(crate) mod keys {
    use alloy_primitives::B256;
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;

    /// Deterministic signer derived from a one-byte seed (must be non-zero)
    pub(crate) fn attester_key(seed: u8) -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(seed)).expect("valid secp256k1 scalar")
    }

    /// Concatenated signatures over `digest` from the given seeds, in order
    pub(crate) fn attestation_from(digest: &B256, seeds: &[u8]) -> Vec<u8> {
        seeds
            .iter()
            .flat_map(|seed| {
                attester_key(*seed)
                    .sign_hash_sync(digest)
                    .expect("signing succeeds")
                    .as_bytes()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AttesterEnabled, SendingPaused};
    use alloy_primitives::Address;

    #[test]
    fn test_in_memory_store_prefix_iteration_is_ordered() {
        let mut store = InMemoryStore::new();
        store.set(b"p/b", vec![2]);
        store.set(b"p/a", vec![1]);
        store.set(b"q/a", vec![3]);

        let items: Vec<_> = store.prefix_iterator(b"p/").collect();
        assert_eq!(
            items,
            vec![(b"p/a".to_vec(), vec![1]), (b"p/b".to_vec(), vec![2])]
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingEventSink::new();
        sink.publish(ProtocolEvent::SendingPaused(SendingPaused {}));
        sink.publish(ProtocolEvent::AttesterEnabled(AttesterEnabled {
            attester: Address::ZERO,
        }));

        assert_eq!(
            sink.signatures(),
            vec!["SendingPaused()", "AttesterEnabled(address)"]
        );
    }

    #[test]
    fn test_rejecting_handler() {
        let mut handler = RecordingHandler::rejecting("mint cap exceeded");
        let result =
            handler.handle_receive_message(Domain::ETHEREUM, B256::ZERO, B256::ZERO, &Bytes::new());
        assert_eq!(result, Err("mint cap exceeded".to_string()));
        assert!(handler.deliveries().is_empty());
    }
}
