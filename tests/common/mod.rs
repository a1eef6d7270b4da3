//! Shared fixtures for integration tests
//!
//! Two ledgers, each with its own store and transmitter, wired to the same
//! set of deterministic attester keys.

#![allow(dead_code)]

use alloy_primitives::{address, keccak256, Address, Bytes, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use cctp_transmitter::testing::{InMemoryStore, RecordingEventSink};
use cctp_transmitter::{
    init_genesis, Domain, GenesisState, Message, MessageTransmitter, TransmitterConfig,
};

pub const OWNER: Address = address!("1000000000000000000000000000000000000001");
pub const MANAGER: Address = address!("2000000000000000000000000000000000000002");
pub const PAUSER: Address = address!("3000000000000000000000000000000000000003");
pub const ALICE: Address = address!("a11ce00000000000000000000000000000000001");
pub const RELAYER: Address = address!("5000000000000000000000000000000000000005");

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic attester signer; `seed` must be non-zero
pub fn attester(seed: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(seed)).expect("valid secp256k1 scalar")
}

/// Concatenated 65-byte signatures over the message hash, in seed order
pub fn attest(message: &[u8], seeds: &[u8]) -> Vec<u8> {
    let digest = keccak256(message);
    seeds
        .iter()
        .flat_map(|seed| {
            attester(*seed)
                .sign_hash_sync(&digest)
                .expect("signing succeeds")
                .as_bytes()
        })
        .collect()
}

/// One ledger running a transmitter
pub struct Ledger {
    pub transmitter: MessageTransmitter,
    pub store: InMemoryStore,
    pub events: RecordingEventSink,
}

impl Ledger {
    /// A ledger whose attester set is the keys for `seeds`, at `threshold`
    pub fn new(domain: Domain, seeds: &[u8], threshold: u32) -> Self {
        let genesis = GenesisState {
            owner: Some(OWNER),
            attester_manager: Some(MANAGER),
            pauser: Some(PAUSER),
            attesters: seeds.iter().map(|seed| attester(*seed).address()).collect(),
            signature_threshold: Some(threshold),
            ..GenesisState::default()
        };
        let mut store = InMemoryStore::new();
        init_genesis(&mut store, &genesis).expect("valid genesis");

        Self {
            transmitter: MessageTransmitter::new(
                TransmitterConfig::builder().local_domain(domain).build(),
            ),
            store,
            events: RecordingEventSink::new(),
        }
    }

    pub fn domain(&self) -> Domain {
        self.transmitter.local_domain()
    }

    /// Sends `body` from `sender` to `recipient` on `destination`
    pub fn send(
        &mut self,
        sender: Address,
        destination: Domain,
        recipient: B256,
        destination_caller: B256,
        body: &[u8],
    ) -> cctp_transmitter::Result<Message> {
        self.transmitter.send_message(
            &mut self.store,
            &mut self.events,
            sender,
            destination,
            recipient,
            destination_caller,
            Bytes::copy_from_slice(body),
        )
    }
}
