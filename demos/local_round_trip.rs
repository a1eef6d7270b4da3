// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Send, attest and receive a message between two in-memory ledgers
//!
//! The receiving ledger's domain comes from `CCTP_LOCAL_DOMAIN` (or `.env`),
//! falling back to Noble. The sender is always Ethereum.
//!
//! Run with: `RUST_LOG=cctp_transmitter=debug cargo run --example local_round_trip`

use alloy_primitives::{address, Address, Bytes, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use cctp_transmitter::testing::{InMemoryStore, RecordingEventSink, RecordingHandler};
use cctp_transmitter::{
    address_to_bytes32, init_genesis, query, Domain, GenesisState, MessageTransmitter,
    TransmitterConfig, TransmitterError,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const OPERATOR: Address = address!("0101010101010101010101010101010101010101");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cctp_transmitter=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let destination = match TransmitterConfig::from_env() {
        Ok(config) => config,
        Err(TransmitterError::InvalidConfig(reason)) => {
            info!(%reason, "falling back to Noble");
            TransmitterConfig::builder().local_domain(Domain::NOBLE).build()
        }
        Err(e) => return Err(e.into()),
    };

    let attesters: Vec<PrivateKeySigner> = (1..=3u8)
        .map(|seed| PrivateKeySigner::from_bytes(&B256::repeat_byte(seed)))
        .collect::<Result<_, _>>()?;

    let genesis = GenesisState {
        owner: Some(OPERATOR),
        attester_manager: Some(OPERATOR),
        pauser: Some(OPERATOR),
        attesters: attesters.iter().map(|signer| signer.address()).collect(),
        signature_threshold: Some(2),
        ..GenesisState::default()
    };

    let source = MessageTransmitter::new(
        TransmitterConfig::builder()
            .local_domain(Domain::ETHEREUM)
            .message_version(destination.message_version())
            .build(),
    );
    let destination = MessageTransmitter::new(destination);

    let mut source_store = InMemoryStore::new();
    let mut destination_store = InMemoryStore::new();
    init_genesis(&mut source_store, &genesis)?;
    init_genesis(&mut destination_store, &genesis)?;
    let mut source_events = RecordingEventSink::new();
    let mut destination_events = RecordingEventSink::new();

    println!("1️⃣  Sending from {} to {}", source.local_domain(), destination.local_domain());
    let sender = Address::repeat_byte(0xaa);
    let message = source.send_message(
        &mut source_store,
        &mut source_events,
        sender,
        destination.local_domain(),
        address_to_bytes32(Address::repeat_byte(0xbb)),
        B256::ZERO,
        Bytes::from_static(b"hello from ethereum"),
    )?;
    let wire = message.encode();
    println!("   nonce {} hash {}", message.nonce(), message.hash());

    println!("2️⃣  Collecting 2-of-3 attester signatures");
    let mut attestation = Vec::new();
    for signer in &attesters[1..] {
        attestation.extend(signer.sign_hash_sync(&message.hash())?.as_bytes());
    }

    println!("3️⃣  Receiving on {}", destination.local_domain());
    let mut handler = RecordingHandler::new();
    destination.receive_message(
        &mut destination_store,
        &mut destination_events,
        Address::repeat_byte(0xcc),
        &wire,
        &attestation,
        &mut handler,
    )?;
    for delivery in handler.deliveries() {
        println!(
            "   delivered {:?} from {}",
            String::from_utf8_lossy(&delivery.message_body),
            delivery.source_domain
        );
    }

    println!("4️⃣  Replaying the same message");
    match destination.receive_message(
        &mut destination_store,
        &mut destination_events,
        Address::repeat_byte(0xcc),
        &wire,
        &attestation,
        &mut handler,
    ) {
        Err(e) => println!("   ✅ rejected: {e}"),
        Ok(_) => println!("   ❌ replay was accepted"),
    }

    let used = query::is_nonce_used(&destination_store, source.local_domain(), message.nonce());
    println!("\nNonce consumed on destination: {used}");
    println!("Events published on destination: {:?}", destination_events.signatures());

    Ok(())
}
