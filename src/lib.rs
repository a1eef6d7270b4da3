// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! # cctp-transmitter
//!
//! The trust core of a CCTP message transmitter: the part of a ledger that
//! emits outbound cross-domain messages and accepts inbound ones once a
//! quorum of off-chain attesters has signed them.
//!
//! The crate is pure, synchronous logic. Durable state, event publishing and
//! the effect of a received message are injected by the host through
//! [`StateStore`], [`EventSink`] and [`MessageHandler`].
//!
//! ## Quick Start
//!
//! ```rust
//! use alloy_primitives::{keccak256, Address, Bytes, B256};
//! use cctp_transmitter::testing::{InMemoryStore, RecordingEventSink};
//! use cctp_transmitter::{init_genesis, Domain, GenesisState, MessageTransmitter, TransmitterConfig};
//!
//! # fn main() -> cctp_transmitter::Result<()> {
//! let mut store = InMemoryStore::new();
//! init_genesis(&mut store, &GenesisState::default())?;
//!
//! let noble = MessageTransmitter::new(
//!     TransmitterConfig::builder().local_domain(Domain::NOBLE).build(),
//! );
//! let mut events = RecordingEventSink::new();
//!
//! let message = noble.send_message(
//!     &mut store,
//!     &mut events,
//!     Address::repeat_byte(0x11),
//!     Domain::ETHEREUM,
//!     B256::repeat_byte(0x22),
//!     B256::ZERO,
//!     Bytes::from_static(b"hello"),
//! )?;
//!
//! // Attesters sign this digest off-chain
//! let digest = keccak256(message.encode());
//! assert_eq!(digest, message.hash());
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`MessageTransmitter`] - send, receive and replace, plus the admin operations
//! - [`Message`] and [`Attestation`] - the wire formats
//! - [`GenesisState`] - import and export of the complete state
//! - [`query`] - read-only lookups, including paginated attester listing
//! - [`TransmitterError`] and [`Result`] - error types
//! - [`spans`] - tracing span constructors for custom instrumentation

mod attesters;
mod config;
mod error;
mod events;
mod genesis;
mod pause;
mod protocol;
mod replay;
mod roles;
mod store;
mod traits;
mod transmitter;

pub mod query;
pub mod state;
pub mod testing;

// Public module for hosts that need custom instrumentation
pub mod spans;

pub use config::{TransmitterConfig, LOCAL_DOMAIN_ENV, MESSAGE_VERSION_ENV};
pub use error::{PausedPath, Result, TransmitterError};
pub use events::{
    AttesterDisabled, AttesterEnabled, AttesterManagerUpdated, MaxMessageBodySizeUpdated,
    MessageReceived, MessageSent, OwnerUpdated, PauserUpdated, ProtocolEvent, ReceivingPaused,
    ReceivingUnpaused, SendingPaused, SendingUnpaused, SignatureThresholdUpdated,
};
pub use genesis::{export_genesis, init_genesis, GenesisState, OutboundNonce, UsedNonce};
pub use protocol::{
    address_to_bytes32, verify_attestation, Attestation, Domain, Message, SIGNATURE_LENGTH,
};
pub use roles::{require_role, Role, Roles};
pub use state::{
    Attester, MaxMessageBodySize, NonceRecord, PauseState, SignatureThreshold, StateExt,
};
pub use store::{BatchOp, PendingWrites};
pub use traits::{Caller, EventSink, MessageHandler, NoopHandler, StateStore};
pub use transmitter::MessageTransmitter;
