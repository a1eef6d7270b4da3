// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! The message transmitter
//!
//! [`MessageTransmitter`] is the caller-facing entry point. It holds only the
//! static [`TransmitterConfig`]; all mutable state lives in the host's
//! [`StateStore`], and notifications go to the host's [`EventSink`].
//!
//! Each operation runs against a [`PendingWrites`] overlay and buffers its
//! events. On success the writes are committed and then the events published,
//! in emission order. On failure nothing is written and nothing is published.

use alloy_primitives::{hex, keccak256, Address, Bytes, B256, U256};
use tracing::{debug, info};

use crate::attesters;
use crate::config::TransmitterConfig;
use crate::error::{PausedPath, Result, TransmitterError};
use crate::events::{MaxMessageBodySizeUpdated, MessageReceived, MessageSent, ProtocolEvent};
use crate::pause;
use crate::protocol::{address_to_bytes32, Attestation, Domain, Message};
use crate::replay;
use crate::roles::{self, require_role, Role};
use crate::spans;
use crate::state::StateExt;
use crate::store::PendingWrites;
use crate::traits::{Caller, EventSink, MessageHandler, StateStore};

/// Sends, receives and replaces cross-domain messages for one local domain.
///
/// # Example
///
/// ```rust
/// use alloy_primitives::{Address, B256, Bytes};
/// use cctp_transmitter::testing::{InMemoryStore, RecordingEventSink};
/// use cctp_transmitter::{Domain, MessageTransmitter, TransmitterConfig};
///
/// let transmitter = MessageTransmitter::new(
///     TransmitterConfig::builder().local_domain(Domain::NOBLE).build(),
/// );
/// let mut store = InMemoryStore::new();
/// let mut events = RecordingEventSink::new();
///
/// let message = transmitter
///     .send_message(
///         &mut store,
///         &mut events,
///         Address::repeat_byte(0x11),
///         Domain::ETHEREUM,
///         B256::repeat_byte(0x22),
///         B256::ZERO,
///         Bytes::from_static(b"hello"),
///     )
///     .unwrap();
///
/// assert_eq!(message.nonce(), 0);
/// assert_eq!(events.signatures(), vec!["MessageSent(bytes)"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTransmitter {
    config: TransmitterConfig,
}

impl MessageTransmitter {
    pub fn new(config: TransmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }

    pub fn local_domain(&self) -> Domain {
        self.config.local_domain()
    }

    pub fn message_version(&self) -> u32 {
        self.config.message_version()
    }

    pub fn enable_attester<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        attester: Address,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::attester_admin("enable_attester", &caller);
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            events.push(attesters::enable_attester(state, caller, attester)?);
            Ok(())
        })
    }

    /// Removes an attester without breaking liveness.
    ///
    /// See [`TransmitterError::LastAttester`] and
    /// [`TransmitterError::ThresholdViolation`].
    pub fn disable_attester<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        attester: Address,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::attester_admin("disable_attester", &caller);
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            events.push(attesters::disable_attester(state, caller, attester)?);
            Ok(())
        })
    }

    pub fn set_signature_threshold<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        amount: u32,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::attester_admin("set_signature_threshold", &caller);
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            events.push(attesters::set_signature_threshold(state, caller, amount)?);
            Ok(())
        })
    }

    pub fn pause_sending<S, E>(&self, store: &mut S, sink: &mut E, caller: Caller) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.set_paused(store, sink, caller, PausedPath::Send, true)
    }

    pub fn unpause_sending<S, E>(&self, store: &mut S, sink: &mut E, caller: Caller) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.set_paused(store, sink, caller, PausedPath::Send, false)
    }

    pub fn pause_receiving<S, E>(&self, store: &mut S, sink: &mut E, caller: Caller) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.set_paused(store, sink, caller, PausedPath::Receive, true)
    }

    pub fn unpause_receiving<S, E>(&self, store: &mut S, sink: &mut E, caller: Caller) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.set_paused(store, sink, caller, PausedPath::Receive, false)
    }

    fn set_paused<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        path: PausedPath,
        paused: bool,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::set_paused(path, paused, &caller);
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            events.push(pause::set_paused(state, caller, path, paused)?);
            Ok(())
        })
    }

    pub fn update_owner<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        new_owner: Address,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.update_role(store, sink, caller, Role::Owner, new_owner)
    }

    pub fn update_attester_manager<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        new_attester_manager: Address,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.update_role(store, sink, caller, Role::AttesterManager, new_attester_manager)
    }

    pub fn update_pauser<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        new_pauser: Address,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        self.update_role(store, sink, caller, Role::Pauser, new_pauser)
    }

    fn update_role<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        role: Role,
        new_holder: Address,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::owner_admin(spans::role_update_operation(role), &caller);
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            events.push(roles::update_role(state, caller, role, new_holder)?);
            Ok(())
        })
    }

    /// Sets the largest body `send_message` and `replace_message` accept; owner only.
    pub fn set_max_message_body_size<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        amount: u64,
    ) -> Result<()>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::owner_admin("set_max_message_body_size", &caller);
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            require_role(state, Role::Owner, caller)?;
            state.set_max_message_body_size(amount)?;

            info!(max_message_body_size = amount, event = "max_message_body_size_updated");
            events.push(ProtocolEvent::MaxMessageBodySizeUpdated(
                MaxMessageBodySizeUpdated {
                    newMaxMessageBodySize: U256::from(amount),
                },
            ));
            Ok(())
        })
    }

    /// Emits a new outbound message from `caller`.
    ///
    /// The message is stamped with the local domain, the configured version
    /// and the next nonce of the local domain. A zero `destination_caller`
    /// lets anyone relay it on the destination.
    ///
    /// # Errors
    ///
    /// - [`TransmitterError::Paused`] while sending is paused; no nonce is used
    /// - [`TransmitterError::InvalidAddress`] for a zero recipient
    /// - [`TransmitterError::MessageBodyTooLarge`] above the configured maximum
    /// - [`TransmitterError::NonceExhausted`] if the nonce space is used up
    #[allow(clippy::too_many_arguments)]
    pub fn send_message<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        destination_domain: Domain,
        recipient: B256,
        destination_caller: B256,
        message_body: Bytes,
    ) -> Result<Message>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::send_message(&self.local_domain(), &destination_domain, message_body.len());
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            state.pause_state()?.check_send()?;

            if recipient.is_zero() {
                return Err(TransmitterError::InvalidAddress(
                    "recipient cannot be the zero address".to_string(),
                ));
            }
            check_body_size(state, message_body.len())?;

            let nonce = replay::next_nonce(state, self.local_domain())?;
            span.record("nonce", nonce);

            let message = Message::builder()
                .version(self.message_version())
                .source_domain(self.local_domain())
                .destination_domain(destination_domain)
                .nonce(nonce)
                .sender(address_to_bytes32(caller))
                .recipient(recipient)
                .destination_caller(destination_caller)
                .message_body(message_body)
                .build();

            info!(
                destination_domain = %destination_domain,
                nonce = nonce,
                sender = %caller,
                event = "message_sent"
            );
            events.push(ProtocolEvent::MessageSent(MessageSent {
                message: message.encode(),
            }));
            Ok(message)
        })
    }

    /// Verifies and delivers an inbound message.
    ///
    /// The nonce is consumed before `handler` runs; if the handler rejects
    /// the message the consumption is discarded with every other write, so
    /// the message can be retried.
    ///
    /// # Errors
    ///
    /// - [`TransmitterError::Paused`] while receiving is paused
    /// - [`TransmitterError::MalformedMessage`] if the bytes do not decode
    /// - [`TransmitterError::UnsupportedVersion`],
    ///   [`TransmitterError::InvalidDestinationDomain`] or
    ///   [`TransmitterError::InvalidDestinationCaller`] for a message not
    ///   addressed to this transmitter and caller
    /// - any attestation error, see [`Attestation::verify`]
    /// - [`TransmitterError::AlreadyUsed`] on replay
    /// - [`TransmitterError::HandlerRejected`] if `handler` fails
    pub fn receive_message<S, E, H>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        message_bytes: &[u8],
        attestation_bytes: &[u8],
        handler: &mut H,
    ) -> Result<Message>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
        H: MessageHandler + ?Sized,
    {
        let span = spans::receive_message(&caller, message_bytes.len(), attestation_bytes.len());
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            state.pause_state()?.check_receive()?;

            let message = Message::decode(message_bytes)?;
            span.record("source_domain", message.source_domain().as_u32());
            span.record("nonce", message.nonce());
            span.record("message_hash", hex::encode(keccak256(message_bytes)));

            if message.version() != self.message_version() {
                return Err(TransmitterError::UnsupportedVersion {
                    expected: self.message_version(),
                    actual: message.version(),
                });
            }
            if message.destination_domain() != self.local_domain() {
                return Err(TransmitterError::InvalidDestinationDomain {
                    expected: self.local_domain(),
                    actual: message.destination_domain(),
                });
            }
            if !message.is_permissionless()
                && *message.destination_caller() != address_to_bytes32(caller)
            {
                return Err(TransmitterError::InvalidDestinationCaller);
            }

            verify(state, message_bytes, attestation_bytes)?;
            replay::consume(state, message.source_domain(), message.nonce())?;

            handler
                .handle_receive_message(
                    message.source_domain(),
                    *message.sender(),
                    *message.recipient(),
                    message.message_body(),
                )
                .map_err(TransmitterError::HandlerRejected)?;

            info!(
                source_domain = %message.source_domain(),
                nonce = message.nonce(),
                caller = %caller,
                event = "message_received"
            );
            events.push(ProtocolEvent::MessageReceived(MessageReceived {
                caller,
                sourceDomain: message.source_domain().as_u32(),
                nonce: message.nonce(),
                sender: *message.sender(),
                messageBody: message.message_body().clone(),
            }));
            Ok(message)
        })
    }

    /// Re-issues a message this domain sent, with a new destination caller
    /// and body.
    ///
    /// The replacement keeps the original nonce, so once either version is
    /// received on the destination the other is rejected as a replay.
    ///
    /// # Errors
    ///
    /// - [`TransmitterError::Paused`] while sending is paused
    /// - any attestation error for the original message
    /// - [`TransmitterError::ReplaceNotPermitted`] unless `caller` sent the
    ///   original from this domain
    /// - [`TransmitterError::MessageBodyTooLarge`] above the configured maximum
    #[allow(clippy::too_many_arguments)]
    pub fn replace_message<S, E>(
        &self,
        store: &mut S,
        sink: &mut E,
        caller: Caller,
        original_message: &[u8],
        original_attestation: &[u8],
        new_destination_caller: B256,
        new_message_body: Bytes,
    ) -> Result<Message>
    where
        S: StateStore + ?Sized,
        E: EventSink + ?Sized,
    {
        let span = spans::replace_message(&caller, &new_destination_caller, new_message_body.len());
        let _guard = span.enter();

        atomically(store, sink, |state, events| {
            state.pause_state()?.check_send()?;

            verify(state, original_message, original_attestation)?;
            let original = Message::decode(original_message)?;
            span.record("nonce", original.nonce());

            if *original.sender() != address_to_bytes32(caller) {
                return Err(TransmitterError::ReplaceNotPermitted {
                    reason: format!("{caller} is not the original sender"),
                });
            }
            if original.source_domain() != self.local_domain() {
                return Err(TransmitterError::ReplaceNotPermitted {
                    reason: format!(
                        "message was sent from {}, not the local {}",
                        original.source_domain(),
                        self.local_domain()
                    ),
                });
            }
            check_body_size(state, new_message_body.len())?;

            let replacement = original.replaced_with(new_destination_caller, new_message_body);

            info!(
                destination_domain = %replacement.destination_domain(),
                nonce = replacement.nonce(),
                sender = %caller,
                event = "message_replaced"
            );
            events.push(ProtocolEvent::MessageSent(MessageSent {
                message: replacement.encode(),
            }));
            Ok(replacement)
        })
    }
}

/// Runs `operation` against a write overlay, committing and publishing only on success.
fn atomically<S, E, T, F>(store: &mut S, sink: &mut E, operation: F) -> Result<T>
where
    S: StateStore + ?Sized,
    E: EventSink + ?Sized,
    F: FnOnce(&mut PendingWrites<'_, S>, &mut Vec<ProtocolEvent>) -> Result<T>,
{
    let mut state = PendingWrites::new(store);
    let mut events = Vec::new();

    match operation(&mut state, &mut events) {
        Ok(value) => {
            let writes = state.commit();
            debug!(writes = writes, events = events.len(), event = "writes_committed");
            for event in events {
                sink.publish(event);
            }
            Ok(value)
        }
        Err(error) => {
            spans::record_error(&error);
            debug!(error = %error, event = "writes_discarded");
            Err(error)
        }
    }
}

/// Checks `attestation_bytes` over `message_bytes` against the current attester set.
fn verify<S: StateStore + ?Sized>(
    state: &S,
    message_bytes: &[u8],
    attestation_bytes: &[u8],
) -> Result<()> {
    let threshold = state
        .signature_threshold()?
        .ok_or_else(|| TransmitterError::NotFound("signature threshold".to_string()))?;
    let attesters = state.attesters()?;

    let digest = keccak256(message_bytes);
    let attestation = Attestation::parse(attestation_bytes)?;

    let span = spans::verify_attestation(&digest, attestation.signature_count(), threshold.amount);
    let _guard = span.enter();

    let counted = attestation.verify(&digest, &attesters, threshold.amount)?;
    debug!(
        counted = counted,
        threshold = threshold.amount,
        event = "attestation_verified"
    );
    Ok(())
}

/// No configured maximum means no limit.
fn check_body_size<S: StateStore + ?Sized>(state: &S, size: usize) -> Result<()> {
    if let Some(max) = state.max_message_body_size()? {
        if size as u64 > max.amount {
            return Err(TransmitterError::MessageBodyTooLarge {
                size,
                max: max.amount,
            });
        }
    }
    Ok(())
}
