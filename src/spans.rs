// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! OpenTelemetry span helpers for transmitter operations
//!
//! Span names are static (`cctp.<operation>`) and carry structured attributes
//! only, so hosts can route them into an existing OpenTelemetry pipeline.
//! Every top-level span declares empty `error.*` fields that
//! [`record_error`] and [`record_error_with_context`] fill in when the
//! operation fails.
//!
//! # Example
//!
//! ```rust
//! use cctp_transmitter::{spans, Domain};
//!
//! let span = spans::send_message(&Domain::NOBLE, &Domain::ETHEREUM, 64);
//! let _guard = span.enter();
//! // custom send logic here
//! ```

use alloy_primitives::{hex, Address, B256};
use tracing::Span;

use crate::error::PausedPath;
use crate::protocol::Domain;
use crate::roles::Role;

/// Span for an outbound send.
///
/// `nonce` is recorded once allocated.
#[inline]
pub fn send_message(source_domain: &Domain, destination_domain: &Domain, body_len: usize) -> Span {
    tracing::info_span!(
        "cctp.send_message",
        source_domain = %source_domain,
        destination_domain = %destination_domain,
        body_len = body_len,
        nonce = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for an inbound receive.
///
/// The message fields are recorded once the bytes have decoded.
/// Children: `cctp.verify_attestation`
#[inline]
pub fn receive_message(caller: &Address, message_len: usize, attestation_len: usize) -> Span {
    tracing::info_span!(
        "cctp.receive_message",
        caller = %caller,
        message_len = message_len,
        attestation_len = attestation_len,
        source_domain = tracing::field::Empty,
        nonce = tracing::field::Empty,
        message_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for re-issuing a previously sent message.
///
/// Children: `cctp.verify_attestation`
#[inline]
pub fn replace_message(caller: &Address, new_destination_caller: &B256, new_body_len: usize) -> Span {
    tracing::info_span!(
        "cctp.replace_message",
        caller = %caller,
        new_destination_caller = %hex::encode(new_destination_caller),
        new_body_len = new_body_len,
        nonce = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for checking an attestation against the attester set.
///
/// Parent: `cctp.receive_message` or `cctp.replace_message`
#[inline]
pub fn verify_attestation(message_hash: &B256, signature_count: usize, threshold: u32) -> Span {
    tracing::debug_span!(
        "cctp.verify_attestation",
        message_hash = %hex::encode(message_hash),
        signature_count = signature_count,
        threshold = threshold,
    )
}

/// Span for attester set and threshold changes.
#[inline]
pub fn attester_admin(operation: &'static str, caller: &Address) -> Span {
    tracing::info_span!(
        "cctp.attester_admin",
        operation = operation,
        caller = %caller,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for flipping a pause switch.
#[inline]
pub fn set_paused(path: PausedPath, paused: bool, caller: &Address) -> Span {
    tracing::info_span!(
        "cctp.set_paused",
        path = %path,
        paused = paused,
        caller = %caller,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for owner-only configuration: role rotation and the body size limit.
#[inline]
pub fn owner_admin(operation: &'static str, caller: &Address) -> Span {
    tracing::info_span!(
        "cctp.owner_admin",
        operation = operation,
        caller = %caller,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Operation name used on `cctp.owner_admin` for a role rotation
pub(crate) const fn role_update_operation(role: Role) -> &'static str {
    match role {
        Role::Owner => "update_owner",
        Role::AttesterManager => "update_attester_manager",
        Role::Pauser => "update_pauser",
    }
}

/// Record error attributes on the current span.
///
/// The error type is the part of the display string before the first colon,
/// which for [`crate::TransmitterError`] is the variant's human name.
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust
/// use cctp_transmitter::spans;
///
/// let span = tracing::info_span!("cctp.host_delivery");
/// let _guard = span.enter();
/// spans::record_error_with_context(
///     "HandlerRejected",
///     "mint failed: recipient is blocked",
///     Some("message left unconsumed"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransmitterError;

    #[test]
    fn test_spans_construct_without_subscriber() {
        let spans = [
            send_message(&Domain::NOBLE, &Domain::ETHEREUM, 10),
            receive_message(&Address::ZERO, 116, 65),
            replace_message(&Address::ZERO, &B256::ZERO, 0),
            verify_attestation(&B256::ZERO, 2, 2),
            attester_admin("enable_attester", &Address::ZERO),
            set_paused(PausedPath::Send, true, &Address::ZERO),
            owner_admin(role_update_operation(Role::Pauser), &Address::ZERO),
        ];
        for span in spans {
            let _guard = span.enter();
            record_error(&TransmitterError::LastAttester);
        }
    }

    #[test]
    fn test_operation_spans_declare_error_fields() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let spans = [
                send_message(&Domain::NOBLE, &Domain::ETHEREUM, 10),
                receive_message(&Address::ZERO, 116, 65),
                replace_message(&Address::ZERO, &B256::ZERO, 0),
                attester_admin("disable_attester", &Address::ZERO),
                set_paused(PausedPath::Receive, false, &Address::ZERO),
                owner_admin("set_max_message_body_size", &Address::ZERO),
            ];
            for span in spans {
                for field in [
                    "error.type",
                    "error.message",
                    "error.source",
                    "error.context",
                    "otel.status_code",
                ] {
                    assert!(span.field(field).is_some(), "{field} missing on {span:?}");
                }
                let _guard = span.enter();
                record_error_with_context("HandlerRejected", "recipient is blocked", Some("retryable"));
            }
        });
    }

    #[test]
    fn test_role_update_operation_names() {
        assert_eq!(role_update_operation(Role::Owner), "update_owner");
        assert_eq!(
            role_update_operation(Role::AttesterManager),
            "update_attester_manager"
        );
    }
}
