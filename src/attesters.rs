// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Attester set and signature threshold management
//!
//! Every mutation keeps the m-of-n configuration live: the set never becomes
//! empty, and the threshold stays in `1..=n`. All checks run before any
//! write, so a rejected change leaves both records as they were.

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::error::{Result, TransmitterError};
use crate::events::{AttesterDisabled, AttesterEnabled, ProtocolEvent, SignatureThresholdUpdated};
use crate::roles::{require_role, Role};
use crate::state::StateExt;
use crate::traits::StateStore;

/// Registers `attester`; attester manager only.
pub(crate) fn enable_attester<S: StateStore + ?Sized>(
    store: &mut S,
    caller: Address,
    attester: Address,
) -> Result<ProtocolEvent> {
    require_role(store, Role::AttesterManager, caller)?;

    if attester.is_zero() {
        return Err(TransmitterError::InvalidAddress(
            "attester cannot be the zero address".to_string(),
        ));
    }
    if store.attester(&attester)?.is_some() {
        return Err(TransmitterError::AttesterAlreadyEnabled(attester));
    }

    store.set_attester(attester)?;

    info!(attester = %attester, event = "attester_enabled");
    Ok(ProtocolEvent::AttesterEnabled(AttesterEnabled { attester }))
}

/// Removes `attester`; attester manager only.
///
/// # Errors
///
/// - [`TransmitterError::NotFound`] if `attester` is not registered or no
///   threshold has been configured
/// - [`TransmitterError::LastAttester`] if it is the only attester left
/// - [`TransmitterError::ThresholdViolation`] if fewer attesters than the
///   threshold would remain
pub(crate) fn disable_attester<S: StateStore + ?Sized>(
    store: &mut S,
    caller: Address,
    attester: Address,
) -> Result<ProtocolEvent> {
    require_role(store, Role::AttesterManager, caller)?;

    if attester.is_zero() {
        return Err(TransmitterError::InvalidAddress(
            "attester cannot be the zero address".to_string(),
        ));
    }
    if store.attester(&attester)?.is_none() {
        return Err(TransmitterError::NotFound(format!("attester {attester}")));
    }

    let remaining = store.attesters()?.len() - 1;
    if remaining == 0 {
        return Err(TransmitterError::LastAttester);
    }

    let threshold = store
        .signature_threshold()?
        .ok_or_else(|| TransmitterError::NotFound("signature threshold".to_string()))?;
    if (remaining as u64) < u64::from(threshold.amount) {
        return Err(TransmitterError::ThresholdViolation {
            reason: format!(
                "disabling would leave {remaining} attesters below the threshold of {}",
                threshold.amount
            ),
        });
    }

    store.delete_attester(&attester);

    info!(
        attester = %attester,
        remaining = remaining,
        event = "attester_disabled"
    );
    Ok(ProtocolEvent::AttesterDisabled(AttesterDisabled { attester }))
}

/// Sets the signature threshold; attester manager only.
///
/// # Errors
///
/// [`TransmitterError::ThresholdViolation`] if `amount` is zero or exceeds the
/// number of registered attesters.
pub(crate) fn set_signature_threshold<S: StateStore + ?Sized>(
    store: &mut S,
    caller: Address,
    amount: u32,
) -> Result<ProtocolEvent> {
    require_role(store, Role::AttesterManager, caller)?;

    if amount == 0 {
        return Err(TransmitterError::ThresholdViolation {
            reason: "threshold must be at least 1".to_string(),
        });
    }

    let attester_count = store.attesters()?.len();
    if u64::from(amount) > attester_count as u64 {
        return Err(TransmitterError::ThresholdViolation {
            reason: format!("threshold {amount} exceeds the {attester_count} enabled attesters"),
        });
    }

    let previous = store.signature_threshold()?.map_or(0, |t| t.amount);
    store.set_signature_threshold(amount)?;

    info!(
        previous = previous,
        threshold = amount,
        attester_count = attester_count,
        event = "signature_threshold_updated"
    );
    Ok(ProtocolEvent::SignatureThresholdUpdated(
        SignatureThresholdUpdated {
            oldSignatureThreshold: U256::from(previous),
            newSignatureThreshold: U256::from(amount),
        },
    ))
}
