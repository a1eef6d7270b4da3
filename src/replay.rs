// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Nonce allocation and replay protection
//!
//! Outbound, each source domain has a strictly increasing counter. Inbound,
//! `(source_domain, nonce)` pairs are marked used forever; there is no way to
//! release a consumed nonce.

use tracing::debug;

use crate::error::{Result, TransmitterError};
use crate::protocol::Domain;
use crate::state::StateExt;
use crate::traits::StateStore;

/// Allocates the next outbound nonce for `domain` and persists the advance.
///
/// # Errors
///
/// [`TransmitterError::NonceExhausted`] once `u64::MAX` has been handed out.
pub fn next_nonce<S: StateStore + ?Sized>(store: &mut S, domain: Domain) -> Result<u64> {
    let nonce = store.next_available_nonce(domain)?;
    let next = nonce
        .checked_add(1)
        .ok_or(TransmitterError::NonceExhausted(domain))?;
    store.set_next_available_nonce(domain, next)?;

    debug!(
        domain = %domain,
        nonce = nonce,
        event = "nonce_allocated"
    );
    Ok(nonce)
}

/// Marks `(source_domain, nonce)` as consumed.
///
/// # Errors
///
/// [`TransmitterError::AlreadyUsed`] if it was consumed before.
pub fn consume<S: StateStore + ?Sized>(store: &mut S, source_domain: Domain, nonce: u64) -> Result<()> {
    if store.is_nonce_used(source_domain, nonce) {
        return Err(TransmitterError::AlreadyUsed {
            source_domain,
            nonce,
        });
    }
    store.mark_nonce_used(source_domain, nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    #[test]
    fn test_nonces_increase_per_domain() {
        let mut store = InMemoryStore::new();
        assert_eq!(next_nonce(&mut store, Domain::NOBLE).unwrap(), 0);
        assert_eq!(next_nonce(&mut store, Domain::NOBLE).unwrap(), 1);
        assert_eq!(next_nonce(&mut store, Domain::ETHEREUM).unwrap(), 0);
        assert_eq!(next_nonce(&mut store, Domain::NOBLE).unwrap(), 2);
        assert_eq!(store.next_available_nonce(Domain::NOBLE).unwrap(), 3);
    }

    #[test]
    fn test_exhausted_nonce_space() {
        let mut store = InMemoryStore::new();
        store
            .set_next_available_nonce(Domain::NOBLE, u64::MAX - 1)
            .unwrap();

        assert_eq!(next_nonce(&mut store, Domain::NOBLE).unwrap(), u64::MAX - 1);
        let err = next_nonce(&mut store, Domain::NOBLE).unwrap_err();
        assert!(matches!(err, TransmitterError::NonceExhausted(d) if d == Domain::NOBLE));
        assert_eq!(store.next_available_nonce(Domain::NOBLE).unwrap(), u64::MAX);
    }

    #[test]
    fn test_consume_twice_is_replay() {
        let mut store = InMemoryStore::new();
        consume(&mut store, Domain::ETHEREUM, 5).unwrap();

        let err = consume(&mut store, Domain::ETHEREUM, 5).unwrap_err();
        assert!(matches!(
            err,
            TransmitterError::AlreadyUsed { source_domain, nonce: 5 } if source_domain == Domain::ETHEREUM
        ));
    }

    #[test]
    fn test_same_nonce_on_other_domain_is_fresh() {
        let mut store = InMemoryStore::new();
        consume(&mut store, Domain::ETHEREUM, 5).unwrap();
        assert!(consume(&mut store, Domain::BASE, 5).is_ok());
        assert!(consume(&mut store, Domain::ETHEREUM, 6).is_ok());
    }
}
