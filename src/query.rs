// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Read-only query surface
//!
//! The host serves these over whatever API it exposes; the core only defines
//! what can be retrieved and in which order.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, TransmitterError};
use crate::protocol::Domain;
use crate::roles::Roles;
use crate::state::{keys, Attester, MaxMessageBodySize, PauseState, SignatureThreshold, StateExt};
use crate::traits::StateStore;

/// Page size used when the request does not set one
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
/// Largest page a single request may ask for
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Pagination parameters.
///
/// `key` is the opaque continuation token returned as `next_key` by the
/// previous page; `None` starts from the beginning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub key: Option<Bytes>,
    pub limit: Option<u64>,
}

/// One page of results, in ascending key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    /// Token for the following page; `None` on the last page
    pub next_key: Option<Bytes>,
}

/// Looks up a single attester by hex address.
///
/// # Errors
///
/// - [`TransmitterError::InvalidAddress`] if `address` is not a 20-byte hex address
/// - [`TransmitterError::NotFound`] if it is not registered
pub fn attester<S: StateStore + ?Sized>(store: &S, address: &str) -> Result<Attester> {
    let parsed = Address::from_str(address)
        .map_err(|e| TransmitterError::InvalidAddress(format!("{address}: {e}")))?;

    store
        .attester(&parsed)?
        .ok_or_else(|| TransmitterError::NotFound(format!("attester {parsed}")))
}

/// Lists attesters ordered by address.
pub fn attesters<S: StateStore + ?Sized>(
    store: &S,
    request: &PageRequest,
) -> Result<PageResponse<Attester>> {
    let limit = match request.limit {
        None | Some(0) => DEFAULT_PAGE_LIMIT,
        Some(limit) => limit.min(MAX_PAGE_LIMIT),
    } as usize;
    let start: &[u8] = request.key.as_ref().map_or(&[][..], |key| &key[..]);

    let mut entries = store
        .prefix_iterator(keys::ATTESTER_PREFIX)
        .map(|(key, value)| (key[keys::ATTESTER_PREFIX.len()..].to_vec(), value))
        .skip_while(|(suffix, _)| suffix.as_slice() < start);

    let mut items = Vec::with_capacity(limit.min(64));
    for (_, value) in entries.by_ref().take(limit) {
        items.push(serde_json::from_slice(&value)?);
    }
    let next_key = entries.next().map(|(suffix, _)| Bytes::from(suffix));

    Ok(PageResponse { items, next_key })
}

/// The configured threshold, or [`TransmitterError::NotFound`]
pub fn signature_threshold<S: StateStore + ?Sized>(store: &S) -> Result<SignatureThreshold> {
    store
        .signature_threshold()?
        .ok_or_else(|| TransmitterError::NotFound("signature threshold".to_string()))
}

pub fn roles<S: StateStore + ?Sized>(store: &S) -> Result<Roles> {
    Roles::load(store)
}

pub fn pause_state<S: StateStore + ?Sized>(store: &S) -> Result<PauseState> {
    store.pause_state()
}

pub fn max_message_body_size<S: StateStore + ?Sized>(store: &S) -> Result<Option<MaxMessageBodySize>> {
    store.max_message_body_size()
}

pub fn next_available_nonce<S: StateStore + ?Sized>(store: &S, domain: Domain) -> Result<u64> {
    store.next_available_nonce(domain)
}

pub fn is_nonce_used<S: StateStore + ?Sized>(store: &S, source_domain: Domain, nonce: u64) -> bool {
    store.is_nonce_used(source_domain, nonce)
}
