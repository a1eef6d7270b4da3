// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Key layout of the protocol's records

use alloy_primitives::{hex, Address};

use crate::protocol::Domain;

pub const NAMESPACE: &[u8] = b"cctp/";

pub const ATTESTER_PREFIX: &[u8] = b"cctp/attester/";
pub const SIGNATURE_THRESHOLD: &[u8] = b"cctp/signature_threshold";
pub const OWNER: &[u8] = b"cctp/roles/owner";
pub const ATTESTER_MANAGER: &[u8] = b"cctp/roles/attester_manager";
pub const PAUSER: &[u8] = b"cctp/roles/pauser";
pub const SEND_RECEIVE_PAUSED: &[u8] = b"cctp/send_receive_paused";
pub const MAX_MESSAGE_BODY_SIZE: &[u8] = b"cctp/max_message_body_size";
pub const OUTBOUND_NONCE_PREFIX: &[u8] = b"cctp/outbound_nonce/";
pub const USED_NONCE_PREFIX: &[u8] = b"cctp/used_nonce/";

/// `cctp/attester/0x<lowercase hex>`; lexicographic order equals address byte order
pub fn attester(address: &Address) -> Vec<u8> {
    let mut key = ATTESTER_PREFIX.to_vec();
    key.extend_from_slice(hex::encode_prefixed(address).as_bytes());
    key
}

/// `cctp/outbound_nonce/<domain be32>`
pub fn outbound_nonce(domain: Domain) -> Vec<u8> {
    let mut key = OUTBOUND_NONCE_PREFIX.to_vec();
    key.extend_from_slice(&domain.to_be_bytes());
    key
}

/// `cctp/used_nonce/<domain be32><nonce be64>`
pub fn used_nonce(domain: Domain, nonce: u64) -> Vec<u8> {
    let mut key = USED_NONCE_PREFIX.to_vec();
    key.extend_from_slice(&domain.to_be_bytes());
    key.extend_from_slice(&nonce.to_be_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_attester_key_is_lowercase_hex() {
        let key = attester(&address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d"));
        insta::assert_snapshot!(
            String::from_utf8(key).unwrap(),
            @"cctp/attester/0x742d35cc6634c0532925a3b844bc9e7595f8fa0d"
        );
    }

    #[test]
    fn test_used_nonce_keys_are_distinct_per_domain() {
        assert_ne!(used_nonce(Domain::ETHEREUM, 1), used_nonce(Domain::NOBLE, 1));
        assert_ne!(used_nonce(Domain::ETHEREUM, 1), used_nonce(Domain::ETHEREUM, 2));
        assert_eq!(
            used_nonce(Domain::new(1), 2).len(),
            USED_NONCE_PREFIX.len() + 12
        );
    }

    #[test]
    fn test_all_keys_share_namespace() {
        for key in [
            ATTESTER_PREFIX,
            SIGNATURE_THRESHOLD,
            OWNER,
            ATTESTER_MANAGER,
            PAUSER,
            SEND_RECEIVE_PAUSED,
            MAX_MESSAGE_BODY_SIZE,
            OUTBOUND_NONCE_PREFIX,
            USED_NONCE_PREFIX,
        ] {
            assert!(key.starts_with(NAMESPACE));
        }
    }
}
