// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP message format
//!
//! Every cross-domain message is a fixed-layout header followed by an opaque
//! body. The encoding is canonical: attesters sign the keccak-256 hash of these
//! exact bytes, so encode and decode must agree byte for byte.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use bon::Builder;

use super::Domain;
use crate::error::{Result, TransmitterError};

/// A cross-domain message
///
/// # Format
///
/// - version: uint32 (4 bytes)
/// - sourceDomain: uint32 (4 bytes)
/// - destinationDomain: uint32 (4 bytes)
/// - nonce: uint64 (8 bytes)
/// - sender: bytes32 (32 bytes)
/// - recipient: bytes32 (32 bytes)
/// - destinationCaller: bytes32 (32 bytes) - zero means any caller may relay
/// - messageBody: dynamic bytes (remainder)
///
/// Total fixed size: 4 + 4 + 4 + 8 + 32 + 32 + 32 = 116 bytes
///
/// # Example
///
/// ```rust
/// use cctp_transmitter::{Domain, Message};
/// use alloy_primitives::B256;
///
/// let message = Message::builder()
///     .version(0)
///     .source_domain(Domain::NOBLE)
///     .destination_domain(Domain::ETHEREUM)
///     .nonce(7)
///     .sender(B256::repeat_byte(1))
///     .recipient(B256::repeat_byte(2))
///     .message_body(vec![0xde, 0xad])
///     .build();
///
/// let decoded = Message::decode(&message.encode()).unwrap();
/// assert_eq!(decoded, message);
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    version: u32,
    source_domain: Domain,
    destination_domain: Domain,
    nonce: u64,
    sender: B256,
    recipient: B256,
    #[builder(default)]
    destination_caller: B256,
    #[builder(default, into)]
    message_body: Bytes,
}

impl Message {
    /// Size of the fixed header in bytes
    pub const HEADER_SIZE: usize = 116;

    const VERSION_INDEX: usize = 0;
    const SOURCE_DOMAIN_INDEX: usize = 4;
    const DESTINATION_DOMAIN_INDEX: usize = 8;
    const NONCE_INDEX: usize = 12;
    const SENDER_INDEX: usize = 20;
    const RECIPIENT_INDEX: usize = 52;
    const DESTINATION_CALLER_INDEX: usize = 84;

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn source_domain(&self) -> Domain {
        self.source_domain
    }

    pub fn destination_domain(&self) -> Domain {
        self.destination_domain
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn sender(&self) -> &B256 {
        &self.sender
    }

    pub fn recipient(&self) -> &B256 {
        &self.recipient
    }

    pub fn destination_caller(&self) -> &B256 {
        &self.destination_caller
    }

    pub fn message_body(&self) -> &Bytes {
        &self.message_body
    }

    /// Returns true if any caller may relay this message on the destination
    pub fn is_permissionless(&self) -> bool {
        self.destination_caller.is_zero()
    }

    /// Builds the replacement for this message.
    ///
    /// Source domain, destination domain, sender, recipient and nonce carry over;
    /// only the destination caller and body change.
    pub fn replaced_with(&self, destination_caller: B256, message_body: Bytes) -> Self {
        Self {
            destination_caller,
            message_body,
            ..self.clone()
        }
    }

    /// Encodes the message to its canonical byte form
    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::HEADER_SIZE + self.message_body.len());

        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&self.source_domain.to_be_bytes());
        bytes.extend_from_slice(&self.destination_domain.to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes.extend_from_slice(self.sender.as_slice());
        bytes.extend_from_slice(self.recipient.as_slice());
        bytes.extend_from_slice(self.destination_caller.as_slice());
        bytes.extend_from_slice(&self.message_body);

        Bytes::from(bytes)
    }

    /// Decodes a message from bytes
    ///
    /// # Errors
    ///
    /// Returns [`TransmitterError::MalformedMessage`] if the input is shorter
    /// than [`Message::HEADER_SIZE`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(TransmitterError::MalformedMessage {
                reason: format!(
                    "expected at least {} header bytes, got {}",
                    Self::HEADER_SIZE,
                    bytes.len()
                ),
            });
        }

        let word = |at: usize| B256::from_slice(&bytes[at..at + 32]);

        Ok(Self {
            version: read_u32(bytes, Self::VERSION_INDEX),
            source_domain: Domain::new(read_u32(bytes, Self::SOURCE_DOMAIN_INDEX)),
            destination_domain: Domain::new(read_u32(bytes, Self::DESTINATION_DOMAIN_INDEX)),
            nonce: read_u64(bytes, Self::NONCE_INDEX),
            sender: word(Self::SENDER_INDEX),
            recipient: word(Self::RECIPIENT_INDEX),
            destination_caller: word(Self::DESTINATION_CALLER_INDEX),
            message_body: Bytes::copy_from_slice(&bytes[Self::HEADER_SIZE..]),
        })
    }

    /// Keccak-256 of the canonical encoding; the digest attesters sign
    pub fn hash(&self) -> B256 {
        keccak256(self.encode())
    }
}

/// Left-pads a 20-byte address into the 32-byte identifier used in message fields
#[inline]
pub fn address_to_bytes32(address: Address) -> B256 {
    address.into_word()
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    fn sample() -> Message {
        Message::builder()
            .version(0)
            .source_domain(Domain::NOBLE)
            .destination_domain(Domain::ETHEREUM)
            .nonce(5)
            .sender(B256::repeat_byte(0x11))
            .recipient(B256::repeat_byte(0x22))
            .destination_caller(B256::repeat_byte(0x33))
            .message_body(vec![0xca, 0xfe])
            .build()
    }

    #[test]
    fn test_header_size() {
        assert_eq!(Message::HEADER_SIZE, 116);
        assert_eq!(Message::DESTINATION_CALLER_INDEX + 32, Message::HEADER_SIZE);
    }

    #[test]
    fn test_encode_decode() {
        let message = sample();
        let encoded = message.encode();
        assert_eq!(encoded.len(), Message::HEADER_SIZE + 2);

        let decoded = Message::decode(&encoded).expect("should decode");
        assert_eq!(message, decoded);
    }

    #[test]
    fn test_encode_layout() {
        let encoded = sample().encode();
        insta::assert_snapshot!(hex::encode(&encoded[..Message::SENDER_INDEX]), @"0000000000000004000000000000000000000005");
        assert_eq!(&encoded[20..52], &[0x11; 32]);
        assert_eq!(&encoded[52..84], &[0x22; 32]);
        assert_eq!(&encoded[84..116], &[0x33; 32]);
        assert_eq!(&encoded[116..], &[0xca, 0xfe]);
    }

    #[test]
    fn test_empty_body_round_trip() {
        let message = Message::builder()
            .version(1)
            .source_domain(Domain::new(u32::MAX))
            .destination_domain(Domain::BASE)
            .nonce(u64::MAX)
            .sender(B256::ZERO)
            .recipient(B256::repeat_byte(0xff))
            .build();

        let encoded = message.encode();
        assert_eq!(encoded.len(), Message::HEADER_SIZE);
        assert!(message.is_permissionless());
        assert_eq!(Message::decode(&encoded).unwrap(), message);
    }

    #[test]
    fn test_decode_too_short() {
        let encoded = sample().encode();
        let result = Message::decode(&encoded[..Message::HEADER_SIZE - 1]);
        assert!(matches!(
            result.unwrap_err(),
            TransmitterError::MalformedMessage { .. }
        ));
        assert!(Message::decode(&[]).is_err());
    }

    #[test]
    fn test_hash_is_keccak_of_encoding() {
        let message = sample();
        assert_eq!(message.hash(), keccak256(message.encode()));
        assert_ne!(
            message.hash(),
            message
                .replaced_with(B256::ZERO, message.message_body().clone())
                .hash()
        );
    }

    #[test]
    fn test_replaced_with_keeps_identity_fields() {
        let original = sample();
        let replacement = original.replaced_with(B256::ZERO, Bytes::from(vec![1, 2, 3]));

        assert_eq!(replacement.nonce(), original.nonce());
        assert_eq!(replacement.source_domain(), original.source_domain());
        assert_eq!(replacement.destination_domain(), original.destination_domain());
        assert_eq!(replacement.sender(), original.sender());
        assert_eq!(replacement.recipient(), original.recipient());
        assert!(replacement.is_permissionless());
        assert_eq!(&replacement.message_body()[..], &[1, 2, 3]);
    }

    #[test]
    fn test_address_to_bytes32_left_pads() {
        let addr = address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d");
        let word = address_to_bytes32(addr);
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], addr.as_slice());
    }
}
