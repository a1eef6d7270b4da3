// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Typed protocol notifications
//!
//! Event schemas mirror the MessageTransmitter contract events so that indexers
//! watching EVM domains can decode notifications from this core with the same
//! ABI. Each mutating operation publishes exactly the events listed on it.

use alloy_primitives::LogData;
use alloy_sol_types::{sol, SolEvent};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    event MessageSent(bytes message);

    #[derive(Debug, PartialEq, Eq)]
    event MessageReceived(
        address indexed caller,
        uint32 sourceDomain,
        uint64 indexed nonce,
        bytes32 sender,
        bytes messageBody
    );

    #[derive(Debug, PartialEq, Eq)]
    event AttesterEnabled(address indexed attester);

    #[derive(Debug, PartialEq, Eq)]
    event AttesterDisabled(address indexed attester);

    #[derive(Debug, PartialEq, Eq)]
    event SignatureThresholdUpdated(uint256 oldSignatureThreshold, uint256 newSignatureThreshold);

    #[derive(Debug, PartialEq, Eq)]
    event SendingPaused();

    #[derive(Debug, PartialEq, Eq)]
    event SendingUnpaused();

    #[derive(Debug, PartialEq, Eq)]
    event ReceivingPaused();

    #[derive(Debug, PartialEq, Eq)]
    event ReceivingUnpaused();

    #[derive(Debug, PartialEq, Eq)]
    event OwnerUpdated(address indexed previousOwner, address indexed newOwner);

    #[derive(Debug, PartialEq, Eq)]
    event AttesterManagerUpdated(address indexed previousAttesterManager, address indexed newAttesterManager);

    #[derive(Debug, PartialEq, Eq)]
    event PauserUpdated(address indexed previousPauser, address indexed newPauser);

    #[derive(Debug, PartialEq, Eq)]
    event MaxMessageBodySizeUpdated(uint256 newMaxMessageBodySize);
}

/// Every notification the transmitter can publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    MessageSent(MessageSent),
    MessageReceived(MessageReceived),
    AttesterEnabled(AttesterEnabled),
    AttesterDisabled(AttesterDisabled),
    SignatureThresholdUpdated(SignatureThresholdUpdated),
    SendingPaused(SendingPaused),
    SendingUnpaused(SendingUnpaused),
    ReceivingPaused(ReceivingPaused),
    ReceivingUnpaused(ReceivingUnpaused),
    OwnerUpdated(OwnerUpdated),
    AttesterManagerUpdated(AttesterManagerUpdated),
    PauserUpdated(PauserUpdated),
    MaxMessageBodySizeUpdated(MaxMessageBodySizeUpdated),
}

impl ProtocolEvent {
    /// The Solidity event signature, e.g. `MessageSent(bytes)`
    pub fn signature(&self) -> &'static str {
        match self {
            Self::MessageSent(_) => MessageSent::SIGNATURE,
            Self::MessageReceived(_) => MessageReceived::SIGNATURE,
            Self::AttesterEnabled(_) => AttesterEnabled::SIGNATURE,
            Self::AttesterDisabled(_) => AttesterDisabled::SIGNATURE,
            Self::SignatureThresholdUpdated(_) => SignatureThresholdUpdated::SIGNATURE,
            Self::SendingPaused(_) => SendingPaused::SIGNATURE,
            Self::SendingUnpaused(_) => SendingUnpaused::SIGNATURE,
            Self::ReceivingPaused(_) => ReceivingPaused::SIGNATURE,
            Self::ReceivingUnpaused(_) => ReceivingUnpaused::SIGNATURE,
            Self::OwnerUpdated(_) => OwnerUpdated::SIGNATURE,
            Self::AttesterManagerUpdated(_) => AttesterManagerUpdated::SIGNATURE,
            Self::PauserUpdated(_) => PauserUpdated::SIGNATURE,
            Self::MaxMessageBodySizeUpdated(_) => MaxMessageBodySizeUpdated::SIGNATURE,
        }
    }

    /// ABI-encodes the event as EVM log topics and data
    pub fn to_log_data(&self) -> LogData {
        match self {
            Self::MessageSent(e) => e.encode_log_data(),
            Self::MessageReceived(e) => e.encode_log_data(),
            Self::AttesterEnabled(e) => e.encode_log_data(),
            Self::AttesterDisabled(e) => e.encode_log_data(),
            Self::SignatureThresholdUpdated(e) => e.encode_log_data(),
            Self::SendingPaused(e) => e.encode_log_data(),
            Self::SendingUnpaused(e) => e.encode_log_data(),
            Self::ReceivingPaused(e) => e.encode_log_data(),
            Self::ReceivingUnpaused(e) => e.encode_log_data(),
            Self::OwnerUpdated(e) => e.encode_log_data(),
            Self::AttesterManagerUpdated(e) => e.encode_log_data(),
            Self::PauserUpdated(e) => e.encode_log_data(),
            Self::MaxMessageBodySizeUpdated(e) => e.encode_log_data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256, Bytes, U256};

    #[test]
    fn test_message_sent_topic_matches_contract() {
        let event = ProtocolEvent::MessageSent(MessageSent {
            message: Bytes::from(vec![1, 2, 3]),
        });

        assert_eq!(event.signature(), "MessageSent(bytes)");
        let log = event.to_log_data();
        assert_eq!(log.topics()[0], keccak256(b"MessageSent(bytes)"));

        let decoded = MessageSent::abi_decode_data(&log.data).unwrap();
        assert_eq!(decoded.0, Bytes::from(vec![1, 2, 3]));
    }

    #[test]
    fn test_indexed_attester_is_a_topic() {
        let attester = address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d");
        let log = ProtocolEvent::AttesterDisabled(AttesterDisabled { attester }).to_log_data();

        assert_eq!(log.topics().len(), 2);
        assert_eq!(log.topics()[1], attester.into_word());
        assert!(log.data.is_empty());
    }

    #[test]
    fn test_threshold_event_signature() {
        let event = ProtocolEvent::SignatureThresholdUpdated(SignatureThresholdUpdated {
            oldSignatureThreshold: U256::from(1),
            newSignatureThreshold: U256::from(2),
        });
        insta::assert_snapshot!(event.signature(), @"SignatureThresholdUpdated(uint256,uint256)");
    }
}
