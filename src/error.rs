// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
use alloy_primitives::Address;
use thiserror::Error;

use crate::protocol::Domain;

/// Which half of the message path a pause switch guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PausedPath {
    Send,
    Receive,
}

impl std::fmt::Display for PausedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Send => f.write_str("sending"),
            Self::Receive => f.write_str("receiving"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TransmitterError {
    #[error("Unauthorized: {caller} is not the {role}")]
    Unauthorized { caller: Address, role: &'static str },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot disable the last attester")]
    LastAttester,

    #[error("Signature threshold violation: {reason}")]
    ThresholdViolation { reason: String },

    #[error("Attester already enabled: {0}")]
    AttesterAlreadyEnabled(Address),

    #[error("Malformed message: {reason}")]
    MalformedMessage { reason: String },

    #[error("Malformed attestation: length {length} is not a positive multiple of 65")]
    MalformedAttestation { length: usize },

    #[error("Invalid signature at index {index}: {reason}")]
    InvalidSignature { index: usize, reason: String },

    #[error("Duplicate signature from attester {0}")]
    DuplicateSignature(Address),

    #[error("Insufficient signatures: {counted} valid attester signatures, {threshold} required")]
    InsufficientSignatures { counted: u32, threshold: u32 },

    #[error("Nonce {nonce} from {source_domain} already used")]
    AlreadyUsed { source_domain: Domain, nonce: u64 },

    #[error("Nonces exhausted for {0}")]
    NonceExhausted(Domain),

    #[error("Paused: {0} messages is disabled")]
    Paused(PausedPath),

    #[error("Unsupported message version: got {actual}, expected {expected}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("Invalid destination domain: got {actual}, expected {expected}")]
    InvalidDestinationDomain { expected: Domain, actual: Domain },

    #[error("Invalid destination caller for this message")]
    InvalidDestinationCaller,

    #[error("Replace not permitted: {reason}")]
    ReplaceNotPermitted { reason: String },

    #[error("Message body too large: {size} bytes exceeds maximum of {max}")]
    MessageBodyTooLarge { size: usize, max: u64 },

    #[error("Message handler rejected message: {0}")]
    HandlerRejected(String),

    #[error("Invalid genesis state: {0}")]
    InvalidGenesis(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransmitterError>;
