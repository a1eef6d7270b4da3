// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Attestation parsing and m-of-n signature verification
//!
//! An attestation is the concatenation of 65-byte ECDSA signatures
//! (`r | s | v`) over the keccak-256 hash of a message's canonical bytes.
//! There is no length prefix and no separator.

use alloy_primitives::{keccak256, Address, Signature, B256, U256};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{Result, TransmitterError};

/// Length of a single attester signature in bytes
pub const SIGNATURE_LENGTH: usize = 65;

/// Half of the secp256k1 group order; signatures with a larger `s` are malleable
const SECP256K1N_HALF: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// A well-formed attestation borrowed from caller-supplied bytes
#[derive(Debug, Clone, Copy)]
pub struct Attestation<'a> {
    bytes: &'a [u8],
}

impl<'a> Attestation<'a> {
    /// Checks the framing of raw attestation bytes
    ///
    /// # Errors
    ///
    /// [`TransmitterError::MalformedAttestation`] unless the length is a positive
    /// multiple of [`SIGNATURE_LENGTH`].
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % SIGNATURE_LENGTH != 0 {
            return Err(TransmitterError::MalformedAttestation {
                length: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Number of signatures carried
    pub fn signature_count(&self) -> usize {
        self.bytes.len() / SIGNATURE_LENGTH
    }

    /// The raw 65-byte signatures, in attester-chosen order
    pub fn signatures(&self) -> impl Iterator<Item = &'a [u8]> {
        self.bytes.chunks_exact(SIGNATURE_LENGTH)
    }

    /// Recovers every signer, rejecting repeats.
    ///
    /// Signers come back in attestation order.
    pub fn recover_signers(&self, digest: &B256) -> Result<Vec<Address>> {
        let mut seen = BTreeSet::new();
        let mut signers = Vec::with_capacity(self.signature_count());

        for (index, raw) in self.signatures().enumerate() {
            let signer = recover_signer(index, raw, digest)?;
            if !seen.insert(signer) {
                return Err(TransmitterError::DuplicateSignature(signer));
            }
            signers.push(signer);
        }

        Ok(signers)
    }

    /// Verifies this attestation against an attester set and threshold.
    ///
    /// Signers outside `attesters` are skipped. Returns the number of counted
    /// attester signatures on success.
    pub fn verify(
        &self,
        digest: &B256,
        attesters: &BTreeSet<Address>,
        threshold: u32,
    ) -> Result<u32> {
        let signers = self.recover_signers(digest)?;

        let mut counted = 0u32;
        for signer in &signers {
            if attesters.contains(signer) {
                counted += 1;
            } else {
                debug!(
                    signer = %signer,
                    event = "unregistered_signer_skipped"
                );
            }
        }

        if counted < threshold {
            return Err(TransmitterError::InsufficientSignatures { counted, threshold });
        }

        Ok(counted)
    }
}

/// Verifies an attestation over raw message bytes.
///
/// The digest is the keccak-256 of `message` exactly as supplied.
///
/// # Example
///
/// ```rust
/// use cctp_transmitter::{verify_attestation, TransmitterError};
/// use std::collections::BTreeSet;
///
/// let result = verify_attestation(b"message", &[0u8; 64], &BTreeSet::new(), 1);
/// assert!(matches!(result, Err(TransmitterError::MalformedAttestation { length: 64 })));
/// ```
pub fn verify_attestation(
    message: &[u8],
    attestation: &[u8],
    attesters: &BTreeSet<Address>,
    threshold: u32,
) -> Result<()> {
    let digest = keccak256(message);
    Attestation::parse(attestation)?.verify(&digest, attesters, threshold)?;
    Ok(())
}

fn recover_signer(index: usize, raw: &[u8], digest: &B256) -> Result<Address> {
    let invalid = |reason: String| TransmitterError::InvalidSignature { index, reason };

    let v = raw[SIGNATURE_LENGTH - 1];
    if !matches!(v, 0 | 1 | 27 | 28) {
        return Err(invalid(format!("invalid recovery id {v}")));
    }

    let signature = Signature::from_raw(raw).map_err(|e| invalid(e.to_string()))?;
    if signature.s() > U256::from_be_slice(&SECP256K1N_HALF) {
        return Err(invalid("s value is in the upper half of the curve order".to_string()));
    }

    signature
        .recover_address_from_prehash(digest)
        .map_err(|e| invalid(e.to_string()))
}
