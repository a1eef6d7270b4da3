// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP protocol types and definitions
//!
//! Wire-level pieces of the protocol with no dependency on state: domain
//! identifiers, the message codec and attestation verification.

mod attestation;
mod domain_id;
mod message;

pub use attestation::{verify_attestation, Attestation, SIGNATURE_LENGTH};
pub use domain_id::Domain;
pub use message::{address_to_bytes32, Message};
