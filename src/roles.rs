// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Role records and caller authorization
//!
//! Authorization is a plain equality check between the caller and the address
//! stored for the role. The owner rotates every role, including itself.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TransmitterError};
use crate::events::{AttesterManagerUpdated, OwnerUpdated, PauserUpdated, ProtocolEvent};
use crate::state::{keys, StateExt};
use crate::traits::StateStore;

/// A privileged role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Rotates roles and sets the maximum message body size
    Owner,
    /// Enables/disables attesters and sets the signature threshold
    AttesterManager,
    /// Toggles the send and receive pause switches
    Pauser,
}

impl Role {
    pub const fn key(self) -> &'static [u8] {
        match self {
            Self::Owner => keys::OWNER,
            Self::AttesterManager => keys::ATTESTER_MANAGER,
            Self::Pauser => keys::PAUSER,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::AttesterManager => "attester manager",
            Self::Pauser => "pauser",
        }
    }
}

/// Current holders of every role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub owner: Option<Address>,
    pub attester_manager: Option<Address>,
    pub pauser: Option<Address>,
}

impl Roles {
    pub fn load<S: StateStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self {
            owner: store.role(Role::Owner)?,
            attester_manager: store.role(Role::AttesterManager)?,
            pauser: store.role(Role::Pauser)?,
        })
    }
}

/// Fails unless `caller` holds `role`.
///
/// # Errors
///
/// - [`TransmitterError::NotFound`] if nobody holds the role yet
/// - [`TransmitterError::Unauthorized`] if somebody else does
pub fn require_role<S: StateStore + ?Sized>(store: &S, role: Role, caller: Address) -> Result<()> {
    let holder = store
        .role(role)?
        .ok_or_else(|| TransmitterError::NotFound(format!("{} not set", role.name())))?;

    if holder != caller {
        return Err(TransmitterError::Unauthorized {
            caller,
            role: role.name(),
        });
    }
    Ok(())
}

/// Hands `role` to `new_holder`; owner only.
pub(crate) fn update_role<S: StateStore + ?Sized>(
    store: &mut S,
    caller: Address,
    role: Role,
    new_holder: Address,
) -> Result<ProtocolEvent> {
    require_role(store, Role::Owner, caller)?;

    if new_holder.is_zero() {
        return Err(TransmitterError::InvalidAddress(format!(
            "{} cannot be the zero address",
            role.name()
        )));
    }

    let previous = store.role(role)?.unwrap_or_default();
    store.set_role(role, new_holder)?;

    info!(
        role = role.name(),
        previous = %previous,
        new_holder = %new_holder,
        event = "role_updated"
    );

    Ok(match role {
        Role::Owner => ProtocolEvent::OwnerUpdated(OwnerUpdated {
            previousOwner: previous,
            newOwner: new_holder,
        }),
        Role::AttesterManager => ProtocolEvent::AttesterManagerUpdated(AttesterManagerUpdated {
            previousAttesterManager: previous,
            newAttesterManager: new_holder,
        }),
        Role::Pauser => ProtocolEvent::PauserUpdated(PauserUpdated {
            previousPauser: previous,
            newPauser: new_holder,
        }),
    })
}
