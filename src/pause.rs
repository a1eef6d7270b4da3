// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Send and receive pause switches

use alloy_primitives::Address;
use tracing::info;

use crate::error::{PausedPath, Result, TransmitterError};
use crate::events::{
    ProtocolEvent, ReceivingPaused, ReceivingUnpaused, SendingPaused, SendingUnpaused,
};
use crate::roles::{require_role, Role};
use crate::state::{PauseState, StateExt};
use crate::traits::StateStore;

impl PauseState {
    /// Fails with [`TransmitterError::Paused`] while sending is paused
    pub fn check_send(&self) -> Result<()> {
        if self.send_paused {
            return Err(TransmitterError::Paused(PausedPath::Send));
        }
        Ok(())
    }

    /// Fails with [`TransmitterError::Paused`] while receiving is paused
    pub fn check_receive(&self) -> Result<()> {
        if self.receive_paused {
            return Err(TransmitterError::Paused(PausedPath::Receive));
        }
        Ok(())
    }
}

/// Sets one switch; pauser only. Setting a switch to its current value is allowed.
pub(crate) fn set_paused<S: StateStore + ?Sized>(
    store: &mut S,
    caller: Address,
    path: PausedPath,
    paused: bool,
) -> Result<ProtocolEvent> {
    require_role(store, Role::Pauser, caller)?;

    let mut state = store.pause_state()?;
    match path {
        PausedPath::Send => state.send_paused = paused,
        PausedPath::Receive => state.receive_paused = paused,
    }
    store.set_pause_state(&state)?;

    info!(
        path = %path,
        paused = paused,
        event = "pause_state_updated"
    );

    Ok(match (path, paused) {
        (PausedPath::Send, true) => ProtocolEvent::SendingPaused(SendingPaused {}),
        (PausedPath::Send, false) => ProtocolEvent::SendingUnpaused(SendingUnpaused {}),
        (PausedPath::Receive, true) => ProtocolEvent::ReceivingPaused(ReceivingPaused {}),
        (PausedPath::Receive, false) => ProtocolEvent::ReceivingUnpaused(ReceivingUnpaused {}),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use alloy_primitives::address;
    use rstest::rstest;

    const PAUSER: Address = address!("3000000000000000000000000000000000000003");

    fn store_with_pauser() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.set_role(Role::Pauser, PAUSER).unwrap();
        store
    }

    #[test]
    fn test_default_is_unpaused() {
        let state = PauseState::default();
        assert!(state.check_send().is_ok());
        assert!(state.check_receive().is_ok());
    }

    #[rstest]
    #[case(PausedPath::Send)]
    #[case(PausedPath::Receive)]
    fn test_switches_are_independent(#[case] path: PausedPath) {
        let mut store = store_with_pauser();
        set_paused(&mut store, PAUSER, path, true).unwrap();

        let state = store.pause_state().unwrap();
        let (paused, other) = match path {
            PausedPath::Send => (state.check_send(), state.check_receive()),
            PausedPath::Receive => (state.check_receive(), state.check_send()),
        };
        assert!(matches!(paused, Err(TransmitterError::Paused(p)) if p == path));
        assert!(other.is_ok());

        set_paused(&mut store, PAUSER, path, false).unwrap();
        assert_eq!(store.pause_state().unwrap(), PauseState::default());
    }

    #[test]
    fn test_events() {
        let mut store = store_with_pauser();
        assert_eq!(
            set_paused(&mut store, PAUSER, PausedPath::Receive, true).unwrap(),
            ProtocolEvent::ReceivingPaused(ReceivingPaused {})
        );
        assert_eq!(
            set_paused(&mut store, PAUSER, PausedPath::Send, false).unwrap(),
            ProtocolEvent::SendingUnpaused(SendingUnpaused {})
        );
    }

    #[test]
    fn test_non_pauser_rejected_and_state_unchanged() {
        let mut store = store_with_pauser();
        let stranger = address!("4000000000000000000000000000000000000004");

        let err = set_paused(&mut store, stranger, PausedPath::Send, true).unwrap_err();
        assert!(matches!(err, TransmitterError::Unauthorized { role: "pauser", .. }));
        assert!(!store.pause_state().unwrap().send_paused);
    }
}
