// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Write buffering over a [`StateStore`]
//!
//! Every transmitter operation runs against a [`PendingWrites`] overlay. Reads
//! see the operation's own writes; nothing reaches the underlying store until
//! [`PendingWrites::commit`], so a failing operation leaves state untouched
//! even when the host does not roll back for us.

use std::collections::BTreeMap;

use crate::traits::StateStore;

/// A buffered mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put(Vec<u8>),
    Delete,
}

/// Overlay that buffers writes until committed
pub struct PendingWrites<'s, S: StateStore + ?Sized> {
    inner: &'s mut S,
    writes: BTreeMap<Vec<u8>, BatchOp>,
}

impl<'s, S: StateStore + ?Sized> PendingWrites<'s, S> {
    pub fn new(inner: &'s mut S) -> Self {
        Self {
            inner,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered mutations
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Applies every buffered write to the underlying store, in key order.
    pub fn commit(self) -> usize {
        let count = self.writes.len();
        for (key, op) in self.writes {
            match op {
                BatchOp::Put(value) => self.inner.set(&key, value),
                BatchOp::Delete => self.inner.delete(&key),
            }
        }
        count
    }
}

impl<S: StateStore + ?Sized> StateStore for PendingWrites<'_, S> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(BatchOp::Put(value)) => Some(value.clone()),
            Some(BatchOp::Delete) => None,
            None => self.inner.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), BatchOp::Put(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), BatchOp::Delete);
    }

    fn prefix_iterator<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self.inner.prefix_iterator(prefix).collect();

        for (key, op) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match op {
                BatchOp::Put(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                BatchOp::Delete => {
                    merged.remove(key);
                }
            }
        }

        Box::new(merged.into_iter())
    }
}
