// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock credential stores.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agentgate_core::{CredentialStore, InMemoryCredentialStore, UserRecord};

/// Store wrapper that counts lookups.
///
/// Share it through `Arc` and inspect [`lookups`](Self::lookups) after the
/// code under test has run.
#[derive(Debug)]
pub struct CountingStore {
    inner: InMemoryCredentialStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    /// Wraps a store.
    pub fn new(inner: InMemoryCredentialStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            lookups: AtomicUsize::new(0),
        })
    }

    /// Number of `find_user` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Resets the counter.
    pub fn reset(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }
}

impl CredentialStore for CountingStore {
    fn find_user(&self, username: &str) -> Option<UserRecord> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_user(username)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
