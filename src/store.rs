// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user store.
//!
//! Stands in for the application's persistence layer. Lookups are by
//! primary key; a numeric string key matches the same record as the integer,
//! the way a SQL primary-key lookup would coerce it.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::auth::{IdentityKey, IdentityStore};
use crate::models::User;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<i64, User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> Option<User> {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(user.id, user)
    }

    pub fn remove_user(&self, id: i64) -> Option<User> {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id)
    }

    pub fn len(&self) -> usize {
        self.users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for InMemoryStore {
    type Identity = User;

    fn find_one(&self, key: &IdentityKey) -> Option<User> {
        let id = match key {
            IdentityKey::Int(id) => *id,
            IdentityKey::Str(raw) => raw.parse().ok()?,
        };

        self.users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
    }
}
