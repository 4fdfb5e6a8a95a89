//! First-seen-wins deduplication by username.
//!
//! The search API can return the same user on two pages when the result
//! set shifts between requests. Later copies are dropped silently and the
//! first occurrence's data is kept.

use std::collections::HashSet;

/// Usernames already emitted in this run.
#[derive(Debug, Default)]
pub struct SeenUsers {
    seen: HashSet<String>,
}

impl SeenUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `username` had not been seen before.
    pub fn insert(&mut self, username: &str) -> bool {
        if self.seen.contains(username) {
            return false;
        }
        self.seen.insert(username.to_owned())
    }
}
