// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loose references between stored records.
//!
//! The document store has no foreign keys: a user's `team_id` or an
//! activity's `user_id` is just a string that may or may not name an
//! existing document. `Reference<T>` keeps the raw string and records what
//! kind of record it is supposed to point at; resolving it is always
//! explicit (see `services::resolver`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A raw identifier that is expected, but not guaranteed, to name a `T`.
pub struct Reference<T> {
    raw: String,
    _target: PhantomData<fn() -> T>,
}

impl<T> Reference<T> {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            _target: PhantomData,
        }
    }

    /// The identifier exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

}

impl<T> Clone for Reference<T> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<T> PartialEq for Reference<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Reference<T> {}

impl<T> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reference").field(&self.raw).finish()
    }
}

impl<T> fmt::Display for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<T> From<&str> for Reference<T> {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<T> From<String> for Reference<T> {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl<T> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de, T> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
