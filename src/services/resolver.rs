// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reference resolution against user and team directories.
//!
//! A missing, blank, or malformed identifier is never an error: resolution
//! simply reports `NotFound` and the caller degrades to a placeholder.

use crate::models::{Reference, TeamRecord, UserRecord};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Point lookup by identifier.
pub trait Directory {
    type Record;

    fn lookup(&self, id: &str) -> Option<&Self::Record>;
}

impl<T, S: BuildHasher> Directory for HashMap<String, T, S> {
    type Record = T;

    fn lookup(&self, id: &str) -> Option<&T> {
        self.get(id)
    }
}

/// Records that carry their own document ID.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for UserRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for TeamRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// In-memory directory built from already-loaded records.
///
/// Later records with a duplicate key replace earlier ones.
#[derive(Debug, Clone)]
pub struct MemoryDirectory<T> {
    records: HashMap<String, T>,
}

impl<T> MemoryDirectory<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for MemoryDirectory<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<T: Keyed> FromIterator<T> for MemoryDirectory<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let records = iter
            .into_iter()
            .map(|record| (record.key().to_string(), record))
            .collect();
        Self { records }
    }
}

impl<T> Directory for MemoryDirectory<T> {
    type Record = T;

    fn lookup(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }
}

pub type UserDirectory = MemoryDirectory<UserRecord>;
pub type TeamDirectory = MemoryDirectory<TeamRecord>;

/// Outcome of resolving a loose reference.
#[derive(Debug, PartialEq)]
pub enum Resolved<'a, T> {
    Found(&'a T),
    NotFound,
}

impl<'a, T> Resolved<'a, T> {
    pub fn found(self) -> Option<&'a T> {
        match self {
            Resolved::Found(record) => Some(record),
            Resolved::NotFound => None,
        }
    }
}

/// Firestore document IDs cannot be empty, contain `/`, or be `.`/`..`.
fn is_plausible_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains('/') && id != "." && id != ".."
}

/// Resolve `id` against `directory`.
pub fn resolve<'a, D>(directory: &'a D, id: &str) -> Resolved<'a, D::Record>
where
    D: Directory + ?Sized,
{
    if !is_plausible_id(id) {
        return Resolved::NotFound;
    }

    match directory.lookup(id) {
        Some(record) => Resolved::Found(record),
        None => Resolved::NotFound,
    }
}

impl<T> Reference<T> {
    /// Resolve this reference against `directory`.
    pub fn resolve<'a, D>(&self, directory: &'a D) -> Resolved<'a, T>
    where
        D: Directory<Record = T> + ?Sized,
    {
        resolve(directory, self.as_str())
    }
}
