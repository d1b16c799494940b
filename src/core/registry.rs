//! core::registry
//!
//! The ordered constraint registry.
//!
//! # Overview
//!
//! Contributors register keyed values together with a location literal
//! (`_begin`, `_end`, `>name`, `<name`). Nobody coordinates: each contributor
//! only says where it wants to land relative to the edges or to one other
//! contributor. [`Registry::resolve`] turns the current set of entries into
//! one total order.
//!
//! # Resolution
//!
//! Every call to `resolve` rebuilds a [`ConstraintGraph`] from the live
//! entries:
//!
//! - newer `_begin` entries precede older ones
//! - older `_end` entries precede newer ones
//! - `_begin` entries precede everything else, `_end` entries follow
//!   everything else
//! - `>ref` puts the entry after `ref`, `<ref` before it; references to
//!   keys that are not registered contribute nothing
//!
//! Ties between unconstrained entries are broken by [`Rank`]: first by the
//! kind of location, then by registration sequence.
//!
//! # Invariants
//!
//! - Exactly one live entry per key
//! - Re-registering a key with a different value or location moves it and
//!   gives it a fresh sequence number
//! - Resolution is a pure function of the live entries
//!
//! # Example
//!
//! ```
//! use composeweave::core::registry::Registry;
//!
//! let mut registry = Registry::new();
//! registry.insert("last", "I should be last", "_end").unwrap();
//! registry.insert("first", "I should be first", "_begin").unwrap();
//! registry.insert("mid", "in between", ">first").unwrap();
//!
//! let order = registry.resolve().unwrap();
//! assert_eq!(order.first(), Some(&"I should be first"));
//! assert_eq!(order.last(), Some(&"I should be last"));
//! assert_eq!(order[1], "in between");
//! ```

use std::collections::HashMap;
use std::ops::Index;

use thiserror::Error;
use tracing::debug;

use super::graph::ConstraintGraph;
use super::types::Location;

/// Errors from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("'{key}' is already registered with the same value and location")]
    DuplicateRegistration { key: String },

    #[error("'{key}' is not registered")]
    NotFound { key: String },

    #[error("ordering constraints cannot be satisfied: cycle through {}", .cycle.join(" -> "))]
    UnsatisfiableOrdering { cycle: Vec<String> },

    #[error("'{key}' has invalid location '{location}'")]
    InvalidLocation { key: String, location: String },
}

/// Position class used to break ties between entries that the graph leaves
/// unordered.
///
/// `After` entries lean towards the entry they follow, `Before` entries
/// towards the entry they precede.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gravity {
    Front,
    Leading,
    Trailing,
    Back,
}

impl Gravity {
    fn of(location: &Location) -> Self {
        match location {
            Location::Begin => Gravity::Front,
            Location::After(_) => Gravity::Leading,
            Location::Before(_) => Gravity::Trailing,
            Location::End => Gravity::Back,
        }
    }
}

/// Tie-break priority of an entry during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank {
    pub gravity: Gravity,
    pub sequence: u64,
}

/// One contributor's registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    pub value: V,
    /// Location literal as given; parsed only at resolution time.
    pub location: String,
    pub sequence: u64,
}

/// Keyed values with positional constraints.
#[derive(Debug, Clone)]
pub struct Registry<V> {
    entries: HashMap<String, Entry<V>>,
    next_sequence: u64,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_sequence: 0,
        }
    }
}

impl<V> Registry<V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The live value registered under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// The live entry registered under `key`.
    pub fn entry(&self, key: &str) -> Option<&Entry<V>> {
        self.entries.get(key)
    }

    /// Remove the entry registered under `key`, returning its value.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no such entry exists.
    pub fn remove(&mut self, key: &str) -> Result<V, RegistryError> {
        let entry = self
            .entries
            .remove(key)
            .ok_or_else(|| RegistryError::NotFound {
                key: key.to_string(),
            })?;
        debug!(key, "removed registry entry");
        Ok(entry.value)
    }

    /// Resolve the live entries into one total order.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InvalidLocation` if any entry's location literal is
    ///   not one of the recognized forms
    /// - `RegistryError::UnsatisfiableOrdering` if the constraints form a
    ///   cycle
    pub fn resolve(&self) -> Result<Resolved<'_, V>, RegistryError> {
        let graph = self.build_graph()?;
        let keys = graph
            .topological_order()
            .map_err(|cycle| RegistryError::UnsatisfiableOrdering { cycle })?;

        debug!(entries = keys.len(), edges = graph.edge_count(), "resolved registry order");

        let items = keys
            .into_iter()
            .filter_map(|key| {
                let (key, entry) = self.entries.get_key_value(key.as_str())?;
                Some((key.as_str(), &entry.value))
            })
            .collect();
        Ok(Resolved { items })
    }

    /// Build the constraint graph for the current entries.
    fn build_graph(&self) -> Result<ConstraintGraph<Rank>, RegistryError> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.sequence);

        let parsed: Vec<(&str, Location, u64)> = entries
            .into_iter()
            .map(|(key, entry)| {
                Location::parse(&entry.location)
                    .map(|loc| (key.as_str(), loc, entry.sequence))
                    .map_err(|_| RegistryError::InvalidLocation {
                        key: key.clone(),
                        location: entry.location.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        let mut graph = ConstraintGraph::new();
        for (key, location, sequence) in &parsed {
            graph.add_node(
                *key,
                Rank {
                    gravity: Gravity::of(location),
                    sequence: *sequence,
                },
            );
        }

        let begins: Vec<_> = parsed
            .iter()
            .filter(|(_, loc, _)| *loc == Location::Begin)
            .collect();
        let ends: Vec<_> = parsed
            .iter()
            .filter(|(_, loc, _)| *loc == Location::End)
            .collect();

        // Sorted by sequence, so a later index is a newer registration.
        for (i, (older, _, _)) in begins.iter().enumerate() {
            for (newer, _, _) in &begins[i + 1..] {
                graph.add_edge(newer, older);
            }
        }
        for (i, (older, _, _)) in ends.iter().enumerate() {
            for (newer, _, _) in &ends[i + 1..] {
                graph.add_edge(older, newer);
            }
        }

        for (key, location, _) in &parsed {
            match location {
                Location::Begin | Location::End => {}
                Location::After(reference) => {
                    if !graph.add_edge(reference, key) {
                        debug!(key = *key, reference = reference.as_str(), "dangling reference");
                    }
                }
                Location::Before(reference) => {
                    if !graph.add_edge(key, reference) {
                        debug!(key = *key, reference = reference.as_str(), "dangling reference");
                    }
                }
            }
            if *location != Location::Begin {
                for (begin, _, _) in &begins {
                    graph.add_edge(begin, key);
                }
            }
            if *location != Location::End {
                for (end, _, _) in &ends {
                    graph.add_edge(key, end);
                }
            }
        }

        Ok(graph)
    }
}

impl<V: PartialEq> Registry<V> {
    /// Register `value` under `key` at `location`.
    ///
    /// Re-registering an existing key with a different value or location
    /// moves the entry and gives it a new sequence number. References in
    /// relative locations are not checked, and neither is the location
    /// literal itself; both are only examined by [`Registry::resolve`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateRegistration` if `key` is already
    /// registered with exactly this value and location.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: V,
        location: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        let location = location.into();

        if let Some(existing) = self.entries.get(&key) {
            if existing.value == value && existing.location == location {
                return Err(RegistryError::DuplicateRegistration { key });
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(key = key.as_str(), location = location.as_str(), sequence, "registered entry");
        self.entries.insert(
            key,
            Entry {
                value,
                location,
                sequence,
            },
        );
        Ok(())
    }

    /// Register every `(key, value, location)` triple in order.
    ///
    /// Stops at the first error; triples before it stay registered.
    pub fn insert_all<I, K, L>(&mut self, items: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (K, V, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        for (key, value, location) in items {
            self.insert(key, value, location)?;
        }
        Ok(())
    }
}

/// A resolved order over the registry's values.
///
/// Borrowed from the registry: it reflects the entries at the time of the
/// call and the registry cannot change while it is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'a, V> {
    items: Vec<(&'a str, &'a V)>,
}

impl<'a, V> Resolved<'a, V> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The value at `index` in the resolved order.
    pub fn get(&self, index: usize) -> Option<&'a V> {
        self.items.get(index).map(|(_, v)| *v)
    }

    pub fn first(&self) -> Option<&'a V> {
        self.items.first().map(|(_, v)| *v)
    }

    pub fn last(&self) -> Option<&'a V> {
        self.items.last().map(|(_, v)| *v)
    }

    /// Position of `key` in the resolved order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|(k, _)| *k == key)
    }

    /// Values in resolved order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a V> + '_ {
        self.items.iter().map(|(_, v)| *v)
    }

    /// Keys in resolved order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &'a str> + '_ {
        self.items.iter().map(|(k, _)| *k)
    }

    /// `(key, value)` pairs in resolved order.
    pub fn iter_entries(&self) -> impl ExactSizeIterator<Item = (&'a str, &'a V)> + '_ {
        self.items.iter().copied()
    }

    /// Values in resolved order.
    pub fn into_values(self) -> Vec<&'a V> {
        self.items.into_iter().map(|(_, v)| v).collect()
    }
}

impl<V: Clone> Resolved<'_, V> {
    /// Owned copies of the values in resolved order.
    pub fn to_vec(&self) -> Vec<V> {
        self.iter().cloned().collect()
    }
}

impl<V> Index<usize> for Resolved<'_, V> {
    type Output = V;

    fn index(&self, index: usize) -> &V {
        self.items[index].1
    }
}

impl<'a, V> IntoIterator for Resolved<'a, V> {
    type Item = &'a V;
    type IntoIter = std::vec::IntoIter<&'a V>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_values().into_iter()
    }
}

impl<'r, 'a, V> IntoIterator for &'r Resolved<'a, V> {
    type Item = &'a V;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'r, (&'a str, &'a V)>,
        fn(&(&'a str, &'a V)) -> &'a V,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let value: fn(&(&'a str, &'a V)) -> &'a V = |(_, v)| *v;
        self.items.iter().map(value)
    }
}
