//! core
//!
//! Core domain types, the constraint graph and the ordered registry.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Location, Fragment
//! - [`graph`] - Constraint graph with cycle detection and stable ordering
//! - [`registry`] - Ordered constraint registry
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Resolution is recomputed from the live entries on every call
//! - Schemas are strict and self-describing
//! - All ordering is deterministic

pub mod config;
pub mod graph;
pub mod registry;
pub mod types;
