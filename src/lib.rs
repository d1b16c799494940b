//! composeweave - Order docker-compose fragments contributed by independent plugins
//!
//! Several contributors (the shared services, a project, the user's own
//! overrides, the current run mode) each add a few arguments to one
//! docker-compose command line. None of them know about each other; each only
//! says where its fragment should go: first, last, or before/after another
//! contributor. composeweave collects these fragments and resolves them into
//! one deterministic order.
//!
//! # Architecture
//!
//! - [`core`] - Location types, the constraint graph and the ordered registry
//! - [`plugins`] - Contributors and the hooks they implement
//! - [`compose`] - Collecting contributions and running the assembled command
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Exactly one live registry entry per contributor key
//! 2. The order is recomputed from the live entries on every resolution
//! 3. The same entries resolve to the same order regardless of the order
//!    contributors ran in, except where registration recency is the tie-break
//! 4. Contradictory locations fail the whole resolution; no partial order is
//!    ever produced

pub mod cli;
pub mod compose;
pub mod core;
pub mod plugins;
pub mod ui;
