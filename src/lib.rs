//! # Labrador: Lab Seat Allocation & Problem Distribution
//!
//! Core engine for a hackathon event system: packs teams into lab rooms
//! under per-team-size seating quotas, hands every seated participant a set
//! of candidate problem statements that never clashes with grid-adjacent
//! seats, and drives the refresh/confirmation lifecycle of those offers.
//!
//! Everything here is pure computation over snapshots passed in by the
//! caller; persistence, transport, and auth live outside this crate behind
//! the `store::AssignmentStore` boundary.

/// Seat label parsing and grid-adjacency resolution.
pub mod topology;

/// Greedy first-fit packing of teams into rooms under seating quotas.
pub mod packer;

/// The static problem catalog and uniform sampling over it.
pub mod catalog;

/// Neighbor-aware problem allocation: initial seed, domain-biased offers,
/// and incremental refresh.
pub mod allocator;

/// Per-participant assignment record and its confirmation state machine.
pub mod assignment;

/// Roster input shapes and team grouping.
pub mod roster;

/// The document-store boundary plus the in-memory implementation.
pub mod store;

/// Orchestration façade tying allocator, lifecycle, and store together.
pub mod engine;

/// Engine configuration knobs.
pub mod config;

/// Error taxonomy shared across the crate.
pub mod error;

pub use catalog::{Catalog, Problem};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use roster::SeatedParticipant;
