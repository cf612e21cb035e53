//! # Clock Correlation Subsystem
//!
//! Given logs collected independently from multiple nodes of a distributed
//! system, each with its own unsynchronized local clock, and the messages
//! observed passing between those nodes, compute a per-node time offset
//! ("delta") that makes all observed causal orderings consistent: no message
//! appears to arrive before it was sent. The deltas are good enough for
//! humans to interleave logs from different machines on one timeline.
//!
//! ## Architecture
//!
//! - **Domain**: Core entities (NodeId, InternodeMessage, InternodeMessagesMap,
//!   ConstraintModel) and result types
//! - **Algorithms**: Graph building, constraint model assembly, degenerate-case
//!   resolution
//! - **Ports**: Inbound (ClockCorrelationApi) and Outbound (LpSolver,
//!   DomainClassifier)
//! - **Adapters**: `good_lp`-backed solver, domain classifiers
//! - **Application**: Service orchestration
//!
//! The engine runs once per analysis batch over already-collected logs; a
//! single constant offset per node is assumed sufficient for one session.
//! Log parsing, format detection, rendering, and persistence live in the
//! surrounding subsystems.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{GoodLpSolver, InstanceDomainClassifier, MapDomainClassifier};
pub use application::ClockCorrelationService;
pub use config::CorrelationConfig;
pub use domain::entities::*;
pub use domain::errors::{CorrelationError, SolverError};
pub use domain::value_objects::*;
pub use ports::inbound::{ClockCorrelationApi, CorrelationRequest};
pub use ports::outbound::{DomainClassifier, LpSolver};
