//! Algorithms module for Clock Correlation
//!
//! Contains:
//! - Node graph builder (message map assembly)
//! - Constraint model builder
//! - Degenerate-case resolver

pub mod constraint_model;
pub mod degenerate;
pub mod graph_builder;

pub use constraint_model::build_constraint_model;
pub use degenerate::{pin_isolated_instances, resolve_unidirectional_pairs};
pub use graph_builder::build_messages_map;
