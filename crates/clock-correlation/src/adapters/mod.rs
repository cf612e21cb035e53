//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits: the `good_lp`-backed solver and the
//! domain classifiers.

pub mod domain_classifier;
pub mod lp_solver;

pub use domain_classifier::{InstanceDomainClassifier, MapDomainClassifier};
pub use lp_solver::GoodLpSolver;
