//! Warm-start state caching for repeated solves
//!
//! Re-solving a problem whose structure is stable but whose data shifts
//! between runs wastes the solver's ability to start from a prior solution.
//! This module captures a session's per-variable and per-constraint state
//! after a solve, persists it compactly, and restores it into a later
//! session by matching component names, tolerating mismatched component
//! sets.
//!
//! Flow: [`WarmStartCoordinator::restore`] applies a persisted
//! [`WarmStartBundle`] to the session, the caller runs the (external) solve,
//! then [`WarmStartCoordinator::capture`] reads the resulting state into a
//! new bundle and persists it.
pub mod basis;
pub mod bundle;
pub mod coordinator;
pub mod store;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimize::solvers::SessionError;

use self::basis::BasisCodeError;
use self::store::StoreError;

pub use self::bundle::WarmStartBundle;
pub use self::coordinator::{RestoreReport, WarmStartCoordinator, WarmStartPhase};
pub use self::store::NamedStateStore;

/// Which kind of solver state a bundle holds
///
/// The two kinds are mutually exclusive: a bundle holds either discrete
/// simplex basis statuses or continuous primal/dual values, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Simplex basis statuses; only valid for continuous linear programs
    BasisStatus,
    /// Primal variable values and dual constraint values
    #[default]
    PrimalDual,
}

/// Errors associated with warm-start capture, persistence, and restore
#[derive(Error, Debug)]
pub enum WarmStartError {
    /// Error when the configured restore path does not exist
    #[error("Warm start bundle not found: {}", .0.display())]
    BundleNotFound(PathBuf),
    /// Error when a persisted bundle cannot be decoded
    #[error("Corrupt warm start bundle: {0}")]
    CorruptBundle(String),
    /// Error when a basis-kind restore is requested against a discrete program
    ///
    /// Basis and dual semantics are defined only for continuous linear
    /// programs; warm starting a discrete program is the solver's own
    /// concern.
    #[error("Basis warm starting is not supported for discrete programs")]
    NotSupportedForDiscreteProgram,
    /// Error when a coordinator operation is called out of phase order
    #[error("Warm start {operation} called in phase {phase:?}")]
    InvalidPhase {
        /// The operation that was attempted
        operation: &'static str,
        /// The phase the coordinator was in
        phase: WarmStartPhase,
    },
    /// Error from a state store
    #[error("State store error: {0}")]
    Store(#[from] StoreError),
    /// Error from a basis codec
    #[error("Basis codec error: {0}")]
    BasisCode(#[from] BasisCodeError),
    /// Error from the solver session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    /// Error from the filesystem while accessing a bundle
    #[error("Io error while accessing warm start bundle: {0}")]
    Io(#[from] std::io::Error),
}
