//! Orchestrates warm-start restore and capture around an external solve
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::configuration::WarmStartConfig;
use crate::optimize::solvers::{AttrKind, AttrValue, SolverSession};

use super::basis::{
    decode_constraint_basis, decode_variable_basis, ConstraintBasis, VariableBasis,
};
use super::bundle::{BundleData, WarmStartBundle};
use super::store::StoreError;
use super::{StateKind, WarmStartError};

/// Phases of one warm-started solve
///
/// Restoring and capturing are each optional, but transitions only move
/// forward: a restore (possibly a skip) always completes before the solve is
/// handed off, and capture only begins after the solve has returned. The
/// solve itself belongs to the solver session and never appears here beyond
/// the hand-off phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmStartPhase {
    /// No warm-start work has happened yet
    Idle,
    /// A bundle is being applied to the session
    Restoring,
    /// The session is handed off to the external solve
    Solving,
    /// Post-solve state is being read from the session
    Capturing,
    /// Warm-start work for this solve is finished
    Done,
}

/// Summary of one restore pass
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreReport {
    /// The kind of state the restored bundle held
    pub state_kind: StateKind,
    /// Session variables whose state came from the bundle
    pub matched_variables: usize,
    /// Session constraints whose state came from the bundle
    pub matched_constraints: usize,
    /// Session names absent from the bundle; these received default state
    pub misses: usize,
    /// Time spent applying the bundle
    pub elapsed: Duration,
}

/// Coordinates warm-start state transfer around one solve
///
/// One coordinator instance covers one solve: restore before, capture after.
/// The configuration is passed in explicitly; the coordinator holds no
/// connection to storage or the solver beyond the calls it is handed.
///
/// # Examples
/// ```rust,no_run
/// use warmstart_core::configuration::WarmStartConfigBuilder;
/// use warmstart_core::optimize::warm_start::{StateKind, WarmStartCoordinator};
/// # use warmstart_core::optimize::warm_start::WarmStartError;
/// # fn solve_with<S: warmstart_core::optimize::solvers::SolverSession>(
/// #     session: &mut S,
/// # ) -> Result<(), WarmStartError> {
/// let config = WarmStartConfigBuilder::default()
///     .restore_path(Some("previous.warmstart".into()))
///     .persist_path(Some("next.warmstart".into()))
///     .state_kind(StateKind::BasisStatus)
///     .build()
///     .unwrap();
/// let mut coordinator = WarmStartCoordinator::new(config);
/// coordinator.restore(session)?;
/// // ... run the solve on the session ...
/// coordinator.capture(session)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WarmStartCoordinator {
    /// Caller-owned configuration for this solve
    config: WarmStartConfig,
    /// Current phase of the warm-start state machine
    phase: WarmStartPhase,
}

impl WarmStartCoordinator {
    /// Create a coordinator for one solve
    pub fn new(config: WarmStartConfig) -> Self {
        WarmStartCoordinator {
            config,
            phase: WarmStartPhase::Idle,
        }
    }

    /// The configuration this coordinator was created with
    pub fn config(&self) -> &WarmStartConfig {
        &self.config
    }

    /// The coordinator's current phase
    pub fn phase(&self) -> WarmStartPhase {
        self.phase
    }

    /// Load the configured bundle and apply it to the session
    ///
    /// Returns `Ok(None)` without touching the session when no restore path
    /// is configured, or when the file is missing and
    /// [`tolerate_missing_bundle`](WarmStartConfig::tolerate_missing_bundle)
    /// is set. A missing or corrupt bundle is otherwise fatal: the session
    /// is left untouched so the caller can decide whether to solve cold.
    pub fn restore<S: SolverSession>(
        &mut self,
        session: &mut S,
    ) -> Result<Option<RestoreReport>, WarmStartError> {
        if self.phase != WarmStartPhase::Idle {
            return Err(WarmStartError::InvalidPhase {
                operation: "restore",
                phase: self.phase,
            });
        }
        let Some(path) = self.config.restore_path.clone() else {
            self.phase = WarmStartPhase::Solving;
            return Ok(None);
        };
        self.phase = WarmStartPhase::Restoring;
        let bundle = match WarmStartBundle::load(&path) {
            Ok(bundle) => bundle,
            Err(WarmStartError::BundleNotFound(path)) if self.config.tolerate_missing_bundle => {
                warn!(
                    path = %path.display(),
                    "warm start bundle missing, continuing with a cold start"
                );
                self.phase = WarmStartPhase::Solving;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        self.restore_bundle(session, &bundle).map(Some)
    }

    /// Apply a bundle to the session
    ///
    /// Every variable and constraint name known to the session is looked up
    /// in the matching store: on a hit the value is decoded (for basis
    /// bundles) and written through the session's set-attribute operation; on
    /// a miss the default state is written instead (basic for basis bundles,
    /// `0.0` for value bundles) and the miss is counted. Misses never fail
    /// the restore; if any occurred, one aggregated warning is emitted after
    /// all names have been processed. Bundle names with no session
    /// counterpart are ignored.
    ///
    /// Fails with [`WarmStartError::NotSupportedForDiscreteProgram`], before
    /// any attribute is written, when a basis bundle meets a discrete
    /// program.
    pub fn restore_bundle<S: SolverSession>(
        &mut self,
        session: &mut S,
        bundle: &WarmStartBundle,
    ) -> Result<RestoreReport, WarmStartError> {
        match self.phase {
            WarmStartPhase::Idle | WarmStartPhase::Restoring => {}
            phase => {
                return Err(WarmStartError::InvalidPhase {
                    operation: "restore",
                    phase,
                })
            }
        }
        self.phase = WarmStartPhase::Restoring;

        if bundle.state_kind() == StateKind::BasisStatus && session.is_discrete_program() {
            return Err(WarmStartError::NotSupportedForDiscreteProgram);
        }

        let start = Instant::now();
        let mut misses: usize = 0;
        let mut matched_variables: usize = 0;
        let mut matched_constraints: usize = 0;
        match bundle.data() {
            BundleData::Basis {
                variables,
                constraints,
            } => {
                for (name, handle) in session.variables() {
                    let code = match variables.lookup(&name) {
                        Ok(&byte) => {
                            matched_variables += 1;
                            decode_variable_basis(byte)?
                        }
                        Err(StoreError::NameNotFound(_)) => {
                            misses += 1;
                            VariableBasis::Basic.raw()
                        }
                        Err(e) => return Err(e.into()),
                    };
                    session.set_variable_attr(
                        handle,
                        AttrKind::BasisStatus,
                        AttrValue::Basis(code),
                    )?;
                }
                for (name, handle) in session.constraints() {
                    let code = match constraints.lookup(&name) {
                        Ok(&flag) => {
                            matched_constraints += 1;
                            decode_constraint_basis(flag)
                        }
                        Err(StoreError::NameNotFound(_)) => {
                            misses += 1;
                            ConstraintBasis::Basic.raw()
                        }
                        Err(e) => return Err(e.into()),
                    };
                    session.set_constraint_attr(
                        handle,
                        AttrKind::BasisStatus,
                        AttrValue::Basis(code),
                    )?;
                }
            }
            BundleData::PrimalDual {
                variables,
                constraints,
            } => {
                for (name, handle) in session.variables() {
                    let value = match variables.lookup(&name) {
                        Ok(&value) => {
                            matched_variables += 1;
                            value
                        }
                        Err(StoreError::NameNotFound(_)) => {
                            misses += 1;
                            0.0
                        }
                        Err(e) => return Err(e.into()),
                    };
                    session.set_variable_attr(handle, AttrKind::Value, AttrValue::Number(value))?;
                }
                for (name, handle) in session.constraints() {
                    let value = match constraints.lookup(&name) {
                        Ok(&value) => {
                            matched_constraints += 1;
                            value
                        }
                        Err(StoreError::NameNotFound(_)) => {
                            misses += 1;
                            0.0
                        }
                        Err(e) => return Err(e.into()),
                    };
                    session.set_constraint_attr(
                        handle,
                        AttrKind::DualValue,
                        AttrValue::Number(value),
                    )?;
                }
            }
        }

        if misses > 0 {
            warn!(
                misses,
                "session names were missing from the warm start bundle and received default \
                 state; with many misses, warm starting can be slower than solving cold"
            );
        }

        let report = RestoreReport {
            state_kind: bundle.state_kind(),
            matched_variables,
            matched_constraints,
            misses,
            elapsed: start.elapsed(),
        };
        debug!(
            elapsed = ?report.elapsed,
            matched_variables = report.matched_variables,
            matched_constraints = report.matched_constraints,
            misses = report.misses,
            "applied warm start bundle"
        );
        self.phase = WarmStartPhase::Solving;
        Ok(report)
    }

    /// Read the session's post-solve state and persist it
    ///
    /// Returns `Ok(None)` when no persist path is configured. Otherwise
    /// captures a bundle of the configured state kind, writes it to the
    /// persist path, and returns it. Only valid once the solve hand-off has
    /// happened, that is after [`WarmStartCoordinator::restore`] has run.
    pub fn capture<S: SolverSession>(
        &mut self,
        session: &S,
    ) -> Result<Option<WarmStartBundle>, WarmStartError> {
        if self.phase != WarmStartPhase::Solving {
            return Err(WarmStartError::InvalidPhase {
                operation: "capture",
                phase: self.phase,
            });
        }
        let Some(path) = self.config.persist_path.clone() else {
            self.phase = WarmStartPhase::Done;
            return Ok(None);
        };
        self.phase = WarmStartPhase::Capturing;
        let start = Instant::now();
        let bundle = WarmStartBundle::capture(session, self.config.state_kind)?;
        bundle.persist(&path)?;
        debug!(
            elapsed = ?start.elapsed(),
            variables = bundle.variable_count(),
            constraints = bundle.constraint_count(),
            path = %path.display(),
            "captured and persisted warm start bundle"
        );
        self.phase = WarmStartPhase::Done;
        Ok(Some(bundle))
    }
}
