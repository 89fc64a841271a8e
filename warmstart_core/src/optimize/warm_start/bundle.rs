//! Provides the unit of captured warm-start state
use std::path::Path;

use crate::io::bundle::{load_bundle, persist_bundle};
use crate::optimize::solvers::{AttrKind, SolverSession};

use super::basis::{encode_constraint_basis, encode_variable_basis};
use super::store::NamedStateStore;
use super::{StateKind, WarmStartError};

/// The state stores of a bundle, one layout per state kind
#[derive(Debug, Clone, PartialEq)]
pub enum BundleData {
    /// Simplex basis statuses, in their compact encodings
    Basis {
        /// Encoded basis status per variable, see [`super::basis`]
        variables: NamedStateStore<u8>,
        /// Encoded basis status per constraint
        constraints: NamedStateStore<bool>,
    },
    /// Continuous solution values
    PrimalDual {
        /// Primal value per variable
        variables: NamedStateStore<f64>,
        /// Dual value per constraint
        constraints: NamedStateStore<f64>,
    },
}

/// A captured unit of warm-start state
///
/// Pairs a variable store and a constraint store with the kind of state they
/// hold. Created atomically by [`WarmStartBundle::capture`] after a solve
/// completes and immutable afterwards; persisted at most once and loaded at
/// most once per restore.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmStartBundle {
    data: BundleData,
}

impl WarmStartBundle {
    /// Wrap already-decoded bundle data; used by the wire format reader
    pub(crate) fn from_data(data: BundleData) -> Self {
        WarmStartBundle { data }
    }

    /// The state stores of this bundle
    pub fn data(&self) -> &BundleData {
        &self.data
    }

    /// Which kind of state this bundle holds
    pub fn state_kind(&self) -> StateKind {
        match self.data {
            BundleData::Basis { .. } => StateKind::BasisStatus,
            BundleData::PrimalDual { .. } => StateKind::PrimalDual,
        }
    }

    /// Number of variable entries in the bundle
    pub fn variable_count(&self) -> usize {
        match &self.data {
            BundleData::Basis { variables, .. } => variables.len(),
            BundleData::PrimalDual { variables, .. } => variables.len(),
        }
    }

    /// Number of constraint entries in the bundle
    pub fn constraint_count(&self) -> usize {
        match &self.data {
            BundleData::Basis { constraints, .. } => constraints.len(),
            BundleData::PrimalDual { constraints, .. } => constraints.len(),
        }
    }

    /// Read the session's post-solve state into a new bundle
    ///
    /// Enumerates the session's variables and constraints in their stable
    /// order and reads the attribute selected by `kind` for each. Basis
    /// codes go through the codecs, so a solver reporting a code outside the
    /// known enumeration aborts the capture instead of producing silently
    /// wrong data. Call this once per solve, after the solve has returned.
    pub fn capture<S: SolverSession>(
        session: &S,
        kind: StateKind,
    ) -> Result<WarmStartBundle, WarmStartError> {
        let session_variables = session.variables();
        let session_constraints = session.constraints();
        let data = match kind {
            StateKind::BasisStatus => {
                let mut variables = NamedStateStore::with_capacity(session_variables.len());
                for (name, handle) in session_variables {
                    let code = session.variable_attr(handle, AttrKind::BasisStatus)?.basis()?;
                    variables.append(name, encode_variable_basis(code)?)?;
                }
                let mut constraints = NamedStateStore::with_capacity(session_constraints.len());
                for (name, handle) in session_constraints {
                    let code = session
                        .constraint_attr(handle, AttrKind::BasisStatus)?
                        .basis()?;
                    constraints.append(name, encode_constraint_basis(code)?)?;
                }
                BundleData::Basis {
                    variables,
                    constraints,
                }
            }
            StateKind::PrimalDual => {
                let mut variables = NamedStateStore::with_capacity(session_variables.len());
                for (name, handle) in session_variables {
                    let value = session.variable_attr(handle, AttrKind::Value)?.number()?;
                    variables.append(name, value)?;
                }
                let mut constraints = NamedStateStore::with_capacity(session_constraints.len());
                for (name, handle) in session_constraints {
                    let value = session
                        .constraint_attr(handle, AttrKind::DualValue)?
                        .number()?;
                    constraints.append(name, value)?;
                }
                BundleData::PrimalDual {
                    variables,
                    constraints,
                }
            }
        };
        Ok(WarmStartBundle { data })
    }

    /// Serialize this bundle to `path` in the binary wire format
    ///
    /// See [`crate::io::bundle`] for the format. The file is written by this
    /// single writer; concurrent access to the same path is not guarded.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<(), WarmStartError> {
        persist_bundle(path.as_ref(), self)
    }

    /// Deserialize a bundle from `path`
    ///
    /// Fails with [`WarmStartError::BundleNotFound`] if the file does not
    /// exist and [`WarmStartError::CorruptBundle`] if it cannot be decoded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<WarmStartBundle, WarmStartError> {
        load_bundle(path.as_ref())
    }
}
