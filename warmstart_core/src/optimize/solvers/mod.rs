//! Interfaces to external solver sessions
//!
//! The solve itself is owned by the external solver; this module defines the
//! capability surface the warm-start layer consumes: stable enumeration of
//! named variables and constraints, attribute get/set on each, and a query
//! for whether the program is discrete.
#[cfg(test)]
pub(crate) mod mock;

use thiserror::Error;

/// Attribute kinds a session exposes on its variables and constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Simplex basis status (variables and constraints)
    BasisStatus,
    /// Primal value of a variable
    Value,
    /// Dual value of a constraint
    DualValue,
}

/// Value carried by a session attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    /// A solver-native basis status code
    ///
    /// See [`crate::optimize::warm_start::basis`] for the code convention.
    Basis(i32),
    /// A primal or dual value
    Number(f64),
}

impl AttrValue {
    /// Unwrap as a basis status code
    pub fn basis(self) -> Result<i32, SessionError> {
        match self {
            AttrValue::Basis(code) => Ok(code),
            AttrValue::Number(_) => Err(SessionError::AttrKindMismatch),
        }
    }

    /// Unwrap as a primal or dual value
    pub fn number(self) -> Result<f64, SessionError> {
        match self {
            AttrValue::Number(value) => Ok(value),
            AttrValue::Basis(_) => Err(SessionError::AttrKindMismatch),
        }
    }
}

/// A live session of an external LP/MIP solver
///
/// Implementations wrap one instantiated solver model. The warm-start layer
/// only relies on the guarantees stated here:
///
/// - [`variables`](SolverSession::variables) and
///   [`constraints`](SolverSession::constraints) return the session's
///   primitives in an order that is stable across calls within one session,
///   with names unique per primitive kind.
/// - Basis status attributes use the conventional LP codes: variables
///   `0` = basic, `-1` = nonbasic at lower bound, `-2` = nonbasic at upper
///   bound, `-3` = superbasic; constraints `0` = basic, `-1` = nonbasic.
/// - [`is_discrete_program`](SolverSession::is_discrete_program) reports
///   whether any variable is integer or binary; basis and dual attributes
///   are only meaningful when it returns false.
pub trait SolverSession {
    /// Handle identifying one variable within this session
    type VariableHandle: Copy;
    /// Handle identifying one constraint within this session
    type ConstraintHandle: Copy;

    /// All variables of the session as (name, handle) pairs, in stable order
    fn variables(&self) -> Vec<(String, Self::VariableHandle)>;

    /// All constraints of the session as (name, handle) pairs, in stable order
    fn constraints(&self) -> Vec<(String, Self::ConstraintHandle)>;

    /// Read an attribute of a variable
    fn variable_attr(
        &self,
        handle: Self::VariableHandle,
        kind: AttrKind,
    ) -> Result<AttrValue, SessionError>;

    /// Write an attribute of a variable
    fn set_variable_attr(
        &mut self,
        handle: Self::VariableHandle,
        kind: AttrKind,
        value: AttrValue,
    ) -> Result<(), SessionError>;

    /// Read an attribute of a constraint
    fn constraint_attr(
        &self,
        handle: Self::ConstraintHandle,
        kind: AttrKind,
    ) -> Result<AttrValue, SessionError>;

    /// Write an attribute of a constraint
    fn set_constraint_attr(
        &mut self,
        handle: Self::ConstraintHandle,
        kind: AttrKind,
        value: AttrValue,
    ) -> Result<(), SessionError>;

    /// Whether the program holds integer or binary variables
    fn is_discrete_program(&self) -> bool;
}

/// Errors associated with a solver session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Error when an attribute value does not match the attribute kind
    #[error("Attribute value does not match the requested attribute kind")]
    AttrKindMismatch,
    /// Error when a handle does not belong to this session
    #[error("Unknown variable or constraint handle")]
    UnknownHandle,
    /// Error when the session does not expose the requested attribute
    #[error("Attribute {0:?} is not available on this session")]
    UnsupportedAttr(AttrKind),
    /// Error reported by the underlying solver
    #[error("Solver backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_value_unwrap() {
        assert_eq!(AttrValue::Basis(-2).basis(), Ok(-2));
        assert_eq!(AttrValue::Number(1.5).number(), Ok(1.5));

        if let Err(SessionError::AttrKindMismatch) = AttrValue::Number(0.0).basis() {
        } else {
            panic!("Kind mismatch not caught")
        }
        if let Err(SessionError::AttrKindMismatch) = AttrValue::Basis(0).number() {
        } else {
            panic!("Kind mismatch not caught")
        }
    }
}
