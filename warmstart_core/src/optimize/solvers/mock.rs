//! In-memory solver session used by the warm-start tests
use indexmap::IndexMap;

use super::{AttrKind, AttrValue, SessionError, SolverSession};

/// Attribute table for one mock variable or constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MockAttrs {
    pub basis: i32,
    pub value: f64,
    pub dual: f64,
}

impl Default for MockAttrs {
    fn default() -> Self {
        MockAttrs {
            basis: 0,
            value: 0.0,
            dual: 0.0,
        }
    }
}

/// A solver session backed by plain attribute tables
///
/// Handles are positions into the insertion-ordered tables, so enumeration
/// order is stable as the trait requires. Variables expose `BasisStatus` and
/// `Value`; constraints expose `BasisStatus` and `DualValue`.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockSession {
    discrete: bool,
    variables: IndexMap<String, MockAttrs>,
    constraints: IndexMap<String, MockAttrs>,
}

impl MockSession {
    /// Create a continuous-program session with default attributes
    pub fn continuous(variables: &[&str], constraints: &[&str]) -> Self {
        Self::with_discrete(variables, constraints, false)
    }

    /// Create a discrete-program session with default attributes
    pub fn discrete(variables: &[&str], constraints: &[&str]) -> Self {
        Self::with_discrete(variables, constraints, true)
    }

    fn with_discrete(variables: &[&str], constraints: &[&str], discrete: bool) -> Self {
        MockSession {
            discrete,
            variables: variables
                .iter()
                .map(|name| (name.to_string(), MockAttrs::default()))
                .collect(),
            constraints: constraints
                .iter()
                .map(|name| (name.to_string(), MockAttrs::default()))
                .collect(),
        }
    }

    pub fn set_variable_basis(&mut self, name: &str, code: i32) {
        self.variables[name].basis = code;
    }

    pub fn set_variable_value(&mut self, name: &str, value: f64) {
        self.variables[name].value = value;
    }

    pub fn set_constraint_basis(&mut self, name: &str, code: i32) {
        self.constraints[name].basis = code;
    }

    pub fn set_constraint_dual(&mut self, name: &str, value: f64) {
        self.constraints[name].dual = value;
    }

    /// Current attributes of a variable, by name
    pub fn variable(&self, name: &str) -> MockAttrs {
        self.variables[name]
    }

    /// Current attributes of a constraint, by name
    pub fn constraint(&self, name: &str) -> MockAttrs {
        self.constraints[name]
    }
}

impl SolverSession for MockSession {
    type VariableHandle = usize;
    type ConstraintHandle = usize;

    fn variables(&self) -> Vec<(String, usize)> {
        self.variables
            .keys()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect()
    }

    fn constraints(&self) -> Vec<(String, usize)> {
        self.constraints
            .keys()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect()
    }

    fn variable_attr(&self, handle: usize, kind: AttrKind) -> Result<AttrValue, SessionError> {
        let (_, attrs) = self
            .variables
            .get_index(handle)
            .ok_or(SessionError::UnknownHandle)?;
        match kind {
            AttrKind::BasisStatus => Ok(AttrValue::Basis(attrs.basis)),
            AttrKind::Value => Ok(AttrValue::Number(attrs.value)),
            AttrKind::DualValue => Err(SessionError::UnsupportedAttr(kind)),
        }
    }

    fn set_variable_attr(
        &mut self,
        handle: usize,
        kind: AttrKind,
        value: AttrValue,
    ) -> Result<(), SessionError> {
        let (_, attrs) = self
            .variables
            .get_index_mut(handle)
            .ok_or(SessionError::UnknownHandle)?;
        match kind {
            AttrKind::BasisStatus => attrs.basis = value.basis()?,
            AttrKind::Value => attrs.value = value.number()?,
            AttrKind::DualValue => return Err(SessionError::UnsupportedAttr(kind)),
        }
        Ok(())
    }

    fn constraint_attr(&self, handle: usize, kind: AttrKind) -> Result<AttrValue, SessionError> {
        let (_, attrs) = self
            .constraints
            .get_index(handle)
            .ok_or(SessionError::UnknownHandle)?;
        match kind {
            AttrKind::BasisStatus => Ok(AttrValue::Basis(attrs.basis)),
            AttrKind::DualValue => Ok(AttrValue::Number(attrs.dual)),
            AttrKind::Value => Err(SessionError::UnsupportedAttr(kind)),
        }
    }

    fn set_constraint_attr(
        &mut self,
        handle: usize,
        kind: AttrKind,
        value: AttrValue,
    ) -> Result<(), SessionError> {
        let (_, attrs) = self
            .constraints
            .get_index_mut(handle)
            .ok_or(SessionError::UnknownHandle)?;
        match kind {
            AttrKind::BasisStatus => attrs.basis = value.basis()?,
            AttrKind::DualValue => attrs.dual = value.number()?,
            AttrKind::Value => return Err(SessionError::UnsupportedAttr(kind)),
        }
        Ok(())
    }

    fn is_discrete_program(&self) -> bool {
        self.discrete
    }
}
