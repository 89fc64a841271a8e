//! Provides explicit codecs between solver-native basis codes and compact encodings
//!
//! Solvers report simplex basis status as small integer codes. Persisting
//! those codes raw would tie a bundle to one solver's numeric convention, so
//! the wire format stores an explicit enumeration instead: one byte per
//! variable and one flag per constraint. Encoding rejects any code outside
//! the known enumeration rather than passing arbitrary integers through.
//!
//! Raw code convention (the codes a [`SolverSession`] exposes):
//!
//! | status           | variable raw | constraint raw | encoded |
//! |------------------|--------------|----------------|---------|
//! | at lower bound   | -1           |                | 0       |
//! | basic            | 0            | 0              | 1 / false |
//! | at upper bound   | -2           |                | 2       |
//! | superbasic       | -3           |                | 3       |
//! | nonbasic         |              | -1             | true    |
//!
//! [`SolverSession`]: crate::optimize::solvers::SolverSession
use thiserror::Error;

/// Basis status of a variable in a continuous linear program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableBasis {
    /// Nonbasic, held at its lower bound
    AtLowerBound,
    /// In the simplex basis
    Basic,
    /// Nonbasic, held at its upper bound
    AtUpperBound,
    /// Nonbasic but not at a bound
    Superbasic,
}

impl VariableBasis {
    /// Interpret a solver-native basis code
    ///
    /// Fails with [`BasisCodeError::UnsupportedBasisCode`] for any code
    /// outside the four known statuses.
    pub fn from_raw(code: i32) -> Result<Self, BasisCodeError> {
        match code {
            -1 => Ok(VariableBasis::AtLowerBound),
            0 => Ok(VariableBasis::Basic),
            -2 => Ok(VariableBasis::AtUpperBound),
            -3 => Ok(VariableBasis::Superbasic),
            _ => Err(BasisCodeError::UnsupportedBasisCode(code)),
        }
    }

    /// The solver-native code for this status
    pub fn raw(self) -> i32 {
        match self {
            VariableBasis::AtLowerBound => -1,
            VariableBasis::Basic => 0,
            VariableBasis::AtUpperBound => -2,
            VariableBasis::Superbasic => -3,
        }
    }

    /// The compact wire byte for this status
    pub fn encoded(self) -> u8 {
        match self {
            VariableBasis::AtLowerBound => 0,
            VariableBasis::Basic => 1,
            VariableBasis::AtUpperBound => 2,
            VariableBasis::Superbasic => 3,
        }
    }

    /// Interpret a wire byte
    pub fn from_encoded(byte: u8) -> Result<Self, BasisCodeError> {
        match byte {
            0 => Ok(VariableBasis::AtLowerBound),
            1 => Ok(VariableBasis::Basic),
            2 => Ok(VariableBasis::AtUpperBound),
            3 => Ok(VariableBasis::Superbasic),
            _ => Err(BasisCodeError::UnsupportedBasisByte(byte)),
        }
    }
}

/// Basis status of a constraint row
///
/// In practice solvers only report rows as basic or nonbasic, so the wire
/// encoding is a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintBasis {
    /// In the simplex basis
    Basic,
    /// Out of the simplex basis
    Nonbasic,
}

impl ConstraintBasis {
    /// Interpret a solver-native basis code
    pub fn from_raw(code: i32) -> Result<Self, BasisCodeError> {
        match code {
            0 => Ok(ConstraintBasis::Basic),
            -1 => Ok(ConstraintBasis::Nonbasic),
            _ => Err(BasisCodeError::UnsupportedBasisCode(code)),
        }
    }

    /// The solver-native code for this status
    pub fn raw(self) -> i32 {
        match self {
            ConstraintBasis::Basic => 0,
            ConstraintBasis::Nonbasic => -1,
        }
    }

    /// The compact wire flag for this status
    pub fn encoded(self) -> bool {
        match self {
            ConstraintBasis::Basic => false,
            ConstraintBasis::Nonbasic => true,
        }
    }

    /// Interpret a wire flag; total over bool
    pub fn from_encoded(flag: bool) -> Self {
        if flag {
            ConstraintBasis::Nonbasic
        } else {
            ConstraintBasis::Basic
        }
    }
}

/// Encode a solver-native variable basis code into its wire byte
pub fn encode_variable_basis(code: i32) -> Result<u8, BasisCodeError> {
    VariableBasis::from_raw(code).map(VariableBasis::encoded)
}

/// Decode a wire byte back into the solver-native variable basis code
pub fn decode_variable_basis(byte: u8) -> Result<i32, BasisCodeError> {
    VariableBasis::from_encoded(byte).map(VariableBasis::raw)
}

/// Encode a solver-native constraint basis code into its wire flag
pub fn encode_constraint_basis(code: i32) -> Result<bool, BasisCodeError> {
    ConstraintBasis::from_raw(code).map(ConstraintBasis::encoded)
}

/// Decode a wire flag back into the solver-native constraint basis code
pub fn decode_constraint_basis(flag: bool) -> i32 {
    ConstraintBasis::from_encoded(flag).raw()
}

/// Errors associated with the basis codecs
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisCodeError {
    /// Error when a solver reports a basis code outside the known enumeration
    #[error("Unsupported solver basis code {0}")]
    UnsupportedBasisCode(i32),
    /// Error when a persisted basis byte is outside the known enumeration
    #[error("Unsupported encoded basis value {0}")]
    UnsupportedBasisByte(u8),
}
