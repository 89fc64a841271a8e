//! Module for interacting with solver sessions and their warm-start state

pub mod solvers;
pub mod warm_start;
