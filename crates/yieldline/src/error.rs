//! Error type for discretisation, persistence and the collapse solve.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Mesh generation failed; fatal for the current call.
    #[error("mesh generation failed: {0}")]
    Mesh(String),

    /// The collapse LP has no feasible mechanism. The outer loop must not
    /// iterate further.
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    /// The LP backend ran out of iterations without reaching optimality.
    #[error("linear program not solved to optimality within {0} iterations")]
    IterationLimit(usize),

    /// The backend was handed a model outside its supported shape.
    #[error("LP backend error: {0}")]
    Backend(String),

    #[error("{path}: {msg}")]
    Parse { path: PathBuf, msg: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
