// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types shared across the kernel.
//!
//! Each variant is one kind of failure. Constructors and decoders return
//! these through [`Result`]; recognisers that simply do not recognise a
//! component return `None` instead.

use strum_macros::{EnumCount as EnumCountMacro, IntoStaticStr};
use thiserror::Error;

/// Errors that can occur anywhere in the kernel.
#[derive(Error, Debug, Clone, PartialEq, Eq, EnumCountMacro, IntoStaticStr)]
pub enum KernelError {
    /// A precondition on input data fails: bad invariant factors,
    /// mismatched matrix dimensions, out-of-range indices.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A decoder was handed bytes that are not a valid encoding.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation needs a structural property that its input lacks.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// A case-by-case routine declines to answer.
    #[error("unsolved case: {0}")]
    UnsolvedCase(String),

    /// A mutation touched a facet held by a lock guard.
    #[error("lock violation: {0}")]
    LockViolation(String),

    /// A long-running enumeration observed a cancellation request.
    #[error("operation cancelled")]
    Cancelled,
}

impl KernelError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        KernelError::InvalidArgument(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        KernelError::InvalidInput(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        KernelError::FailedPrecondition(msg.into())
    }

    /// The kind of this error, as a short static name.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;
