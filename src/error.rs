//! Crate-level convenience error.

use thiserror::Error;

use crate::core::{ApplyError, MutationError};
use crate::store::{ClosedError, WaitError};

/// Thin wrapper over the capability errors; not a "god error".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error(transparent)]
    Closed(#[from] ClosedError),
}
