//! [`RentalResult`] definitions.

use std::fmt;

use tracerr::Traced;

use crate::domain::rental;
#[cfg(doc)]
use crate::Command;

/// Uniform outcome of a mutating [`Command`].
///
/// Either the ID of the affected entity, or a human-readable message of why
/// nothing was changed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RentalResult<Id = rental::Id> {
    /// Operation succeeded.
    Success(Id),

    /// Operation failed with the message.
    Failure(String),
}

impl<Id, E> From<Result<Id, Traced<E>>> for RentalResult<Id>
where
    E: fmt::Display,
{
    fn from(res: Result<Id, Traced<E>>) -> Self {
        match res {
            Ok(id) => Self::Success(id),
            Err(e) => Self::Failure(e.as_ref().to_string()),
        }
    }
}

impl<Id: fmt::Display> fmt::Display for RentalResult<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(id) => write!(f, "OK (ID: {id})"),
            Self::Failure(msg) => f.write_str(msg),
        }
    }
}
