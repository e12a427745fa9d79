//! Error categorization of the [`Service`] operations.

use derive_more::{Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::infra::database::{self, constraint};
#[cfg(doc)]
use crate::Service;

/// Category of a failed [`Service`] operation.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Input breaks a domain rule.
    Validation,

    /// Referenced entity doesn't exist.
    NotFound,

    /// Operation clashes with the existing data.
    Conflict,

    /// Storage failed or rejected the operation.
    Storage,
}

/// Categorization of an error into a [`Kind`].
pub trait Categorize {
    /// Returns the [`Kind`] of this error.
    fn kind(&self) -> Kind;
}

impl<E: Categorize> Categorize for Traced<E> {
    fn kind(&self) -> Kind {
        self.as_ref().kind()
    }
}

impl Categorize for database::Error {
    fn kind(&self) -> Kind {
        Kind::Storage
    }
}

/// [`database::Error`] translated into a message for the end user.
///
/// Violations of the known storage constraints are recognized by their
/// names, anything else is reported as is.
#[derive(Debug, Display, Error)]
pub enum StorageError {
    /// Referenced chair doesn't exist.
    #[display(
        "Error: the selected chair does not exist in the system (DB constraint)"
    )]
    ChairNotExists,

    /// Referenced renter doesn't exist.
    #[display("Error: the given renter does not exist (DB constraint)")]
    RenterNotExists,

    /// Rental period ends before it starts.
    #[display("Error: end date must not be before start date (DB constraint)")]
    InvalidPeriod,

    /// Unknown payment status.
    #[display("Error: invalid payment status (DB constraint)")]
    InvalidPaymentStatus,

    /// Unknown rental kind.
    #[display("Error: invalid rental type (DB constraint)")]
    InvalidKind,

    /// Any other [`database::Error`].
    #[display("Database error: {_0}")]
    Other(database::Error),
}

impl StorageError {
    /// Indicates whether this [`StorageError`] is a recognized constraint
    /// violation.
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<database::Error> for StorageError {
    fn from(e: database::Error) -> Self {
        match e.constraint() {
            Some(constraint::RENTALS_CHAIR_ID_FKEY) => Self::ChairNotExists,
            Some(constraint::RENTALS_RENTER_ID_FKEY) => Self::RenterNotExists,
            Some(constraint::RENTALS_PERIOD_CHECK) => Self::InvalidPeriod,
            Some(constraint::RENTALS_PAYMENT_STATUS_CHECK) => {
                Self::InvalidPaymentStatus
            }
            Some(constraint::RENTALS_KIND_CHECK) => Self::InvalidKind,
            Some(_) | None => {
                log::error!("unexpected `Database` failure: {e}");
                Self::Other(e)
            }
        }
    }
}

impl Categorize for StorageError {
    fn kind(&self) -> Kind {
        match self {
            Self::ChairNotExists | Self::RenterNotExists => Kind::NotFound,
            Self::InvalidPeriod
            | Self::InvalidPaymentStatus
            | Self::InvalidKind => Kind::Validation,
            Self::Other(_) => Kind::Storage,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::infra::{
        database::{self, constraint},
        memory,
    };

    use super::{Categorize as _, Kind, StorageError};

    fn violation(name: &'static str) -> StorageError {
        database::Error::from(memory::Error::Constraint(name)).into()
    }

    #[test]
    fn maps_known_constraints() {
        assert_eq!(
            violation(constraint::RENTALS_CHAIR_ID_FKEY).to_string(),
            "Error: the selected chair does not exist in the system \
             (DB constraint)",
        );
        assert_eq!(
            violation(constraint::RENTALS_RENTER_ID_FKEY).to_string(),
            "Error: the given renter does not exist (DB constraint)",
        );
        assert_eq!(
            violation(constraint::RENTALS_PERIOD_CHECK).to_string(),
            "Error: end date must not be before start date (DB constraint)",
        );
        assert_eq!(
            violation(constraint::RENTALS_PAYMENT_STATUS_CHECK).to_string(),
            "Error: invalid payment status (DB constraint)",
        );
        assert_eq!(
            violation(constraint::RENTALS_KIND_CHECK).to_string(),
            "Error: invalid rental type (DB constraint)",
        );
        assert_eq!(
            violation(constraint::RENTALS_CHAIR_ID_FKEY).kind(),
            Kind::NotFound,
        );
    }

    #[test]
    fn falls_back_to_database_error() {
        let e = violation("unknown_check");

        assert!(!e.is_constraint());
        assert_eq!(e.kind(), Kind::Storage);
        assert!(e.to_string().starts_with("Database error: "));

        let e = StorageError::from(database::Error::from(
            memory::Error::Poisoned,
        ));
        assert_eq!(e.to_string(), "Database error: `Memory` state is poisoned");
    }
}
