//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{
    command, error::StorageError, infra::database, Categorize, ErrorKind,
};
use tracerr::{Trace, Traced};

/// CLI [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`ErrorKind`] of this [`Error`].
    pub kind: ErrorKind,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] describing the provided categorized `err`.
    #[must_use]
    pub fn new<E>(code: Code, err: &E) -> Self
    where
        E: Categorize + fmt::Display + ?Sized,
    {
        Self {
            code,
            kind: err.kind(),
            backtrace: None,
            message: err.to_string(),
        }
    }

    /// Creates a new [`ErrorKind::NotFound`] [`Error`].
    #[must_use]
    pub fn not_found(code: Code, msg: &impl ToString) -> Self {
        Self {
            code,
            kind: ErrorKind::NotFound,
            backtrace: None,
            message: msg.to_string(),
        }
    }

    /// Create a new [`Error`] representing an internal failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            kind: ErrorKind::Storage,
            backtrace: None,
            message: msg.to_string(),
        }
    }

    /// Returns the process exit code for this [`Error`].
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Storage => 1,
            ErrorKind::Validation => 3,
            ErrorKind::NotFound => 4,
            ErrorKind::Conflict => 5,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            kind: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().as_error();
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for StorageError {
    fn try_as_error(&self) -> Option<Error> {
        self.is_constraint()
            .then(|| Error::new("CONSTRAINT_VIOLATION", self))
    }
}

impl AsError for command::create_daily_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::ChairNotExists(_) => {
                Some(Error::new("CHAIR_NOT_EXISTS", self))
            }
            Self::Validation(_) => Some(Error::new("INVALID_RENTAL", self)),
            Self::Overlap(_) => Some(Error::new("RENTAL_OVERLAP", self)),
        }
    }
}

impl AsError for command::update_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::NoChanges => Some(Error::new("NO_CHANGES", self)),
            Self::RentalNotExists(_) => {
                Some(Error::new("RENTAL_NOT_EXISTS", self))
            }
            Self::Validation(_) => Some(Error::new("INVALID_RENTAL", self)),
            Self::Overlap(_) => Some(Error::new("RENTAL_OVERLAP", self)),
        }
    }
}

impl AsError for command::delete_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::RentalNotExists(_) => {
                Some(Error::new("RENTAL_NOT_EXISTS", self))
            }
        }
    }
}

impl AsError for command::create_renter::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::PhoneExists(..) | Self::PhoneInUse(_) => {
                Some(Error::new("PHONE_OCCUPIED", self))
            }
        }
    }
}

impl AsError for command::update_renter::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::NoChanges => Some(Error::new("NO_CHANGES", self)),
            Self::RenterNotExists(_) => {
                Some(Error::new("RENTER_NOT_EXISTS", self))
            }
            Self::PhoneInUse(_) => Some(Error::new("PHONE_OCCUPIED", self)),
            Self::NotUpdated(_) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::{create_daily_rental, update_renter},
        domain::{chair, renter},
        error::StorageError,
        ErrorKind,
    };

    use super::{AsError as _, Error};

    #[test]
    fn categorizes_command_errors() {
        let err = create_daily_rental::ExecutionError::ChairNotExists(
            chair::Id::from(3),
        )
        .into_error();

        assert_eq!(err.code, "CHAIR_NOT_EXISTS");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Chair 3 does not exist");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn keeps_storage_messages() {
        let err = create_daily_rental::ExecutionError::Storage(
            StorageError::RenterNotExists,
        )
        .into_error();

        assert_eq!(err.code, "CONSTRAINT_VIOLATION");
        assert_eq!(
            err.message,
            "Error: the given renter does not exist (DB constraint)",
        );
    }

    #[test]
    fn falls_back_to_internal() {
        let err =
            update_renter::ExecutionError::NotUpdated(renter::Id::from(2))
                .into_error();

        assert_eq!(err.code, "INTERNAL_ERROR");
        assert_eq!(err.message, "Could not update renter ID 2");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn displays_code_and_message() {
        let err = Error::not_found("RENTAL_NOT_EXISTS", &"Rental ID 1");

        assert_eq!(err.to_string(), "[RENTAL_NOT_EXISTS]: Rental ID 1");
    }
}
