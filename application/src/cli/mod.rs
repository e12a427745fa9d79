//! Execution of the parsed [`args::Command`]s.

pub mod chair;
pub mod rental;
pub mod renter;

use std::fmt;

use service::RentalResult;
use tracerr::Traced;

use crate::{args, AsError, Error, Service};

/// Executes the provided [`args::Command`] on the [`Service`].
///
/// Returns the output to be printed on success.
///
/// # Errors
///
/// If the [`Service`] rejects or fails the [`args::Command`].
#[tracing::instrument(skip(service))]
pub async fn execute(
    service: &Service,
    cmd: args::Command,
) -> Result<String, Error> {
    match cmd {
        args::Command::Rental(cmd) => rental::execute(service, cmd).await,
        args::Command::Renter(cmd) => renter::execute(service, cmd).await,
        args::Command::Chair(cmd) => chair::execute(service, cmd).await,
    }
}

/// Renders the outcome of a mutating command as a [`RentalResult`].
///
/// # Errors
///
/// With the categorized [`Error`] of a failed command, carrying the
/// [`RentalResult::Failure`] message.
pub fn report<Id, E>(res: Result<Id, Traced<E>>) -> Result<String, Error>
where
    Id: fmt::Display,
    E: AsError + fmt::Display,
{
    let error = res.as_ref().err().map(AsError::as_error);
    match (RentalResult::from(res), error) {
        (outcome, None) => Ok(outcome.to_string()),
        (outcome, Some(error)) => Err(Error {
            message: outcome.to_string(),
            ..error
        }),
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::{create_daily_rental, update_rental},
        domain::{rental, renter},
        ErrorKind,
    };
    use tracerr::Traced;

    use super::report;

    #[test]
    fn reports_success_with_id() {
        let res = Ok::<_, Traced<create_daily_rental::ExecutionError>>(
            rental::Id::from(12),
        );

        assert_eq!(report(res).unwrap(), "OK (ID: 12)");
    }

    #[test]
    fn reports_failure_message_with_category() {
        let res = Err::<rental::Id, _>(tracerr::new!(
            create_daily_rental::ExecutionError::Overlap(rental::Id::from(3))
        ));

        let err = report(res).unwrap_err();

        assert_eq!(err.code, "RENTAL_OVERLAP");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.exit_code(), 5);
        assert!(err.backtrace.is_some());
        assert_eq!(err.message, "Overlap with existing booking");
    }

    #[test]
    fn reports_validation_failure() {
        let res = Err::<renter::Id, _>(tracerr::new!(
            update_rental::ExecutionError::NoChanges
        ));

        let err = report(res).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.message, "No changes selected");
    }
}
