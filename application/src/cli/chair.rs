//! [`args::Chair`] execution.

use common::Handler as _;
use service::query;

use crate::{args, AsError, Error, Service};

/// Executes the provided [`args::Chair`] command.
///
/// # Errors
///
/// If the chair doesn't exist, or the storage fails.
pub async fn execute(
    service: &Service,
    cmd: args::Chair,
) -> Result<String, Error> {
    match cmd {
        args::Chair::Check { id } => service
            .execute(query::chair::ById::by(id))
            .await
            .map_err(AsError::into_error)?
            .map(|_| format!("Chair {id} exists"))
            .ok_or_else(|| {
                Error::not_found(
                    "CHAIR_NOT_EXISTS",
                    &format!("Chair {id} does not exist"),
                )
            }),
    }
}
