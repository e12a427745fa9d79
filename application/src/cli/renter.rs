//! [`args::Renter`] execution.

use std::fmt;

use common::Handler as _;
use service::{command, domain, query};

use crate::{args, AsError, Error, Service};

use super::report;

/// Executes the provided [`args::Renter`] command.
///
/// # Errors
///
/// If the [`Service`] rejects or fails the command.
pub async fn execute(
    service: &Service,
    cmd: args::Renter,
) -> Result<String, Error> {
    match cmd {
        args::Renter::Create { name, phone } => report(
            service
                .execute(command::CreateRenter { name, phone })
                .await,
        ),
        args::Renter::Update { id, name, phone } => report(
            service
                .execute(command::UpdateRenter {
                    renter_id: id,
                    changes: domain::renter::Changes { name, phone },
                })
                .await,
        ),
        args::Renter::Show(args::RenterSelector { id, phone }) => {
            let (renter, missing) = match (id, phone) {
                (Some(id), _) => (
                    service.execute(query::renter::ById::by(id)).await,
                    format!("No renter found with ID {id}"),
                ),
                (None, Some(phone)) => {
                    let missing =
                        format!("No renter found with phone number {phone}");
                    (
                        service.execute(query::renter::ByPhone::by(phone)).await,
                        missing,
                    )
                }
                (None, None) => {
                    return Err(Error::internal(&"no renter selector"));
                }
            };
            renter
                .map_err(AsError::into_error)?
                .map(|r| Row(&r).to_string())
                .ok_or_else(|| Error::not_found("RENTER_NOT_EXISTS", &missing))
        }
    }
}

/// Single line rendering of a [`domain::Renter`].
#[derive(Clone, Copy, Debug)]
struct Row<'a>(&'a domain::Renter);

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domain::Renter { id, name, phone } = self.0;
        write!(f, "#{id} {name} ({phone})")
    }
}
