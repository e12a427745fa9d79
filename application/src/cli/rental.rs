//! [`args::Rental`] execution.

use std::fmt;

use common::{Date, Handler as _};
use itertools::Itertools as _;
use service::{
    command,
    domain::{rental, Rental},
    query, read,
};

use crate::{args, AsError, Error, Service};

use super::report;

/// Executes the provided [`args::Rental`] command.
///
/// # Errors
///
/// If the [`Service`] rejects or fails the command.
pub async fn execute(
    service: &Service,
    cmd: args::Rental,
) -> Result<String, Error> {
    use args::Rental as R;

    match cmd {
        R::CreateDaily {
            chair_id,
            renter_id,
            date,
            price,
            status,
        } => report(
            service
                .execute(command::CreateDailyRental {
                    chair_id,
                    renter_id,
                    date,
                    price,
                    payment_status: status,
                })
                .await,
        ),
        R::CreateMonthly {
            chair_id,
            renter_id,
            start,
            end,
            price,
            status,
        } => report(
            service
                .execute(command::CreateMonthlyRental {
                    chair_id,
                    renter_id,
                    start_date: start,
                    end_date: end,
                    price,
                    payment_status: status,
                })
                .await,
        ),
        R::Update {
            id,
            chair_id,
            start,
            end,
            price,
            status,
        } => report(
            service
                .execute(command::UpdateRental {
                    rental_id: id,
                    changes: rental::Changes {
                        chair_id,
                        start_date: start,
                        end_date: end,
                        price,
                        payment_status: status,
                    },
                })
                .await,
        ),
        R::Delete { id } => report(
            service
                .execute(command::DeleteRental::from(id))
                .await,
        ),
        R::Show { id } => service
            .execute(query::rental::ById::by(id))
            .await
            .map_err(AsError::into_error)?
            .map(|r| Row(&r).to_string())
            .ok_or_else(|| {
                Error::not_found(
                    "RENTAL_NOT_EXISTS",
                    &format!("Rental ID {id} does not exist"),
                )
            }),
        R::Upcoming { from } => service
            .execute(query::rental::Upcoming::by(read::rental::Upcoming(
                from.unwrap_or_else(Date::today),
            )))
            .await
            .map_err(AsError::into_error)
            .map(|r| list(&r)),
        R::Completed { before } => service
            .execute(query::rental::Completed::by(read::rental::Completed(
                before.unwrap_or_else(Date::today),
            )))
            .await
            .map_err(AsError::into_error)
            .map(|r| list(&r)),
        R::ByChair { chair_id } => service
            .execute(query::rental::ByChair::by(chair_id))
            .await
            .map_err(AsError::into_error)
            .map(|r| list(&r)),
    }
}

/// Renders the provided [`Rental`]s one per line.
fn list(rentals: &[Rental]) -> String {
    if rentals.is_empty() {
        return "No rentals found".to_owned();
    }
    rentals.iter().map(Row).join("\n")
}

/// Single line rendering of a [`Rental`].
#[derive(Clone, Copy, Debug)]
struct Row<'a>(&'a Rental);

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rental {
            id,
            chair_id,
            renter_id,
            kind,
            payment_status,
            price,
            total_price,
            start_date,
            end_date,
            renter_name,
            renter_phone,
            ..
        } = self.0;

        write!(f, "#{id} chair {chair_id} {kind} {start_date}")?;
        if start_date != end_date {
            write!(f, "..{end_date}")?;
        }
        write!(f, " price {price} total {total_price} {payment_status} ")?;
        match (renter_name, renter_phone) {
            (Some(name), Some(phone)) => write!(f, "{name} ({phone})"),
            _ => write!(f, "renter #{renter_id}"),
        }
    }
}
