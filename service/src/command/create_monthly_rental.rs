//! [`Command`] for creating a new [`rental::Kind::Monthly`] [`Rental`].

use common::{
    operations::{By, Insert, Select},
    Date, Money,
};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{Rental, Renter};
use crate::{
    domain::{
        chair,
        rental::{self, validation},
        renter, Chair,
    },
    infra::{database, Database},
    read, Service,
};

use super::{create_daily_rental, Command};

/// [`Command`] for creating a new [`rental::Kind::Monthly`] [`Rental`].
#[derive(Clone, Copy, Debug)]
pub struct CreateMonthlyRental {
    /// ID of the [`Chair`] to rent.
    pub chair_id: chair::Id,

    /// ID of the [`Renter`] renting the [`Chair`].
    pub renter_id: renter::Id,

    /// First day of the [`Rental`].
    pub start_date: Date,

    /// Last day of the [`Rental`].
    pub end_date: Date,

    /// Price of a single month.
    pub price: Money,

    /// Initial [`rental::PaymentStatus`].
    pub payment_status: rental::PaymentStatus,
}

impl<Db> Command<CreateMonthlyRental> for Service<Db>
where
    Db: Database<
            Select<By<Option<Chair>, chair::Id>>,
            Ok = Option<Chair>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<rental::Id>, read::rental::Overlap>>,
            Ok = Option<rental::Id>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<rental::Draft>,
            Ok = rental::Id,
            Err = Traced<database::Error>,
        >,
{
    type Ok = rental::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMonthlyRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMonthlyRental {
            chair_id,
            renter_id,
            start_date,
            end_date,
            price,
            payment_status,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Chair>, _>::new(chair_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ChairNotExists(chair_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let draft = rental::Draft::monthly(
            chair_id,
            renter_id,
            start_date,
            end_date,
            price,
            payment_status,
        );

        // Period is checked before the price.
        validation::validate_date_order(
            rental::Kind::Monthly,
            start_date,
            end_date,
        )
        .and_then(|()| validation::validate_price(rental::Kind::Monthly, price))
        .and_then(|()| validation::validate_total_price(draft.total_price))
        .inspect_err(|e| log::debug!("monthly `Rental` rejected: {e}"))
        .map_err(tracerr::from_and_wrap!(=> E))?;

        if self.config().check_overlap_on_creation {
            let overlap = self
                .database()
                .execute(Select(By::<Option<rental::Id>, _>::new(
                    read::rental::Overlap {
                        chair_id,
                        start: start_date,
                        end: end_date,
                        excluding: None,
                    },
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(other) = overlap {
                log::debug!("monthly `Rental` overlaps `Rental(id: {other})`");
                return Err(tracerr::new!(E::Overlap(other)));
            }
        }

        let total = draft.total_price;
        let id = self
            .database()
            .execute(Insert(draft))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "created monthly `Rental(id: {id})` of `Chair(id: {chair_id})` \
             for {start_date}..={end_date}, total {total}",
        );
        Ok(id)
    }
}

/// Error of [`CreateMonthlyRental`] [`Command`] execution.
pub type ExecutionError = create_daily_rental::ExecutionError;
