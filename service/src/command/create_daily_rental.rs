//! [`Command`] for creating a new [`rental::Kind::Daily`] [`Rental`].

use common::{
    operations::{By, Insert, Select},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{
        chair,
        rental::{self, validation, ValidationError},
        renter, Chair,
    },
    error::{self, Categorize, StorageError},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for creating a new [`rental::Kind::Daily`] [`Rental`].
#[derive(Clone, Copy, Debug)]
pub struct CreateDailyRental {
    /// ID of the [`Chair`] to rent.
    pub chair_id: chair::Id,

    /// ID of the [`Renter`] renting the [`Chair`].
    ///
    /// [`Renter`]: crate::domain::Renter
    pub renter_id: renter::Id,

    /// Day the [`Chair`] is rented for.
    pub date: Date,

    /// Price of the day.
    pub price: Money,

    /// Initial [`rental::PaymentStatus`].
    pub payment_status: rental::PaymentStatus,
}

impl<Db> Command<CreateDailyRental> for Service<Db>
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
        cmd: CreateDailyRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateDailyRental {
            chair_id,
            renter_id,
            date,
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

        validation::validate_price(rental::Kind::Daily, price)
            .and_then(|()| {
                validation::validate_date_order(rental::Kind::Daily, date, date)
            })
            .inspect_err(|e| log::debug!("daily `Rental` rejected: {e}"))
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let draft = rental::Draft::daily(
            chair_id,
            renter_id,
            date,
            price,
            payment_status,
        );

        if self.config().check_overlap_on_creation {
            let overlap = self
                .database()
                .execute(Select(By::<Option<rental::Id>, _>::new(
                    read::rental::Overlap {
                        chair_id,
                        start: draft.start_date,
                        end: draft.end_date,
                        excluding: None,
                    },
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(other) = overlap {
                log::debug!("daily `Rental` overlaps `Rental(id: {other})`");
                return Err(tracerr::new!(E::Overlap(other)));
            }
        }

        let id = self
            .database()
            .execute(Insert(draft))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "created daily `Rental(id: {id})` of `Chair(id: {chair_id})` \
             on {date}",
        );
        Ok(id)
    }
}

/// Error of creating a new [`Rental`].
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Chair`] doesn't exist.
    #[display("Chair {_0} does not exist")]
    #[from(ignore)]
    ChairNotExists(#[error(not(source))] chair::Id),

    /// Provided values break a [`Rental`] rule.
    #[display("{_0}")]
    #[from]
    Validation(ValidationError),

    /// [`Chair`] is already rented for some day of the period.
    #[display("Overlap with existing booking")]
    #[from(ignore)]
    Overlap(#[error(not(source))] rental::Id),

    /// Storage failed or rejected the [`Rental`].
    #[display("{_0}")]
    #[from(database::Error, StorageError)]
    Storage(StorageError),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::ChairNotExists(_) => error::Kind::NotFound,
            Self::Validation(_) => error::Kind::Validation,
            Self::Overlap(_) => error::Kind::Conflict,
            Self::Storage(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Date, Money,
    };

    use crate::{
        command::{CreateDailyRental, CreateRenter},
        domain::{chair, rental, renter, Rental},
        error::{self, Categorize as _},
        infra::{Database as _, Memory},
        Command as _, Config, RentalResult, Service,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    async fn service(config: Config) -> (Service<Memory>, renter::Id) {
        let svc = Service::new(
            config,
            Memory::with_chairs([chair::Id::from(1), chair::Id::from(2)]),
        );
        let renter_id = svc
            .execute(CreateRenter {
                name: renter::Name::new("Mette").unwrap(),
                phone: renter::Phone::new("12345678").unwrap(),
            })
            .await
            .unwrap();
        (svc, renter_id)
    }

    fn cmd(renter_id: renter::Id, price: i64) -> CreateDailyRental {
        CreateDailyRental {
            chair_id: chair::Id::from(1),
            renter_id,
            date: date("2023-05-05"),
            price: Money::kroner(price),
            payment_status: rental::PaymentStatus::Unpaid,
        }
    }

    #[tokio::test]
    async fn creates_single_day_rental() {
        let (svc, renter_id) = service(Config::default()).await;

        let id = svc.execute(cmd(renter_id, 100)).await.unwrap();

        let stored = svc
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.kind, rental::Kind::Daily);
        assert_eq!(stored.start_date, date("2023-05-05"));
        assert_eq!(stored.end_date, date("2023-05-05"));
        assert_eq!(stored.price, Money::kroner(100));
        assert_eq!(stored.total_price, Money::kroner(100));
        assert_eq!(stored.payment_status, rental::PaymentStatus::Unpaid);
        assert_eq!(stored.renter_id, renter_id);
    }

    #[tokio::test]
    async fn rejects_price_below_minimum() {
        let (svc, renter_id) = service(Config::default()).await;

        let err = svc.execute(cmd(renter_id, 99)).await.unwrap_err();

        assert_eq!(err.kind(), error::Kind::Validation);
        assert_eq!(
            err.as_ref().to_string(),
            "Minimum price for a daily rental is 100 kr",
        );
    }

    #[tokio::test]
    async fn rejects_unknown_chair() {
        let (svc, renter_id) = service(Config::default()).await;

        let res = RentalResult::from(
            svc.execute(CreateDailyRental {
                chair_id: chair::Id::from(9),
                ..cmd(renter_id, 150)
            })
            .await,
        );

        assert_eq!(res, RentalResult::Failure("Chair 9 does not exist".into()));
    }

    #[tokio::test]
    async fn maps_storage_constraints() {
        let (svc, _) = service(Config::default()).await;

        let err = svc
            .execute(cmd(renter::Id::from(42), 150))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().to_string(),
            "Error: the given renter does not exist (DB constraint)",
        );
    }

    #[tokio::test]
    async fn skips_overlap_check_by_default() {
        let (svc, renter_id) = service(Config::default()).await;

        let first = svc.execute(cmd(renter_id, 150)).await.unwrap();
        let second = svc.execute(cmd(renter_id, 150)).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn checks_overlap_when_configured() {
        let (svc, renter_id) = service(Config {
            check_overlap_on_creation: true,
        })
        .await;

        let first = svc.execute(cmd(renter_id, 150)).await.unwrap();
        let err = svc.execute(cmd(renter_id, 150)).await.unwrap_err();

        assert_eq!(err.kind(), error::Kind::Conflict);
        assert_eq!(err.as_ref().to_string(), "Overlap with existing booking");
        assert!(matches!(
            err.as_ref(),
            super::ExecutionError::Overlap(id) if *id == first,
        ));
    }
}
