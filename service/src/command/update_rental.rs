//! [`Command`] for updating a [`Rental`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        rental::{self, validation, ValidationError},
        Rental,
    },
    error::{self, Categorize, StorageError},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for updating a [`Rental`].
///
/// Only the present [`rental::Changes`] are applied, and the total price is
/// recomputed afterwards.
#[derive(Clone, Copy, Debug)]
pub struct UpdateRental {
    /// ID of the [`Rental`] to update.
    pub rental_id: rental::Id,

    /// [`rental::Changes`] to apply.
    pub changes: rental::Changes,
}

impl<Db> Command<UpdateRental> for Service<Db>
where
    Db: Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<rental::Id>, read::rental::Overlap>>,
            Ok = Option<rental::Id>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = rental::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRental { rental_id, changes } = cmd;

        if !changes.has_any() {
            log::debug!("no changes requested for `Rental(id: {rental_id})`");
            return Err(tracerr::new!(E::NoChanges));
        }

        let mut rental = self
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        let moves_booking = changes.moves_booking();
        rental.apply(changes);
        rental.recalculate_total_price();

        validation::validate_date_order(
            rental.kind,
            rental.start_date,
            rental.end_date,
        )
        .and_then(|()| validation::validate_price(rental.kind, rental.price))
        .and_then(|()| validation::validate_total_price(rental.total_price))
        .inspect_err(|e| {
            log::debug!("update of `Rental(id: {rental_id})` rejected: {e}");
        })
        .map_err(tracerr::from_and_wrap!(=> E))?;

        if moves_booking {
            let overlap = self
                .database()
                .execute(Select(By::<Option<rental::Id>, _>::new(
                    read::rental::Overlap {
                        chair_id: rental.chair_id,
                        start: rental.start_date,
                        end: rental.end_date,
                        excluding: Some(rental_id),
                    },
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(other) = overlap {
                log::debug!(
                    "`Rental(id: {rental_id})` would overlap \
                     `Rental(id: {other})`",
                );
                return Err(tracerr::new!(E::Overlap(other)));
            }
        }

        let updated = self
            .database()
            .execute(Update(rental))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !updated {
            return Err(tracerr::new!(E::RentalNotExists(rental_id)));
        }

        log::info!("updated `Rental(id: {rental_id})`");
        Ok(rental_id)
    }
}

/// Error of [`UpdateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// No [`rental::Changes`] were requested.
    #[display("No changes selected")]
    #[from(ignore)]
    NoChanges,

    /// [`Rental`] doesn't exist.
    #[display("Rental ID {_0} does not exist")]
    #[from(ignore)]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// Updated values break a [`Rental`] rule.
    #[display("{_0}")]
    #[from]
    Validation(ValidationError),

    /// Updated [`Rental`] overlaps another one of the same chair.
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
            Self::NoChanges | Self::Validation(_) => error::Kind::Validation,
            Self::RentalNotExists(_) => error::Kind::NotFound,
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
        command::{
            CreateDailyRental, CreateMonthlyRental, CreateRenter, UpdateRental,
        },
        domain::{chair, rental, renter, Rental},
        error::{self, Categorize as _},
        infra::{Database as _, Memory},
        Command as _, Config, Service,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    struct Fixture {
        svc: Service<Memory>,
        renter_id: renter::Id,
    }

    impl Fixture {
        async fn new() -> Self {
            let svc = Service::new(
                Config::default(),
                Memory::with_chairs([chair::Id::from(1), chair::Id::from(2)]),
            );
            let renter_id = svc
                .execute(CreateRenter {
                    name: renter::Name::new("Mette").unwrap(),
                    phone: renter::Phone::new("12345678").unwrap(),
                })
                .await
                .unwrap();
            Self { svc, renter_id }
        }

        async fn daily(&self, day: &str) -> rental::Id {
            self.svc
                .execute(CreateDailyRental {
                    chair_id: chair::Id::from(1),
                    renter_id: self.renter_id,
                    date: date(day),
                    price: Money::kroner(150),
                    payment_status: rental::PaymentStatus::Unpaid,
                })
                .await
                .unwrap()
        }

        async fn monthly(&self, start: &str, end: &str) -> rental::Id {
            self.svc
                .execute(CreateMonthlyRental {
                    chair_id: chair::Id::from(1),
                    renter_id: self.renter_id,
                    start_date: date(start),
                    end_date: date(end),
                    price: Money::kroner(2000),
                    payment_status: rental::PaymentStatus::Unpaid,
                })
                .await
                .unwrap()
        }

        async fn get(&self, id: rental::Id) -> Rental {
            self.svc
                .database()
                .execute(Select(By::<Option<Rental>, _>::new(id)))
                .await
                .unwrap()
                .unwrap()
        }

        async fn update(
            &self,
            id: rental::Id,
            changes: rental::Changes,
        ) -> Result<rental::Id, tracerr::Traced<super::ExecutionError>>
        {
            self.svc
                .execute(UpdateRental {
                    rental_id: id,
                    changes,
                })
                .await
        }
    }

    #[tokio::test]
    async fn rejects_empty_changes() {
        let f = Fixture::new().await;
        let id = f.daily("2023-05-05").await;
        let before = f.get(id).await;

        let err = f.update(id, rental::Changes::default()).await.unwrap_err();

        assert!(err.as_ref().to_string().contains("No changes"));
        assert_eq!(f.get(id).await, before);
    }

    #[tokio::test]
    async fn rejects_unknown_rental() {
        let f = Fixture::new().await;

        let err = f
            .update(
                rental::Id::from(77),
                rental::Changes {
                    price: Some(Money::kroner(200)),
                    ..rental::Changes::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), error::Kind::NotFound);
        assert_eq!(err.as_ref().to_string(), "Rental ID 77 does not exist");
    }

    #[tokio::test]
    async fn changes_only_named_fields() {
        let f = Fixture::new().await;
        let id = f.daily("2023-05-05").await;
        let before = f.get(id).await;

        _ = f
            .update(
                id,
                rental::Changes {
                    payment_status: Some(rental::PaymentStatus::Paid),
                    ..rental::Changes::default()
                },
            )
            .await
            .unwrap();

        let after = f.get(id).await;
        assert_eq!(after.payment_status, rental::PaymentStatus::Paid);
        assert_eq!(after.chair_id, before.chair_id);
        assert_eq!(after.start_date, before.start_date);
        assert_eq!(after.end_date, before.end_date);
        assert_eq!(after.price, before.price);
        assert_eq!(after.total_price, before.total_price);
        assert_eq!(after.kind, before.kind);
        assert!(after.updated_at.is_some());
    }

    #[tokio::test]
    async fn rejects_monthly_period_ending_before_start() {
        let f = Fixture::new().await;
        let id = f.monthly("2023-01-01", "2023-02-28").await;
        let before = f.get(id).await;

        let err = f
            .update(
                id,
                rental::Changes {
                    end_date: Some(date("2022-12-31")),
                    ..rental::Changes::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), error::Kind::Validation);
        assert_eq!(f.get(id).await, before);
    }

    #[tokio::test]
    async fn rejects_price_below_minimum_of_kind() {
        let f = Fixture::new().await;
        let id = f.monthly("2023-01-01", "2023-02-28").await;

        let err = f
            .update(
                id,
                rental::Changes {
                    price: Some(Money::kroner(150)),
                    ..rental::Changes::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().to_string(),
            "Minimum price for a monthly rental is 2000 kr",
        );
    }

    #[tokio::test]
    async fn rejects_price_beyond_storage_range() {
        let f = Fixture::new().await;
        let id = f.monthly("2023-01-01", "2023-12-31").await;
        let before = f.get(id).await;

        for (price, msg) in [
            (
                "79228162514264337593543950335",
                "Price of a rental must be below 10000000000 kr",
            ),
            (
                "9000000000",
                "Total price of a rental must be below 10000000000 kr",
            ),
        ] {
            let err = f
                .update(
                    id,
                    rental::Changes {
                        price: Some(price.parse().unwrap()),
                        ..rental::Changes::default()
                    },
                )
                .await
                .unwrap_err();

            assert_eq!(err.kind(), error::Kind::Validation);
            assert_eq!(err.as_ref().to_string(), msg);
        }
        assert_eq!(f.get(id).await, before);
    }

    #[tokio::test]
    async fn rejects_moving_onto_booked_day() {
        let f = Fixture::new().await;
        let first = f.daily("2023-05-05").await;
        let second = f.daily("2023-05-06").await;
        let before = f.get(second).await;

        let err = f
            .update(
                second,
                rental::Changes {
                    start_date: Some(date("2023-05-05")),
                    end_date: Some(date("2023-05-05")),
                    ..rental::Changes::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), error::Kind::Conflict);
        assert_eq!(err.as_ref().to_string(), "Overlap with existing booking");
        assert!(matches!(
            err.as_ref(),
            super::ExecutionError::Overlap(id) if *id == first,
        ));
        assert_eq!(f.get(second).await, before);
    }

    #[tokio::test]
    async fn allows_moving_to_free_chair() {
        let f = Fixture::new().await;
        _ = f.daily("2023-05-05").await;
        let second = f.daily("2023-05-06").await;

        let res = f
            .update(
                second,
                rental::Changes {
                    chair_id: Some(chair::Id::from(2)),
                    start_date: Some(date("2023-05-05")),
                    end_date: Some(date("2023-05-05")),
                    ..rental::Changes::default()
                },
            )
            .await;

        assert_eq!(res.unwrap(), second);
        assert_eq!(f.get(second).await.chair_id, chair::Id::from(2));
    }

    #[tokio::test]
    async fn does_not_conflict_with_itself() {
        let f = Fixture::new().await;
        let id = f.monthly("2023-01-01", "2023-01-31").await;

        let res = f
            .update(
                id,
                rental::Changes {
                    end_date: Some(date("2023-01-20")),
                    ..rental::Changes::default()
                },
            )
            .await;

        assert_eq!(res.unwrap(), id);
    }

    #[tokio::test]
    async fn recomputes_monthly_total_with_one_month_floor() {
        let f = Fixture::new().await;
        let id = f.monthly("2023-01-01", "2023-01-31").await;

        for (end, total) in [
            ("2023-01-31", 2000),
            ("2023-02-01", 4000),
            ("2023-03-02", 4000),
            ("2023-01-01", 2000),
        ] {
            _ = f
                .update(
                    id,
                    rental::Changes {
                        end_date: Some(date(end)),
                        ..rental::Changes::default()
                    },
                )
                .await
                .unwrap();
            assert_eq!(f.get(id).await.total_price, Money::kroner(total));
        }
    }

    #[tokio::test]
    async fn reports_moving_to_unknown_chair() {
        let f = Fixture::new().await;
        let id = f.daily("2023-05-05").await;

        let err = f
            .update(
                id,
                rental::Changes {
                    chair_id: Some(chair::Id::from(3)),
                    ..rental::Changes::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().to_string(),
            "Error: the selected chair does not exist in the system \
             (DB constraint)",
        );
    }
}
