//! [`Command`] for updating an existing [`Renter`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{renter, Renter},
    error::{self, Categorize, StorageError},
    infra::{database, database::constraint, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Renter`].
#[derive(Clone, Debug)]
pub struct UpdateRenter {
    /// ID of the [`Renter`] to update.
    pub renter_id: renter::Id,

    /// [`renter::Changes`] to apply.
    pub changes: renter::Changes,
}

impl<Db> Command<UpdateRenter> for Service<Db>
where
    Db: Database<
            Select<By<Option<Renter>, renter::Id>>,
            Ok = Option<Renter>,
            Err = Traced<database::Error>,
        > + Database<Update<Renter>, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = renter::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRenter) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRenter { renter_id, changes } = cmd;

        if !changes.has_any() {
            return Err(tracerr::new!(E::NoChanges));
        }

        let mut renter = self
            .database()
            .execute(Select(By::<Option<Renter>, _>::new(renter_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RenterNotExists(renter_id))
            .map_err(tracerr::wrap!())?;

        if !renter.apply(changes) {
            log::debug!("`Renter(id: {renter_id})` is unchanged");
            return Err(tracerr::new!(E::NoChanges));
        }

        let phone = renter.phone.clone();
        let updated = self
            .database()
            .execute(Update(renter))
            .await
            .map_err(|e| {
                if e.as_ref().constraint() == Some(constraint::RENTERS_PHONE_KEY)
                {
                    tracerr::new!(E::PhoneInUse(phone.clone()))
                } else {
                    (tracerr::map_from_and_wrap!(=> E))(e)
                }
            })?;
        if !updated {
            return Err(tracerr::new!(E::NotUpdated(renter_id)));
        }

        log::info!("updated `Renter(id: {renter_id})`");
        Ok(renter_id)
    }
}

/// Error of [`UpdateRenter`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Nothing to change.
    #[display("No changes selected")]
    #[from(ignore)]
    NoChanges,

    /// [`Renter`] doesn't exist.
    #[display("No renter found with ID {_0}")]
    #[from(ignore)]
    RenterNotExists(#[error(not(source))] renter::Id),

    /// Storage reported no row updated.
    #[display("Could not update renter ID {_0}")]
    #[from(ignore)]
    NotUpdated(#[error(not(source))] renter::Id),

    /// New [`renter::Phone`] belongs to another [`Renter`].
    #[display("Phone number {_0} is already in use by another renter")]
    #[from(ignore)]
    PhoneInUse(#[error(not(source))] renter::Phone),

    /// Storage failed to update the [`Renter`].
    #[display("{_0}")]
    #[from(database::Error, StorageError)]
    Storage(StorageError),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::NoChanges => error::Kind::Validation,
            Self::RenterNotExists(_) => error::Kind::NotFound,
            Self::PhoneInUse(_) => error::Kind::Conflict,
            Self::NotUpdated(_) | Self::Storage(_) => error::Kind::Storage,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::{CreateRenter, UpdateRenter},
        domain::{renter, Renter},
        error::{self, Categorize as _},
        infra::{Database as _, Memory},
        Command as _, Config, RentalResult, Service,
    };

    fn name(s: &str) -> renter::Name {
        renter::Name::new(s).unwrap()
    }

    fn phone(s: &str) -> renter::Phone {
        renter::Phone::new(s).unwrap()
    }

    async fn add_renter(
        svc: &Service<Memory>,
        n: &str,
        p: &str,
    ) -> renter::Id {
        svc.execute(CreateRenter {
            name: name(n),
            phone: phone(p),
        })
        .await
        .unwrap()
    }

    async fn stored(svc: &Service<Memory>, id: renter::Id) -> Renter {
        svc.database()
            .execute(Select(By::<Option<Renter>, _>::new(id)))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn changes_only_given_fields() {
        let svc = Service::new(Config::default(), Memory::new());
        let id = add_renter(&svc, "Mette", "12345678").await;

        let res = RentalResult::from(
            svc.execute(UpdateRenter {
                renter_id: id,
                changes: renter::Changes {
                    name: Some(name("Mette Hansen")),
                    phone: None,
                },
            })
            .await,
        );

        assert_eq!(res, RentalResult::Success(id));
        let renter = stored(&svc, id).await;
        assert_eq!(renter.name, name("Mette Hansen"));
        assert_eq!(renter.phone, phone("12345678"));
    }

    #[tokio::test]
    async fn rejects_empty_changes() {
        let svc = Service::new(Config::default(), Memory::new());
        let id = add_renter(&svc, "Mette", "12345678").await;

        let err = svc
            .execute(UpdateRenter {
                renter_id: id,
                changes: renter::Changes::default(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), error::Kind::Validation);
        assert_eq!(err.as_ref().to_string(), "No changes selected");
    }

    #[tokio::test]
    async fn rejects_same_values() {
        let svc = Service::new(Config::default(), Memory::new());
        let id = add_renter(&svc, "Mette", "12345678").await;

        let err = svc
            .execute(UpdateRenter {
                renter_id: id,
                changes: renter::Changes {
                    name: Some(name("Mette")),
                    phone: Some(phone("12345678")),
                },
            })
            .await
            .unwrap_err();

        assert_eq!(err.as_ref().to_string(), "No changes selected");
    }

    #[tokio::test]
    async fn rejects_unknown_renter() {
        let svc = Service::new(Config::default(), Memory::new());

        let err = svc
            .execute(UpdateRenter {
                renter_id: renter::Id::from(7),
                changes: renter::Changes {
                    name: Some(name("Jens")),
                    phone: None,
                },
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), error::Kind::NotFound);
        assert_eq!(err.as_ref().to_string(), "No renter found with ID 7");
    }

    #[tokio::test]
    async fn rejects_phone_of_another_renter() {
        let svc = Service::new(Config::default(), Memory::new());
        let id = add_renter(&svc, "Mette", "12345678").await;
        _ = add_renter(&svc, "Jens", "87654321").await;

        let err = svc
            .execute(UpdateRenter {
                renter_id: id,
                changes: renter::Changes {
                    name: None,
                    phone: Some(phone("87654321")),
                },
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), error::Kind::Conflict);
        assert_eq!(
            err.as_ref().to_string(),
            "Phone number 87654321 is already in use by another renter",
        );
        assert_eq!(stored(&svc, id).await.phone, phone("12345678"));
    }
}
