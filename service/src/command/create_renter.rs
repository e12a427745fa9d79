//! [`Command`] for creating a new [`Renter`].

use common::operations::{By, Insert, Select};
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

/// [`Command`] for creating a new [`Renter`].
#[derive(Clone, Debug)]
pub struct CreateRenter {
    /// [`renter::Name`] of a new [`Renter`].
    pub name: renter::Name,

    /// [`renter::Phone`] number of a new [`Renter`].
    ///
    /// Must not be used by any other [`Renter`].
    pub phone: renter::Phone,
}

impl<Db> Command<CreateRenter> for Service<Db>
where
    Db: Database<
            Select<By<Option<Renter>, renter::Phone>>,
            Ok = Option<Renter>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<renter::Draft>,
            Ok = renter::Id,
            Err = Traced<database::Error>,
        >,
{
    type Ok = renter::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRenter) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRenter { name, phone } = cmd;

        let existing = self
            .database()
            .execute(Select(By::<Option<Renter>, _>::new(phone.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(renter) = existing {
            log::debug!(
                "`Renter(id: {})` already uses phone {phone}",
                renter.id,
            );
            return Err(tracerr::new!(E::PhoneExists(phone, renter.id)));
        }

        // Concurrent creations are caught by `renters_phone_key`.
        let id = self
            .database()
            .execute(Insert(renter::Draft {
                name,
                phone: phone.clone(),
            }))
            .await
            .map_err(|e| {
                if e.as_ref().constraint() == Some(constraint::RENTERS_PHONE_KEY)
                {
                    tracerr::new!(E::PhoneInUse(phone.clone()))
                } else {
                    (tracerr::map_from_and_wrap!(=> E))(e)
                }
            })?;

        log::info!("created `Renter(id: {id})`");
        Ok(id)
    }
}

/// Error of [`CreateRenter`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Another [`Renter`] already has the [`renter::Phone`].
    #[display("A renter with phone number {_0} already exists (ID: {_1})")]
    #[from(ignore)]
    PhoneExists(renter::Phone, renter::Id),

    /// Storage rejected the [`renter::Phone`] as a duplicate.
    #[display("Phone number {_0} is already in use by another renter")]
    #[from(ignore)]
    PhoneInUse(#[error(not(source))] renter::Phone),

    /// Storage failed to store the [`Renter`].
    #[display("{_0}")]
    #[from(database::Error, StorageError)]
    Storage(StorageError),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::PhoneExists(..) | Self::PhoneInUse(_) => error::Kind::Conflict,
            Self::Storage(e) => e.kind(),
        }
    }
}
