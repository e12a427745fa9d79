//! [`Command`] for deleting a [`Rental`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{rental, Rental},
    error::{self, Categorize, StorageError},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Rental`].
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteRental {
    /// ID of the [`Rental`] to delete.
    pub rental_id: rental::Id,
}

impl<Db> Command<DeleteRental> for Service<Db>
where
    Db: Database<
        Delete<By<Rental, rental::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = rental::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRental { rental_id } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::RentalNotExists(rental_id)));
        }

        log::info!("deleted `Rental(id: {rental_id})`");
        Ok(rental_id)
    }
}

/// Error of [`DeleteRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Rental`] doesn't exist.
    #[display("Rental ID {_0} does not exist")]
    #[from(ignore)]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// Storage failed to delete the [`Rental`].
    #[display("{_0}")]
    #[from(database::Error, StorageError)]
    Storage(StorageError),
}

impl Categorize for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::RentalNotExists(_) => error::Kind::NotFound,
            Self::Storage(e) => e.kind(),
        }
    }
}
