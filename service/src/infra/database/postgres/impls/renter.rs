//! [`Renter`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{renter, Renter},
    infra::{
        database::{self, postgres::Connection as _, Postgres},
        Database,
    },
};

/// Builds a [`Renter`] out of a `renters` [`Row`].
fn from_row(row: &Row) -> Renter {
    Renter {
        id: row.get("id"),
        name: row.get("name"),
        phone: row.get("phone"),
    }
}

impl Database<Select<By<Option<Renter>, renter::Id>>> for Postgres {
    type Ok = Option<Renter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Renter>, renter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, phone \
            FROM renters \
            WHERE id = $1::INT4";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl Database<Select<By<Option<Renter>, renter::Phone>>> for Postgres {
    type Ok = Option<Renter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Renter>, renter::Phone>>,
    ) -> Result<Self::Ok, Self::Err> {
        let phone = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, phone \
            FROM renters \
            WHERE phone = $1::VARCHAR";
        Ok(self
            .query_opt(SQL, &[&phone])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl Database<Insert<renter::Draft>> for Postgres {
    type Ok = renter::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<renter::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let renter::Draft { name, phone } = draft;

        const SQL: &str = "\
            INSERT INTO renters (name, phone) \
            VALUES ($1::VARCHAR, $2::VARCHAR) \
            RETURNING id";
        Ok(self
            .query_one(SQL, &[&name, &phone])
            .await
            .map_err(tracerr::wrap!())?
            .get("id"))
    }
}

impl Database<Update<Renter>> for Postgres {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(renter): Update<Renter>,
    ) -> Result<Self::Ok, Self::Err> {
        let Renter { id, name, phone } = renter;

        const SQL: &str = "\
            UPDATE renters \
            SET name = $2::VARCHAR, \
                phone = $3::VARCHAR \
            WHERE id = $1::INT4";
        self.exec(SQL, &[&id, &name, &phone])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
