//! [`Rental`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{chair, rental, Rental},
    infra::{
        database::{self, postgres::Connection as _, Postgres},
        Database,
    },
    read,
};

/// Expands into a `SELECT` of [`Rental`]s joined with their renters, followed
/// by the provided SQL tail.
macro_rules! select_rentals {
    ($tail:literal) => {
        concat!(
            "SELECT r.id, r.chair_id, r.renter_id, \
                    r.kind, r.payment_status, \
                    r.price, r.total_price, \
                    r.start_date, r.end_date, \
                    r.created_at, r.updated_at, \
                    rr.name AS renter_name, rr.phone AS renter_phone \
             FROM rentals AS r \
             LEFT JOIN renters AS rr ON rr.id = r.renter_id ",
            $tail,
        )
    };
}

/// Builds a [`Rental`] out of a `select_rentals!` [`Row`].
fn from_row(row: &Row) -> Rental {
    Rental {
        id: row.get("id"),
        chair_id: row.get("chair_id"),
        renter_id: row.get("renter_id"),
        kind: row.get("kind"),
        payment_status: row.get("payment_status"),
        price: row.get("price"),
        total_price: row.get("total_price"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        renter_name: row.get("renter_name"),
        renter_phone: row.get("renter_phone"),
    }
}

impl Database<Select<By<Option<Rental>, rental::Id>>> for Postgres {
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = select_rentals!("WHERE r.id = $1::INT4");
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl Database<Select<By<Vec<Rental>, chair::Id>>> for Postgres {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let chair_id = by.into_inner();

        const SQL: &str = select_rentals!(
            "WHERE r.chair_id = $1::INT4 \
             ORDER BY r.start_date ASC, r.id ASC"
        );
        Ok(self
            .query(SQL, &[&chair_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Select<By<Vec<Rental>, read::rental::Upcoming>>> for Postgres {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, read::rental::Upcoming>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::Upcoming(from) = by.into_inner();

        const SQL: &str = select_rentals!(
            "WHERE r.end_date >= $1::DATE \
             ORDER BY r.start_date ASC, r.id ASC"
        );
        Ok(self
            .query(SQL, &[&from])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Select<By<Vec<Rental>, read::rental::Completed>>> for Postgres {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, read::rental::Completed>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::Completed(before) = by.into_inner();

        const SQL: &str = select_rentals!(
            "WHERE r.end_date < $1::DATE \
             ORDER BY r.end_date DESC, r.id ASC"
        );
        Ok(self
            .query(SQL, &[&before])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Select<By<Option<rental::Id>, read::rental::Overlap>>>
    for Postgres
{
    type Ok = Option<rental::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<rental::Id>, read::rental::Overlap>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::Overlap {
            chair_id,
            start,
            end,
            excluding,
        } = by.into_inner();

        // Closed intervals: touching on a single day is an overlap too.
        const SQL: &str = "\
            SELECT id \
            FROM rentals \
            WHERE chair_id = $1::INT4 \
              AND start_date <= $3::DATE \
              AND end_date >= $2::DATE \
              AND ($4::INT4 IS NULL OR id <> $4::INT4) \
            ORDER BY id ASC \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&chair_id, &start, &end, &excluding])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| row.get("id")))
    }
}

impl Database<Insert<rental::Draft>> for Postgres {
    type Ok = rental::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<rental::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental::Draft {
            chair_id,
            renter_id,
            kind,
            payment_status,
            price,
            total_price,
            start_date,
            end_date,
            created_at,
        } = draft;

        const SQL: &str = "\
            INSERT INTO rentals (\
                chair_id, renter_id, \
                kind, payment_status, \
                price, total_price, \
                start_date, end_date, \
                created_at\
            ) \
            VALUES (\
                $1::INT4, $2::INT4, \
                $3::INT2, $4::INT2, \
                $5::NUMERIC, $6::NUMERIC, \
                $7::DATE, $8::DATE, \
                $9::TIMESTAMPTZ\
            ) \
            RETURNING id";
        Ok(self
            .query_one(
                SQL,
                &[
                    &chair_id,
                    &renter_id,
                    &kind,
                    &payment_status,
                    &price,
                    &total_price,
                    &start_date,
                    &end_date,
                    &created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .get("id"))
    }
}

impl Database<Update<Rental>> for Postgres {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        // `kind`, `renter_id` and `created_at` are never changed.
        let Rental {
            id,
            chair_id,
            payment_status,
            price,
            total_price,
            start_date,
            end_date,
            ..
        } = rental;

        const SQL: &str = "\
            UPDATE rentals \
            SET chair_id = $2::INT4, \
                payment_status = $3::INT2, \
                price = $4::NUMERIC, \
                total_price = $5::NUMERIC, \
                start_date = $6::DATE, \
                end_date = $7::DATE, \
                updated_at = NOW() \
            WHERE id = $1::INT4";
        self.exec(
            SQL,
            &[
                &id,
                &chair_id,
                &payment_status,
                &price,
                &total_price,
                &start_date,
                &end_date,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|affected| affected > 0)
    }
}

impl Database<Delete<By<Rental, rental::Id>>> for Postgres {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM rentals \
            WHERE id = $1::INT4";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}
