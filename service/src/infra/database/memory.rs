//! In-memory [`Database`] implementation.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Date, DateTime,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{chair, rental, renter, Chair, Rental, Renter},
    infra::database::{self, constraint, Database},
    read,
};

/// In-memory [`Database`] keeping the same constraints as the persistent
/// one.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared [`State`] of this [`Memory`].
    state: Arc<RwLock<State>>,
}

/// Stored entities of a [`Memory`].
#[derive(Debug, Default)]
struct State {
    /// Known [`Chair`]s.
    chairs: BTreeSet<chair::Id>,

    /// Stored [`Renter`]s.
    renters: BTreeMap<renter::Id, Renter>,

    /// Stored [`Rental`]s, without the denormalized [`Renter`] fields.
    rentals: BTreeMap<rental::Id, Rental>,

    /// Last assigned [`renter::Id`].
    last_renter_id: i32,

    /// Last assigned [`rental::Id`].
    last_rental_id: i32,
}

impl State {
    /// Fills the denormalized [`Renter`] fields of the provided [`Rental`].
    fn joined(&self, mut rental: Rental) -> Rental {
        if let Some(r) = self.renters.get(&rental.renter_id) {
            rental.renter_name = Some(r.name.clone());
            rental.renter_phone = Some(r.phone.clone());
        }
        rental
    }

    /// Checks the [`Rental`] constraints of the provided values.
    fn check_rental(
        &self,
        chair_id: chair::Id,
        renter_id: renter::Id,
        period: (Date, Date),
    ) -> Result<(), Error> {
        if !self.chairs.contains(&chair_id) {
            return Err(Error::Constraint(constraint::RENTALS_CHAIR_ID_FKEY));
        }
        if !self.renters.contains_key(&renter_id) {
            return Err(Error::Constraint(constraint::RENTALS_RENTER_ID_FKEY));
        }
        if period.1 < period.0 {
            return Err(Error::Constraint(constraint::RENTALS_PERIOD_CHECK));
        }
        Ok(())
    }

    /// Checks that the `phone` is not used by a [`Renter`] other than the
    /// provided one.
    fn check_phone(
        &self,
        phone: &renter::Phone,
        owner: Option<renter::Id>,
    ) -> Result<(), Error> {
        let taken = self
            .renters
            .values()
            .any(|r| r.phone == *phone && Some(r.id) != owner);
        if taken {
            return Err(Error::Constraint(constraint::RENTERS_PHONE_KEY));
        }
        Ok(())
    }

    /// Returns the stored [`Rental`]s matching the `filter`, joined with
    /// their [`Renter`]s.
    fn rentals(&self, filter: impl Fn(&Rental) -> bool) -> Vec<Rental> {
        self.rentals
            .values()
            .filter(|r| filter(r))
            .map(|r| self.joined(r.clone()))
            .collect()
    }
}

impl Memory {
    /// Creates a new empty [`Memory`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Memory`] knowing the provided [`Chair`]s.
    #[must_use]
    pub fn with_chairs(ids: impl IntoIterator<Item = chair::Id>) -> Self {
        let this = Self::new();
        if let Ok(mut state) = this.state.write() {
            state.chairs.extend(ids);
        }
        this
    }

    /// Acquires the [`State`] for reading.
    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, State>, Traced<database::Error>> {
        self.state
            .read()
            .map_err(|_| tracerr::new!(database::Error::from(Error::Poisoned)))
    }

    /// Acquires the [`State`] for writing.
    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, State>, Traced<database::Error>> {
        self.state
            .write()
            .map_err(|_| tracerr::new!(database::Error::from(Error::Poisoned)))
    }
}

impl Database<Select<By<Option<Chair>, chair::Id>>> for Memory {
    type Ok = Option<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Chair>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        Ok(state.chairs.contains(&id).then_some(Chair { id }))
    }
}

impl Database<Select<By<Option<Rental>, rental::Id>>> for Memory {
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        Ok(state.rentals.get(&id).cloned().map(|r| state.joined(r)))
    }
}

impl Database<Select<By<Vec<Rental>, chair::Id>>> for Memory {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let chair_id = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        let mut rentals = state.rentals(|r| r.chair_id == chair_id);
        rentals.sort_by_key(|r| (r.start_date, r.id));
        Ok(rentals)
    }
}

impl Database<Select<By<Vec<Rental>, read::rental::Upcoming>>> for Memory {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, read::rental::Upcoming>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::Upcoming(from) = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        let mut rentals = state.rentals(|r| r.end_date >= from);
        rentals.sort_by_key(|r| (r.start_date, r.id));
        Ok(rentals)
    }
}

impl Database<Select<By<Vec<Rental>, read::rental::Completed>>> for Memory {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, read::rental::Completed>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::Completed(before) = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        let mut rentals = state.rentals(|r| r.end_date < before);
        rentals.sort_by(|a, b| {
            b.end_date.cmp(&a.end_date).then(a.id.cmp(&b.id))
        });
        Ok(rentals)
    }
}

impl Database<Select<By<Option<rental::Id>, read::rental::Overlap>>>
    for Memory
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
        let state = self.read().map_err(tracerr::wrap!())?;
        Ok(state
            .rentals
            .values()
            .find(|r| {
                r.chair_id == chair_id
                    && Some(r.id) != excluding
                    && r.overlaps(start, end)
            })
            .map(|r| r.id))
    }
}

impl Database<Insert<rental::Draft>> for Memory {
    type Ok = rental::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<rental::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write().map_err(tracerr::wrap!())?;
        state
            .check_rental(
                draft.chair_id,
                draft.renter_id,
                (draft.start_date, draft.end_date),
            )
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        state.last_rental_id += 1;
        let id = rental::Id::from(state.last_rental_id);
        drop(state.rentals.insert(id, draft.into_rental(id)));
        Ok(id)
    }
}

impl Database<Update<Rental>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write().map_err(tracerr::wrap!())?;
        if !state.rentals.contains_key(&rental.id) {
            return Ok(false);
        }
        state
            .check_rental(
                rental.chair_id,
                rental.renter_id,
                (rental.start_date, rental.end_date),
            )
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        let stored = Rental {
            updated_at: Some(DateTime::now().coerce()),
            renter_name: None,
            renter_phone: None,
            ..rental
        };
        drop(state.rentals.insert(stored.id, stored));
        Ok(true)
    }
}

impl Database<Delete<By<Rental, rental::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut state = self.write().map_err(tracerr::wrap!())?;
        Ok(state.rentals.remove(&id).is_some())
    }
}

impl Database<Select<By<Option<Renter>, renter::Id>>> for Memory {
    type Ok = Option<Renter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Renter>, renter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        Ok(state.renters.get(&id).cloned())
    }
}

impl Database<Select<By<Option<Renter>, renter::Phone>>> for Memory {
    type Ok = Option<Renter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Renter>, renter::Phone>>,
    ) -> Result<Self::Ok, Self::Err> {
        let phone = by.into_inner();
        let state = self.read().map_err(tracerr::wrap!())?;
        Ok(state.renters.values().find(|r| r.phone == phone).cloned())
    }
}

impl Database<Insert<renter::Draft>> for Memory {
    type Ok = renter::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<renter::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write().map_err(tracerr::wrap!())?;
        state
            .check_phone(&draft.phone, None)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        state.last_renter_id += 1;
        let id = renter::Id::from(state.last_renter_id);
        drop(state.renters.insert(id, draft.into_renter(id)));
        Ok(id)
    }
}

impl Database<Update<Renter>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(renter): Update<Renter>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write().map_err(tracerr::wrap!())?;
        if !state.renters.contains_key(&renter.id) {
            return Ok(false);
        }
        state
            .check_phone(&renter.phone, Some(renter.id))
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        drop(state.renters.insert(renter.id, renter));
        Ok(true)
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Named constraint is violated.
    #[display("violates constraint `{_0}`")]
    Constraint(#[error(not(source))] &'static str),

    /// [`State`] lock is poisoned by a panicked writer.
    #[display("`Memory` state is poisoned")]
    Poisoned,
}

impl Error {
    /// Returns the name of the violated constraint, if any.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Constraint(name) => Some(name),
            Self::Poisoned => None,
        }
    }
}
