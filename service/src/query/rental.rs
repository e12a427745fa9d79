//! [`Query`] collection related to [`Rental`]s.

use common::operations::By;

use crate::{
    domain::{chair, rental, Rental},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Rental`] by its [`rental::Id`].
pub type ById = DatabaseQuery<By<Option<Rental>, rental::Id>>;

/// Queries [`Rental`]s not finished yet, earliest start first.
pub type Upcoming = DatabaseQuery<By<Vec<Rental>, read::rental::Upcoming>>;

/// Queries finished [`Rental`]s, latest end first.
pub type Completed = DatabaseQuery<By<Vec<Rental>, read::rental::Completed>>;

/// Queries all [`Rental`]s of a [`Chair`].
///
/// [`Chair`]: crate::domain::Chair
pub type ByChair = DatabaseQuery<By<Vec<Rental>, chair::Id>>;

/// Queries any [`Rental`] overlapping the [`read::rental::Overlap`] period.
pub type Overlap =
    DatabaseQuery<By<Option<rental::Id>, read::rental::Overlap>>;
