//! [`Chair`] definitions.

use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

/// Salon chair available for renting.
///
/// Chairs are managed outside of this service, only their existence matters
/// here.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Chair {
    /// ID of this [`Chair`].
    pub id: Id,
}

/// ID of a [`Chair`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);
