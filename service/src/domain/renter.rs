//! [`Renter`] definitions.

use std::sync::LazyLock;

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Hairdresser renting salon chairs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Renter {
    /// ID of this [`Renter`].
    pub id: Id,

    /// [`Name`] of this [`Renter`].
    pub name: Name,

    /// [`Phone`] number of this [`Renter`].
    ///
    /// Unique across all the [`Renter`]s.
    pub phone: Phone,
}

impl Renter {
    /// Applies the provided [`Changes`] to this [`Renter`].
    ///
    /// Returns `false` if the resulting values are the same as before.
    pub fn apply(&mut self, changes: Changes) -> bool {
        let Changes { name, phone } = changes;

        let mut changed = false;
        if let Some(name) = name.filter(|n| *n != self.name) {
            self.name = name;
            changed = true;
        }
        if let Some(phone) = phone.filter(|p| *p != self.phone) {
            self.phone = phone;
            changed = true;
        }
        changed
    }
}

/// Not yet stored [`Renter`], without an [`Id`] assigned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// [`Name`] of a new [`Renter`].
    pub name: Name,

    /// [`Phone`] number of a new [`Renter`].
    pub phone: Phone,
}

impl Draft {
    /// Turns this [`Draft`] into a [`Renter`] with the provided [`Id`].
    #[must_use]
    pub fn into_renter(self, id: Id) -> Renter {
        let Self { name, phone } = self;
        Renter { id, name, phone }
    }
}

/// Partial modification of a [`Renter`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Changes {
    /// New [`Name`] of the [`Renter`].
    pub name: Option<Name>,

    /// New [`Phone`] number of the [`Renter`].
    pub phone: Option<Phone>,
}

impl Changes {
    /// Indicates whether these [`Changes`] request any modification at all.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.name.is_some() || self.phone.is_some()
    }
}

/// ID of a [`Renter`].
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

/// Name of a [`Renter`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Phone number of a [`Renter`].
///
/// Stored with separators removed, so differently formatted inputs of the
/// same number are equal.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    ///
    /// Spaces and dashes between the digits are dropped.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then(|| {
            Self(
                number
                    .chars()
                    .filter(|c| *c == '+' || c.is_ascii_digit())
                    .collect(),
            )
        })
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format:
        /// - optional leading `+`;
        /// - 8 to 15 digits;
        /// - digits may be separated by a single space or dash.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[+]?[0-9](?:[-\s]?[0-9]){7,14}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}
