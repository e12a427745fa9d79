//! [`Database`]-related implementations.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// Names of the storage constraints surfaced to the domain.
pub mod constraint {
    /// Rented chair must exist.
    pub const RENTALS_CHAIR_ID_FKEY: &str = "rentals_chair_id_fkey";

    /// Renter of a rental must exist.
    pub const RENTALS_RENTER_ID_FKEY: &str = "rentals_renter_id_fkey";

    /// Rental period must not end before it starts.
    pub const RENTALS_PERIOD_CHECK: &str = "rentals_period_check";

    /// Payment status of a rental must be a known one.
    pub const RENTALS_PAYMENT_STATUS_CHECK: &str =
        "rentals_payment_status_check";

    /// Kind of a rental must be a known one.
    pub const RENTALS_KIND_CHECK: &str = "rentals_kind_check";

    /// Phone numbers of renters are unique.
    pub const RENTERS_PHONE_KEY: &str = "renters_phone_key";
}

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    /// [`Memory`] error.
    Memory(memory::Error),
}

impl Error {
    /// Returns the name of the violated storage constraint, if this [`Error`]
    /// is caused by one.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.constraint(),
            Self::Memory(e) => e.constraint(),
        }
    }
}
