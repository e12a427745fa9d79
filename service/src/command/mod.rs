//! [`Command`] definition.

pub mod create_daily_rental;
pub mod create_monthly_rental;
pub mod create_renter;
pub mod delete_rental;
pub mod update_rental;
pub mod update_renter;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_daily_rental::CreateDailyRental,
    create_monthly_rental::CreateMonthlyRental, create_renter::CreateRenter,
    delete_rental::DeleteRental, update_rental::UpdateRental,
    update_renter::UpdateRenter,
};
