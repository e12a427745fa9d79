//! Domain definitions.

pub mod chair;
pub mod rental;
pub mod renter;

pub use self::{chair::Chair, rental::Rental, renter::Renter};
