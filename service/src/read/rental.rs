//! [`Rental`] read selectors.

use common::Date;

use crate::domain::{chair, rental};
#[cfg(doc)]
use crate::domain::{Chair, Rental};

/// Selector of a [`Rental`] occupying the [`Chair`] on any day of the period.
///
/// Both `start` and `end` are inclusive, so rentals touching the period on its
/// first or last day overlap it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Overlap {
    /// ID of the [`Chair`] to check.
    pub chair_id: chair::Id,

    /// First day of the period.
    pub start: Date,

    /// Last day of the period.
    pub end: Date,

    /// ID of the [`Rental`] to ignore, usually the one being updated.
    pub excluding: Option<rental::Id>,
}

/// Selector of the [`Rental`]s not ended before the provided [`Date`],
/// ordered by their start dates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Upcoming(pub Date);

/// Selector of the [`Rental`]s ended before the provided [`Date`], the most
/// recently ended first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Completed(pub Date);
