//! [`Rental`] definitions.

pub mod validation;

use common::{define_kind, unit, Date, DateTime, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use crate::domain::{chair, renter};
#[cfg(doc)]
use crate::domain::{Chair, Renter};

pub use self::validation::ValidationError;

/// Minimum price (in kroner) of a [`Kind::Daily`] [`Rental`].
pub const DAILY_MINIMUM_PRICE: i64 = 100;

/// Minimum price (in kroner) of a [`Kind::Monthly`] [`Rental`].
pub const MONTHLY_MINIMUM_PRICE: i64 = 2000;

/// Amount (in kroner) that both the price and the total price of a [`Rental`]
/// must stay below to fit into the storage.
pub const PRICE_LIMIT: i64 = 10_000_000_000;

/// Number of days billed as a single month of a [`Kind::Monthly`] [`Rental`].
pub const DAYS_PER_MONTH: i64 = 30;

/// Rental agreement of a [`Chair`] by a [`Renter`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the rented [`Chair`].
    pub chair_id: chair::Id,

    /// ID of the [`Renter`] renting the [`Chair`].
    pub renter_id: renter::Id,

    /// [`Kind`] of this [`Rental`].
    ///
    /// Fixed at creation.
    pub kind: Kind,

    /// [`PaymentStatus`] of this [`Rental`].
    pub payment_status: PaymentStatus,

    /// Price of a single day or month of this [`Rental`], depending on its
    /// [`Kind`].
    pub price: Money,

    /// Total price of this [`Rental`], derived from its [`Kind`], `price`
    /// and period.
    pub total_price: Money,

    /// First day of this [`Rental`] (inclusive).
    pub start_date: Date,

    /// Last day of this [`Rental`] (inclusive).
    pub end_date: Date,

    /// [`DateTime`] when this [`Rental`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rental`] was last modified, if ever.
    pub updated_at: Option<ModificationDateTime>,

    /// [`renter::Name`] of the [`Renter`], filled on reads.
    pub renter_name: Option<renter::Name>,

    /// [`renter::Phone`] of the [`Renter`], filled on reads.
    pub renter_phone: Option<renter::Phone>,
}

impl Rental {
    /// Merges the provided [`Changes`] into this [`Rental`].
    ///
    /// Only the present fields are touched. `total_price` is left as is, use
    /// [`Rental::recalculate_total_price()`] afterwards.
    pub fn apply(&mut self, changes: Changes) {
        let Changes {
            chair_id,
            start_date,
            end_date,
            price,
            payment_status,
        } = changes;

        if let Some(id) = chair_id {
            self.chair_id = id;
        }
        if let Some(date) = start_date {
            self.start_date = date;
        }
        if let Some(date) = end_date {
            self.end_date = date;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(status) = payment_status {
            self.payment_status = status;
        }
    }

    /// Recomputes `total_price` of this [`Rental`] from its current fields.
    ///
    /// A [`Kind::Monthly`] [`Rental`] is always billed for at least one month.
    pub fn recalculate_total_price(&mut self) {
        self.total_price = match self.kind {
            Kind::Daily => self.price,
            Kind::Monthly => {
                let months =
                    billed_months(self.start_date, self.end_date).max(1);
                self.price * months
            }
        };
    }

    /// Indicates whether this [`Rental`] occupies its [`Chair`] on any day of
    /// the provided period.
    #[must_use]
    pub fn overlaps(&self, start: Date, end: Date) -> bool {
        periods_overlap((self.start_date, self.end_date), (start, end))
    }
}

/// Not yet stored [`Rental`], without an [`Id`] assigned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// ID of the [`Chair`] to rent.
    pub chair_id: chair::Id,

    /// ID of the [`Renter`] renting the [`Chair`].
    pub renter_id: renter::Id,

    /// [`Kind`] of a new [`Rental`].
    pub kind: Kind,

    /// [`PaymentStatus`] of a new [`Rental`].
    pub payment_status: PaymentStatus,

    /// Per-unit price of a new [`Rental`].
    pub price: Money,

    /// Total price of a new [`Rental`].
    pub total_price: Money,

    /// First day of a new [`Rental`].
    pub start_date: Date,

    /// Last day of a new [`Rental`].
    pub end_date: Date,

    /// [`DateTime`] when a new [`Rental`] is created.
    pub created_at: CreationDateTime,
}

impl Draft {
    /// Creates a new [`Kind::Daily`] [`Draft`] for the single `date`.
    #[must_use]
    pub fn daily(
        chair_id: chair::Id,
        renter_id: renter::Id,
        date: Date,
        price: Money,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            chair_id,
            renter_id,
            kind: Kind::Daily,
            payment_status,
            price,
            total_price: price,
            start_date: date,
            end_date: date,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Creates a new [`Kind::Monthly`] [`Draft`] for the provided period.
    ///
    /// Started months are billed fully, and a same-day period bills nothing.
    #[must_use]
    pub fn monthly(
        chair_id: chair::Id,
        renter_id: renter::Id,
        start_date: Date,
        end_date: Date,
        price: Money,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            chair_id,
            renter_id,
            kind: Kind::Monthly,
            payment_status,
            price,
            total_price: price * billed_months(start_date, end_date),
            start_date,
            end_date,
            created_at: DateTime::now().coerce(),
        }
    }

    /// Turns this [`Draft`] into a [`Rental`] with the provided [`Id`].
    #[must_use]
    pub fn into_rental(self, id: Id) -> Rental {
        let Self {
            chair_id,
            renter_id,
            kind,
            payment_status,
            price,
            total_price,
            start_date,
            end_date,
            created_at,
        } = self;

        Rental {
            id,
            chair_id,
            renter_id,
            kind,
            payment_status,
            price,
            total_price,
            start_date,
            end_date,
            created_at,
            updated_at: None,
            renter_name: None,
            renter_phone: None,
        }
    }
}

/// Partial modification of a [`Rental`].
///
/// [`None`] fields are left untouched. [`Kind`] cannot be changed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Changes {
    /// ID of the new [`Chair`] to rent.
    pub chair_id: Option<chair::Id>,

    /// New first day of the [`Rental`].
    pub start_date: Option<Date>,

    /// New last day of the [`Rental`].
    pub end_date: Option<Date>,

    /// New per-unit price of the [`Rental`].
    pub price: Option<Money>,

    /// New [`PaymentStatus`] of the [`Rental`].
    pub payment_status: Option<PaymentStatus>,
}

impl Changes {
    /// Indicates whether these [`Changes`] request any modification at all.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.chair_id.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.price.is_some()
            || self.payment_status.is_some()
    }

    /// Indicates whether these [`Changes`] move the [`Rental`] to another
    /// [`Chair`] or period.
    #[must_use]
    pub fn moves_booking(&self) -> bool {
        self.chair_id.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }
}

/// Returns the number of started [`DAYS_PER_MONTH`]-day months between the
/// provided dates.
#[must_use]
pub fn billed_months(start: Date, end: Date) -> i64 {
    let days = start.days_until(end);
    days.div_euclid(DAYS_PER_MONTH)
        + i64::from(days.rem_euclid(DAYS_PER_MONTH) > 0)
}

/// Indicates whether two inclusive periods share at least one day.
#[must_use]
pub fn periods_overlap(a: (Date, Date), b: (Date, Date)) -> bool {
    a.0 <= b.1 && a.1 >= b.0
}

/// ID of a [`Rental`].
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

define_kind! {
    #[doc = "Kind of a [`Rental`]."]
    enum Kind {
        #[doc = "[`Rental`] of a single day."]
        Daily = 1,

        #[doc = "[`Rental`] billed per started month."]
        Monthly = 2,
    }
}

impl Kind {
    /// Returns the minimum allowed price of this [`Kind`] of [`Rental`].
    #[must_use]
    pub fn minimum_price(self) -> Money {
        match self {
            Self::Daily => Money::kroner(DAILY_MINIMUM_PRICE),
            Self::Monthly => Money::kroner(MONTHLY_MINIMUM_PRICE),
        }
    }
}

define_kind! {
    #[doc = "Payment status of a [`Rental`]."]
    enum PaymentStatus {
        #[doc = "Nothing is paid yet."]
        Unpaid = 1,

        #[doc = "[`Rental`] is paid in full."]
        Paid = 2,

        #[doc = "Payment is requested and awaited."]
        AwaitingPayment = 3,
    }
}

/// [`DateTime`] when a [`Rental`] was created.
pub type CreationDateTime = DateTimeOf<(Rental, unit::Creation)>;

/// [`DateTime`] when a [`Rental`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Rental, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::domain::{chair, renter};

    use super::{
        billed_months, periods_overlap, Changes, Draft, Id, Kind,
        PaymentStatus,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn monthly(start: &str, end: &str, price: i64) -> Draft {
        Draft::monthly(
            chair::Id::from(1),
            renter::Id::from(1),
            date(start),
            date(end),
            Money::kroner(price),
            PaymentStatus::Unpaid,
        )
    }

    #[test]
    fn counts_started_months() {
        assert_eq!(billed_months(date("2023-01-01"), date("2023-01-01")), 0);
        assert_eq!(billed_months(date("2023-01-01"), date("2023-01-02")), 1);
        assert_eq!(billed_months(date("2023-01-01"), date("2023-01-31")), 1);
        assert_eq!(billed_months(date("2023-01-01"), date("2023-02-01")), 2);
        assert_eq!(billed_months(date("2023-01-01"), date("2023-03-02")), 2);
        assert_eq!(billed_months(date("2023-01-01"), date("2023-03-03")), 3);
    }

    #[test]
    fn daily_draft_covers_single_day() {
        let d = Draft::daily(
            chair::Id::from(3),
            renter::Id::from(7),
            date("2023-05-05"),
            Money::kroner(150),
            PaymentStatus::Paid,
        );

        assert_eq!(d.kind, Kind::Daily);
        assert_eq!(d.start_date, d.end_date);
        assert_eq!(d.total_price, Money::kroner(150));
    }

    #[test]
    fn monthly_draft_has_no_minimum_month() {
        assert_eq!(
            monthly("2023-01-01", "2023-01-31", 2000).total_price,
            Money::kroner(2000),
        );
        assert_eq!(
            monthly("2023-01-01", "2023-02-15", 2000).total_price,
            Money::kroner(4000),
        );
        assert_eq!(
            monthly("2023-01-01", "2023-01-01", 2000).total_price,
            Money::ZERO,
        );
    }

    #[test]
    fn recalculated_monthly_total_bills_at_least_one_month() {
        let mut r = monthly("2023-01-01", "2023-01-01", 2000)
            .into_rental(Id::from(1));
        r.recalculate_total_price();
        assert_eq!(r.total_price, Money::kroner(2000));

        r.end_date = date("2023-01-31");
        r.recalculate_total_price();
        assert_eq!(r.total_price, Money::kroner(2000));

        r.end_date = date("2023-02-01");
        r.recalculate_total_price();
        assert_eq!(r.total_price, Money::kroner(4000));

        r.end_date = date("2023-03-02");
        r.recalculate_total_price();
        assert_eq!(r.total_price, Money::kroner(4000));
    }

    #[test]
    fn recalculated_daily_total_equals_price() {
        let mut r = Draft::daily(
            chair::Id::from(1),
            renter::Id::from(1),
            date("2023-05-05"),
            Money::kroner(150),
            PaymentStatus::Unpaid,
        )
        .into_rental(Id::from(1));
        r.price = Money::kroner(250);
        r.end_date = date("2023-05-09");
        r.recalculate_total_price();

        assert_eq!(r.total_price, Money::kroner(250));
    }

    #[test]
    fn applies_only_present_fields() {
        let original =
            monthly("2023-01-01", "2023-02-28", 2500).into_rental(Id::from(1));
        let mut r = original.clone();
        r.apply(Changes {
            price: Some(Money::kroner(3000)),
            ..Changes::default()
        });

        assert_eq!(r.price, Money::kroner(3000));
        assert_eq!(r.chair_id, original.chair_id);
        assert_eq!(r.start_date, original.start_date);
        assert_eq!(r.end_date, original.end_date);
        assert_eq!(r.payment_status, original.payment_status);
        assert_eq!(r.kind, original.kind);
    }

    #[test]
    fn detects_booking_moves() {
        assert!(!Changes::default().has_any());
        assert!(!Changes::default().moves_booking());

        let status_only = Changes {
            payment_status: Some(PaymentStatus::Paid),
            ..Changes::default()
        };
        assert!(status_only.has_any());
        assert!(!status_only.moves_booking());

        let new_chair = Changes {
            chair_id: Some(chair::Id::from(2)),
            ..Changes::default()
        };
        assert!(new_chair.moves_booking());
    }

    #[test]
    fn overlaps_inclusively() {
        let p = |a: &str, b: &str| (date(a), date(b));

        assert!(periods_overlap(
            p("2023-01-01", "2023-01-10"),
            p("2023-01-05", "2023-01-20"),
        ));
        assert!(periods_overlap(
            p("2023-01-01", "2023-01-10"),
            p("2023-01-10", "2023-01-20"),
        ));
        assert!(periods_overlap(
            p("2023-01-05", "2023-01-05"),
            p("2023-01-01", "2023-01-10"),
        ));
        assert!(!periods_overlap(
            p("2023-01-01", "2023-01-09"),
            p("2023-01-10", "2023-01-20"),
        ));
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("daily".parse::<Kind>(), Ok(Kind::Daily));
        assert_eq!(
            "awaiting_payment".parse::<PaymentStatus>(),
            Ok(PaymentStatus::AwaitingPayment),
        );
        assert_eq!(PaymentStatus::try_from(2), Ok(PaymentStatus::Paid));
        assert_eq!(Kind::try_from(3), Err(3));
        assert_eq!(Kind::Monthly.minimum_price(), Money::kroner(2000));
    }
}
