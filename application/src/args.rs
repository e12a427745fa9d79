//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use common::{Date, Money};
use service::domain::{chair, rental, renter};

/// Salon chair rental management.
#[derive(Debug, Parser)]
#[command(name = "salon", version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// [`Command`] to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Top-level command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manages chair rentals.
    #[command(subcommand)]
    Rental(Rental),

    /// Manages renters.
    #[command(subcommand)]
    Renter(Renter),

    /// Inspects chairs.
    #[command(subcommand)]
    Chair(Chair),
}

/// Rental command.
#[derive(Debug, Subcommand)]
pub enum Rental {
    /// Rents a chair for a single day.
    CreateDaily {
        /// ID of the chair to rent.
        #[arg(long = "chair")]
        chair_id: chair::Id,

        /// ID of the renter.
        #[arg(long = "renter")]
        renter_id: renter::Id,

        /// Day to rent the chair for (`YYYY-MM-DD`).
        #[arg(long)]
        date: Date,

        /// Price of the day.
        #[arg(long)]
        price: Money,

        /// Initial payment status.
        #[arg(long, default_value = "unpaid")]
        status: rental::PaymentStatus,
    },

    /// Rents a chair for a period billed per started month.
    CreateMonthly {
        /// ID of the chair to rent.
        #[arg(long = "chair")]
        chair_id: chair::Id,

        /// ID of the renter.
        #[arg(long = "renter")]
        renter_id: renter::Id,

        /// First day of the period (`YYYY-MM-DD`).
        #[arg(long)]
        start: Date,

        /// Last day of the period (`YYYY-MM-DD`).
        #[arg(long)]
        end: Date,

        /// Price of a single month.
        #[arg(long)]
        price: Money,

        /// Initial payment status.
        #[arg(long, default_value = "unpaid")]
        status: rental::PaymentStatus,
    },

    /// Changes the provided fields of an existing rental.
    Update {
        /// ID of the rental to update.
        id: rental::Id,

        /// ID of the chair to move the rental to.
        #[arg(long = "chair")]
        chair_id: Option<chair::Id>,

        /// New first day.
        #[arg(long)]
        start: Option<Date>,

        /// New last day.
        #[arg(long)]
        end: Option<Date>,

        /// New base price.
        #[arg(long)]
        price: Option<Money>,

        /// New payment status.
        #[arg(long)]
        status: Option<rental::PaymentStatus>,
    },

    /// Deletes a rental.
    Delete {
        /// ID of the rental to delete.
        id: rental::Id,
    },

    /// Shows a single rental.
    Show {
        /// ID of the rental to show.
        id: rental::Id,
    },

    /// Lists rentals not ended yet.
    Upcoming {
        /// Day to list the rentals from, today by default.
        #[arg(long)]
        from: Option<Date>,
    },

    /// Lists ended rentals.
    Completed {
        /// Day the rentals ended before, today by default.
        #[arg(long)]
        before: Option<Date>,
    },

    /// Lists all rentals of a chair.
    ByChair {
        /// ID of the chair.
        chair_id: chair::Id,
    },
}

/// Renter command.
#[derive(Debug, Subcommand)]
pub enum Renter {
    /// Registers a new renter.
    Create {
        /// Full name.
        #[arg(long)]
        name: renter::Name,

        /// Phone number, unique across renters.
        #[arg(long)]
        phone: renter::Phone,
    },

    /// Changes the provided fields of an existing renter.
    Update {
        /// ID of the renter to update.
        id: renter::Id,

        /// New full name.
        #[arg(long)]
        name: Option<renter::Name>,

        /// New phone number.
        #[arg(long)]
        phone: Option<renter::Phone>,
    },

    /// Shows a single renter.
    Show(RenterSelector),
}

/// Selector of a single renter.
#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
pub struct RenterSelector {
    /// ID of the renter.
    #[arg(long)]
    pub id: Option<renter::Id>,

    /// Phone number of the renter.
    #[arg(long)]
    pub phone: Option<renter::Phone>,
}

/// Chair command.
#[derive(Debug, Subcommand)]
pub enum Chair {
    /// Checks whether a chair exists.
    Check {
        /// ID of the chair.
        id: chair::Id,
    },
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;
    use service::domain::rental;

    use super::{Args, Command, Rental, Renter};

    #[test]
    fn parses_daily_rental() {
        let args = Args::try_parse_from([
            "salon",
            "rental",
            "create-daily",
            "--chair",
            "1",
            "--renter",
            "2",
            "--date",
            "2023-05-05",
            "--price",
            "150",
        ])
        .unwrap();

        assert_eq!(args.config, "config.toml");
        let Command::Rental(Rental::CreateDaily {
            chair_id,
            renter_id,
            status,
            ..
        }) = args.command
        else {
            panic!("unexpected command: {:?}", args.command);
        };
        assert_eq!(chair_id, 1.into());
        assert_eq!(renter_id, 2.into());
        assert_eq!(status, rental::PaymentStatus::Unpaid);
    }

    #[test]
    fn parses_partial_update() {
        let args = Args::try_parse_from([
            "salon",
            "--config",
            "salon.toml",
            "rental",
            "update",
            "7",
            "--status",
            "awaiting_payment",
        ])
        .unwrap();

        assert_eq!(args.config, "salon.toml");
        let Command::Rental(Rental::Update {
            id,
            chair_id,
            start,
            end,
            price,
            status,
        }) = args.command
        else {
            panic!("unexpected command: {:?}", args.command);
        };
        assert_eq!(id, 7.into());
        assert!(chair_id.is_none() && start.is_none() && end.is_none());
        assert!(price.is_none());
        assert_eq!(status, Some(rental::PaymentStatus::AwaitingPayment));
    }

    #[test]
    fn requires_single_renter_selector() {
        assert!(Args::try_parse_from(["salon", "renter", "show"]).is_err());
        assert!(Args::try_parse_from([
            "salon", "renter", "show", "--id", "1", "--phone", "12345678",
        ])
        .is_err());

        let args =
            Args::try_parse_from(["salon", "renter", "show", "--id", "1"])
                .unwrap();
        assert!(matches!(args.command, Command::Renter(Renter::Show(_))));
    }

    #[test]
    fn rejects_invalid_phone() {
        assert!(Args::try_parse_from([
            "salon", "renter", "create", "--name", "Mette", "--phone", "abc",
        ])
        .is_err());
    }
}
