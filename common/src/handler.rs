//! [`Handler`] abstraction.
//!
//! Commands, queries and storage operations are all expressed as a [`Handler`]
//! of some argument type, so a single value can handle many kinds of requests.

use std::future::Future;

/// Something able to handle `Args` asynchronously.
pub trait Handler<Args = ()> {
    /// Type of a successful outcome.
    type Ok;

    /// Type of a failed outcome.
    type Err;

    /// Handles the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
