//! [`Tender`] value validations.

use common::Money;

#[cfg(doc)]
use crate::domain::Tender;

use super::Error;

/// Checks that the `computed` [`Tender`] value is in the same currency as
/// the `stored` one.
///
/// # Errors
///
/// With [`Error::CurrencyMismatch`] otherwise.
pub fn stored_currency(computed: &Money, stored: &Money) -> Result<(), Error> {
    if computed.currency == stored.currency {
        Ok(())
    } else {
        Err(Error::CurrencyMismatch(format!(
            "tender value currency `{}` differs from the stored `{}`",
            computed.currency, stored.currency,
        )))
    }
}
