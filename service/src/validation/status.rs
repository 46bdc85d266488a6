//! [`Tender`] status validations.

use crate::domain::{tender::Status, Tender};

use super::Error;

/// Checks that the [`Tender`] is [`Status::Active`].
///
/// # Errors
///
/// With [`Error::InvalidStatus`] otherwise.
pub fn active(tender: &Tender) -> Result<(), Error> {
    if tender.status == Status::Active {
        Ok(())
    } else {
        Err(Error::InvalidStatus(format!(
            "tender must be `{}`, but is `{}`",
            Status::Active,
            tender.status,
        )))
    }
}

/// Checks that a contract notice may be created out of the planning
/// [`Tender`].
///
/// # Errors
///
/// With [`Error::InvalidStatus`] if the [`Tender`] is
/// [`Status::Unsuccessful`] or is not planning anymore.
pub fn planning_compatible(tender: &Tender) -> Result<(), Error> {
    match tender.status {
        Status::Planning | Status::Planned => Ok(()),
        Status::Unsuccessful => Err(Error::InvalidStatus(
            "planning notice is unsuccessful".into(),
        )),
        s @ (Status::Active | Status::Cancelled | Status::Complete) => {
            Err(Error::InvalidStatus(format!(
                "planning notice must be `{}` or `{}`, but is `{s}`",
                Status::Planning,
                Status::Planned,
            )))
        }
    }
}
