//! [`Conversion`] validations.

use std::collections::HashSet;

use crate::domain::{Conversion, Criterion};

use super::Error;

/// Checks that every [`Conversion`] applies to a requirement of the provided
/// [`Criterion`]s.
///
/// # Errors
///
/// With [`Error::DanglingReference`] on the first unresolved reference.
pub fn related_requirements_exist(
    conversions: &[Conversion],
    criteria: &[Criterion],
) -> Result<(), Error> {
    let requirements = criteria
        .iter()
        .flat_map(Criterion::requirements)
        .map(|r| &r.id)
        .collect::<HashSet<_>>();

    conversions
        .iter()
        .find(|c| !requirements.contains(&c.related_item))
        .map_or(Ok(()), |c| {
            Err(Error::DanglingReference(format!(
                "conversion `{}` relates to unknown requirement `{}`",
                c.id, c.related_item,
            )))
        })
}
