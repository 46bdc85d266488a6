//! Evaluation [`Criterion`] validations.

use std::collections::HashSet;

use crate::domain::criterion::{Criterion, RelatesTo};

use super::{first_duplicate, Error};

/// Checks that every [`Criterion`] relating to a lot or an item references
/// one of the `lots` or `items` respectively.
///
/// # Errors
///
/// - With [`Error::DuplicateIdentity`] if [`Criterion`] IDs repeat.
/// - With [`Error::MissingRequiredAttribute`] if a [`Criterion`] relating to
///   a lot or an item doesn't reference any.
/// - With [`Error::DanglingReference`] on the first unresolved reference.
pub fn related_items_exist(
    criteria: &[Criterion],
    lots: &HashSet<&str>,
    items: &HashSet<&str>,
) -> Result<(), Error> {
    if let Some(id) = first_duplicate(criteria.iter().map(|c| &c.id)) {
        return Err(Error::DuplicateIdentity(format!("criterion `{id}`")));
    }

    for c in criteria {
        let known = match c.relates_to {
            Some(RelatesTo::Lot) => lots,
            Some(RelatesTo::Item) => items,
            Some(RelatesTo::Tenderer) | None => continue,
        };
        let related = c.related_item.as_deref().ok_or_else(|| {
            Error::MissingRequiredAttribute(format!(
                "criterion `{}` relatedItem",
                c.id,
            ))
        })?;
        if !known.contains(related) {
            return Err(Error::DanglingReference(format!(
                "criterion `{}` relates to unknown {} `{related}`",
                c.id,
                c.relates_to.map_or("", |r| r.as_str()),
            )));
        }
    }
    Ok(())
}
