//! [`Item`]-related validations.

use std::collections::HashSet;

use crate::domain::{lot, Item};

use super::{first_duplicate, Error};

/// Checks that IDs of the `received` [`Item`]s are unique.
///
/// # Errors
///
/// With [`Error::DuplicateIdentity`] on the first repeated ID.
pub fn unique_ids(received: &[Item]) -> Result<(), Error> {
    first_duplicate(received.iter().map(|i| &i.id)).map_or(Ok(()), |id| {
        Err(Error::DuplicateIdentity(format!("item `{id}`")))
    })
}

/// Checks that every [`Item`] relates to one of the `known` lots.
///
/// # Errors
///
/// With [`Error::DanglingReference`] on the first unresolved reference.
pub fn related_lots_exist(
    received: &[Item],
    known: &HashSet<&lot::Id>,
) -> Result<(), Error> {
    received
        .iter()
        .find(|i| !known.contains(&i.related_lot))
        .map_or(Ok(()), |i| {
            Err(Error::DanglingReference(format!(
                "item `{}` relates to unknown lot `{}`",
                i.id, i.related_lot,
            )))
        })
}

/// Checks that every [`Item`] quantity is positive.
///
/// # Errors
///
/// With [`Error::InvalidRange`] on the first non-positive quantity.
pub fn positive_quantities(received: &[Item]) -> Result<(), Error> {
    received
        .iter()
        .find(|i| i.quantity <= rust_decimal::Decimal::ZERO)
        .map_or(Ok(()), |i| {
            Err(Error::InvalidRange(format!(
                "quantity of item `{}` must be positive",
                i.id,
            )))
        })
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use rust_decimal::Decimal;

    use crate::{domain::lot, test_support as fx, validation::ErrorKind};

    #[test]
    fn rejects_duplicate_ids() {
        let items = [fx::item("item-1", "lot-1"), fx::item("item-1", "lot-2")];

        let err = super::unique_ids(&items).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
    }

    #[test]
    fn requires_known_related_lots() {
        let lot = lot::Id::from("lot-1");
        let known = HashSet::from([&lot]);

        assert!(super::related_lots_exist(
            &[fx::item("item-1", "lot-1")],
            &known,
        )
        .is_ok());

        let err =
            super::related_lots_exist(&[fx::item("item-1", "lot-2")], &known)
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingReference);
    }

    #[test]
    fn requires_positive_quantities() {
        let mut item = fx::item("item-1", "lot-1");
        assert!(super::positive_quantities(&[item.clone()]).is_ok());

        item.quantity = Decimal::ZERO;
        let err = super::positive_quantities(&[item]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }
}
