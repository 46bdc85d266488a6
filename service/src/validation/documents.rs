//! [`Document`]-related validations.

use std::collections::HashSet;

use crate::domain::{lot, Document};

use super::{first_duplicate, Error};

/// Checks that IDs of the `received` [`Document`]s are unique.
///
/// # Errors
///
/// With [`Error::DuplicateIdentity`] on the first repeated ID.
pub fn unique_ids(received: &[Document]) -> Result<(), Error> {
    first_duplicate(received.iter().map(|d| &d.id)).map_or(Ok(()), |id| {
        Err(Error::DuplicateIdentity(format!("document `{id}`")))
    })
}

/// Checks that every [`Document`] relates to the `known` lots only.
///
/// # Errors
///
/// With [`Error::DanglingReference`] on the first unresolved reference.
pub fn related_lots_exist(
    received: &[Document],
    known: &HashSet<&lot::Id>,
) -> Result<(), Error> {
    for d in received {
        if let Some(l) = d.related_lots.iter().find(|l| !known.contains(l)) {
            return Err(Error::DanglingReference(format!(
                "document `{}` relates to unknown lot `{l}`",
                d.id,
            )));
        }
    }
    Ok(())
}

/// Checks that no [`Document`] is of a planning-only type.
///
/// # Errors
///
/// With [`Error::InvalidEnumValue`] on the first planning-only type.
pub fn allowed_types(received: &[Document]) -> Result<(), Error> {
    received
        .iter()
        .find(|d| d.document_type.is_planning_only())
        .map_or(Ok(()), |d| {
            Err(Error::InvalidEnumValue(format!(
                "document `{}` type `{}` is allowed in planning notices only",
                d.id, d.document_type,
            )))
        })
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use crate::{
        domain::{document::DocumentType, lot},
        test_support as fx,
        validation::ErrorKind,
    };

    #[test]
    fn rejects_duplicate_ids() {
        let docs = [
            fx::document("doc-1", DocumentType::TenderNotice, &[]),
            fx::document("doc-1", DocumentType::BiddingDocuments, &[]),
        ];

        let err = super::unique_ids(&docs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
    }

    #[test]
    fn rejects_unknown_related_lots() {
        let (received, saved) =
            (lot::Id::from("temp-1"), lot::Id::from("perm-1"));
        let known = HashSet::from([&received, &saved]);

        let doc = fx::document(
            "doc-1",
            DocumentType::TenderNotice,
            &["temp-1", "perm-1"],
        );
        assert!(super::related_lots_exist(&[doc], &known).is_ok());

        let doc = fx::document(
            "doc-1",
            DocumentType::TenderNotice,
            &["temp-1", "ghost"],
        );
        let err = super::related_lots_exist(&[doc], &known).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingReference);
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn rejects_planning_only_types() {
        let doc = fx::document("doc-1", DocumentType::FeasibilityStudy, &[]);

        let err = super::allowed_types(&[doc]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    }
}
