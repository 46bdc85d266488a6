//! [`ProcuringEntity`] and [`Person`]-related validations.

use common::DateTime;

use crate::{
    domain::{organization, Person},
    reconcile::Identified as _,
    request,
};
#[cfg(doc)]
use crate::domain::ProcuringEntity;

use super::{first_duplicate, Error};

/// Checks that the `received` [`ProcuringEntity`] keeps the ID of the
/// `saved` one, as this ID is immutable once stored.
///
/// # Errors
///
/// With [`Error::DanglingReference`] if the IDs differ.
pub fn same_procuring_entity(
    received: Option<&request::ProcuringEntity>,
    saved: &organization::Id,
) -> Result<(), Error> {
    match received {
        Some(pe) if &pe.id != saved => Err(Error::DanglingReference(format!(
            "procuring entity ID is immutable, `{}` cannot replace the \
             stored `{saved}`",
            pe.id,
        ))),
        Some(_) | None => Ok(()),
    }
}

/// Checks that the `received` [`Person`]s are unique by their identifier.
///
/// # Errors
///
/// With [`Error::DuplicateIdentity`] on the first repeated [`Person`].
pub fn unique_persons(received: &[Person]) -> Result<(), Error> {
    first_duplicate(received.iter().map(Person::key)).map_or(Ok(()), |key| {
        Err(Error::DuplicateIdentity(format!("person `{key}`")))
    })
}

/// Checks that business functions of each [`Person`] are unique.
///
/// # Errors
///
/// With [`Error::DuplicateIdentity`] on the first repeated ID.
pub fn unique_business_functions(received: &[Person]) -> Result<(), Error> {
    for p in received {
        if let Some(id) =
            first_duplicate(p.business_functions.iter().map(|bf| &bf.id))
        {
            return Err(Error::DuplicateIdentity(format!(
                "business function `{id}` of person `{}`",
                p.key(),
            )));
        }
    }
    Ok(())
}

/// Checks that documents of each business function are unique.
///
/// # Errors
///
/// With [`Error::DuplicateIdentity`] on the first repeated ID.
pub fn unique_business_function_documents(
    received: &[Person],
) -> Result<(), Error> {
    for bf in received.iter().flat_map(|p| &p.business_functions) {
        if let Some(id) = first_duplicate(bf.documents.iter().map(|d| &d.id)) {
            return Err(Error::DuplicateIdentity(format!(
                "document `{id}` of business function `{}`",
                bf.id,
            )));
        }
    }
    Ok(())
}

/// Checks that no business function is of a deprecated type.
///
/// # Errors
///
/// With [`Error::InvalidEnumValue`] naming the replacement type.
pub fn business_function_types(received: &[Person]) -> Result<(), Error> {
    for bf in received.iter().flat_map(|p| &p.business_functions) {
        if let Some(replacement) = bf.kind.replacement() {
            return Err(Error::InvalidEnumValue(format!(
                "business function `{}` type `{}` is deprecated, \
                 use `{replacement}`",
                bf.id, bf.kind,
            )));
        }
    }
    Ok(())
}

/// Checks that no business function starts after the `start_date`.
///
/// # Errors
///
/// With [`Error::InvalidRange`] on the first business function starting
/// later.
pub fn business_function_periods(
    received: &[Person],
    start_date: DateTime,
) -> Result<(), Error> {
    received
        .iter()
        .flat_map(|p| &p.business_functions)
        .find(|bf| bf.period.start_date > start_date)
        .map_or(Ok(()), |bf| {
            Err(Error::InvalidRange(format!(
                "business function `{}` must start no later than {start_date}",
                bf.id,
            )))
        })
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::organization::{self, BusinessFunctionType},
        request, test_support as fx,
        validation::ErrorKind,
    };

    #[test]
    fn requires_same_procuring_entity() {
        let saved = organization::Id::from("MD-IDNO-1");
        let mut received = request::ProcuringEntity {
            id: saved.clone(),
            persons: vec![],
        };
        assert!(super::same_procuring_entity(Some(&received), &saved).is_ok());
        assert!(super::same_procuring_entity(None, &saved).is_ok());

        received.id = organization::Id::from("MD-IDNO-2");
        let err =
            super::same_procuring_entity(Some(&received), &saved).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingReference);
        assert!(err.to_string().contains("immutable"), "{err}");
    }

    #[test]
    fn rejects_duplicate_persons() {
        let persons = [
            fx::person("MD-IDNO", "1"),
            fx::person("MD-IDNO", "2"),
            fx::person("MD-IDNO", "1"),
        ];

        let err = super::unique_persons(&persons).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
        assert!(super::unique_persons(&persons[..2]).is_ok());
    }

    #[test]
    fn rejects_duplicate_business_functions_and_documents() {
        let mut person = fx::person("MD-IDNO", "1");
        let bf = person.business_functions[0].clone();
        person.business_functions.push(bf);
        let err =
            super::unique_business_functions(&[person.clone()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);

        drop(person.business_functions.pop());
        person.business_functions[0].documents = vec![
            fx::bf_document("doc-1", None),
            fx::bf_document("doc-1", None),
        ];
        assert!(super::unique_business_functions(&[person.clone()]).is_ok());
        let err =
            super::unique_business_function_documents(&[person]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentity);
    }

    #[test]
    fn rejects_authority_business_function() {
        let mut person = fx::person("MD-IDNO", "1");
        assert!(super::business_function_types(&[person.clone()]).is_ok());

        person.business_functions[0].kind = BusinessFunctionType::Authority;
        let err = super::business_function_types(&[person]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
        assert!(err.to_string().contains("chairman"));
    }

    #[test]
    fn requires_business_functions_started() {
        let person = fx::person("MD-IDNO", "1");
        assert!(super::business_function_periods(
            &[person.clone()],
            fx::start_date(),
        )
        .is_ok());

        let early = DateTime::from_rfc3339("2000-01-01T00:00:00Z").unwrap();
        let err = super::business_function_periods(&[person], early)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }
}
