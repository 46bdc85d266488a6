//! Validations of required attributes.

use crate::{
    domain::tender::{Period, PreQualification},
    request,
};

use super::Error;

/// Returns the `value` of the required attribute `name`.
///
/// # Errors
///
/// With [`Error::MissingRequiredAttribute`] if there is no `value`.
pub fn attribute<T>(value: Option<T>, name: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::MissingRequiredAttribute(name.into()))
}

/// Checks that the [`PreQualification`] is present and its period is
/// ordered.
///
/// # Errors
///
/// - With [`Error::MissingRequiredAttribute`] if it's absent.
/// - With [`Error::InvalidRange`] if its period doesn't start before it ends.
pub fn pre_qualification(
    pre_qualification: Option<&PreQualification>,
) -> Result<(), Error> {
    let pq = attribute(pre_qualification, "tender.preQualification")?;
    if pq.period.is_ordered() {
        Ok(())
    } else {
        Err(Error::InvalidRange(
            "pre-qualification period must start before it ends".into(),
        ))
    }
}

/// Checks that the tender [`Period`] is present and ordered.
///
/// # Errors
///
/// - With [`Error::MissingRequiredAttribute`] if it's absent.
/// - With [`Error::InvalidRange`] if it doesn't start before it ends.
pub fn tender_period(period: Option<&Period>) -> Result<(), Error> {
    let period = attribute(period, "tender.tenderPeriod")?;
    if period.is_ordered() {
        Ok(())
    } else {
        Err(Error::InvalidRange(
            "tender period must start before it ends".into(),
        ))
    }
}

/// Checks that the `received` [`request::Tender`] carries lots and items
/// when no items were stored before.
///
/// # Errors
///
/// With [`Error::MissingRequiredAttribute`] if any of them is absent.
pub fn items_present(
    received: &request::Tender,
    has_saved_items: bool,
) -> Result<(), Error> {
    if has_saved_items {
        return Ok(());
    }
    if received.lots.is_empty() {
        return Err(Error::MissingRequiredAttribute("tender.lots".into()));
    }
    if received.items.is_empty() {
        return Err(Error::MissingRequiredAttribute("tender.items".into()));
    }
    Ok(())
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::tender::PreQualification, request, test_support as fx,
        validation::ErrorKind,
    };

    #[test]
    fn requires_pre_qualification() {
        let err = super::pre_qualification(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredAttribute);

        let pq = PreQualification {
            period: fx::tender_period(),
        };
        assert!(super::pre_qualification(Some(&pq)).is_ok());
    }

    #[test]
    fn requires_items_without_saved_ones() {
        let mut received = request::Tender::default();
        assert!(super::items_present(&received, true).is_ok());

        let err = super::items_present(&received, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredAttribute);

        received.lots = vec![fx::received_lot("temp-1", "10", "EUR")];
        let err = super::items_present(&received, false).unwrap_err();
        assert!(err.to_string().contains("items"));

        received.items = vec![fx::item("item-1", "temp-1")];
        assert!(super::items_present(&received, false).is_ok());
    }

    #[test]
    fn requires_ordered_tender_period() {
        let mut period = fx::tender_period();
        assert!(super::tender_period(Some(&period)).is_ok());

        period.end_date = period.start_date;
        let err = super::tender_period(Some(&period)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }
}
