//! Electronic auction validations.

use std::collections::HashSet;

use crate::{
    domain::{
        lot,
        tender::{ElectronicAuctions, Modality},
    },
    request,
};

use super::Error;

/// Checks that the auction data of the `received` [`request::Tender`] agrees
/// with the declared modalities and with whether an auction `is_required`.
///
/// # Errors
///
/// With [`Error::InconsistentAuctionSignal`] on any disagreement.
pub fn consistency(
    received: &request::Tender,
    is_required: bool,
) -> Result<(), Error> {
    let has_modality = received
        .procurement_method_modalities
        .contains(&Modality::ElectronicAuction);
    let has_details = received
        .electronic_auctions
        .as_ref()
        .is_some_and(|a| !a.details.is_empty());

    if is_required && !(has_modality && has_details) {
        return Err(Error::InconsistentAuctionSignal(
            "electronic auction is required".into(),
        ));
    }
    match (received.electronic_auctions.is_some(), has_modality) {
        (true, false) => Err(Error::InconsistentAuctionSignal(format!(
            "electronic auctions require `{}` modality",
            Modality::ElectronicAuction,
        ))),
        (false, true) => Err(Error::InconsistentAuctionSignal(format!(
            "`{}` modality requires electronic auctions",
            Modality::ElectronicAuction,
        ))),
        (true, true) | (false, false) => Ok(()),
    }
}

/// Checks that every auction relates to one of the `known` lots.
///
/// # Errors
///
/// With [`Error::DanglingReference`] on the first unresolved reference.
pub fn related_lots_exist(
    auctions: Option<&ElectronicAuctions>,
    known: &HashSet<&lot::Id>,
) -> Result<(), Error> {
    auctions
        .into_iter()
        .flat_map(|a| &a.details)
        .find(|d| !known.contains(&d.related_lot))
        .map_or(Ok(()), |d| {
            Err(Error::DanglingReference(format!(
                "auction `{}` relates to unknown lot `{}`",
                d.id, d.related_lot,
            )))
        })
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use crate::{
        domain::{lot, tender::Modality},
        request, test_support as fx,
        validation::ErrorKind,
    };

    fn with_auction(modality: bool, details: bool) -> request::Tender {
        request::Tender {
            procurement_method_modalities: if modality {
                vec![Modality::ElectronicAuction]
            } else {
                vec![]
            },
            electronic_auctions: details
                .then(|| fx::electronic_auctions("temp-1")),
            ..request::Tender::default()
        }
    }

    #[test]
    fn requires_auction_when_rules_say_so() {
        assert!(super::consistency(&with_auction(true, true), true).is_ok());

        for (m, d) in [(false, false), (true, false), (false, true)] {
            let err =
                super::consistency(&with_auction(m, d), true).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InconsistentAuctionSignal);
        }
    }

    #[test]
    fn requires_modality_to_match_details() {
        assert!(super::consistency(&with_auction(false, false), false).is_ok());
        assert!(super::consistency(&with_auction(true, true), false).is_ok());

        for (m, d) in [(true, false), (false, true)] {
            let err =
                super::consistency(&with_auction(m, d), false).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InconsistentAuctionSignal);
        }
    }

    #[test]
    fn requires_known_related_lots() {
        let known_lot = lot::Id::from("temp-1");
        let known = HashSet::from([&known_lot]);

        let auctions = fx::electronic_auctions("temp-1");
        assert!(super::related_lots_exist(Some(&auctions), &known).is_ok());
        assert!(super::related_lots_exist(None, &known).is_ok());

        let auctions = fx::electronic_auctions("ghost");
        let err =
            super::related_lots_exist(Some(&auctions), &known).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingReference);
    }
}
