//! Building blocks shared by [`Command`]s.
//!
//! [`Command`]: super::Command

use std::collections::HashSet;

use crate::{
    domain::{
        criterion::{self, RelatesTo},
        document, item, lot,
        tender::ElectronicAuctions,
        Conversion, Criterion, Document, Item, Lot, MissingAttribute,
    },
    infra::{generator::IdKind, Generator},
    reconcile::{self, Mapping},
    request,
};

/// Temporary to permanent IDs replaced during a single request.
#[derive(Debug, Default)]
pub(super) struct Ids {
    /// [`Lot`] IDs.
    pub(super) lots: Mapping<lot::Id>,

    /// [`Item`] IDs.
    pub(super) items: Mapping<item::Id>,
}

/// Reconciles the `received` lots with the `saved` ones, creating the new
/// ones with permanent IDs.
///
/// Merged lots are updated by [`Lot::update()`], with their value replaced
/// by the received one for active lots.
pub(super) fn lots<G: Generator>(
    received: Vec<request::Lot>,
    saved: Vec<Lot>,
    generator: &G,
    ids: &mut Ids,
) -> Result<Vec<Lot>, MissingAttribute> {
    reconcile::try_reconcile(
        received,
        saved,
        |s, r| {
            let value = r.value.clone();
            let mut merged = s.update(r);
            if merged.is_active() {
                merged.value = value;
            }
            Ok(merged)
        },
        |r| {
            let id = lot::Id::from(generator.generate(IdKind::Lot));
            ids.lots.insert(r.id.clone(), id.clone());
            Lot::create(id, r)
        },
    )
}

/// Makes all the provided lots active.
pub(super) fn activate(lots: &mut [Lot]) {
    for l in lots {
        l.status = lot::Status::Active;
        l.status_details = lot::StatusDetails::Empty;
    }
}

/// Reconciles the `received` items with the `saved` ones, creating the new
/// ones with permanent IDs.
///
/// Related lots are resolved to permanent IDs beforehand.
pub(super) fn items<G: Generator>(
    mut received: Vec<Item>,
    saved: Vec<Item>,
    generator: &G,
    ids: &mut Ids,
) -> Vec<Item> {
    for i in &mut received {
        ids.lots.rewrite(&mut i.related_lot);
    }
    reconcile::reconcile(received, saved, Item::update, |mut i| {
        let id = item::Id::from(generator.generate(IdKind::Item));
        ids.items.insert(i.id.clone(), id.clone());
        i.id = id;
        i
    })
}

/// Reconciles the `received` documents with the `saved` ones.
///
/// Related lots are resolved to permanent IDs beforehand.
pub(super) fn documents(
    mut received: Vec<Document>,
    saved: Vec<Document>,
    ids: &Ids,
) -> Vec<Document> {
    for d in &mut received {
        for l in &mut d.related_lots {
            ids.lots.rewrite(l);
        }
    }
    reconcile::reconcile(received, saved, Document::update, |d| d)
}

/// Assigns permanent IDs to the provided auctions, resolving their related
/// lots.
///
/// IDs listed as `existing` are kept as is.
pub(super) fn auctions<G: Generator>(
    auctions: Option<ElectronicAuctions>,
    existing: &HashSet<&str>,
    generator: &G,
    ids: &Ids,
) -> Option<ElectronicAuctions> {
    auctions.map(|mut a| {
        for d in &mut a.details {
            if !existing.contains(d.id.as_str()) {
                d.id = generator.generate(IdKind::Auction);
            }
            ids.lots.rewrite(&mut d.related_lot);
        }
        a
    })
}

/// Assigns permanent IDs to the provided criteria, resolving their related
/// lots and items, and rewrites the conversions to the new requirement IDs.
pub(super) fn criteria<G: Generator>(
    mut criteria: Vec<Criterion>,
    mut conversions: Vec<Conversion>,
    generator: &G,
    ids: &Ids,
) -> (Vec<Criterion>, Vec<Conversion>) {
    let mut requirements = Mapping::default();

    for c in &mut criteria {
        c.id = generator.generate(IdKind::Criterion).into();
        if let Some(related) = &mut c.related_item {
            match c.relates_to {
                Some(RelatesTo::Lot) => {
                    *related =
                        ids.lots.resolve(&related.as_str().into()).into();
                }
                Some(RelatesTo::Item) => {
                    *related =
                        ids.items.resolve(&related.as_str().into()).into();
                }
                Some(RelatesTo::Tenderer) | None => {}
            }
        }
        for g in &mut c.requirement_groups {
            g.id = generator.generate(IdKind::RequirementGroup).into();
            for r in &mut g.requirements {
                let id = criterion::RequirementId::from(
                    generator.generate(IdKind::Requirement),
                );
                requirements.insert(r.id.clone(), id.clone());
                r.id = id;
            }
        }
    }
    for c in &mut conversions {
        requirements.rewrite(&mut c.related_item);
    }

    (criteria, conversions)
}

/// Collects the IDs of the lots and items the criteria may reference.
pub(super) fn criteria_targets<'a>(
    received: &'a request::Tender,
    saved_lots: &'a [Lot],
    saved_items: &'a [Item],
) -> (HashSet<&'a str>, HashSet<&'a str>) {
    let lots = received
        .lots
        .iter()
        .map(|l| l.id.as_ref())
        .chain(saved_lots.iter().map(|l| l.id.as_ref()))
        .collect();
    let items = received
        .items
        .iter()
        .chain(saved_items)
        .map(|i| i.id.as_ref())
        .collect();
    (lots, items)
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use crate::{
        domain::{criterion::RelatesTo, document::DocumentType, item, lot},
        test_support::{self as fx, Sequential},
    };

    use super::Ids;

    #[test]
    fn new_lots_get_permanent_ids_and_references_follow() {
        let generator = Sequential::default();
        let mut ids = Ids::default();

        let lots = super::lots(
            vec![
                fx::received_lot("lot-1", "300", "EUR"),
                fx::received_lot("temp-1", "50", "EUR"),
            ],
            vec![fx::lot("lot-1", "100", "EUR")],
            &generator,
            &mut ids,
        )
        .unwrap();

        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0].id, lot::Id::from("lot-1"));
        assert_eq!(lots[0].value, "300EUR".parse().unwrap());
        let permanent = lots[1].id.clone();
        assert_ne!(permanent, lot::Id::from("temp-1"));
        assert_eq!(ids.lots.resolve(&"temp-1".into()), permanent);

        let items = super::items(
            vec![fx::item("item-new", "temp-1")],
            vec![],
            &generator,
            &mut ids,
        );
        assert_eq!(items[0].related_lot, permanent);
        assert_ne!(items[0].id, item::Id::from("item-new"));

        let docs = super::documents(
            vec![fx::document(
                "doc-1",
                DocumentType::TenderNotice,
                &["temp-1", "lot-1"],
            )],
            vec![],
            &ids,
        );
        assert_eq!(docs[0].related_lots, [permanent.clone(), "lot-1".into()]);

        let auctions = super::auctions(
            Some(fx::electronic_auctions("temp-1")),
            &HashSet::new(),
            &generator,
            &ids,
        )
        .unwrap();
        assert_eq!(auctions.details[0].related_lot, permanent);
        assert_ne!(auctions.details[0].id, "auction-1");
    }

    #[test]
    fn planning_lot_values_are_kept() {
        let generator = Sequential::default();
        let mut planning = fx::lot("lot-1", "100", "EUR");
        planning.status = lot::Status::Planning;

        let lots = super::lots(
            vec![fx::received_lot("lot-1", "300", "EUR")],
            vec![planning],
            &generator,
            &mut Ids::default(),
        )
        .unwrap();

        assert_eq!(lots[0].value, "100EUR".parse().unwrap());

        let mut lots = lots;
        super::activate(&mut lots);
        assert_eq!(lots[0].status, lot::Status::Active);
    }

    #[test]
    fn criteria_get_permanent_ids() {
        let generator = Sequential::default();
        let mut ids = Ids::default();
        ids.lots.insert("temp-1".into(), "perm-1".into());

        let (criteria, conversions) = super::criteria(
            vec![fx::criterion("c-1", Some((RelatesTo::Lot, "temp-1")), "r-1")],
            vec![fx::conversion("conv-1", "r-1")],
            &generator,
            &ids,
        );

        assert_ne!(criteria[0].id, "c-1".into());
        assert_eq!(criteria[0].related_item.as_deref(), Some("perm-1"));
        let requirement = &criteria[0].requirement_groups[0].requirements[0];
        assert_ne!(requirement.id, "r-1".into());
        assert_eq!(conversions[0].related_item, requirement.id);
    }
}
