//! [`Item`] definitions.

use derive_more::{AsRef, Display, From, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{lot, tender::Classification},
    reconcile::Identified,
};
#[cfg(doc)]
use crate::domain::{Lot, Tender};

/// Good, work or service procured within a [`Lot`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// ID of this [`Item`].
    pub id: Id,

    /// Identifier of this [`Item`] internal to the procuring entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,

    /// Main [`Classification`] of this [`Item`].
    pub classification: Classification,

    /// Additional [`Classification`]s of this [`Item`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_classifications: Vec<Classification>,

    /// Quantity of [`Unit`]s procured.
    pub quantity: Decimal,

    /// [`Unit`] the quantity is measured in.
    pub unit: Unit,

    /// Description of this [`Item`].
    pub description: String,

    /// ID of the [`Lot`] this [`Item`] belongs to.
    pub related_lot: lot::Id,
}

impl Item {
    /// Merges the `received` [`Item`] into this one.
    ///
    /// Classification, quantity and unit are immutable once created.
    #[must_use]
    pub fn update(self, received: Self) -> Self {
        Self {
            internal_id: received.internal_id.or(self.internal_id),
            description: received.description,
            related_lot: received.related_lot,
            ..self
        }
    }
}

impl Identified for Item {
    type Key = Id;

    fn key(&self) -> Id {
        self.id.clone()
    }
}

/// ID of an [`Item`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into, Ord,
    PartialEq, PartialOrd, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct Id(String);

/// Unit of measure of an [`Item`] quantity.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Unit {
    /// Code of this [`Unit`].
    pub id: String,

    /// Human-readable name of this [`Unit`].
    pub name: String,
}

#[cfg(test)]
mod spec {
    use crate::{domain::lot, test_support as fx};

    #[test]
    fn update_overwrites_description_and_related_lot() {
        let saved = fx::item("item-1", "lot-1");
        let mut received = fx::item("item-1", "lot-2");
        received.description = "Another".into();
        received.internal_id = None;
        received.quantity = saved.quantity * rust_decimal::Decimal::TWO;

        let merged = saved.clone().update(received);

        assert_eq!(merged.description, "Another");
        assert_eq!(merged.related_lot, lot::Id::from("lot-2"));
        assert_eq!(merged.internal_id, saved.internal_id);
        assert_eq!(merged.quantity, saved.quantity);
    }

    #[test]
    fn update_overrides_internal_id_when_present() {
        let saved = fx::item("item-1", "lot-1");
        let mut received = saved.clone();
        received.internal_id = Some("INT-2".into());

        assert_eq!(
            saved.update(received).internal_id.as_deref(),
            Some("INT-2"),
        );
    }
}
