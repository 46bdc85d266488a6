//! Request payloads received by [`Command`]s.
//!
//! Unlike the persisted [`domain`] entities, these may carry temporary IDs
//! and partially specified substructures.
//!
//! [`Command`]: crate::Command

use common::Money;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        criterion::{Conversion, Criterion},
        lot::{self, AddressUnit, Options, Recurrence, Renewal, Variants},
        organization,
        tender::{
            AwardCriteria, AwardCriteriaDetails, ElectronicAuctions, Modality,
            Period, PreQualification, SecondStage,
        },
        Document, Item, Person,
    },
    reconcile::Identified,
};
#[cfg(doc)]
use crate::domain;

/// [`domain::Tender`] as received in a request.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// Title of the [`domain::Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description of the [`domain::Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Justification of the procurement method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procurement_method_rationale: Option<String>,

    /// [`Period`] for submitting bids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tender_period: Option<Period>,

    /// [`Period`] for asking questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enquiry_period: Option<Period>,

    /// [`Modality`]s of the procurement method.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procurement_method_modalities: Vec<Modality>,

    /// [`ElectronicAuctions`] details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electronic_auctions: Option<ElectronicAuctions>,

    /// [`Lot`]s, possibly with temporary IDs.
    #[serde(default)]
    pub lots: Vec<Lot>,

    /// [`Item`]s, possibly with temporary IDs.
    #[serde(default)]
    pub items: Vec<Item>,

    /// [`Document`]s.
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Evaluation [`Criterion`]s.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,

    /// [`Conversion`]s of the [`Criterion`] requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<Conversion>,

    /// [`AwardCriteria`] of the [`domain::Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_criteria: Option<AwardCriteria>,

    /// [`AwardCriteriaDetails`] of the [`domain::Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_criteria_details: Option<AwardCriteriaDetails>,

    /// [`ProcuringEntity`] reference with its [`Person`]s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procuring_entity: Option<ProcuringEntity>,

    /// [`SecondStage`] candidates range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_stage: Option<SecondStage>,

    /// [`PreQualification`] stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_qualification: Option<PreQualification>,
}

impl Tender {
    /// Returns the [`Person`]s of the received [`ProcuringEntity`].
    #[must_use]
    pub fn persons(&self) -> &[Person] {
        self.procuring_entity
            .as_ref()
            .map_or(&[], |pe| pe.persons.as_slice())
    }
}

/// [`domain::Lot`] as received in a request.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Permanent ID of an existing [`domain::Lot`], or a temporary one.
    pub id: lot::Id,

    /// Identifier internal to the procuring entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,

    /// Title.
    pub title: String,

    /// Description.
    pub description: String,

    /// Estimated value.
    pub value: Money,

    /// Contract [`Period`].
    pub contract_period: Period,

    /// [`PlaceOfPerformance`].
    #[serde(default)]
    pub place_of_performance: PlaceOfPerformance,

    /// [`Options`] details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,

    /// [`Variants`] details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Variants>,

    /// [`Renewal`] details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal: Option<Renewal>,

    /// [`Recurrence`] details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Identified for Lot {
    type Key = lot::Id;

    fn key(&self) -> lot::Id {
        self.id.clone()
    }
}

/// Partially specified [`lot::PlaceOfPerformance`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PlaceOfPerformance {
    /// [`Address`], if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// Description, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partially specified [`lot::Address`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street part, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,

    /// Postal code, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// [`AddressDetails`], if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_details: Option<AddressDetails>,
}

/// Partially specified [`lot::AddressDetails`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AddressDetails {
    /// Country, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<AddressUnit>,

    /// Region, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<AddressUnit>,

    /// Locality, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<AddressUnit>,
}

/// Reference to the [`domain::ProcuringEntity`] carrying its [`Person`]s.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProcuringEntity {
    /// ID of the referenced [`domain::ProcuringEntity`].
    pub id: organization::Id,

    /// Responsible [`Person`]s.
    #[serde(default)]
    pub persons: Vec<Person>,
}
