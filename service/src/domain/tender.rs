//! [`Tender`] definitions.

use common::{define_kind, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::domain::{
    criterion::{Conversion, Criterion},
    lot, Document, Item, Lot, ProcuringEntity,
};

/// Tender of a contract notice.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// ID of this [`Tender`].
    pub id: Id,

    /// [`Status`] of this [`Tender`].
    pub status: Status,

    /// [`StatusDetails`] of this [`Tender`].
    pub status_details: StatusDetails,

    /// Title of this [`Tender`].
    pub title: String,

    /// Description of this [`Tender`].
    pub description: String,

    /// Main [`Classification`] of this [`Tender`].
    pub classification: Classification,

    /// [`ProcurementMethod`] this [`Tender`] is conducted by.
    pub procurement_method: ProcurementMethod,

    /// Details of the [`ProcurementMethod`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procurement_method_details: Option<String>,

    /// Justification of the [`ProcurementMethod`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procurement_method_rationale: Option<String>,

    /// [`MainProcurementCategory`] of this [`Tender`].
    pub main_procurement_category: MainProcurementCategory,

    /// Estimated value of this [`Tender`].
    pub value: Money,

    /// Overall contract [`Period`] of this [`Tender`].
    ///
    /// [`None`] while no [`Lot`]s are defined yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_period: Option<Period>,

    /// [`Period`] for submitting bids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tender_period: Option<Period>,

    /// [`Period`] for asking questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enquiry_period: Option<Period>,

    /// [`ProcuringEntity`] conducting this [`Tender`].
    pub procuring_entity: ProcuringEntity,

    /// [`Lot`]s of this [`Tender`].
    #[serde(default)]
    pub lots: Vec<Lot>,

    /// [`Item`]s of this [`Tender`].
    #[serde(default)]
    pub items: Vec<Item>,

    /// [`Document`]s of this [`Tender`].
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Evaluation [`Criterion`]s of this [`Tender`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,

    /// [`Conversion`]s of the [`Criterion`] requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<Conversion>,

    /// [`AwardCriteria`] of this [`Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_criteria: Option<AwardCriteria>,

    /// [`AwardCriteriaDetails`] of this [`Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_criteria_details: Option<AwardCriteriaDetails>,

    /// [`Modality`]s of the procurement method.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procurement_method_modalities: Vec<Modality>,

    /// [`ElectronicAuctions`] of this [`Tender`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electronic_auctions: Option<ElectronicAuctions>,

    /// [`SecondStage`] candidates range of a selective [`Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_stage: Option<SecondStage>,

    /// [`PreQualification`] of a selective [`Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_qualification: Option<PreQualification>,
}

impl Tender {
    /// Returns the [`Lot`]s of this [`Tender`] being [`lot::Status::Active`].
    pub fn active_lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter().filter(|l| l.status == lot::Status::Active)
    }

    /// Indicates whether this [`Tender`] requests an electronic auction.
    #[must_use]
    pub fn has_electronic_auction(&self) -> bool {
        self.procurement_method_modalities
            .contains(&Modality::ElectronicAuction)
    }
}

/// ID of a [`Tender`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into, PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Id(String);

define_kind! {
    #[doc = "Status of a [`Tender`]."]
    enum Status {
        #[doc = "Planning is in progress."]
        #[value = "planning"]
        Planning,

        #[doc = "Planning is finished, the [`Tender`] is not announced yet."]
        #[value = "planned"]
        Planned,

        #[doc = "The [`Tender`] is announced and running."]
        #[value = "active"]
        Active,

        #[doc = "The [`Tender`] was cancelled."]
        #[value = "cancelled"]
        Cancelled,

        #[doc = "The [`Tender`] was unsuccessful."]
        #[value = "unsuccessful"]
        Unsuccessful,

        #[doc = "The [`Tender`] is complete."]
        #[value = "complete"]
        Complete,
    }
}

define_kind! {
    #[doc = "Details of a [`Tender`] [`Status`]."]
    enum StatusDetails {
        #[doc = "No details."]
        #[value = "empty"]
        Empty,

        #[doc = "Planning notice is being prepared."]
        #[value = "planning"]
        Planning,

        #[doc = "Questions may be asked about the [`Tender`]."]
        #[value = "clarification"]
        Clarification,

        #[doc = "Candidates may submit their applications."]
        #[value = "submission"]
        Submission,

        #[doc = "Negotiations with suppliers are held."]
        #[value = "negotiation"]
        Negotiation,
    }
}

/// Family of [`ProcurementMethod`]s sharing a contract period behavior.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum MethodFamily {
    /// Open, simplified and multi-stage procedures.
    Open,

    /// Restricted and negotiated procedures.
    Restricted,
}

define_kind! {
    #[doc = "Procurement method of a [`Tender`]."]
    enum ProcurementMethod {
        #[doc = "Open tender."]
        #[value = "OT"]
        Ot,

        #[doc = "Small value procurement."]
        #[value = "SV"]
        Sv,

        #[doc = "Micro value procurement."]
        #[value = "MV"]
        Mv,

        #[doc = "Direct award."]
        #[value = "DA"]
        Da,

        #[doc = "Negotiated procedure."]
        #[value = "NP"]
        Np,

        #[doc = "Negotiated procedure without prior publication."]
        #[value = "OP"]
        Op,

        #[doc = "Restricted tender."]
        #[value = "RT"]
        Rt,

        #[doc = "Framework agreement."]
        #[value = "FA"]
        Fa,
    }
}

impl ProcurementMethod {
    /// Returns the [`MethodFamily`] of this [`ProcurementMethod`].
    #[must_use]
    pub const fn family(self) -> MethodFamily {
        match self {
            Self::Ot | Self::Sv | Self::Mv => MethodFamily::Open,
            Self::Da | Self::Np | Self::Op | Self::Rt | Self::Fa => {
                MethodFamily::Restricted
            }
        }
    }
}

define_kind! {
    #[doc = "Main procurement category of a [`Tender`]."]
    enum MainProcurementCategory {
        #[doc = "Goods."]
        #[value = "goods"]
        Goods,

        #[doc = "Works."]
        #[value = "works"]
        Works,

        #[doc = "Services."]
        #[value = "services"]
        Services,
    }
}

define_kind! {
    #[doc = "Modality of a procurement method."]
    enum Modality {
        #[doc = "Bids are ranked by an electronic auction."]
        #[value = "electronicAuction"]
        ElectronicAuction,
    }
}

define_kind! {
    #[doc = "Criteria by which a [`Tender`] is awarded."]
    enum AwardCriteria {
        #[doc = "Lowest price wins."]
        #[value = "priceOnly"]
        PriceOnly,

        #[doc = "Lowest cost wins."]
        #[value = "costOnly"]
        CostOnly,

        #[doc = "Best quality wins."]
        #[value = "qualityOnly"]
        QualityOnly,

        #[doc = "Best weighted rating wins."]
        #[value = "ratedCriteria"]
        RatedCriteria,
    }
}

define_kind! {
    #[doc = "Way an [`AwardCriteria`] is applied."]
    enum AwardCriteriaDetails {
        #[doc = "Evaluated by the platform."]
        #[value = "automated"]
        Automated,

        #[doc = "Evaluated by the procuring entity."]
        #[value = "manual"]
        Manual,
    }
}

/// Classification of a [`Tender`] or an [`Item`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Classification {
    /// Classification scheme, e.g. `CPV`.
    pub scheme: String,

    /// Code within the scheme.
    pub id: String,

    /// Human-readable description of the code.
    pub description: String,
}

/// Closed period of time.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// [`DateTime`] this [`Period`] starts at.
    pub start_date: DateTime,

    /// [`DateTime`] this [`Period`] ends at.
    pub end_date: DateTime,
}

impl Period {
    /// Indicates whether this [`Period`] starts strictly before it ends.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.start_date < self.end_date
    }

    /// Indicates whether this [`Period`] shares at least one instant with the
    /// `other` one.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.end_date >= other.start_date && self.start_date <= other.end_date
    }
}

/// Electronic auctions of a [`Tender`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ElectronicAuctions {
    /// Per-[`Lot`] [`AuctionDetail`]s.
    #[serde(default)]
    pub details: Vec<AuctionDetail>,
}

/// Electronic auction of a single [`Lot`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionDetail {
    /// ID of this [`AuctionDetail`].
    pub id: String,

    /// ID of the [`Lot`] being auctioned.
    pub related_lot: lot::Id,

    /// [`AuctionModality`]s of this auction.
    #[serde(default)]
    pub electronic_auction_modalities: Vec<AuctionModality>,
}

/// Modality of an electronic auction.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionModality {
    /// Minimal step between two subsequent bids.
    pub eligible_minimum_difference: Money,
}

/// Range of candidates admitted to the second stage of a selective
/// [`Tender`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondStage {
    /// Minimal number of candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_candidates: Option<u32>,

    /// Maximal number of candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_candidates: Option<u32>,
}

/// Pre-qualification stage of a selective [`Tender`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PreQualification {
    /// [`Period`] for submitting applications.
    pub period: Period,
}
