//! [`Document`] definitions.

use common::define_kind;
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::{domain::lot, reconcile::Identified};
#[cfg(doc)]
use crate::domain::{Lot, Tender};

/// Document attached to a [`Tender`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// ID of this [`Document`].
    pub id: Id,

    /// [`DocumentType`] of this [`Document`].
    pub document_type: DocumentType,

    /// Title of this [`Document`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description of this [`Document`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// IDs of the [`Lot`]s this [`Document`] relates to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_lots: Vec<lot::Id>,
}

impl Document {
    /// Merges the `received` [`Document`] into this one.
    ///
    /// [`DocumentType`] is immutable once created.
    #[must_use]
    pub fn update(self, received: Self) -> Self {
        Self {
            title: received.title,
            description: received.description,
            related_lots: received.related_lots,
            ..self
        }
    }
}

impl Identified for Document {
    type Key = Id;

    fn key(&self) -> Id {
        self.id.clone()
    }
}

/// ID of a [`Document`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into, Ord,
    PartialEq, PartialOrd, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct Id(String);

define_kind! {
    #[doc = "Type of a [`Document`]."]
    enum DocumentType {
        #[doc = "Formal notice of the [`Tender`]."]
        #[value = "tenderNotice"]
        TenderNotice,

        #[doc = "Documents for bidders to prepare their bids."]
        #[value = "biddingDocuments"]
        BiddingDocuments,

        #[doc = "Technical specifications of the procured goods or works."]
        #[value = "technicalSpecifications"]
        TechnicalSpecifications,

        #[doc = "Criteria bids are evaluated by."]
        #[value = "evaluationCriteria"]
        EvaluationCriteria,

        #[doc = "Answers to the questions of bidders."]
        #[value = "clarifications"]
        Clarifications,

        #[doc = "Criteria bidders must satisfy."]
        #[value = "eligibilityCriteria"]
        EligibilityCriteria,

        #[doc = "Risks of the contract."]
        #[value = "riskProvisions"]
        RiskProvisions,

        #[doc = "Quantities of the procured items."]
        #[value = "billOfQuantity"]
        BillOfQuantity,

        #[doc = "Declaration of no conflict of interest."]
        #[value = "conflictOfInterest"]
        ConflictOfInterest,

        #[doc = "Procurement plan of the procuring entity."]
        #[value = "procurementPlan"]
        ProcurementPlan,

        #[doc = "Draft of the contract."]
        #[value = "contractDraft"]
        ContractDraft,

        #[doc = "Complaints and decisions on them."]
        #[value = "complaints"]
        Complaints,

        #[doc = "Illustrations of the procured items."]
        #[value = "illustration"]
        Illustration,

        #[doc = "Reasons of a cancellation."]
        #[value = "cancellationDetails"]
        CancellationDetails,

        #[doc = "Reports of the bids evaluation."]
        #[value = "evaluationReports"]
        EvaluationReports,

        #[doc = "Firms admitted to the next stage."]
        #[value = "shortlistedFirms"]
        ShortlistedFirms,

        #[doc = "Arrangements of the contract."]
        #[value = "contractArrangements"]
        ContractArrangements,

        #[doc = "Guarantees of the contract."]
        #[value = "contractGuarantees"]
        ContractGuarantees,

        #[doc = "Market study preceding the procurement."]
        #[value = "marketStudies"]
        MarketStudies,

        #[doc = "Notice of a public hearing."]
        #[value = "hearingNotice"]
        HearingNotice,

        #[doc = "Feasibility study of the procurement."]
        #[value = "feasibilityStudy"]
        FeasibilityStudy,

        #[doc = "Environmental impact assessment."]
        #[value = "environmentalImpact"]
        EnvironmentalImpact,

        #[doc = "Assessment of the procurement needs."]
        #[value = "needsAssessment"]
        NeedsAssessment,

        #[doc = "Plan of the project being procured for."]
        #[value = "projectPlan"]
        ProjectPlan,
    }
}

impl DocumentType {
    /// Indicates whether this [`DocumentType`] is allowed in planning notices
    /// only.
    #[must_use]
    pub const fn is_planning_only(self) -> bool {
        matches!(
            self,
            Self::MarketStudies
                | Self::HearingNotice
                | Self::FeasibilityStudy
                | Self::EnvironmentalImpact
                | Self::NeedsAssessment
                | Self::ProjectPlan
        )
    }
}

#[cfg(test)]
mod spec {
    use crate::{domain::lot, test_support as fx};

    use super::DocumentType;

    #[test]
    fn update_keeps_saved_type() {
        let saved = fx::document("doc-1", DocumentType::TenderNotice, &[]);
        let mut received =
            fx::document("doc-1", DocumentType::BiddingDocuments, &["lot-1"]);
        received.title = Some("Renamed".into());
        received.description = None;

        let merged = saved.update(received);

        assert_eq!(merged.document_type, DocumentType::TenderNotice);
        assert_eq!(merged.title.as_deref(), Some("Renamed"));
        assert_eq!(merged.description, None);
        assert_eq!(merged.related_lots, [lot::Id::from("lot-1")]);
    }

    #[test]
    fn planning_only_types() {
        let planning_only = DocumentType::ALL
            .iter()
            .filter(|t| t.is_planning_only())
            .count();

        assert_eq!(planning_only, 6);
        assert!(!DocumentType::TenderNotice.is_planning_only());
        assert!(DocumentType::MarketStudies.is_planning_only());
    }
}
