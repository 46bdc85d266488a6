//! Evaluation [`Criterion`] and [`Conversion`] definitions.

use common::define_kind;
use derive_more::{AsRef, Display, From, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::{Item, Lot, Tender};

/// Criterion bids of a [`Tender`] are evaluated by.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    /// ID of this [`Criterion`].
    pub id: Id,

    /// Title of this [`Criterion`].
    pub title: String,

    /// Description of this [`Criterion`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Kind of the entity this [`Criterion`] relates to.
    ///
    /// [`None`] means the whole [`Tender`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<RelatesTo>,

    /// ID of the [`Lot`] or the [`Item`] this [`Criterion`] relates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_item: Option<String>,

    /// Alternative [`RequirementGroup`]s, any of which satisfies this
    /// [`Criterion`].
    pub requirement_groups: Vec<RequirementGroup>,
}

/// ID of a [`Criterion`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into,
    PartialEq, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct Id(String);

define_kind! {
    #[doc = "Kind of the entity a [`Criterion`] relates to."]
    enum RelatesTo {
        #[doc = "A [`Lot`]."]
        #[value = "lot"]
        Lot,

        #[doc = "An [`Item`]."]
        #[value = "item"]
        Item,

        #[doc = "A bidder itself."]
        #[value = "tenderer"]
        Tenderer,
    }
}

/// Group of [`Requirement`]s which must all be satisfied together.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RequirementGroup {
    /// ID of this [`RequirementGroup`].
    pub id: RequirementGroupId,

    /// Description of this [`RequirementGroup`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// [`Requirement`]s of this [`RequirementGroup`].
    pub requirements: Vec<Requirement>,
}

/// ID of a [`RequirementGroup`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into,
    PartialEq, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct RequirementGroupId(String);

/// Single requirement a bid is checked against.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// ID of this [`Requirement`].
    pub id: RequirementId,

    /// Title of this [`Requirement`].
    pub title: String,

    /// Description of this [`Requirement`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// [`DataType`] of the response to this [`Requirement`].
    pub data_type: DataType,

    /// Exact value expected in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,

    /// Minimal numeric value of the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Decimal>,

    /// Maximal numeric value of the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Decimal>,
}

/// ID of a [`Requirement`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into,
    PartialEq, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct RequirementId(String);

define_kind! {
    #[doc = "Data type of a response to a [`Requirement`]."]
    enum DataType {
        #[doc = "`true` or `false`."]
        #[value = "boolean"]
        Boolean,

        #[doc = "Arbitrary text."]
        #[value = "string"]
        String,

        #[doc = "Decimal number."]
        #[value = "number"]
        Number,

        #[doc = "Integer number."]
        #[value = "integer"]
        Integer,
    }
}

/// Conversion of responses to a [`Requirement`] into evaluation
/// [`Coefficient`]s.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// ID of this [`Conversion`].
    pub id: String,

    /// ID of the [`Requirement`] this [`Conversion`] applies to.
    pub related_item: RequirementId,

    /// Rationale of this [`Conversion`].
    pub rationale: String,

    /// Description of this [`Conversion`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// [`Coefficient`]s of this [`Conversion`].
    pub coefficients: Vec<Coefficient>,
}

/// Coefficient applied to a bid price for a given response value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coefficient {
    /// ID of this [`Coefficient`].
    pub id: String,

    /// Response value this [`Coefficient`] applies to.
    pub value: String,

    /// Multiplier of the bid price.
    pub coefficient: Decimal,
}

impl Criterion {
    /// Returns all the [`Requirement`]s of this [`Criterion`].
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirement_groups
            .iter()
            .flat_map(|g| g.requirements.iter())
    }
}
