//! [`Planning`] and its [`Budget`] definitions.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::domain::tender::Period;
#[cfg(doc)]
use crate::domain::Tender;

/// Planning section of a procurement process.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Planning {
    /// [`Budget`] the process is financed from.
    pub budget: Budget,

    /// Rationale of the procurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Budget of a procurement process.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Description of this [`Budget`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Total amount of this [`Budget`].
    ///
    /// Its currency is the one every [`Tender`] lot must be estimated in.
    pub amount: Money,

    /// Indicator whether this [`Budget`] is funded by the European Union.
    #[serde(default)]
    pub is_european_union_funded: bool,

    /// [`BudgetBreakdown`]s of this [`Budget`].
    #[serde(default)]
    pub budget_breakdown: Vec<BudgetBreakdown>,
}

/// Part of a [`Budget`] provided by a single source.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    /// ID of this [`BudgetBreakdown`].
    pub id: String,

    /// Description of this [`BudgetBreakdown`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Amount of this [`BudgetBreakdown`].
    pub amount: Money,

    /// [`Period`] the amount is available within.
    pub period: Period,

    /// [`SourceParty`] providing the amount.
    pub source_party: SourceParty,

    /// [`EuropeanUnionFunding`] details, if funded by the European Union.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub european_union_funding: Option<EuropeanUnionFunding>,
}

/// Party providing a [`BudgetBreakdown`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SourceParty {
    /// ID of this party.
    pub id: String,

    /// Name of this party.
    pub name: String,
}

/// European Union funding details of a [`BudgetBreakdown`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EuropeanUnionFunding {
    /// Name of the funded project.
    pub project_name: String,

    /// Identifier of the funded project.
    pub project_identifier: String,

    /// URI of the project description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}
