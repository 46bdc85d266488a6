//! [`Rules`] lookup of procurement policies.

use common::operations::{By, Select};
use derive_more::{Deref, Display, Error as StdError};
use serde::Deserialize;
use smart_default::SmartDefault;
use tracerr::Traced;

use crate::domain::{
    record::Country,
    tender::{MainProcurementCategory, ProcurementMethod},
};

/// Lookup of procurement policies.
pub use common::Handler as Rules;

/// Parameters of a procurement policy lookup.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{country}/{method}/{category}")]
pub struct Params {
    /// [`Country`] of the procurement process.
    pub country: Country,

    /// [`ProcurementMethod`] of the procurement process.
    pub method: ProcurementMethod,

    /// [`MainProcurementCategory`] of the procurement process.
    pub category: MainProcurementCategory,
}

/// Indicator whether an electronic auction is required.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct AuctionRequired(pub bool);

impl PartialEq<bool> for AuctionRequired {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// [`Rules`] lookup error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// No policy is defined for the [`Params`].
    #[display("No rule defined for `{_0}`")]
    NoRule(#[error(not(source))] Params),
}

/// Configuration of [`StaticRules`].
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    /// [`AuctionRule`]s, the first matching one wins.
    pub auctions: Vec<AuctionRule>,

    /// Whether an auction is required when no [`AuctionRule`] matches.
    ///
    /// [`None`] makes unmatched lookups fail.
    #[default(Some(false))]
    pub default_auction_required: Option<bool>,
}

/// Entry of the electronic auctions policy table.
///
/// Absent criteria match anything.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct AuctionRule {
    /// [`Country`] this rule applies to.
    #[serde(default)]
    pub country: Option<Country>,

    /// [`ProcurementMethod`] this rule applies to.
    #[serde(default)]
    pub method: Option<ProcurementMethod>,

    /// [`MainProcurementCategory`] this rule applies to.
    #[serde(default)]
    pub category: Option<MainProcurementCategory>,

    /// Whether an electronic auction is required.
    pub required: bool,
}

impl AuctionRule {
    /// Indicates whether this [`AuctionRule`] applies to the [`Params`].
    fn matches(&self, params: &Params) -> bool {
        self.country.as_ref().is_none_or(|c| c == &params.country)
            && self.method.is_none_or(|m| m == params.method)
            && self.category.is_none_or(|c| c == params.category)
    }
}

/// [`Rules`] backed by a static policy table.
#[derive(Clone, Debug)]
pub struct StaticRules {
    /// [`Config`] of these [`StaticRules`].
    config: Config,
}

impl StaticRules {
    /// Creates new [`StaticRules`] out of the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Rules<Select<By<AuctionRequired, Params>>> for StaticRules {
    type Ok = AuctionRequired;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<AuctionRequired, Params>>,
    ) -> Result<Self::Ok, Self::Err> {
        let params = by.into_inner();
        self.config
            .auctions
            .iter()
            .find(|r| r.matches(&params))
            .map(|r| r.required)
            .or(self.config.default_auction_required)
            .map(AuctionRequired)
            .ok_or_else(|| tracerr::new!(Error::NoRule(params)))
    }
}
