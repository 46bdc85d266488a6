//! [`Generator`] of identifiers.

use common::{define_kind, DateTime};
use uuid::Uuid;

use crate::domain::record::{Country, Cpid, Ocid, Prefix, Stage, Token};

define_kind! {
    #[doc = "Kind of an entity a permanent ID is generated for."]
    enum IdKind {
        #[doc = "Lot."]
        #[value = "LOT"]
        Lot,

        #[doc = "Item."]
        #[value = "ITEM"]
        Item,

        #[doc = "Electronic auction."]
        #[value = "AUCTION"]
        Auction,

        #[doc = "Tender."]
        #[value = "TENDER"]
        Tender,

        #[doc = "Organization."]
        #[value = "ORGANIZATION"]
        Organization,

        #[doc = "Evaluation criterion."]
        #[value = "CRITERION"]
        Criterion,

        #[doc = "Group of criterion requirements."]
        #[value = "REQUIREMENT_GROUP"]
        RequirementGroup,

        #[doc = "Criterion requirement."]
        #[value = "REQUIREMENT"]
        Requirement,
    }
}

/// Generator of unique identifiers.
pub trait Generator {
    /// Generates a new permanent ID for an entity of the provided [`IdKind`].
    fn generate(&self, kind: IdKind) -> String;

    /// Generates a new [`Cpid`] of a process in the provided [`Country`].
    fn cpid(&self, country: &Country) -> Cpid;

    /// Generates a new [`Ocid`] of the provided [`Stage`] of the process.
    fn ocid(&self, cpid: &Cpid, stage: Stage) -> Ocid;

    /// Generates a new [`Token`].
    fn token(&self) -> Token;
}

/// [`Generator`] based on random [`Uuid`]s and the current time.
#[derive(Clone, Debug)]
pub struct UuidGenerator {
    /// [`Prefix`] of the generated [`Cpid`]s.
    prefix: Prefix,
}

impl UuidGenerator {
    /// Creates a new [`UuidGenerator`] composing [`Cpid`]s with the provided
    /// [`Prefix`].
    #[must_use]
    pub fn new(prefix: Prefix) -> Self {
        Self { prefix }
    }
}

impl Generator for UuidGenerator {
    fn generate(&self, _: IdKind) -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn cpid(&self, country: &Country) -> Cpid {
        Cpid::compose(
            &self.prefix,
            country,
            DateTime::now().unix_timestamp_millis(),
        )
    }

    fn ocid(&self, cpid: &Cpid, stage: Stage) -> Ocid {
        Ocid::compose(cpid, stage, DateTime::now().unix_timestamp_millis())
    }

    fn token(&self) -> Token {
        Token::new()
    }
}
