//! [`ProcuringEntity`] and its [`Person`]s definitions.

use common::{define_kind, DateTime};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::{domain::lot::Address, reconcile::{self, Identified}};
#[cfg(doc)]
use crate::domain::Tender;

/// Organization conducting a [`Tender`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcuringEntity {
    /// ID of this [`ProcuringEntity`].
    ///
    /// Immutable once the process is created.
    pub id: Id,

    /// Name of this [`ProcuringEntity`].
    pub name: String,

    /// Legal [`Identifier`] of this [`ProcuringEntity`].
    pub identifier: Identifier,

    /// Other legal [`Identifier`]s of this [`ProcuringEntity`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_identifiers: Vec<Identifier>,

    /// Postal [`Address`] of this [`ProcuringEntity`].
    pub address: Address,

    /// [`ContactPoint`] of this [`ProcuringEntity`].
    pub contact_point: ContactPoint,

    /// Responsible [`Person`]s of this [`ProcuringEntity`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persons: Vec<Person>,
}

impl ProcuringEntity {
    /// Reconciles the `received` [`Person`]s with the ones of this
    /// [`ProcuringEntity`].
    ///
    /// [`Person`]s missing in the `received` ones are retained.
    #[must_use]
    pub fn update(self, received: Vec<Person>) -> Self {
        Self {
            persons: reconcile::reconcile(
                received,
                self.persons,
                Person::update,
                |p| p,
            ),
            ..self
        }
    }
}

/// ID of a [`ProcuringEntity`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into,
    PartialEq, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Derives an [`Id`] out of the provided legal [`Identifier`].
    #[must_use]
    pub fn of(identifier: &Identifier) -> Self {
        Self(format!("{}-{}", identifier.scheme, identifier.id))
    }
}

/// Legal identifier of an organization or a [`Person`].
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// Register the `id` is issued by.
    pub scheme: String,

    /// Identifier within the `scheme`.
    pub id: String,

    /// Legal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,

    /// URI of the register entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Contact details of an organization.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    /// Name of the contact.
    pub name: String,

    /// E-mail address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number.
    pub telephone: String,

    /// Fax number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,

    /// Web address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Person responsible for a part of a [`Tender`] on behalf of a
/// [`ProcuringEntity`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Honorific title of this [`Person`].
    pub title: String,

    /// Full name of this [`Person`].
    pub name: String,

    /// Legal [`Identifier`] of this [`Person`].
    pub identifier: Identifier,

    /// [`BusinessFunction`]s of this [`Person`].
    pub business_functions: Vec<BusinessFunction>,
}

impl Person {
    /// Merges the `received` [`Person`] into this one.
    #[must_use]
    pub fn update(self, received: Self) -> Self {
        Self {
            title: received.title,
            name: received.name,
            business_functions: reconcile::reconcile(
                received.business_functions,
                self.business_functions,
                BusinessFunction::update,
                |bf| bf,
            ),
            ..self
        }
    }
}

impl Identified for Person {
    type Key = PersonKey;

    fn key(&self) -> PersonKey {
        PersonKey {
            scheme: self.identifier.scheme.clone(),
            id: self.identifier.id.clone(),
        }
    }
}

/// Identity of a [`Person`]: the `scheme` and `id` of its [`Identifier`].
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("{scheme}/{id}")]
pub struct PersonKey {
    /// [`Identifier::scheme`].
    pub scheme: String,

    /// [`Identifier::id`].
    pub id: String,
}

/// Role of a [`Person`] within a [`ProcuringEntity`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFunction {
    /// ID of this [`BusinessFunction`], unique within its [`Person`].
    pub id: BusinessFunctionId,

    /// [`BusinessFunctionType`] of this [`BusinessFunction`].
    #[serde(rename = "type")]
    pub kind: BusinessFunctionType,

    /// Job title of the [`Person`].
    pub job_title: String,

    /// [`BusinessFunctionPeriod`] of this [`BusinessFunction`].
    pub period: BusinessFunctionPeriod,

    /// Supporting [`BusinessFunctionDocument`]s.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<BusinessFunctionDocument>,
}

impl BusinessFunction {
    /// Merges the `received` [`BusinessFunction`] into this one.
    #[must_use]
    pub fn update(self, received: Self) -> Self {
        Self {
            id: self.id,
            kind: received.kind,
            job_title: received.job_title,
            period: received.period,
            documents: reconcile::reconcile(
                received.documents,
                self.documents,
                BusinessFunctionDocument::update,
                |d| d,
            ),
        }
    }
}

impl Identified for BusinessFunction {
    type Key = BusinessFunctionId;

    fn key(&self) -> BusinessFunctionId {
        self.id.clone()
    }
}

/// ID of a [`BusinessFunction`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into,
    PartialEq, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct BusinessFunctionId(String);

/// Period a [`BusinessFunction`] is exercised within.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFunctionPeriod {
    /// [`DateTime`] the [`BusinessFunction`] is exercised since.
    pub start_date: DateTime,
}

define_kind! {
    #[doc = "Type of a [`BusinessFunction`]."]
    enum BusinessFunctionType {
        #[doc = "Chairman of the evaluation committee."]
        #[value = "chairman"]
        Chairman,

        #[doc = "Officer conducting the procurement."]
        #[value = "procurementOfficer"]
        ProcurementOfficer,

        #[doc = "Contact point for bidders."]
        #[value = "contactPoint"]
        ContactPoint,

        #[doc = "Member opening the technical part of bids."]
        #[value = "technicalOpener"]
        TechnicalOpener,

        #[doc = "Member opening the price part of bids."]
        #[value = "priceOpener"]
        PriceOpener,

        #[doc = "Member evaluating the price part of bids."]
        #[value = "priceEvaluator"]
        PriceEvaluator,

        #[doc = "Member evaluating the technical part of bids."]
        #[value = "technicalEvaluator"]
        TechnicalEvaluator,

        #[doc = "Legacy name of [`BusinessFunctionType::Chairman`]."]
        #[value = "authority"]
        Authority,
    }
}

impl BusinessFunctionType {
    /// Returns the [`BusinessFunctionType`] replacing this deprecated one, if
    /// it is deprecated.
    #[must_use]
    pub const fn replacement(self) -> Option<Self> {
        match self {
            Self::Authority => Some(Self::Chairman),
            Self::Chairman
            | Self::ProcurementOfficer
            | Self::ContactPoint
            | Self::TechnicalOpener
            | Self::PriceOpener
            | Self::PriceEvaluator
            | Self::TechnicalEvaluator => None,
        }
    }
}

/// Document supporting a [`BusinessFunction`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFunctionDocument {
    /// ID of this [`BusinessFunctionDocument`], unique within its
    /// [`BusinessFunction`].
    pub id: BusinessFunctionDocumentId,

    /// [`BusinessFunctionDocumentType`] of this document.
    ///
    /// Membership is enforced while deserializing, so an unknown value is
    /// reported as a deserialization error rather than as
    /// [`ErrorKind::InvalidEnumValue`].
    ///
    /// [`ErrorKind::InvalidEnumValue`]: crate::validation::ErrorKind
    pub document_type: BusinessFunctionDocumentType,

    /// Title of this document.
    pub title: String,

    /// Description of this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BusinessFunctionDocument {
    /// Merges the `received` [`BusinessFunctionDocument`] into this one.
    ///
    /// Description is kept if the `received` one has none.
    #[must_use]
    pub fn update(self, received: Self) -> Self {
        Self {
            title: received.title,
            description: received.description.or(self.description),
            ..self
        }
    }
}

impl Identified for BusinessFunctionDocument {
    type Key = BusinessFunctionDocumentId;

    fn key(&self) -> BusinessFunctionDocumentId {
        self.id.clone()
    }
}

/// ID of a [`BusinessFunctionDocument`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into,
    PartialEq, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct BusinessFunctionDocumentId(String);

define_kind! {
    #[doc = "Type of a [`BusinessFunctionDocument`]."]
    enum BusinessFunctionDocumentType {
        #[doc = "Regulatory act appointing the [`Person`]."]
        #[value = "regulatoryDocument"]
        RegulatoryDocument,
    }
}

#[cfg(test)]
mod spec {
    use crate::test_support as fx;

    use super::{
        BusinessFunctionDocumentId, BusinessFunctionDocumentType,
        BusinessFunctionType, Id, Identifier,
    };

    #[test]
    fn business_function_document_keeps_description_if_null() {
        let saved = fx::bf_document("doc-1", Some("Saved"));
        let mut received = fx::bf_document("doc-1", None);
        received.title = "New".into();

        let merged = saved.clone().update(received);
        assert_eq!(merged.title, "New");
        assert_eq!(merged.description.as_deref(), Some("Saved"));

        let merged = saved.update(fx::bf_document("doc-1", Some("Received")));
        assert_eq!(merged.description.as_deref(), Some("Received"));
    }

    #[test]
    fn person_update_reconciles_business_functions() {
        let mut saved = fx::person("MD-IDNO", "1");
        saved.business_functions[0].documents =
            vec![fx::bf_document("doc-1", Some("Saved"))];

        let mut received = fx::person("MD-IDNO", "1");
        received.name = "Renamed".into();
        received.business_functions[0].kind =
            BusinessFunctionType::PriceEvaluator;
        received.business_functions[0].documents =
            vec![fx::bf_document("doc-2", None)];
        let mut extra = fx::business_function("bf-2");
        extra.documents.clear();
        received.business_functions.push(extra);

        let merged = saved.update(received);

        assert_eq!(merged.name, "Renamed");
        assert_eq!(merged.business_functions.len(), 2);
        let bf = &merged.business_functions[0];
        assert_eq!(bf.kind, BusinessFunctionType::PriceEvaluator);
        let mut docs = bf
            .documents
            .iter()
            .map(|d| d.id.clone())
            .collect::<Vec<_>>();
        docs.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        assert_eq!(
            docs,
            [
                BusinessFunctionDocumentId::from("doc-1"),
                BusinessFunctionDocumentId::from("doc-2"),
            ],
        );
    }

    #[test]
    fn authority_is_replaced_by_chairman() {
        assert_eq!(
            BusinessFunctionType::Authority.replacement(),
            Some(BusinessFunctionType::Chairman),
        );
        assert_eq!(BusinessFunctionType::Chairman.replacement(), None);
    }

    #[test]
    fn id_is_derived_from_identifier() {
        let identifier = Identifier {
            scheme: "MD-IDNO".into(),
            id: "1010101".into(),
            legal_name: None,
            uri: None,
        };
        assert_eq!(Id::of(&identifier), Id::from("MD-IDNO-1010101"));
    }

    #[test]
    fn document_type_is_closed_on_deserialization() {
        let known = serde_json::from_str::<BusinessFunctionDocumentType>(
            r#""regulatoryDocument""#,
        );
        assert_eq!(
            known.unwrap(),
            BusinessFunctionDocumentType::RegulatoryDocument,
        );

        let unknown = serde_json::from_str::<BusinessFunctionDocumentType>(
            r#""contractNotice""#,
        );
        assert!(unknown.is_err());
    }
}
