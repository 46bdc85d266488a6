//! [`Lot`] definitions.

use common::{define_kind, Money};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{tender::Period, MissingAttribute},
    reconcile::Identified,
    request,
};
#[cfg(doc)]
use crate::domain::{Item, Tender};

/// Biddable sub-division of a [`Tender`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// ID of this [`Lot`].
    pub id: Id,

    /// Identifier of this [`Lot`] internal to the procuring entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,

    /// Title of this [`Lot`].
    pub title: String,

    /// Description of this [`Lot`].
    pub description: String,

    /// [`Status`] of this [`Lot`].
    pub status: Status,

    /// [`StatusDetails`] of this [`Lot`].
    pub status_details: StatusDetails,

    /// Estimated value of this [`Lot`].
    pub value: Money,

    /// [`Period`] the contract of this [`Lot`] is executed within.
    pub contract_period: Period,

    /// [`PlaceOfPerformance`] of this [`Lot`].
    pub place_of_performance: PlaceOfPerformance,

    /// [`Options`] of this [`Lot`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,

    /// [`Variants`] of this [`Lot`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Variants>,

    /// [`Renewal`] of this [`Lot`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal: Option<Renewal>,

    /// [`Recurrence`] of this [`Lot`], if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Lot {
    /// Creates a new [`Status::Active`] [`Lot`] with the provided permanent
    /// [`Id`] out of the `received` one.
    ///
    /// # Errors
    ///
    /// If the `received` [`PlaceOfPerformance`] is incomplete.
    pub fn create(
        id: Id,
        received: request::Lot,
    ) -> Result<Self, MissingAttribute> {
        let request::Lot {
            id: _,
            internal_id,
            title,
            description,
            value,
            contract_period,
            place_of_performance,
            options,
            variants,
            renewal,
            recurrence,
        } = received;

        Ok(Self {
            id,
            internal_id,
            title,
            description,
            status: Status::Active,
            status_details: StatusDetails::Empty,
            value,
            contract_period,
            place_of_performance: place_of_performance.try_into()?,
            options,
            variants,
            renewal,
            recurrence,
        })
    }

    /// Merges the `received` [`Lot`] into this one.
    ///
    /// [`Status`] and value are left intact.
    #[must_use]
    pub fn update(self, received: request::Lot) -> Self {
        let request::Lot {
            id: _,
            internal_id,
            title,
            description,
            value: _,
            contract_period,
            place_of_performance,
            options,
            variants,
            renewal,
            recurrence,
        } = received;

        Self {
            internal_id: internal_id.or(self.internal_id),
            title,
            description,
            contract_period,
            place_of_performance: self
                .place_of_performance
                .update(place_of_performance),
            options: options.or(self.options),
            variants: variants.or(self.variants),
            renewal: renewal.or(self.renewal),
            recurrence: recurrence.or(self.recurrence),
            ..self
        }
    }

    /// Indicates whether this [`Lot`] is [`Status::Active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

impl Identified for Lot {
    type Key = Id;

    fn key(&self) -> Id {
        self.id.clone()
    }
}

/// ID of a [`Lot`].
///
/// Either a permanent platform-generated identifier, or a temporary one
/// supplied by a client for a [`Lot`] not persisted yet.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into, Ord,
    PartialEq, PartialOrd, Serialize,
)]
#[as_ref(str)]
#[from(String, &str)]
#[serde(transparent)]
pub struct Id(String);

define_kind! {
    #[doc = "Status of a [`Lot`]."]
    enum Status {
        #[doc = "The [`Lot`] is planned."]
        #[value = "planning"]
        Planning,

        #[doc = "The [`Lot`] is part of the live procurement."]
        #[value = "active"]
        Active,

        #[doc = "The [`Lot`] was cancelled."]
        #[value = "cancelled"]
        Cancelled,

        #[doc = "The [`Lot`] was unsuccessful."]
        #[value = "unsuccessful"]
        Unsuccessful,

        #[doc = "The [`Lot`] is complete."]
        #[value = "complete"]
        Complete,
    }
}

define_kind! {
    #[doc = "Details of a [`Lot`] [`Status`]."]
    enum StatusDetails {
        #[doc = "No details."]
        #[value = "empty"]
        Empty,

        #[doc = "The [`Lot`] is awarded."]
        #[value = "awarded"]
        Awarded,
    }
}

/// Place a [`Lot`] is performed at.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlaceOfPerformance {
    /// [`Address`] of this place.
    pub address: Address,

    /// Description of this place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlaceOfPerformance {
    /// Merges the `received` [`PlaceOfPerformance`] into this one, keeping
    /// the substructures the `received` one lacks.
    #[must_use]
    pub fn update(self, received: request::PlaceOfPerformance) -> Self {
        Self {
            address: match received.address {
                Some(a) => self.address.update(a),
                None => self.address,
            },
            description: received.description.or(self.description),
        }
    }
}

impl TryFrom<request::PlaceOfPerformance> for PlaceOfPerformance {
    type Error = MissingAttribute;

    fn try_from(
        received: request::PlaceOfPerformance,
    ) -> Result<Self, Self::Error> {
        let address = received
            .address
            .ok_or(MissingAttribute("lot.placeOfPerformance.address"))?;
        Ok(Self {
            address: address.try_into()?,
            description: received.description,
        })
    }
}

/// Postal address.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street part of this [`Address`].
    pub street_address: String,

    /// Postal code of this [`Address`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Administrative [`AddressDetails`] of this [`Address`].
    pub address_details: AddressDetails,
}

impl Address {
    /// Merges the `received` [`Address`] into this one.
    #[must_use]
    pub fn update(self, received: request::Address) -> Self {
        Self {
            street_address: received
                .street_address
                .unwrap_or(self.street_address),
            postal_code: received.postal_code.or(self.postal_code),
            address_details: match received.address_details {
                Some(d) => self.address_details.update(d),
                None => self.address_details,
            },
        }
    }
}

impl TryFrom<request::Address> for Address {
    type Error = MissingAttribute;

    fn try_from(received: request::Address) -> Result<Self, Self::Error> {
        Ok(Self {
            street_address: received.street_address.ok_or(MissingAttribute(
                "lot.placeOfPerformance.address.streetAddress",
            ))?,
            postal_code: received.postal_code,
            address_details: received
                .address_details
                .ok_or(MissingAttribute(
                    "lot.placeOfPerformance.address.addressDetails",
                ))?
                .try_into()?,
        })
    }
}

/// Administrative division of an [`Address`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AddressDetails {
    /// Country.
    pub country: AddressUnit,

    /// Region within the country.
    pub region: AddressUnit,

    /// Locality within the region.
    pub locality: AddressUnit,
}

impl AddressDetails {
    /// Merges the `received` [`AddressDetails`] into these ones, replacing
    /// every [`AddressUnit`] present in the `received` ones.
    #[must_use]
    pub fn update(self, received: request::AddressDetails) -> Self {
        Self {
            country: received.country.unwrap_or(self.country),
            region: received.region.unwrap_or(self.region),
            locality: received.locality.unwrap_or(self.locality),
        }
    }
}

impl TryFrom<request::AddressDetails> for AddressDetails {
    type Error = MissingAttribute;

    fn try_from(
        received: request::AddressDetails,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            country: received
                .country
                .ok_or(MissingAttribute("addressDetails.country"))?,
            region: received
                .region
                .ok_or(MissingAttribute("addressDetails.region"))?,
            locality: received
                .locality
                .ok_or(MissingAttribute("addressDetails.locality"))?,
        })
    }
}

/// Unit of an administrative division, referenced by a scheme.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AddressUnit {
    /// Scheme of the `id`.
    pub scheme: String,

    /// Code within the scheme.
    pub id: String,

    /// Human-readable name.
    pub description: String,

    /// URI of the scheme entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Options the procuring entity may exercise on a [`Lot`] contract.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Indicator whether there are options.
    pub has_options: bool,

    /// Description of the options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Variants bidders are allowed to submit for a [`Lot`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variants {
    /// Indicator whether variants are allowed.
    pub has_variants: bool,

    /// Details of the allowed variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants_details: Option<String>,
}

/// Renewal of a [`Lot`] contract.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Renewal {
    /// Indicator whether the contract may be renewed.
    pub has_renewals: bool,

    /// Maximal number of renewals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_renewals: Option<u32>,

    /// Description of the renewal conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Recurrence of a [`Lot`] procurement.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    /// Indicator whether the procurement recurs.
    pub has_recurrence: bool,

    /// Description of the recurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod spec {
    use crate::{request, test_support as fx};

    use super::{Id, Status};

    #[test]
    fn update_overwrites_content_but_keeps_status_and_value() {
        let saved = fx::lot("lot-1", "1000.00", "EUR");
        let mut received = fx::received_lot("lot-1", "2000.00", "EUR");
        received.title = "New title".into();
        received.description = "New description".into();
        received.internal_id = None;

        let merged = saved.clone().update(received.clone());

        assert_eq!(merged.id, Id::from("lot-1"));
        assert_eq!(merged.title, "New title");
        assert_eq!(merged.description, "New description");
        assert_eq!(merged.internal_id, saved.internal_id);
        assert_eq!(merged.contract_period, received.contract_period);
        assert_eq!(merged.status, Status::Active);
        assert_eq!(merged.value, saved.value);
    }

    #[test]
    fn update_keeps_missing_address_parts() {
        let saved = fx::lot("lot-1", "1000.00", "EUR");
        let mut received = fx::received_lot("lot-1", "1000.00", "EUR");
        received.place_of_performance = request::PlaceOfPerformance {
            address: Some(request::Address {
                street_address: Some("Main st. 2".into()),
                postal_code: None,
                address_details: Some(request::AddressDetails {
                    country: None,
                    region: None,
                    locality: Some(fx::address_unit("2001")),
                }),
            }),
            description: None,
        };

        let merged = saved.clone().update(received);
        let address = merged.place_of_performance.address;
        let saved_address = saved.place_of_performance.address;

        assert_eq!(address.street_address, "Main st. 2");
        assert_eq!(address.postal_code, saved_address.postal_code);
        assert_eq!(
            address.address_details.country,
            saved_address.address_details.country,
        );
        assert_eq!(
            address.address_details.region,
            saved_address.address_details.region,
        );
        assert_eq!(address.address_details.locality.id, "2001");
        assert_eq!(
            merged.place_of_performance.description,
            saved.place_of_performance.description,
        );
    }

    #[test]
    fn create_requires_complete_place_of_performance() {
        let mut received = fx::received_lot("temp-1", "1000.00", "EUR");
        let lot = super::Lot::create(Id::from("perm-1"), received.clone())
            .unwrap();
        assert_eq!(lot.id, Id::from("perm-1"));
        assert_eq!(lot.status, Status::Active);

        received.place_of_performance.address = None;
        assert!(super::Lot::create(Id::from("perm-1"), received).is_err());
    }
}
