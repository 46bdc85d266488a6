//! Fixtures shared by unit tests.

use std::sync::atomic::{AtomicU64, Ordering};

use common::{DateTime, Money};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    domain::{
        budget::{Budget, BudgetBreakdown, Planning, SourceParty},
        criterion::{
            Coefficient, DataType, RelatesTo, Requirement, RequirementGroup,
        },
        document::DocumentType,
        item::Unit,
        lot::{self, AddressDetails, AddressUnit, PlaceOfPerformance},
        organization::{
            BusinessFunction, BusinessFunctionDocument,
            BusinessFunctionDocumentType, BusinessFunctionPeriod,
            BusinessFunctionType, ContactPoint, Identifier,
        },
        record::{Country, Cpid, Ocid, Owner, Prefix, Stage, Token},
        tender::{
            self, AuctionDetail, AuctionModality, Classification,
            ElectronicAuctions, MainProcurementCategory, Period,
            ProcurementMethod,
        },
        Conversion, Criterion, Document, Item, Lot, Person, ProcuringEntity,
        Record, Tender,
    },
    infra::{generator::IdKind, rules, Generator, StaticRules},
    request, Config, Service,
};

/// [`Generator`] producing predictable identifiers.
#[derive(Debug, Default)]
pub(crate) struct Sequential {
    /// Number of identifiers generated so far.
    counter: AtomicU64,
}

impl Sequential {
    /// Returns the next sequence number.
    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the next timestamp.
    fn timestamp(&self) -> i64 {
        1_700_000_000_000 + i64::try_from(self.next()).unwrap()
    }
}

impl Generator for Sequential {
    fn generate(&self, kind: IdKind) -> String {
        format!("{kind}-{}", self.next())
    }

    fn cpid(&self, country: &Country) -> Cpid {
        Cpid::compose(&Prefix::default(), country, self.timestamp())
    }

    fn ocid(&self, cpid: &Cpid, stage: Stage) -> Ocid {
        Ocid::compose(cpid, stage, self.timestamp())
    }

    fn token(&self) -> Token {
        Token::from(Uuid::from_u128(u128::from(self.next())))
    }
}

/// Creates a new [`Service`] over the provided `database`, never requiring
/// auctions.
pub(crate) fn service<Db>(
    database: Db,
) -> Service<Db, Sequential, StaticRules> {
    service_with(database, rules::Config::default())
}

/// Creates a new [`Service`] over the provided `database` and `rules`.
pub(crate) fn service_with<Db>(
    database: Db,
    rules: rules::Config,
) -> Service<Db, Sequential, StaticRules> {
    let config = Config {
        rules: rules.clone(),
        ..Config::default()
    };
    Service::with(
        config,
        database,
        Sequential::default(),
        StaticRules::new(rules),
    )
}

pub(crate) fn datetime(s: &str) -> DateTime {
    DateTime::from_rfc3339(s).unwrap()
}

pub(crate) fn money(s: &str) -> Money {
    s.parse().unwrap()
}

/// Reference start date of a transition.
pub(crate) fn start_date() -> DateTime {
    datetime("2029-05-01T00:00:00Z")
}

/// Tender period ending before any [`lot()`] contract starts.
pub(crate) fn tender_period() -> Period {
    Period {
        start_date: datetime("2029-06-01T00:00:00Z"),
        end_date: datetime("2029-07-01T00:00:00Z"),
    }
}

pub(crate) fn contract_period() -> Period {
    Period {
        start_date: datetime("2030-01-01T00:00:00Z"),
        end_date: datetime("2030-12-31T00:00:00Z"),
    }
}

pub(crate) fn classification() -> Classification {
    Classification {
        scheme: "CPV".into(),
        id: "45000000-7".into(),
        description: "Construction work".into(),
    }
}

pub(crate) fn address_unit(id: &str) -> AddressUnit {
    AddressUnit {
        scheme: "CUATM".into(),
        id: id.into(),
        description: format!("Unit {id}"),
        uri: None,
    }
}

pub(crate) fn address() -> lot::Address {
    lot::Address {
        street_address: "Main st. 1".into(),
        postal_code: Some("MD-2001".into()),
        address_details: AddressDetails {
            country: address_unit("MD"),
            region: address_unit("0101000"),
            locality: address_unit("0101001"),
        },
    }
}

/// Saved active [`Lot`].
pub(crate) fn lot(id: &str, amount: &str, currency: &str) -> Lot {
    Lot {
        id: id.into(),
        internal_id: Some(format!("internal-{id}")),
        title: format!("Lot {id}"),
        description: format!("Description of {id}"),
        status: lot::Status::Active,
        status_details: lot::StatusDetails::Empty,
        value: money(&format!("{amount}{currency}")),
        contract_period: contract_period(),
        place_of_performance: PlaceOfPerformance {
            address: address(),
            description: Some("On site".into()),
        },
        options: None,
        variants: None,
        renewal: None,
        recurrence: None,
    }
}

/// Received [`request::Lot`] with a complete place of performance.
pub(crate) fn received_lot(
    id: &str,
    amount: &str,
    currency: &str,
) -> request::Lot {
    let address = address();
    let details = address.address_details;
    request::Lot {
        id: id.into(),
        internal_id: Some(format!("internal-{id}")),
        title: format!("Lot {id}"),
        description: format!("Description of {id}"),
        value: money(&format!("{amount}{currency}")),
        contract_period: contract_period(),
        place_of_performance: request::PlaceOfPerformance {
            address: Some(request::Address {
                street_address: Some(address.street_address),
                postal_code: address.postal_code,
                address_details: Some(request::AddressDetails {
                    country: Some(details.country),
                    region: Some(details.region),
                    locality: Some(details.locality),
                }),
            }),
            description: Some("On site".into()),
        },
        options: None,
        variants: None,
        renewal: None,
        recurrence: None,
    }
}

pub(crate) fn item(id: &str, related_lot: &str) -> Item {
    Item {
        id: id.into(),
        internal_id: Some(format!("internal-{id}")),
        classification: classification(),
        additional_classifications: vec![],
        quantity: Decimal::TEN,
        unit: Unit {
            id: "H87".into(),
            name: "Piece".into(),
        },
        description: format!("Item {id}"),
        related_lot: related_lot.into(),
    }
}

pub(crate) fn document(
    id: &str,
    document_type: DocumentType,
    related_lots: &[&str],
) -> Document {
    Document {
        id: id.into(),
        document_type,
        title: Some(format!("Document {id}")),
        description: None,
        related_lots: related_lots.iter().map(|&l| l.into()).collect(),
    }
}

pub(crate) fn bf_document(
    id: &str,
    description: Option<&str>,
) -> BusinessFunctionDocument {
    BusinessFunctionDocument {
        id: id.into(),
        document_type: BusinessFunctionDocumentType::RegulatoryDocument,
        title: "Appointment".into(),
        description: description.map(Into::into),
    }
}

/// [`BusinessFunction`] started long before the [`start_date()`].
pub(crate) fn business_function(id: &str) -> BusinessFunction {
    BusinessFunction {
        id: id.into(),
        kind: BusinessFunctionType::Chairman,
        job_title: "Chairman".into(),
        period: BusinessFunctionPeriod {
            start_date: datetime("2024-01-01T00:00:00Z"),
        },
        documents: vec![bf_document("bf-doc-1", None)],
    }
}

pub(crate) fn person(scheme: &str, id: &str) -> Person {
    Person {
        title: "Mr.".into(),
        name: format!("Person {id}"),
        identifier: Identifier {
            scheme: scheme.into(),
            id: id.into(),
            legal_name: None,
            uri: None,
        },
        business_functions: vec![business_function("bf-1")],
    }
}

pub(crate) fn procuring_entity() -> ProcuringEntity {
    ProcuringEntity {
        id: "MD-IDNO-1010101".into(),
        name: "Buyer".into(),
        identifier: Identifier {
            scheme: "MD-IDNO".into(),
            id: "1010101".into(),
            legal_name: Some("Buyer LLC".into()),
            uri: None,
        },
        additional_identifiers: vec![],
        address: address(),
        contact_point: ContactPoint {
            name: "Contact".into(),
            email: Some("buyer@example.com".into()),
            telephone: "+37322000000".into(),
            fax_number: None,
            url: None,
        },
        persons: vec![person("MD-IDNO", "1")],
    }
}

pub(crate) fn electronic_auctions(related_lot: &str) -> ElectronicAuctions {
    ElectronicAuctions {
        details: vec![AuctionDetail {
            id: "auction-1".into(),
            related_lot: related_lot.into(),
            electronic_auction_modalities: vec![AuctionModality {
                eligible_minimum_difference: money("10EUR"),
            }],
        }],
    }
}

pub(crate) fn criterion(
    id: &str,
    related: Option<(RelatesTo, &str)>,
    requirement_id: &str,
) -> Criterion {
    Criterion {
        id: id.into(),
        title: format!("Criterion {id}"),
        description: None,
        relates_to: related.map(|(r, _)| r),
        related_item: related.map(|(_, id)| id.into()),
        requirement_groups: vec![RequirementGroup {
            id: format!("group-{id}").into(),
            description: None,
            requirements: vec![Requirement {
                id: requirement_id.into(),
                title: "Has experience".into(),
                description: None,
                data_type: DataType::Boolean,
                expected_value: Some("true".into()),
                min_value: None,
                max_value: None,
            }],
        }],
    }
}

pub(crate) fn conversion(id: &str, requirement_id: &str) -> Conversion {
    Conversion {
        id: id.into(),
        related_item: requirement_id.into(),
        rationale: "Experience matters".into(),
        description: None,
        coefficients: vec![Coefficient {
            id: "coefficient-1".into(),
            value: "true".into(),
            coefficient: Decimal::ONE,
        }],
    }
}

/// [`Planning`] budgeted in EUR with a breakdown covering 2030.
pub(crate) fn planning() -> Planning {
    let amount = money("1000EUR");
    Planning {
        budget: Budget {
            description: None,
            amount: amount.clone(),
            is_european_union_funded: false,
            budget_breakdown: vec![BudgetBreakdown {
                id: "breakdown-1".into(),
                description: None,
                amount,
                period: Period {
                    start_date: datetime("2029-01-01T00:00:00Z"),
                    end_date: datetime("2030-06-30T00:00:00Z"),
                },
                source_party: SourceParty {
                    id: "MD-IDNO-1010101".into(),
                    name: "Buyer".into(),
                },
                european_union_funding: None,
            }],
        },
        rationale: None,
    }
}

/// [`Token`] of the [`cn_record()`] and the [`pn_record()`].
pub(crate) fn token() -> Token {
    Token::from(Uuid::from_u128(42))
}

pub(crate) fn cpid() -> Cpid {
    Cpid::new("ocds-t1s2t3-MD-1580458690892").unwrap()
}

/// Active Contract Notice with a single covered lot `lot-1`.
pub(crate) fn cn_record() -> Record {
    Record {
        cpid: cpid(),
        ocid: Ocid::new("ocds-t1s2t3-MD-1580458690892-EV-1580458791896")
            .unwrap(),
        owner: Owner::from("platform-1".to_owned()),
        token: token(),
        created_at: datetime("2029-04-01T00:00:00Z").coerce(),
        planning: planning(),
        tender: Tender {
            id: "tender-1".to_owned().into(),
            status: tender::Status::Active,
            status_details: tender::StatusDetails::Clarification,
            title: "Road repair".into(),
            description: "Repair of the main road".into(),
            classification: classification(),
            procurement_method: ProcurementMethod::Ot,
            procurement_method_details: None,
            procurement_method_rationale: None,
            main_procurement_category: MainProcurementCategory::Works,
            value: money("1000EUR"),
            contract_period: Some(contract_period()),
            tender_period: Some(tender_period()),
            enquiry_period: None,
            procuring_entity: procuring_entity(),
            lots: vec![lot("lot-1", "1000", "EUR")],
            items: vec![item("item-1", "lot-1")],
            documents: vec![document(
                "doc-1",
                DocumentType::TenderNotice,
                &["lot-1"],
            )],
            criteria: vec![],
            conversions: vec![],
            award_criteria: None,
            award_criteria_details: None,
            procurement_method_modalities: vec![],
            electronic_auctions: None,
            second_stage: None,
            pre_qualification: None,
        },
    }
}

/// Planning Notice without lots and items.
pub(crate) fn pn_record() -> Record {
    let cn = cn_record();
    Record {
        ocid: Ocid::new("ocds-t1s2t3-MD-1580458690892-PN-1580458690900")
            .unwrap(),
        tender: Tender {
            status: tender::Status::Planning,
            status_details: tender::StatusDetails::Planning,
            contract_period: None,
            tender_period: None,
            lots: vec![],
            items: vec![],
            documents: vec![],
            ..cn.tender
        },
        ..cn
    }
}
