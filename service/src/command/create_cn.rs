//! [`Command`] for creating a new Contract Notice without a Planning Notice.

use std::collections::HashSet;

use common::{
    operations::{By, Check, Insert, Select},
    DateTime, Money,
};
use secrecy::SecretBox;
use tracerr::Traced;
use tracing as log;

use crate::{
    calculation::{self, AmountRule},
    domain::{
        budget::Planning,
        organization,
        record::{Country, Owner, Stage},
        tender::{
            self, Classification, MainProcurementCategory, ProcurementMethod,
            StatusDetails,
        },
        ProcuringEntity, Record, Tender,
    },
    infra::{database, generator::IdKind, rules, Database, Generator, Rules},
    request,
    validation::{
        self, auction, conversions, criteria, documents, items, lots,
        lots::{ContractPeriodPolicy, ContractPeriodRule},
        required,
    },
    Service,
};

use super::{
    build, log_rejection, CheckOutput, Command, ExecutionError, Output,
};

/// [`Command`] for creating a new Contract Notice without a Planning Notice.
#[derive(Clone, Debug)]
pub struct CreateCn {
    /// [`Owner`] of the new process.
    pub owner: Owner,

    /// [`Country`] of the new process.
    pub country: Country,

    /// Reference [`DateTime`] of the creation.
    pub start_date: DateTime,

    /// [`Planning`] section of the new process.
    pub planning: Planning,

    /// [`ProcuringEntity`] of the new process.
    ///
    /// Its ID is derived from its identifier.
    pub procuring_entity: ProcuringEntity,

    /// [`Classification`] of the procured subject.
    pub classification: Classification,

    /// [`ProcurementMethod`] of the new process.
    pub procurement_method: ProcurementMethod,

    /// Details of the [`ProcurementMethod`].
    pub procurement_method_details: Option<String>,

    /// [`MainProcurementCategory`] of the new process.
    pub main_procurement_category: MainProcurementCategory,

    /// Declared value of the new [`Tender`].
    pub value: Money,

    /// Received [`request::Tender`].
    pub tender: request::Tender,
}

/// [`ContractPeriodPolicy`] of the [`CreateCn`] [`Command`].
const CONTRACT_PERIODS: ContractPeriodPolicy = ContractPeriodPolicy {
    open: ContractPeriodRule::AfterTenderPeriodEnd,
    restricted: ContractPeriodRule::Reject,
};

impl<Db, Gen, Rl> Service<Db, Gen, Rl>
where
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    /// Validates the provided [`CreateCn`] request and builds a new
    /// Contract Notice [`Record`] out of it, without persisting anything.
    async fn prepare_create_cn(
        &self,
        cmd: CreateCn,
    ) -> Result<(Record, build::Ids, bool), Traced<ExecutionError>> {
        use ExecutionError as E;

        validate(&cmd).map_err(tracerr::from_and_wrap!(=> E))?;

        let required = self
            .rules()
            .execute(Select(By::<rules::AuctionRequired, _>::new(
                rules::Params {
                    country: cmd.country.clone(),
                    method: cmd.procurement_method,
                    category: cmd.main_procurement_category,
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        auction::consistency(&cmd.tender, *required)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let (record, ids) = create(cmd, self.generator())
            .map_err(tracerr::from_and_wrap!(=> E))?;
        Ok((record, ids, *required))
    }
}

impl<Db, Gen, Rl> Command<Check<CreateCn>> for Service<Db, Gen, Rl>
where
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    type Ok = CheckOutput;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Check(cmd): Check<CreateCn>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!("checking `CreateCn` in `{}`", cmd.country);

        let (_, _, is_auction_required) = self
            .prepare_create_cn(cmd)
            .await
            .inspect_err(|e| log_rejection("CreateCn", e))?;

        Ok(CheckOutput {
            is_auction_required,
        })
    }
}

impl<Db, Gen, Rl> Command<CreateCn> for Service<Db, Gen, Rl>
where
    Db: Database<Insert<Record>, Err = Traced<database::Error>>,
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        log::debug!("executing `CreateCn` in `{}`", cmd.country);

        let (record, ids, _) = self
            .prepare_create_cn(cmd)
            .await
            .inspect_err(|e| log_rejection("CreateCn", e))?;

        self.database()
            .execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .inspect_err(|e| log_rejection("CreateCn", e))
            .map(drop)?;
        log::info!("`CreateCn` saved `{}`", record.ocid);

        Ok(Output {
            cpid: record.cpid.clone(),
            ocid: record.ocid.clone(),
            token: Some(SecretBox::new(Box::new(record.token))),
            lot_ids: ids.lots.into_inner(),
            tender: record.into(),
        })
    }
}

/// Runs the validations of the `cmd` preceding the rules lookup.
fn validate(cmd: &CreateCn) -> Result<(), validation::Error> {
    let received = &cmd.tender;

    lots::unique_ids(&received.lots)?;
    items::unique_ids(&received.items)?;
    documents::unique_ids(&received.documents)?;
    let persons = &cmd.procuring_entity.persons;
    validation::organization::unique_persons(persons)?;
    validation::organization::unique_business_functions(persons)?;
    validation::organization::unique_business_function_documents(persons)?;
    validation::organization::business_function_types(persons)?;
    validation::organization::business_function_periods(
        persons,
        cmd.start_date,
    )?;

    documents::allowed_types(&received.documents)?;
    items::positive_quantities(&received.items)?;
    required::items_present(received, false)?;
    required::tender_period(received.tender_period.as_ref())?;
    required::attribute(received.title.as_ref(), "tender.title").map(drop)?;
    required::attribute(received.description.as_ref(), "tender.description")
        .map(drop)?;

    let known = lots::ids(&received.lots, &[]);
    items::related_lots_exist(&received.items, &known)?;
    documents::related_lots_exist(&received.documents, &known)?;
    auction::related_lots_exist(received.electronic_auctions.as_ref(), &known)?;

    lots::non_zero_values(&received.lots)?;
    lots::budget_currency(
        &received.lots,
        &cmd.planning.budget.amount.currency,
    )?;
    lots::contract_periods(
        &received.lots,
        cmd.procurement_method,
        CONTRACT_PERIODS,
        received.tender_period.as_ref(),
        cmd.start_date,
    )?;

    let (lot_ids, item_ids) = build::criteria_targets(received, &[], &[]);
    criteria::related_items_exist(&received.criteria, &lot_ids, &item_ids)?;
    conversions::related_requirements_exist(
        &received.conversions,
        &received.criteria,
    )?;

    let total = calculation::tender_value(&received.lots)?;
    AmountRule::EqualToLots.check(&cmd.value, &total)
}

/// Builds a new Contract Notice [`Record`] out of the validated `cmd`.
fn create<G: Generator>(
    cmd: CreateCn,
    generator: &G,
) -> Result<(Record, build::Ids), validation::Error> {
    let CreateCn {
        owner,
        country,
        start_date: _,
        planning,
        procuring_entity,
        classification,
        procurement_method,
        procurement_method_details,
        main_procurement_category,
        value: _,
        tender: received,
    } = cmd;
    let request::Tender {
        title,
        description,
        procurement_method_rationale,
        tender_period,
        enquiry_period,
        procurement_method_modalities,
        electronic_auctions,
        lots,
        items,
        documents,
        criteria,
        conversions,
        award_criteria,
        award_criteria_details,
        procuring_entity: _,
        second_stage: _,
        pre_qualification: _,
    } = received;

    let mut ids = build::Ids::default();
    let lots = build::lots(lots, vec![], generator, &mut ids)?;
    let items = build::items(items, vec![], generator, &mut ids);
    let documents = build::documents(documents, vec![], &ids);

    let value = calculation::sum(lots.iter().map(|l| &l.value))?;
    validation::lots::active_lots_have_items(&lots, &items)?;
    let contract_period =
        calculation::contract_period(lots.iter().map(|l| &l.contract_period))?;
    calculation::check_budget_coverage(
        &planning.budget.budget_breakdown,
        &contract_period,
    )?;

    let (criteria, conversions) =
        build::criteria(criteria, conversions, generator, &ids);
    let electronic_auctions = build::auctions(
        electronic_auctions,
        &HashSet::new(),
        generator,
        &ids,
    );

    let tender = Tender {
        id: generator.generate(IdKind::Tender).into(),
        status: tender::Status::Active,
        status_details: StatusDetails::Clarification,
        title: required::attribute(title, "tender.title")?,
        description: required::attribute(description, "tender.description")?,
        classification,
        procurement_method,
        procurement_method_details,
        procurement_method_rationale,
        main_procurement_category,
        value,
        contract_period: Some(contract_period),
        tender_period,
        enquiry_period,
        procuring_entity: ProcuringEntity {
            id: organization::Id::of(&procuring_entity.identifier),
            ..procuring_entity
        },
        lots,
        items,
        documents,
        criteria,
        conversions,
        award_criteria,
        award_criteria_details,
        procurement_method_modalities,
        electronic_auctions,
        second_stage: None,
        pre_qualification: None,
    };

    let cpid = generator.cpid(&country);
    let record = Record {
        ocid: generator.ocid(&cpid, Stage::Ev),
        cpid,
        owner,
        token: generator.token(),
        created_at: DateTime::now().coerce(),
        planning,
        tender,
    };
    Ok((record, ids))
}

#[cfg(test)]
mod spec {
    use common::operations::Check;
    use secrecy::ExposeSecret as _;

    use crate::{
        domain::{
            document::DocumentType,
            lot, organization,
            record::{Country, Owner, Stage},
            tender::{MainProcurementCategory, ProcurementMethod},
        },
        infra::Memory,
        query::record::ById,
        request, test_support as fx,
        validation::ErrorKind,
        Command as _, Query as _,
    };

    use super::CreateCn;

    fn create(value: &str, lots: Vec<request::Lot>) -> CreateCn {
        let items = lots
            .iter()
            .map(|l| fx::item(&format!("item-{}", l.id), l.id.as_ref()))
            .collect();
        let mut procuring_entity = fx::procuring_entity();
        procuring_entity.id = "temporary".into();
        CreateCn {
            owner: Owner::from("platform-1".to_owned()),
            country: Country::new("MD").unwrap(),
            start_date: fx::start_date(),
            planning: fx::planning(),
            procuring_entity,
            classification: fx::classification(),
            procurement_method: ProcurementMethod::Ot,
            procurement_method_details: None,
            main_procurement_category: MainProcurementCategory::Works,
            value: fx::money(value),
            tender: request::Tender {
                title: Some("Road repair".into()),
                description: Some("Repair of the main road".into()),
                tender_period: Some(fx::tender_period()),
                lots,
                items,
                documents: vec![fx::document(
                    "doc-1",
                    DocumentType::BiddingDocuments,
                    &["temp-1"],
                )],
                ..request::Tender::default()
            },
        }
    }

    fn two_lots() -> Vec<request::Lot> {
        vec![
            fx::received_lot("temp-1", "1000.00", "EUR"),
            fx::received_lot("temp-2", "2500.50", "EUR"),
        ]
    }

    #[tokio::test]
    async fn creates_notice() {
        let svc = fx::service(Memory::new());

        let out = svc.execute(create("3500.50EUR", two_lots())).await.unwrap();

        assert_eq!(out.ocid.stage(), Stage::Ev);
        assert_eq!(out.cpid.country(), Country::new("MD").unwrap());
        assert_eq!(out.lot_ids.len(), 2);
        let token = *out.token.unwrap().expose_secret();

        let cn = svc
            .execute(ById::by((out.cpid, out.ocid)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cn.token, token);
        assert_eq!(cn.tender.value, "3500.50EUR".parse().unwrap());
        assert_eq!(
            cn.tender.procuring_entity.id,
            organization::Id::from("MD-IDNO-1010101"),
        );
        let first = &out.lot_ids[&lot::Id::from("temp-1")];
        assert_eq!(&cn.tender.lots[0].id, first);
        assert_eq!(&cn.tender.items[0].related_lot, first);
        assert_eq!(cn.tender.documents[0].related_lots, [first.clone()]);
    }

    #[tokio::test]
    async fn requires_declared_value_equal_to_lots() {
        let svc = fx::service(Memory::new());

        let err = svc
            .execute(Check(create("3500EUR", two_lots())))
            .await
            .unwrap_err();

        assert_eq!(err.as_ref().kind(), Some(ErrorKind::AmountMismatch));
    }

    #[tokio::test]
    async fn rejects_mixed_currencies() {
        let svc = fx::service(Memory::new());
        let mut lots = two_lots();
        lots[1].value = fx::money("2500.50USD");

        let err = svc
            .execute(Check(create("3500.50EUR", lots)))
            .await
            .unwrap_err();

        assert_eq!(err.as_ref().kind(), Some(ErrorKind::CurrencyMismatch));
    }

    #[tokio::test]
    async fn requires_title() {
        let svc = fx::service(Memory::new());
        let mut cmd = create("3500.50EUR", two_lots());
        cmd.tender.title = None;

        let err = svc.execute(cmd).await.unwrap_err();

        assert_eq!(
            err.as_ref().kind(),
            Some(ErrorKind::MissingRequiredAttribute),
        );
    }
}
