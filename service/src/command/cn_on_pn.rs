//! Transition of a Planning Notice into a Contract Notice, shared by the
//! `Create*CnOnPn` [`Command`]s.
//!
//! [`Command`]: super::Command

use std::collections::HashSet;

use common::{
    operations::{By, Select},
    DateTime,
};
use secrecy::SecretBox;
use tracerr::Traced;

use crate::{
    calculation::{self, AmountRule},
    domain::{
        record::{Cpid, Ocid, Owner, Stage, Token},
        tender::{self, StatusDetails},
        Item, Lot, Record, Tender,
    },
    infra::{database, rules, Database, Generator, Rules},
    request,
    validation::{
        self, auction, candidates, conversions, criteria, documents, items,
        lots, organization,
        lots::{ContractPeriodPolicy, ContractPeriodRule},
        required, status,
    },
    Service,
};

use super::{build, ExecutionError};

/// Request of a Contract Notice creation on a Planning Notice.
#[derive(Clone, Debug)]
pub struct CnOnPn {
    /// [`Cpid`] of the process.
    pub cpid: Cpid,

    /// [`Ocid`] of the Planning Notice.
    pub ocid: Ocid,

    /// [`Owner`] claiming the Planning Notice.
    pub owner: Owner,

    /// [`Token`] granting write access to the Planning Notice.
    pub token: SecretBox<Token>,

    /// Reference [`DateTime`] of the transition.
    pub start_date: DateTime,

    /// Received [`request::Tender`].
    pub tender: request::Tender,
}

/// Parameters distinguishing the Contract Notice variants.
#[derive(Clone, Copy, Debug)]
pub(super) struct Transition {
    /// [`Stage`] of the produced record.
    pub(super) stage: Stage,

    /// [`StatusDetails`] of the produced [`Tender`].
    pub(super) status_details: StatusDetails,

    /// [`ContractPeriodPolicy`] of the lots.
    pub(super) contract_periods: ContractPeriodPolicy,

    /// [`AmountRule`] of the budget against the lots total.
    pub(super) amount: AmountRule,

    /// Indicator whether electronic auctions are carried.
    pub(super) auctions: bool,

    /// Indicator whether a tender period is required.
    pub(super) tender_period: bool,

    /// Indicator whether candidates range and pre-qualification are
    /// required.
    pub(super) candidates: bool,
}

/// Contract Notice prepared out of a Planning Notice.
#[derive(Debug)]
pub(super) struct Prepared {
    /// New [`Record`] to be inserted.
    pub(super) record: Record,

    /// Permanent IDs of the lots received with temporary ones.
    pub(super) ids: build::Ids,

    /// Indicator whether an electronic auction is required.
    pub(super) is_auction_required: bool,
}

impl<Db, Gen, Rl> Service<Db, Gen, Rl>
where
    Db: Database<
        Select<By<Option<Record>, (Cpid, Ocid)>>,
        Ok = Option<Record>,
        Err = Traced<database::Error>,
    >,
    Gen: Generator,
    Rl: Rules<
        Select<By<rules::AuctionRequired, rules::Params>>,
        Ok = rules::AuctionRequired,
        Err = Traced<rules::Error>,
    >,
{
    /// Validates the provided [`CnOnPn`] request and prepares a new
    /// Contract Notice [`Record`] out of it, without persisting anything.
    pub(super) async fn prepare_cn_on_pn(
        &self,
        transition: Transition,
        req: CnOnPn,
    ) -> Result<Prepared, Traced<ExecutionError>> {
        use ExecutionError as E;

        let pn = self
            .database()
            .execute(Select(By::<Option<Record>, _>::new((
                req.cpid.clone(),
                req.ocid.clone(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.stage() == Stage::Pn)
            .ok_or_else(|| {
                validation::Error::NotFound(format!(
                    "planning notice `{}` of `{}`",
                    req.ocid, req.cpid,
                ))
            })
            .map_err(tracerr::from_and_wrap!(=> E))?;

        validate(transition, &pn, &req)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let is_auction_required = if transition.auctions {
            let required = self
                .rules()
                .execute(Select(By::<rules::AuctionRequired, _>::new(
                    rules::Params {
                        country: pn.cpid.country(),
                        method: pn.tender.procurement_method,
                        category: pn.tender.main_procurement_category,
                    },
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            auction::consistency(&req.tender, *required)
                .map_err(tracerr::from_and_wrap!(=> E))?;
            *required
        } else {
            false
        };

        let (record, ids) = transit(transition, pn, req, self.generator())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        Ok(Prepared {
            record,
            ids,
            is_auction_required,
        })
    }
}

/// Runs the validations of the `req` preceding the rules lookup.
fn validate(
    transition: Transition,
    pn: &Record,
    req: &CnOnPn,
) -> Result<(), validation::Error> {
    let received = &req.tender;
    let saved = &pn.tender;

    pn.authorize(&req.owner, &req.token)?;
    status::planning_compatible(saved)?;

    lots::unique_ids(&received.lots)?;
    items::unique_ids(&received.items)?;
    documents::unique_ids(&received.documents)?;
    organization::same_procuring_entity(
        received.procuring_entity.as_ref(),
        &saved.procuring_entity.id,
    )?;
    let persons = received.persons();
    organization::unique_persons(persons)?;
    organization::unique_business_functions(persons)?;
    organization::unique_business_function_documents(persons)?;
    organization::business_function_types(persons)?;
    organization::business_function_periods(persons, req.start_date)?;

    documents::allowed_types(&received.documents)?;
    items::positive_quantities(&received.items)?;
    required::items_present(received, keeps_planned(saved))?;

    if transition.candidates {
        candidates::range(received.second_stage.as_ref())?;
        required::pre_qualification(received.pre_qualification.as_ref())?;
    }
    if transition.tender_period {
        required::tender_period(received.tender_period.as_ref())?;
    }

    let (saved_lots, saved_items): (&[Lot], &[Item]) =
        if keeps_planned(saved) {
            (saved.lots.as_slice(), saved.items.as_slice())
        } else {
            (&[], &[])
        };
    let known = lots::ids(&received.lots, saved_lots);
    items::related_lots_exist(&received.items, &known)?;
    documents::related_lots_exist(&received.documents, &known)?;
    if transition.auctions {
        auction::related_lots_exist(
            received.electronic_auctions.as_ref(),
            &known,
        )?;
    }

    lots::non_zero_values(&received.lots)?;
    lots::budget_currency(
        &received.lots,
        &pn.planning.budget.amount.currency,
    )?;
    lots::contract_periods(
        &received.lots,
        saved.procurement_method,
        transition.contract_periods,
        received.tender_period.as_ref(),
        req.start_date,
    )?;

    let (lot_ids, item_ids) =
        build::criteria_targets(received, saved_lots, saved_items);
    criteria::related_items_exist(&received.criteria, &lot_ids, &item_ids)?;
    conversions::related_requirements_exist(
        &received.conversions,
        &received.criteria,
    )
}

/// Builds a new Contract Notice [`Record`] out of the `pn` one and the
/// validated `req`.
fn transit<G: Generator>(
    transition: Transition,
    pn: Record,
    req: CnOnPn,
    generator: &G,
) -> Result<(Record, build::Ids), validation::Error> {
    let Record {
        cpid,
        ocid: _,
        owner,
        token,
        created_at: _,
        planning,
        tender: saved,
    } = pn;
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
        procuring_entity,
        second_stage,
        pre_qualification,
    } = req.tender;

    let mut ids = build::Ids::default();

    let (saved_lots, saved_items, saved_documents) = if keeps_planned(&saved)
    {
        (saved.lots, saved.items, saved.documents)
    } else {
        let mut documents = saved.documents;
        for d in &mut documents {
            d.related_lots.clear();
        }
        (vec![], vec![], documents)
    };
    let mut lots = build::lots(lots, saved_lots, generator, &mut ids)?;
    build::activate(&mut lots);
    let items = build::items(items, saved_items, generator, &mut ids);
    let documents = build::documents(documents, saved_documents, &ids);

    let total = calculation::sum(lots.iter().map(|l| &l.value))?;
    transition.amount.check(&planning.budget.amount, &total)?;
    validation::lots::active_lots_have_items(&lots, &items)?;
    let contract_period =
        calculation::contract_period(lots.iter().map(|l| &l.contract_period))?;
    calculation::check_budget_coverage(
        &planning.budget.budget_breakdown,
        &contract_period,
    )?;

    let (criteria, conversions) =
        build::criteria(criteria, conversions, generator, &ids);
    let (procurement_method_modalities, electronic_auctions) =
        if transition.auctions {
            let auctions = build::auctions(
                electronic_auctions,
                &HashSet::new(),
                generator,
                &ids,
            );
            (procurement_method_modalities, auctions)
        } else {
            (vec![], None)
        };
    let (second_stage, pre_qualification) = if transition.candidates {
        (second_stage, pre_qualification)
    } else {
        (None, None)
    };
    let persons = procuring_entity.map(|pe| pe.persons).unwrap_or_default();

    let tender = Tender {
        id: saved.id,
        status: tender::Status::Active,
        status_details: transition.status_details,
        title: title.unwrap_or(saved.title),
        description: description.unwrap_or(saved.description),
        classification: saved.classification,
        procurement_method: saved.procurement_method,
        procurement_method_details: saved.procurement_method_details,
        procurement_method_rationale: procurement_method_rationale
            .or(saved.procurement_method_rationale),
        main_procurement_category: saved.main_procurement_category,
        value: total,
        contract_period: Some(contract_period),
        tender_period,
        enquiry_period,
        procuring_entity: saved.procuring_entity.update(persons),
        lots,
        items,
        documents,
        criteria,
        conversions,
        award_criteria: award_criteria.or(saved.award_criteria),
        award_criteria_details: award_criteria_details
            .or(saved.award_criteria_details),
        procurement_method_modalities,
        electronic_auctions,
        second_stage,
        pre_qualification,
    };

    let record = Record {
        ocid: generator.ocid(&cpid, transition.stage),
        cpid,
        owner,
        token,
        created_at: DateTime::now().coerce(),
        planning,
        tender,
    };
    Ok((record, ids))
}

/// Indicates whether the lots of the `saved` Planning Notice [`Tender`]
/// are carried into the Contract Notice.
///
/// Planned lots survive only along with planned items, otherwise all the
/// lots arrive with the request.
fn keeps_planned(saved: &Tender) -> bool {
    !saved.items.is_empty()
}

/// [`ContractPeriodPolicy`] of the negotiated Contract Notices.
pub(super) const NEGOTIATED: ContractPeriodPolicy = ContractPeriodPolicy {
    open: ContractPeriodRule::Reject,
    restricted: ContractPeriodRule::AfterStartDate,
};

/// [`ContractPeriodPolicy`] of the open Contract Notices.
pub(super) const OPEN: ContractPeriodPolicy = ContractPeriodPolicy {
    open: ContractPeriodRule::AfterTenderPeriodEnd,
    restricted: ContractPeriodRule::Reject,
};

/// [`ContractPeriodPolicy`] of the selective Contract Notices.
pub(super) const SELECTIVE: ContractPeriodPolicy = ContractPeriodPolicy {
    open: ContractPeriodRule::AfterTenderPeriodEnd,
    restricted: ContractPeriodRule::AfterStartDate,
};
