//! [`Lot`]-related validations.

use std::collections::HashSet;

use common::{Currency, DateTime};
use derive_more::Display;

use crate::{
    domain::{
        lot,
        tender::{MethodFamily, Period, ProcurementMethod},
        Item, Lot,
    },
    reconcile::Diff,
    request,
};

use super::{first_duplicate, Error};

/// Checks that IDs of the `received` lots are unique.
///
/// # Errors
///
/// With [`Error::DuplicateIdentity`] on the first repeated ID.
pub fn unique_ids(received: &[request::Lot]) -> Result<(), Error> {
    first_duplicate(received.iter().map(|l| &l.id)).map_or(Ok(()), |id| {
        Err(Error::DuplicateIdentity(format!("lot `{id}`")))
    })
}

/// Checks that every [`lot::Status::Active`] `saved` [`Lot`] is present among
/// the `received` ones.
///
/// # Errors
///
/// With [`Error::MissingCoverage`] on the first missing [`Lot`].
pub fn active_lots_transferred(
    received: &[request::Lot],
    saved: &[Lot],
) -> Result<(), Error> {
    let missing = Diff::of(received, saved).unchanged;
    saved
        .iter()
        .filter(|l| l.is_active())
        .find(|l| missing.contains(&l.id))
        .map_or(Ok(()), |l| {
            Err(Error::MissingCoverage(format!(
                "all active lots must be transferred, lot `{}` is missing",
                l.id,
            )))
        })
}

/// Checks that every [`lot::Status::Active`] [`Lot`] is referenced by at
/// least one of the provided [`Item`]s.
///
/// # Errors
///
/// With [`Error::MissingCoverage`] on the first uncovered [`Lot`].
pub fn active_lots_have_items(
    lots: &[Lot],
    items: &[Item],
) -> Result<(), Error> {
    let covered = items.iter().map(|i| &i.related_lot).collect::<HashSet<_>>();
    lots.iter()
        .filter(|l| l.is_active())
        .find(|l| !covered.contains(&l.id))
        .map_or(Ok(()), |l| {
            Err(Error::MissingCoverage(format!(
                "active lot `{}` is not referenced by any item",
                l.id,
            )))
        })
}

/// Checks that no `received` lot is valued at zero.
///
/// # Errors
///
/// With [`Error::InvalidRange`] on the first zero-valued lot.
pub fn non_zero_values(received: &[request::Lot]) -> Result<(), Error> {
    received
        .iter()
        .find(|l| l.value.amount.is_zero())
        .map_or(Ok(()), |l| {
            Err(Error::InvalidRange(format!(
                "value of lot `{}` must not be zero",
                l.id,
            )))
        })
}

/// Checks that every `received` lot is valued in the budget [`Currency`].
///
/// # Errors
///
/// With [`Error::CurrencyMismatch`] on the first lot valued differently.
pub fn budget_currency(
    received: &[request::Lot],
    budget: &Currency,
) -> Result<(), Error> {
    received
        .iter()
        .find(|l| &l.value.currency != budget)
        .map_or(Ok(()), |l| {
            Err(Error::CurrencyMismatch(format!(
                "lot `{}` is valued in `{}` while the budget is in `{budget}`",
                l.id, l.value.currency,
            )))
        })
}

/// Rule a lot contract period start is checked by.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ContractPeriodRule {
    /// Contract period must start after the tender period ends.
    AfterTenderPeriodEnd,

    /// Contract period must start after the reference start date.
    AfterStartDate,

    /// The [`ProcurementMethod`] is not allowed at all.
    Reject,
}

/// Table of [`ContractPeriodRule`]s per [`MethodFamily`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContractPeriodPolicy {
    /// [`ContractPeriodRule`] of the [`MethodFamily::Open`].
    pub open: ContractPeriodRule,

    /// [`ContractPeriodRule`] of the [`MethodFamily::Restricted`].
    pub restricted: ContractPeriodRule,
}

impl ContractPeriodPolicy {
    /// Returns the [`ContractPeriodRule`] of the provided [`MethodFamily`].
    #[must_use]
    pub const fn rule(&self, family: MethodFamily) -> ContractPeriodRule {
        match family {
            MethodFamily::Open => self.open,
            MethodFamily::Restricted => self.restricted,
        }
    }
}

/// Checks contract periods of the `received` lots against the
/// [`ContractPeriodPolicy`] for the provided [`ProcurementMethod`].
///
/// # Errors
///
/// - With [`Error::InvalidEnumValue`] if the [`ProcurementMethod`] is
///   rejected by the policy.
/// - With [`Error::InvalidRange`] if a period doesn't start before it ends.
/// - With [`Error::MissingRequiredAttribute`] if the rule requires a tender
///   period while there is none.
/// - With [`Error::InvalidRange`] if a period doesn't start after the
///   required point in time.
pub fn contract_periods(
    received: &[request::Lot],
    method: ProcurementMethod,
    policy: ContractPeriodPolicy,
    tender_period: Option<&Period>,
    start_date: DateTime,
) -> Result<(), Error> {
    let bound = match policy.rule(method.family()) {
        ContractPeriodRule::Reject => {
            return Err(Error::InvalidEnumValue(format!(
                "INVALID_PMD: procurement method `{method}` is not allowed",
            )));
        }
        ContractPeriodRule::AfterTenderPeriodEnd => tender_period
            .map(|p| (p.end_date, "tender period end"))
            .ok_or_else(|| {
                Error::MissingRequiredAttribute("tender.tenderPeriod".into())
            }),
        ContractPeriodRule::AfterStartDate => Ok((start_date, "start date")),
    };

    for l in received {
        if !l.contract_period.is_ordered() {
            return Err(Error::InvalidRange(format!(
                "contract period of lot `{}` must start before it ends",
                l.id,
            )));
        }
    }

    let (bound, what) = bound?;
    received
        .iter()
        .find(|l| l.contract_period.start_date <= bound)
        .map_or(Ok(()), |l| {
            Err(Error::InvalidRange(format!(
                "contract period of lot `{}` must start after the {what}",
                l.id,
            )))
        })
}

/// Collects IDs of the provided lots into a lookup set.
pub(crate) fn ids<'a>(
    received: &'a [request::Lot],
    saved: &'a [Lot],
) -> HashSet<&'a lot::Id> {
    received
        .iter()
        .map(|l| &l.id)
        .chain(saved.iter().map(|l| &l.id))
        .collect()
}
