//! Derived values calculations.

use std::collections::{HashMap, HashSet};

use common::Money;
use derive_more::Display;

use crate::{
    domain::{budget::BudgetBreakdown, tender::Period, Lot},
    request,
    validation::Error,
};

/// Sums the provided amounts, rounding the result half-up to
/// [`Money::SCALE`] fraction digits.
///
/// # Errors
///
/// - With [`Error::AmountMismatch`] if there is nothing to sum.
/// - With [`Error::CurrencyMismatch`] if currencies differ.
pub fn sum<'a>(
    values: impl IntoIterator<Item = &'a Money>,
) -> Result<Money, Error> {
    let mut values = values.into_iter();
    let first = values.next().ok_or_else(|| {
        Error::AmountMismatch("there are no active lots to sum".into())
    })?;

    let mut amount = first.amount;
    for v in values {
        if v.currency != first.currency {
            return Err(Error::CurrencyMismatch(format!(
                "lots are valued in both `{}` and `{}`",
                first.currency, v.currency,
            )));
        }
        amount += v.amount;
    }

    Ok(Money::new(amount, first.currency.clone()).round())
}

/// Calculates the tender value out of the `received` lots, all of which
/// become active.
///
/// # Errors
///
/// See [`sum()`].
pub fn tender_value(received: &[request::Lot]) -> Result<Money, Error> {
    sum(received.iter().map(|l| &l.value))
}

/// Calculates the tender value out of the `received` lots reconciled with
/// the `saved` ones.
///
/// A lot counts if it's either new or active in the `saved` set. Received
/// values take precedence over the saved ones.
///
/// # Errors
///
/// See [`sum()`].
pub fn merged_tender_value(
    received: &[request::Lot],
    saved: &[Lot],
) -> Result<Money, Error> {
    let by_id = saved
        .iter()
        .map(|l| (&l.id, l))
        .collect::<HashMap<_, _>>();
    let received_ids = received.iter().map(|l| &l.id).collect::<HashSet<_>>();

    let from_received = received
        .iter()
        .filter(|r| by_id.get(&r.id).is_none_or(|s| s.is_active()))
        .map(|r| &r.value);
    let from_saved = saved
        .iter()
        .filter(|s| s.is_active() && !received_ids.contains(&s.id))
        .map(|s| &s.value);

    sum(from_received.chain(from_saved))
}

/// Calculates the overall contract [`Period`] spanning all the provided
/// ones.
///
/// # Errors
///
/// With [`Error::MissingRequiredAttribute`] if there are no periods.
pub fn contract_period<'a>(
    periods: impl IntoIterator<Item = &'a Period>,
) -> Result<Period, Error> {
    periods
        .into_iter()
        .fold(None, |acc: Option<Period>, p| {
            Some(acc.map_or(*p, |acc| Period {
                start_date: acc.start_date.min(p.start_date),
                end_date: acc.end_date.max(p.end_date),
            }))
        })
        .ok_or_else(|| {
            Error::MissingRequiredAttribute("lots contract periods".into())
        })
}

/// Checks that every [`BudgetBreakdown`] overlaps the contract [`Period`].
///
/// # Errors
///
/// With [`Error::PeriodNotCovered`] on the first non-overlapping one.
pub fn check_budget_coverage(
    breakdowns: &[BudgetBreakdown],
    period: &Period,
) -> Result<(), Error> {
    breakdowns
        .iter()
        .find(|b| !b.period.overlaps(period))
        .map_or(Ok(()), |b| {
            Err(Error::PeriodNotCovered(format!(
                "budget breakdown `{}` period [{}, {}] doesn't overlap \
                 contract period [{}, {}]",
                b.id,
                b.period.start_date,
                b.period.end_date,
                period.start_date,
                period.end_date,
            )))
        })
}

/// Rule the declared tender value is compared with the lots total by.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum AmountRule {
    /// Tender value must equal the lots total.
    EqualToLots,

    /// Tender value must not exceed the lots total.
    TenderNotAboveLots,

    /// Lots total must not exceed the tender value.
    LotsNotAboveTender,
}

impl AmountRule {
    /// Checks the `declared` tender value against the `lots` total.
    ///
    /// # Errors
    ///
    /// - With [`Error::CurrencyMismatch`] if currencies differ.
    /// - With [`Error::AmountMismatch`] if this [`AmountRule`] is violated.
    pub fn check(self, declared: &Money, lots: &Money) -> Result<(), Error> {
        if declared.currency != lots.currency {
            return Err(Error::CurrencyMismatch(format!(
                "tender value `{declared}` and lots total `{lots}` are in \
                 different currencies",
            )));
        }

        let (d, l) = (declared.amount, lots.amount);
        let violated = match self {
            Self::EqualToLots => d != l,
            Self::TenderNotAboveLots => d > l,
            Self::LotsNotAboveTender => l > d,
        };
        if violated {
            return Err(Error::AmountMismatch(format!(
                "tender value `{declared}` violates `{self}` against lots \
                 total `{lots}`",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::{
        domain::{lot, tender::Period},
        test_support as fx,
        validation::ErrorKind,
    };

    use super::AmountRule;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn sums_lots_of_same_currency() {
        let lots = [
            fx::received_lot("lot-1", "1000.00", "EUR"),
            fx::received_lot("lot-2", "2500.50", "EUR"),
        ];

        assert_eq!(super::tender_value(&lots).unwrap(), money("3500.50EUR"));
    }

    #[test]
    fn rounds_half_up() {
        let values = [money("0.005EUR"), money("1.00EUR")];
        assert_eq!(super::sum(&values).unwrap(), money("1.01EUR"));
    }

    #[test]
    fn rejects_mixed_currencies() {
        let lots = [
            fx::received_lot("lot-1", "1000.00", "EUR"),
            fx::received_lot("lot-2", "2500.50", "USD"),
        ];

        let err = super::tender_value(&lots).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CurrencyMismatch);
    }

    #[test]
    fn rejects_empty_sum() {
        let err = super::tender_value(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmountMismatch);
    }

    #[test]
    fn merged_value_counts_active_and_new_lots() {
        let mut planning = fx::lot("lot-2", "500", "EUR");
        planning.status = lot::Status::Planning;
        let saved = [
            fx::lot("lot-1", "100", "EUR"),
            planning,
            fx::lot("lot-3", "7", "EUR"),
        ];
        let received = [
            fx::received_lot("lot-1", "200", "EUR"),
            fx::received_lot("lot-2", "300", "EUR"),
            fx::received_lot("new-1", "40", "EUR"),
        ];

        assert_eq!(
            super::merged_tender_value(&received, &saved).unwrap(),
            money("247EUR"),
        );
    }

    #[test]
    fn contract_period_spans_all_lots() {
        let p = |s: &str, e: &str| Period {
            start_date: DateTime::from_rfc3339(s).unwrap(),
            end_date: DateTime::from_rfc3339(e).unwrap(),
        };
        let periods = [
            p("2030-03-01T00:00:00Z", "2030-06-01T00:00:00Z"),
            p("2030-01-01T00:00:00Z", "2030-02-01T00:00:00Z"),
            p("2030-02-01T00:00:00Z", "2030-12-01T00:00:00Z"),
        ];

        assert_eq!(
            super::contract_period(&periods).unwrap(),
            p("2030-01-01T00:00:00Z", "2030-12-01T00:00:00Z"),
        );
        assert_eq!(
            super::contract_period(std::iter::empty()).unwrap_err().kind(),
            ErrorKind::MissingRequiredAttribute,
        );
    }

    #[test]
    fn budget_breakdowns_must_overlap() {
        let period = fx::lot("lot-1", "1", "EUR").contract_period;
        let mut breakdowns = fx::pn_record().planning.budget.budget_breakdown;
        assert!(super::check_budget_coverage(&breakdowns, &period).is_ok());

        breakdowns[0].period.start_date =
            DateTime::from_rfc3339("2031-01-01T00:00:00Z").unwrap();
        breakdowns[0].period.end_date =
            DateTime::from_rfc3339("2031-12-31T00:00:00Z").unwrap();
        let err =
            super::check_budget_coverage(&breakdowns, &period).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PeriodNotCovered);
    }

    #[test]
    fn amount_rules_compare_differently() {
        let (low, high) = (money("100EUR"), money("200EUR"));

        assert!(AmountRule::EqualToLots.check(&low, &low).is_ok());
        assert!(AmountRule::EqualToLots.check(&low, &high).is_err());

        assert!(AmountRule::TenderNotAboveLots.check(&low, &high).is_ok());
        assert!(AmountRule::TenderNotAboveLots.check(&high, &low).is_err());

        assert!(AmountRule::LotsNotAboveTender.check(&high, &low).is_ok());
        assert!(AmountRule::LotsNotAboveTender.check(&low, &high).is_err());

        let err = AmountRule::EqualToLots
            .check(&low, &money("100USD"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CurrencyMismatch);
    }
}
