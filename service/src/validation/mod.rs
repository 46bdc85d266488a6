//! Cross-entity validations of received requests.
//!
//! Every validation is a pure function either passing silently or failing
//! with an [`Error`] describing the first violation found.

pub mod auction;
pub mod candidates;
pub mod conversions;
pub mod criteria;
pub mod documents;
pub mod items;
pub mod lots;
pub mod organization;
pub mod required;
pub mod status;
pub mod value;

use std::hash::Hash;

use common::define_kind;
use derive_more::{Display, Error as StdError};
use itertools::Itertools as _;

use crate::domain::MissingAttribute;

/// Error of a validation.
///
/// Its [`Display`] implementation provides a human-readable detail.
///
/// [`Display`]: std::fmt::Display
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Referenced document or process doesn't exist.
    #[display("Not found: {_0}")]
    NotFound(#[error(not(source))] String),

    /// Owner or token mismatch.
    #[display("Unauthorized: {_0}")]
    Unauthorized(#[error(not(source))] String),

    /// Tender is not in the required source status.
    #[display("Invalid status: {_0}")]
    InvalidStatus(#[error(not(source))] String),

    /// Identity collision.
    #[display("Duplicate identity: {_0}")]
    DuplicateIdentity(#[error(not(source))] String),

    /// Reference to a non-existent entity.
    #[display("Dangling reference: {_0}")]
    DanglingReference(#[error(not(source))] String),

    /// Active lot not covered by items or not transferred.
    #[display("Missing coverage: {_0}")]
    MissingCoverage(#[error(not(source))] String),

    /// Value outside of the allowed set, including deprecated values.
    #[display("Invalid value: {_0}")]
    InvalidEnumValue(#[error(not(source))] String),

    /// Empty or inverted range, or non-positive quantity.
    #[display("Invalid range: {_0}")]
    InvalidRange(#[error(not(source))] String),

    /// Currencies disagree.
    #[display("Currency mismatch: {_0}")]
    CurrencyMismatch(#[error(not(source))] String),

    /// Tender value disagrees with the lots total.
    #[display("Amount mismatch: {_0}")]
    AmountMismatch(#[error(not(source))] String),

    /// Budget breakdown doesn't overlap the contract period.
    #[display("Period not covered: {_0}")]
    PeriodNotCovered(#[error(not(source))] String),

    /// Required substructure is absent.
    #[display("Missing required attribute: {_0}")]
    MissingRequiredAttribute(#[error(not(source))] String),

    /// Auction data disagrees with the required or declared modalities.
    #[display("Inconsistent auction signal: {_0}")]
    InconsistentAuctionSignal(#[error(not(source))] String),
}

impl Error {
    /// Returns the [`ErrorKind`] of this [`Error`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::InvalidStatus(_) => ErrorKind::InvalidStatus,
            Self::DuplicateIdentity(_) => ErrorKind::DuplicateIdentity,
            Self::DanglingReference(_) => ErrorKind::DanglingReference,
            Self::MissingCoverage(_) => ErrorKind::MissingCoverage,
            Self::InvalidEnumValue(_) => ErrorKind::InvalidEnumValue,
            Self::InvalidRange(_) => ErrorKind::InvalidRange,
            Self::CurrencyMismatch(_) => ErrorKind::CurrencyMismatch,
            Self::AmountMismatch(_) => ErrorKind::AmountMismatch,
            Self::PeriodNotCovered(_) => ErrorKind::PeriodNotCovered,
            Self::MissingRequiredAttribute(_) => {
                ErrorKind::MissingRequiredAttribute
            }
            Self::InconsistentAuctionSignal(_) => {
                ErrorKind::InconsistentAuctionSignal
            }
        }
    }
}

impl From<MissingAttribute> for Error {
    fn from(MissingAttribute(attr): MissingAttribute) -> Self {
        Self::MissingRequiredAttribute(attr.into())
    }
}

define_kind! {
    #[doc = "Kind of a validation [`Error`]."]
    enum ErrorKind {
        #[doc = "[`Error::NotFound`]."]
        #[value = "NOT_FOUND"]
        NotFound,

        #[doc = "[`Error::Unauthorized`]."]
        #[value = "UNAUTHORIZED"]
        Unauthorized,

        #[doc = "[`Error::InvalidStatus`]."]
        #[value = "INVALID_STATUS"]
        InvalidStatus,

        #[doc = "[`Error::DuplicateIdentity`]."]
        #[value = "DUPLICATE_IDENTITY"]
        DuplicateIdentity,

        #[doc = "[`Error::DanglingReference`]."]
        #[value = "DANGLING_REFERENCE"]
        DanglingReference,

        #[doc = "[`Error::MissingCoverage`]."]
        #[value = "MISSING_COVERAGE"]
        MissingCoverage,

        #[doc = "[`Error::InvalidEnumValue`]."]
        #[value = "INVALID_ENUM_VALUE"]
        InvalidEnumValue,

        #[doc = "[`Error::InvalidRange`]."]
        #[value = "INVALID_RANGE"]
        InvalidRange,

        #[doc = "[`Error::CurrencyMismatch`]."]
        #[value = "CURRENCY_MISMATCH"]
        CurrencyMismatch,

        #[doc = "[`Error::AmountMismatch`]."]
        #[value = "AMOUNT_MISMATCH"]
        AmountMismatch,

        #[doc = "[`Error::PeriodNotCovered`]."]
        #[value = "PERIOD_NOT_COVERED"]
        PeriodNotCovered,

        #[doc = "[`Error::MissingRequiredAttribute`]."]
        #[value = "MISSING_REQUIRED_ATTRIBUTE"]
        MissingRequiredAttribute,

        #[doc = "[`Error::InconsistentAuctionSignal`]."]
        #[value = "INCONSISTENT_AUCTION_SIGNAL"]
        InconsistentAuctionSignal,
    }
}

/// Returns the first key occurring more than once among the provided ones.
fn first_duplicate<K: Clone + Eq + Hash>(
    keys: impl IntoIterator<Item = K>,
) -> Option<K> {
    keys.into_iter().duplicates().next()
}
