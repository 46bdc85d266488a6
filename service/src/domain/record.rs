//! [`Record`] definitions.

use std::{fmt, str::FromStr, sync::LazyLock};

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret, ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{budget::Planning, Tender},
    validation,
};

/// Persisted document of a procurement process stage.
///
/// A [`Record`] is always saved as a whole: updates replace the previous
/// version keyed by the same ([`Cpid`], [`Ocid`]) pair.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// [`Cpid`] of the process this [`Record`] belongs to.
    pub cpid: Cpid,

    /// [`Ocid`] of the stage this [`Record`] describes.
    pub ocid: Ocid,

    /// [`Owner`] of this [`Record`].
    pub owner: Owner,

    /// [`Token`] granting write access to this [`Record`].
    pub token: Token,

    /// [`DateTime`] when this [`Record`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,

    /// [`Planning`] section of the process.
    pub planning: Planning,

    /// [`Tender`] of this stage.
    pub tender: Tender,
}

impl Record {
    /// Returns the storage key of this [`Record`].
    #[must_use]
    pub fn key(&self) -> (Cpid, Ocid) {
        (self.cpid.clone(), self.ocid.clone())
    }

    /// Returns the [`Stage`] this [`Record`] describes.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.ocid.stage()
    }

    /// Checks whether the provided [`Owner`] and [`Token`] grant write access
    /// to this [`Record`].
    ///
    /// # Errors
    ///
    /// With [`validation::Error::Unauthorized`] if they don't.
    pub fn authorize(
        &self,
        owner: &Owner,
        token: &SecretBox<Token>,
    ) -> Result<(), validation::Error> {
        if &self.owner != owner {
            return Err(validation::Error::Unauthorized(
                "invalid owner".into(),
            ));
        }
        if &self.token != token.expose_secret() {
            return Err(validation::Error::Unauthorized(
                "invalid token".into(),
            ));
        }
        Ok(())
    }
}

/// Contracting process identifier.
///
/// Has the `{prefix}-{country}-{timestamp}` format, where `prefix` is an
/// [OCDS] publisher prefix, e.g. `ocds-t1s2t3-MD-1580458690892`.
///
/// [OCDS]: https://standard.open-contracting.org
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq,
    PartialOrd, Serialize,
)]
#[as_ref(str)]
#[serde(try_from = "String", into = "String")]
pub struct Cpid(String);

/// Format of a [`Cpid`].
static CPID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ocds-[a-z0-9]{6}-[A-Z]{2}-[0-9]{13}$").expect("valid regex")
});

impl Cpid {
    /// Creates a new [`Cpid`] if the given `value` matches the format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        CPID.is_match(&value).then_some(Self(value))
    }

    /// Composes a new [`Cpid`] out of its valid parts.
    #[must_use]
    pub fn compose(prefix: &Prefix, country: &Country, timestamp: i64) -> Self {
        Self(format!("{prefix}-{country}-{timestamp:013}"))
    }

    /// Returns the [`Country`] encoded into this [`Cpid`].
    #[must_use]
    pub fn country(&self) -> Country {
        // Offset of the country code is fixed by the format.
        Country(self.0[12..14].to_owned())
    }
}

impl FromStr for Cpid {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Cpid`")
    }
}

impl TryFrom<String> for Cpid {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("invalid `Cpid`")
    }
}

impl From<Cpid> for String {
    fn from(cpid: Cpid) -> Self {
        cpid.0
    }
}

/// Stage identifier inside a contracting process.
///
/// Has the `{cpid}-{stage}-{timestamp}` format, e.g.
/// `ocds-t1s2t3-MD-1580458690892-EV-1580458791896`.
#[derive(
    Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Ocid {
    /// Full textual value.
    value: String,

    /// [`Stage`] encoded into the `value`.
    stage: Stage,
}

/// Format of an [`Ocid`].
static OCID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ocds-[a-z0-9]{6}-[A-Z]{2}-[0-9]{13}-(?<stage>[A-Z]{2})-[0-9]{13}$",
    )
    .expect("valid regex")
});

impl Ocid {
    /// Creates a new [`Ocid`] if the given `value` matches the format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let stage =
            OCID.captures(&value)?.name("stage")?.as_str().parse().ok()?;
        Some(Self { value, stage })
    }

    /// Composes a new [`Ocid`] of the provided [`Cpid`] and [`Stage`].
    #[must_use]
    pub fn compose(cpid: &Cpid, stage: Stage, timestamp: i64) -> Self {
        Self {
            value: format!("{cpid}-{stage}-{timestamp:013}"),
            stage,
        }
    }

    /// Returns the [`Stage`] of this [`Ocid`].
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl fmt::Display for Ocid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Ocid {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Ocid`")
    }
}

impl TryFrom<String> for Ocid {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("invalid `Ocid`")
    }
}

impl From<Ocid> for String {
    fn from(ocid: Ocid) -> Self {
        ocid.value
    }
}

/// [OCDS] publisher prefix of [`Cpid`]s, e.g. `ocds-t1s2t3`.
///
/// [OCDS]: https://standard.open-contracting.org
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str)]
#[serde(try_from = "String", into = "String")]
pub struct Prefix(String);

/// Format of a [`Prefix`].
static PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ocds-[a-z0-9]{6}$").expect("valid regex"));

impl Prefix {
    /// Creates a new [`Prefix`] if the given `value` matches the format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        PREFIX.is_match(&value).then_some(Self(value))
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Self("ocds-t1s2t3".into())
    }
}

impl TryFrom<String> for Prefix {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("invalid `Prefix`")
    }
}

impl From<Prefix> for String {
    fn from(prefix: Prefix) -> Self {
        prefix.0
    }
}

/// Country of a procurement process, as an [ISO 3166-1 alpha-2] code.
///
/// [ISO 3166-1 alpha-2]: https://en.wikipedia.org/wiki/ISO_3166-1_alpha-2
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq,
    PartialOrd, Serialize,
)]
#[as_ref(str)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Creates a new [`Country`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`Country`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl FromStr for Country {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Country`")
    }
}

impl TryFrom<String> for Country {
    type Error = &'static str;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code).ok_or("invalid `Country`")
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

define_kind! {
    #[doc = "Stage of a procurement process."]
    enum Stage {
        #[doc = "Planning notice."]
        #[value = "PN"]
        Pn,

        #[doc = "Contract notice of an open or selective procedure."]
        #[value = "EV"]
        Ev,

        #[doc = "Contract notice of a negotiated procedure."]
        #[value = "NP"]
        Np,
    }
}

/// Platform owning a [`Record`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Hash, Into, PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Owner(String);

/// Secret token granting write access to a [`Record`].
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Into, PartialEq,
    Serialize,
)]
#[serde(transparent)]
pub struct Token(Uuid);

impl Token {
    /// Creates a new random [`Token`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl Zeroize for Token {
    fn zeroize(&mut self) {
        self.0 = Uuid::nil();
    }
}

impl CloneableSecret for Token {}

/// [`DateTime`] when a [`Record`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Record, unit::Creation)>;
