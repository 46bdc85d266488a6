//! Service contains the validation and reconciliation logic of procurement
//! Contract Notices.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod calculation;
pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod reconcile;
pub mod request;
#[cfg(test)]
mod test_support;
pub mod validation;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

use self::{
    domain::record::Prefix,
    infra::{rules, StaticRules, UuidGenerator},
};
#[cfg(doc)]
use self::infra::{Database, Generator, Rules};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    /// [`Prefix`] of the generated [`Cpid`]s.
    ///
    /// [`Cpid`]: domain::record::Cpid
    pub ocid_prefix: Prefix,

    /// [`StaticRules`] configuration.
    pub rules: rules::Config,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Gen = UuidGenerator, Rl = StaticRules> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Generator`] of this [`Service`].
    generator: Gen,

    /// [`Rules`] of this [`Service`].
    rules: Rl,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters, using the
    /// [`UuidGenerator`] and the [`StaticRules`] built from the [`Config`].
    #[must_use]
    pub fn new(config: Config, database: Db) -> Self {
        let generator = UuidGenerator::new(config.ocid_prefix.clone());
        let rules = StaticRules::new(config.rules.clone());
        Self::with(config, database, generator, rules)
    }
}

impl<Db, Gen, Rl> Service<Db, Gen, Rl> {
    /// Creates a new [`Service`] out of the provided parts.
    #[must_use]
    pub fn with(
        config: Config,
        database: Db,
        generator: Gen,
        rules: Rl,
    ) -> Self {
        Self {
            config,
            database,
            generator,
            rules,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Generator`] of this [`Service`].
    #[must_use]
    pub fn generator(&self) -> &Gen {
        &self.generator
    }

    /// Returns [`Rules`] of this [`Service`].
    #[must_use]
    pub fn rules(&self) -> &Rl {
        &self.rules
    }
}
