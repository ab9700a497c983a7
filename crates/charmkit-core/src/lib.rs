//! charmkit Core - loading, series selection and version stamping for charms
//!
//! This crate provides the building blocks used when deploying and packaging
//! charms:
//! - `read_charm`: load a charm from a directory or a packed archive
//! - `series_for_charm`: choose the series a deployment should target
//! - `VersionStamper`: write a `version` file from git, bazaar or mercurial
//! - `Meta`, `Config`, `Metrics`, `Actions`: the charm's declared schemas

pub mod actions;
pub mod archive;
pub mod charm;
pub mod config;
pub mod dir;
pub mod error;
pub mod meta;
pub mod metrics;
pub mod series;
pub mod version;

pub use actions::{ActionSpec, Actions};
pub use archive::{CharmArchive, default_archive_name};
pub use charm::{Charm, CharmReader, FsCharmReader, LoadedCharm, read_charm, read_charm_with};
pub use config::{Config, ConfigOption, OptionType};
pub use dir::CharmDir;
pub use error::{
    CoreError, Result, SeriesError, UnsupportedSeries, is_missing_series_error,
    is_unsupported_series_error,
};
pub use meta::{Meta, Relation, RelationRole, RelationScope};
pub use metrics::{Metric, MetricType, Metrics};
pub use series::{series_for, series_for_charm};
pub use version::{
    CommandOutput, CommandRunner, SystemCommandRunner, Vcs, VersionStamper, stamp_version,
};
