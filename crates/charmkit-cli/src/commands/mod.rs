//! CLI commands

pub mod package;
pub mod series;
pub mod show;
pub mod unpack;
pub mod version;
