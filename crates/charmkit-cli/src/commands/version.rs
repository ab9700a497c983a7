//! Version command - stamp the charm's version file

use charmkit_core::VersionStamper;
use charmkit_core::charm::VERSION_FILE;
use console::style;
use std::path::Path;

use crate::error::{CliError, Result};

pub fn run(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(CliError::io(format!(
            "{} is not a charm directory",
            path.display()
        )));
    }

    match VersionStamper::new().stamp(path)? {
        Some(vcs) => {
            let version = std::fs::read_to_string(path.join(VERSION_FILE))?;
            println!(
                "{} {} from {}",
                style("Stamped").green().bold(),
                version.trim(),
                vcs
            );
        }
        None => println!(
            "{} is not under revision control; no version file written",
            path.display()
        ),
    }

    Ok(())
}
