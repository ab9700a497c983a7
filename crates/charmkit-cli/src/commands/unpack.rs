//! Unpack command - expand a charm archive

use charmkit_core::{Charm, CharmArchive};
use console::style;
use std::path::Path;

use crate::error::Result;

pub fn run(archive: &Path, dest: &Path) -> Result<()> {
    let charm = CharmArchive::read(archive)?;

    println!(
        "{} {} (revision {})",
        style("Unpacking").cyan().bold(),
        charm.meta().name,
        charm.revision()
    );

    charm.expand_to(dest)?;

    println!(
        "  {} {} ({} entries)",
        style("Expanded").green().bold(),
        dest.display(),
        charm.entries().len()
    );

    Ok(())
}
