//! Package command - create distributable charm archives

use charmkit_core::{Charm, CharmDir, default_archive_name};
use console::style;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};
use crate::util::{file_sha256, format_size, is_inside};

pub fn run(path: &Path, output: Option<&Path>, no_version: bool) -> Result<()> {
    let charm = CharmDir::read(path)?;

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output(path, &default_archive_name(&charm)),
    };

    if is_inside(&output_path, path) {
        return Err(CliError::usage_with_help(
            format!(
                "refusing to write {} inside the charm being packaged",
                output_path.display()
            ),
            "choose an output path outside the charm directory with --output",
        ));
    }

    println!(
        "{} {} (revision {})",
        style("Packaging").cyan().bold(),
        charm.meta().name,
        charm.revision()
    );

    if let Err(err) = write_archive(&charm, &output_path, no_version) {
        // Don't leave a truncated archive behind
        let _ = std::fs::remove_file(&output_path);
        return Err(err);
    }

    let size = std::fs::metadata(&output_path)?.len();
    let digest = file_sha256(&output_path)?;

    println!(
        "  {} {}",
        style("Created").green().bold(),
        output_path.display()
    );
    println!("  {} {}", style("Size").dim(), format_size(size));

    // Re-read so the printed version matches what was stamped
    if let Some(version) = CharmDir::read(path)?.version() {
        println!("  {} {}", style("Version").dim(), version);
    }

    println!();
    println!("{}: sha256:{}", style("Digest").bold(), digest);

    Ok(())
}

fn write_archive(charm: &CharmDir, output_path: &Path, no_version: bool) -> Result<()> {
    let writer = BufWriter::new(std::fs::File::create(output_path)?);
    let mut writer = if no_version {
        charm.write_archive(writer)?
    } else {
        charm.archive_to(writer)?
    };
    writer.flush()?;
    Ok(())
}

/// `name` in the current directory, or next to the charm when run from inside it
fn default_output(charm_path: &Path, name: &str) -> PathBuf {
    let candidate = PathBuf::from(name);
    if !is_inside(&candidate, charm_path) {
        return candidate;
    }
    charm_path
        .canonicalize()
        .ok()
        .and_then(|dir| dir.parent().map(|parent| parent.join(name)))
        .unwrap_or(candidate)
}
