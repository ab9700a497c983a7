//! Packed charm archives
//!
//! A charm archive is a gzipped tar of the charm directory. Entries are
//! written in file-name order with a zero mtime so that packing the same tree
//! twice gives the same bytes.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tar::{Archive, Builder, EntryType, Header};
use walkdir::{DirEntry, WalkDir};

use crate::actions::Actions;
use crate::charm::{
    ACTIONS_FILE, CONFIG_FILE, Charm, CharmContents, METADATA_FILE, METRICS_FILE, REVISION_FILE,
    VERSION_FILE,
};
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::meta::Meta;
use crate::metrics::Metrics;

/// Files the reader parses; everything else is only listed
const CHARM_FILES: [&str; 6] = [
    METADATA_FILE,
    CONFIG_FILE,
    METRICS_FILE,
    ACTIONS_FILE,
    REVISION_FILE,
    VERSION_FILE,
];

/// Top-level directories whose files must stay executable
const EXECUTABLE_DIRS: [&str; 2] = ["hooks", "actions"];

/// A charm stored as a packed archive file
#[derive(Debug, Clone)]
pub struct CharmArchive {
    path: PathBuf,
    contents: CharmContents,
    entries: Vec<String>,
}

impl CharmArchive {
    /// Read a charm archive in a single pass over its entries
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut archive = Archive::new(GzDecoder::new(file));

        let mut files = HashMap::new();
        let mut entries = Vec::new();

        for entry in archive.entries().map_err(|e| corrupt(&path, e))? {
            let mut entry = entry.map_err(|e| corrupt(&path, e))?;
            if entry.header().entry_type().is_dir() {
                continue;
            }

            let name = entry_name(&entry.path().map_err(|e| corrupt(&path, e))?);
            if CHARM_FILES.contains(&name.as_str()) {
                let mut data = Vec::new();
                entry
                    .read_to_end(&mut data)
                    .map_err(|e| corrupt(&path, e))?;
                files.insert(name.clone(), data);
            }
            entries.push(name);
        }

        let contents = CharmContents::from_files(|name| Ok(files.remove(name)))?;

        Ok(Self {
            path,
            contents,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Paths of all non-directory entries, in archive order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Unpack the archive into `dest`, creating it if needed
    pub fn expand_to<P: AsRef<Path>>(&self, dest: P) -> Result<()> {
        let dest = dest.as_ref();
        let file = File::open(&self.path)?;
        let mut archive = Archive::new(GzDecoder::new(file));
        archive.set_preserve_permissions(true);

        std::fs::create_dir_all(dest)?;
        archive.unpack(dest).map_err(|e| corrupt(&self.path, e))?;

        tracing::debug!(archive = %self.path.display(), dest = %dest.display(), "expanded charm");
        Ok(())
    }
}

impl Charm for CharmArchive {
    fn meta(&self) -> &Meta {
        &self.contents.meta
    }

    fn config(&self) -> &Config {
        &self.contents.config
    }

    fn metrics(&self) -> Option<&Metrics> {
        self.contents.metrics.as_ref()
    }

    fn actions(&self) -> &Actions {
        &self.contents.actions
    }

    fn revision(&self) -> u32 {
        self.contents.revision
    }

    fn version(&self) -> Option<&str> {
        self.contents.version.as_deref()
    }
}

/// Default file name for a packed charm: `<name>-<revision>.charm`
#[must_use]
pub fn default_archive_name<C: Charm + ?Sized>(charm: &C) -> String {
    format!("{}-{}.charm", charm.meta().name, charm.revision())
}

fn corrupt(path: &Path, err: std::io::Error) -> CoreError {
    CoreError::Archive {
        message: format!("{}: {}", path.display(), err),
    }
}

fn entry_name(path: &Path) -> String {
    let name = path.to_string_lossy().replace('\\', "/");
    name.trim_start_matches("./").to_string()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Write the tree at `root` as a gzipped tar, with `revision` as the revision entry
pub(crate) fn write_archive<W: Write>(root: &Path, revision: u32, writer: W) -> Result<W> {
    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = Builder::new(encoder);

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let rel_path = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = entry_name(rel_path);

        if name == REVISION_FILE {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            add_dir_to_archive(&mut builder, &name)?;
        } else if file_type.is_symlink() {
            add_link_to_archive(&mut builder, entry.path(), &name)?;
        } else if file_type.is_file() {
            let content = std::fs::read(entry.path())?;
            let mode = file_mode(&entry, &name)?;
            add_bytes_to_archive(&mut builder, &name, &content, mode)?;
        }
    }

    add_bytes_to_archive(
        &mut builder,
        REVISION_FILE,
        format!("{revision}\n").as_bytes(),
        0o644,
    )?;

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

fn file_mode(entry: &DirEntry, name: &str) -> Result<u32> {
    let top = name.split('/').next().unwrap_or_default();
    if name.contains('/') && EXECUTABLE_DIRS.contains(&top) {
        return Ok(0o755);
    }
    Ok(if is_executable(entry)? { 0o755 } else { 0o644 })
}

#[cfg(unix)]
fn is_executable(entry: &DirEntry) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = entry.metadata().map_err(std::io::Error::from)?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_entry: &DirEntry) -> Result<bool> {
    Ok(false)
}

fn add_dir_to_archive<W: Write>(builder: &mut Builder<W>, name: &str) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    header.set_mtime(0);
    header.set_cksum();

    builder.append_data(&mut header, format!("{name}/"), std::io::empty())?;
    Ok(())
}

fn add_link_to_archive<W: Write>(builder: &mut Builder<W>, path: &Path, name: &str) -> Result<()> {
    let target = std::fs::read_link(path)?;
    if target.is_absolute() {
        return Err(CoreError::Archive {
            message: format!(
                "symlink {name} points outside the charm: {}",
                target.display()
            ),
        });
    }

    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    header.set_mtime(0);

    builder.append_link(&mut header, name, &target)?;
    Ok(())
}

fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    name: &str,
    content: &[u8],
    mode: u32,
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(mode);
    header.set_mtime(0);
    header.set_cksum();

    builder.append_data(&mut header, name, content)?;
    Ok(())
}
