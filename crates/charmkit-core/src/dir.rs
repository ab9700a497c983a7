//! Expanded charm directories

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::actions::Actions;
use crate::archive::write_archive;
use crate::charm::{Charm, CharmContents, REVISION_FILE};
use crate::config::Config;
use crate::error::Result;
use crate::meta::Meta;
use crate::metrics::Metrics;
use crate::version::{CommandRunner, VersionStamper};

/// A charm stored as a directory tree
#[derive(Debug, Clone)]
pub struct CharmDir {
    path: PathBuf,
    contents: CharmContents,
}

impl CharmDir {
    /// Read a charm directory
    ///
    /// `metadata.yaml` is required; the other charm files are optional.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = CharmContents::from_files(|name| read_optional(&path.join(name)))?;

        Ok(Self { path, contents })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the in-memory revision; used when archiving
    pub fn set_revision(&mut self, revision: u32) {
        self.contents.revision = revision;
    }

    /// Change the revision and persist it to the `revision` file
    pub fn set_disk_revision(&mut self, revision: u32) -> Result<()> {
        std::fs::write(self.path.join(REVISION_FILE), format!("{revision}\n"))?;
        self.contents.revision = revision;
        Ok(())
    }

    /// Stamp the version file, then write the charm as a gzipped tar to `writer`
    ///
    /// Hidden entries (`.git`, `.bzr`, editor files...) are left out and the
    /// `revision` entry carries the in-memory revision.
    pub fn archive_to<W: Write>(&self, writer: W) -> Result<W> {
        self.archive_with(&VersionStamper::new(), writer)
    }

    /// [`CharmDir::archive_to`] with a caller-supplied stamper
    pub fn archive_with<R, W>(&self, stamper: &VersionStamper<R>, writer: W) -> Result<W>
    where
        R: CommandRunner,
        W: Write,
    {
        stamper.stamp(&self.path)?;
        self.write_archive(writer)
    }

    /// Write the archive as-is, without refreshing the version file
    pub fn write_archive<W: Write>(&self, writer: W) -> Result<W> {
        write_archive(&self.path, self.contents.revision, writer)
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl Charm for CharmDir {
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
