//! The `Charm` capability and path-based loading
//!
//! A charm on disk is either an expanded directory ([`CharmDir`]) or a packed
//! archive ([`CharmArchive`]). [`read_charm`] picks one by looking at what the
//! path is, never at its name or contents.

use std::path::Path;

use crate::actions::Actions;
use crate::archive::CharmArchive;
use crate::config::Config;
use crate::dir::CharmDir;
use crate::error::{CoreError, Result};
use crate::meta::Meta;
use crate::metrics::Metrics;

pub const METADATA_FILE: &str = "metadata.yaml";
pub const CONFIG_FILE: &str = "config.yaml";
pub const METRICS_FILE: &str = "metrics.yaml";
pub const ACTIONS_FILE: &str = "actions.yaml";
pub const REVISION_FILE: &str = "revision";
pub const VERSION_FILE: &str = "version";

/// Read-only view of a loaded charm
pub trait Charm {
    fn meta(&self) -> &Meta;
    fn config(&self) -> &Config;
    /// `None` when the charm ships no `metrics.yaml`
    fn metrics(&self) -> Option<&Metrics>;
    fn actions(&self) -> &Actions;
    fn revision(&self) -> u32;
    /// Build identifier from the `version` file, if the charm was stamped
    fn version(&self) -> Option<&str>;
}

/// Parsed charm files shared by both on-disk representations
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CharmContents {
    pub meta: Meta,
    pub config: Config,
    pub metrics: Option<Metrics>,
    pub actions: Actions,
    pub revision: u32,
    pub version: Option<String>,
}

impl CharmContents {
    /// Build contents from a file lookup; `read` returns `None` for absent files
    pub fn from_files<F>(mut read: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<Option<Vec<u8>>>,
    {
        let meta = match read(METADATA_FILE)? {
            Some(content) => Meta::parse(&content)?,
            None => {
                return Err(CoreError::InvalidCharm {
                    message: format!("{METADATA_FILE} not found"),
                });
            }
        };

        let config = match non_blank(read(CONFIG_FILE)?) {
            Some(content) => Config::parse(&content)?,
            None => Config::default(),
        };

        let metrics = non_blank(read(METRICS_FILE)?)
            .map(|content| Metrics::parse(&content))
            .transpose()?;

        let actions = match non_blank(read(ACTIONS_FILE)?) {
            Some(content) => Actions::parse(&content)?,
            None => Actions::default(),
        };

        let revision = match read(REVISION_FILE)? {
            Some(content) => parse_revision(&content)?,
            None => 0,
        };

        let version = read(VERSION_FILE)?
            .map(|content| String::from_utf8_lossy(&content).trim_end().to_string());

        Ok(Self {
            meta,
            config,
            metrics,
            actions,
            revision,
            version,
        })
    }
}

fn non_blank(content: Option<Vec<u8>>) -> Option<Vec<u8>> {
    content.filter(|c| !c.iter().all(u8::is_ascii_whitespace))
}

pub(crate) fn parse_revision(content: &[u8]) -> Result<u32> {
    let text = String::from_utf8_lossy(content);
    text.trim().parse().map_err(|_| CoreError::InvalidRevision {
        value: text.trim().to_string(),
    })
}

/// A charm loaded by [`read_charm`]: exactly one of the two on-disk forms
#[derive(Debug, Clone)]
pub enum LoadedCharm {
    Dir(CharmDir),
    Archive(CharmArchive),
}

impl LoadedCharm {
    /// Path the charm was read from
    pub fn path(&self) -> &Path {
        match self {
            LoadedCharm::Dir(dir) => dir.path(),
            LoadedCharm::Archive(archive) => archive.path(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, LoadedCharm::Dir(_))
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, LoadedCharm::Archive(_))
    }

    fn inner(&self) -> &dyn Charm {
        match self {
            LoadedCharm::Dir(dir) => dir,
            LoadedCharm::Archive(archive) => archive,
        }
    }
}

impl Charm for LoadedCharm {
    fn meta(&self) -> &Meta {
        self.inner().meta()
    }

    fn config(&self) -> &Config {
        self.inner().config()
    }

    fn metrics(&self) -> Option<&Metrics> {
        self.inner().metrics()
    }

    fn actions(&self) -> &Actions {
        self.inner().actions()
    }

    fn revision(&self) -> u32 {
        self.inner().revision()
    }

    fn version(&self) -> Option<&str> {
        self.inner().version()
    }
}

/// The two format readers [`read_charm_with`] dispatches between
pub trait CharmReader {
    type Charm;

    /// Read an expanded charm directory
    fn read_dir(&self, path: &Path) -> Result<Self::Charm>;

    /// Read a packed charm archive
    fn read_archive(&self, path: &Path) -> Result<Self::Charm>;
}

/// Filesystem readers backed by [`CharmDir`] and [`CharmArchive`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCharmReader;

impl CharmReader for FsCharmReader {
    type Charm = LoadedCharm;

    fn read_dir(&self, path: &Path) -> Result<LoadedCharm> {
        CharmDir::read(path).map(LoadedCharm::Dir)
    }

    fn read_archive(&self, path: &Path) -> Result<LoadedCharm> {
        CharmArchive::read(path).map(LoadedCharm::Archive)
    }
}

/// Read a charm from a directory or an archive
pub fn read_charm<P: AsRef<Path>>(path: P) -> Result<LoadedCharm> {
    read_charm_with(&FsCharmReader, path)
}

/// Stat `path` and hand it to the matching reader
///
/// A failed stat is returned as-is and no reader runs. Directories go to
/// [`CharmReader::read_dir`], every other entry type to
/// [`CharmReader::read_archive`]. Reader errors are not wrapped.
pub fn read_charm_with<R, P>(reader: &R, path: P) -> Result<R::Charm>
where
    R: CharmReader + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let info = std::fs::metadata(path)?;

    if info.is_dir() {
        tracing::debug!(path = %path.display(), "reading charm directory");
        reader.read_dir(path)
    } else {
        tracing::debug!(path = %path.display(), "reading charm archive");
        reader.read_archive(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records which reader was asked for which path
    #[derive(Default)]
    struct RecordingReader {
        calls: RefCell<Vec<(&'static str, PathBuf)>>,
    }

    impl CharmReader for RecordingReader {
        type Charm = &'static str;

        fn read_dir(&self, path: &Path) -> Result<&'static str> {
            self.calls.borrow_mut().push(("dir", path.to_path_buf()));
            Ok("dir")
        }

        fn read_archive(&self, path: &Path) -> Result<&'static str> {
            self.calls.borrow_mut().push(("archive", path.to_path_buf()));
            Ok("archive")
        }
    }

    struct FailingReader;

    impl CharmReader for FailingReader {
        type Charm = ();

        fn read_dir(&self, _: &Path) -> Result<()> {
            Err(CoreError::InvalidCharm {
                message: "broken dir".to_string(),
            })
        }

        fn read_archive(&self, _: &Path) -> Result<()> {
            Err(CoreError::Archive {
                message: "broken archive".to_string(),
            })
        }
    }

    fn write_charm(dir: &Path) {
        std::fs::write(
            dir.join(METADATA_FILE),
            "name: mysql\nsummary: Database\nseries: [xenial, trusty]\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(CONFIG_FILE),
            "options:\n  port:\n    type: int\n    default: 3306\n",
        )
        .unwrap();
        std::fs::write(dir.join(REVISION_FILE), "7\n").unwrap();
    }

    #[test]
    fn test_directory_goes_to_dir_reader() {
        let temp = TempDir::new().unwrap();
        let reader = RecordingReader::default();

        let charm = read_charm_with(&reader, temp.path()).unwrap();

        assert_eq!(charm, "dir");
        assert_eq!(
            *reader.calls.borrow(),
            vec![("dir", temp.path().to_path_buf())]
        );
    }

    #[test]
    fn test_file_goes_to_archive_reader() {
        let temp = TempDir::new().unwrap();
        // Name and content don't matter, only the entry type
        let file = temp.path().join("looks-like-a-dir");
        std::fs::write(&file, "not an archive").unwrap();
        let reader = RecordingReader::default();

        let charm = read_charm_with(&reader, &file).unwrap();

        assert_eq!(charm, "archive");
        assert_eq!(*reader.calls.borrow(), vec![("archive", file)]);
    }

    #[test]
    fn test_missing_path_returns_stat_error() {
        let temp = TempDir::new().unwrap();
        let reader = RecordingReader::default();

        let err = read_charm_with(&reader, temp.path().join("nope")).unwrap_err();

        assert_eq!(
            err.as_io().map(std::io::Error::kind),
            Some(std::io::ErrorKind::NotFound)
        );
        assert!(reader.calls.borrow().is_empty());
    }

    #[test]
    fn test_reader_errors_pass_through() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("x.charm");
        std::fs::write(&file, b"").unwrap();

        assert!(matches!(
            read_charm_with(&FailingReader, temp.path()),
            Err(CoreError::InvalidCharm { .. })
        ));
        assert!(matches!(
            read_charm_with(&FailingReader, &file),
            Err(CoreError::Archive { .. })
        ));
    }

    #[test]
    fn test_read_charm_directory() {
        let temp = TempDir::new().unwrap();
        write_charm(temp.path());

        let charm = read_charm(temp.path()).unwrap();

        assert!(charm.is_dir());
        assert_eq!(charm.path(), temp.path());
        assert_eq!(charm.meta().name, "mysql");
        assert_eq!(charm.revision(), 7);
        assert_eq!(charm.config().options.len(), 1);
        assert!(charm.metrics().is_none());
        assert!(charm.actions().is_empty());
        assert!(charm.version().is_none());
    }

    #[test]
    fn test_read_charm_archive() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir(&src).unwrap();
        write_charm(&src);

        let archive_path = temp.path().join("mysql.charm");
        let dir = CharmDir::read(&src).unwrap();
        let file = std::fs::File::create(&archive_path).unwrap();
        dir.archive_to(file).unwrap();

        let charm = read_charm(&archive_path).unwrap();

        assert!(charm.is_archive());
        assert_eq!(charm.meta().name, "mysql");
        assert_eq!(charm.meta().series, vec!["xenial", "trusty"]);
        assert_eq!(charm.revision(), 7);
    }

    #[test]
    fn test_contents_missing_metadata() {
        let err = CharmContents::from_files(|_| Ok(None)).unwrap_err();
        assert!(err.to_string().contains(METADATA_FILE));
    }

    #[test]
    fn test_contents_blank_optional_files() {
        let contents = CharmContents::from_files(|name| {
            Ok(match name {
                METADATA_FILE => Some(b"name: blank\n".to_vec()),
                CONFIG_FILE | ACTIONS_FILE | METRICS_FILE => Some(b"\n".to_vec()),
                VERSION_FILE => Some(b"v1.2-dirty\n".to_vec()),
                _ => None,
            })
        })
        .unwrap();

        assert!(contents.config.options.is_empty());
        assert!(contents.actions.is_empty());
        assert!(contents.metrics.is_none());
        assert_eq!(contents.revision, 0);
        assert_eq!(contents.version.as_deref(), Some("v1.2-dirty"));
    }

    #[test]
    fn test_parse_revision() {
        assert_eq!(parse_revision(b" 42\n").unwrap(), 42);
        assert!(matches!(
            parse_revision(b"forty-two"),
            Err(CoreError::InvalidRevision { .. })
        ));
        assert!(parse_revision(b"-1").is_err());
    }
}
