//! Version stamping from revision control
//!
//! A charm source tree kept under git, bazaar or mercurial gets a `version`
//! file holding the output of the matching "describe" command. The command
//! runs through a [`CommandRunner`] so tests can fake tool behaviour.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::charm::VERSION_FILE;
use crate::error::{CoreError, Result};

/// Revision control systems, in probe order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vcs {
    Git,
    Bazaar,
    Mercurial,
}

impl Vcs {
    /// Earlier entries win when several markers are present
    pub const PROBE_ORDER: [Vcs; 3] = [Vcs::Git, Vcs::Bazaar, Vcs::Mercurial];

    /// Marker entry at the root of a controlled tree
    pub fn marker(self) -> &'static str {
        match self {
            Vcs::Git => ".git",
            Vcs::Bazaar => ".bzr",
            Vcs::Mercurial => ".hg",
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Vcs::Git => "git",
            Vcs::Bazaar => "bzr",
            Vcs::Mercurial => "hg",
        }
    }

    pub fn args(self) -> &'static [&'static str] {
        match self {
            Vcs::Git => &["describe", "--dirty"],
            Vcs::Bazaar => &["revision-info"],
            Vcs::Mercurial => &["id", "--id"],
        }
    }

    /// Program and arguments as one printable string
    pub fn command_line(self) -> String {
        let mut line = self.program().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// First system whose marker exists directly under `path`
    ///
    /// Only the presence of the marker is checked, not whether it is a valid
    /// repository or whether the tool is installed.
    pub fn detect(path: &Path) -> Option<Vcs> {
        Self::PROBE_ORDER
            .into_iter()
            .find(|vcs| path.join(vcs.marker()).exists())
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vcs::Git => "git",
            Vcs::Bazaar => "bazaar",
            Vcs::Mercurial => "mercurial",
        };
        f.write_str(name)
    }
}

/// Result of running an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Stdout and stderr, interleaved as the process wrote them
    pub output: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs a program to completion and captures its combined output
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `dir`, blocking until it exits
    ///
    /// An `Err` means the process could not be started or read; a non-zero
    /// exit is reported through [`CommandOutput::code`].
    fn combined_output(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
    ) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] that spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn combined_output(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
    ) -> std::io::Result<CommandOutput> {
        // One pipe for both streams keeps their relative order.
        let (mut reader, writer) = std::io::pipe()?;

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let mut child = command.spawn()?;
        // The command still holds write ends; drop them or the read never sees EOF.
        drop(command);

        collect_output(&mut reader, &mut child)
    }
}

/// Read `reader` to EOF, then wait for `child`
///
/// The child is always reaped, killing it first if reading fails.
fn collect_output<R: Read>(reader: &mut R, child: &mut Child) -> std::io::Result<CommandOutput> {
    let mut output = Vec::new();
    if let Err(err) = reader.read_to_end(&mut output) {
        let _ = child.kill();
        let _ = child.wait();
        return Err(err);
    }
    let status = child.wait()?;

    Ok(CommandOutput {
        code: status.code(),
        output,
    })
}

/// Writes the `version` file for revision-controlled charm trees
#[derive(Debug, Clone, Default)]
pub struct VersionStamper<R = SystemCommandRunner> {
    runner: R,
}

impl VersionStamper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> VersionStamper<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Create or overwrite `<path>/version`
    ///
    /// Returns the system that was used, or `None` (and writes nothing) if
    /// `path` is not under revision control. When the command can't be run
    /// or exits non-zero, its output is logged and no file is touched.
    /// An existing `version` file is truncated before the new output is written.
    pub fn stamp<P: AsRef<Path>>(&self, path: P) -> Result<Option<Vcs>> {
        let path = path.as_ref();

        let Some(vcs) = Vcs::detect(path) else {
            tracing::info!(path = %path.display(), "charm is not in a revision control directory");
            return Ok(None);
        };

        let command = vcs.command_line();
        tracing::debug!(%vcs, %command, path = %path.display(), "deriving charm version");

        let result = self
            .runner
            .combined_output(vcs.program(), vcs.args(), path)
            .map_err(|source| {
                tracing::warn!(%command, error = %source, "could not run version command");
                CoreError::CommandSpawn {
                    command: command.clone(),
                    source,
                }
            })?;

        if !result.success() {
            tracing::warn!(
                %command,
                output = %String::from_utf8_lossy(&result.output),
                "version command failed"
            );
            return Err(CoreError::CommandFailed {
                command,
                status: result.status(),
                output: result.output,
            });
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.join(VERSION_FILE))?;
        file.write_all(&result.output)?;

        Ok(Some(vcs))
    }
}

/// Stamp `path` using the real revision control tools
pub fn stamp_version<P: AsRef<Path>>(path: P) -> Result<Option<Vcs>> {
    VersionStamper::new().stamp(path)
}
