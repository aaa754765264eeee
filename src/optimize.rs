//! External GIF optimization.
//!
//! Optimization is delegated to an external program behind the
//! [`Optimizer`] trait so the orchestrator can be exercised without the
//! program installed. [`Gifsicle`] is the stock implementation: it rewrites
//! the GIF with `--optimize` and a 256-colour palette cap. The rewritten
//! file replaces the original only once the optimizer exits successfully,
//! so a crashed or timed-out run leaves the unoptimized GIF intact.
//!
//! Whether a missing optimizer is fatal is decided by [`OptimizeMode`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::GifmakeError;
use crate::utilities::{parent_directory, persist_staged, staging_file_in};

/// Palette size passed to the optimizer.
pub const OPTIMIZER_COLORS: u16 = 256;

/// Default upper bound on a single optimizer run.
pub const DEFAULT_OPTIMIZER_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How the optimization stage treats the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizeMode {
    /// Skip optimization entirely.
    Disabled,
    /// Optimize if the optimizer is installed; otherwise warn and continue.
    #[default]
    BestEffort,
    /// Fail the run if the optimizer is missing or fails.
    Required,
}

/// A post-processing step that shrinks a finished GIF in place.
///
/// Implementations must be [`Send`] and [`Sync`] so they can be shared via
/// [`ConvertOptions`](crate::ConvertOptions).
pub trait Optimizer: Send + Sync {
    /// Human-readable program name for messages.
    fn name(&self) -> &str;

    /// Returns `true` if the optimizer can be launched.
    fn probe(&self) -> bool;

    /// Optimize the GIF at `path` in place, giving up after `timeout`.
    fn optimize(&self, path: &Path, timeout: Duration) -> Result<(), GifmakeError>;
}

/// The [gifsicle](https://www.lcdf.org/gifsicle/) command-line optimizer.
#[derive(Debug, Clone)]
pub struct Gifsicle {
    program: PathBuf,
}

impl Default for Gifsicle {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gifsicle"),
        }
    }
}

impl Gifsicle {
    /// Use `gifsicle` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific gifsicle executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Optimizer for Gifsicle {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("gifsicle")
    }

    fn probe(&self) -> bool {
        // Any exit status means the program exists; only a failed launch
        // counts as absent.
        match Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => {
                log::debug!("{} probe exited with {status}", self.program.display());
                true
            }
            Err(error) if error.kind() == ErrorKind::NotFound => false,
            Err(error) => {
                log::warn!("Could not launch {}: {error}", self.program.display());
                false
            }
        }
    }

    fn optimize(&self, path: &Path, timeout: Duration) -> Result<(), GifmakeError> {
        log::debug!("Optimizing {} with {}", path.display(), self.program.display());

        let staging = staging_file_in(&parent_directory(path))?;
        let child = Command::new(&self.program)
            .arg("--optimize")
            .arg(path)
            .arg("--colors")
            .arg(OPTIMIZER_COLORS.to_string())
            .arg("-o")
            .arg(staging.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| {
                GifmakeError::OptimizeError(format!(
                    "failed to launch {}: {error}",
                    self.program.display()
                ))
            })?;

        let status = wait_with_timeout(child, timeout)?;
        if status.success() {
            persist_staged(staging, path)?;
            Ok(())
        } else {
            Err(GifmakeError::OptimizeError(format!(
                "{} exited with {status}",
                self.program.display()
            )))
        }
    }
}

/// Wait for `child`, killing it if it outlives `timeout`.
///
/// # Errors
///
/// Returns [`GifmakeError::OptimizeError`] on timeout, after the child has
/// been killed and reaped.
pub fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> Result<ExitStatus, GifmakeError> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            child.kill()?;
            child.wait()?;
            return Err(GifmakeError::OptimizeError(format!(
                "optimizer timed out after {:.1}s",
                timeout.as_secs_f64()
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
