//! Host-driven polling on top of the memory scanner.
//!
//! `Monitor` is what a host calls on its own timer:
//!
//! ```ignore
//! use re5scan_core::prelude::*;
//!
//! let mut monitor = Monitor::new(SystemLocator, MonitorConfig::default(), TracingReporter);
//! monitor.startup()?;
//! loop {
//!     if let Some(snapshot) = monitor.pull_data() {
//!         render(&snapshot);
//!     }
//!     std::thread::sleep(monitor.config().poll_interval());
//! }
//! ```

mod report;

pub use report::*;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::game::GameStateSnapshot;
use crate::offset::PointerTableSet;
use crate::process::{GameProcess, ProcessLocator};
use crate::scanner::{Clock, MemoryScanner, ResolveTimer, SystemClock};
use crate::version::{self, GameVersion};

type Identifier = Box<dyn Fn(&Path) -> Result<GameVersion>>;

pub struct Monitor<L: ProcessLocator, C: Clock = SystemClock> {
    locator: L,
    clock: C,
    config: MonitorConfig,
    reporter: Box<dyn ErrorReporter>,
    identifier: Identifier,
    scanner: MemoryScanner<L::Process>,
    timer: ResolveTimer,
    /// Build of the game we attached to; reused when the game restarts
    version: GameVersion,
    /// Last pid whose image turned out to be unsupported
    rejected_pid: Option<u32>,
    /// Set by `shutdown`; nothing attaches again until `startup`
    stopped: bool,
}

impl<L: ProcessLocator> Monitor<L, SystemClock> {
    pub fn new<R: ErrorReporter + 'static>(locator: L, config: MonitorConfig, reporter: R) -> Self {
        let timer = ResolveTimer::new(config.resolve_interval());
        Self {
            locator,
            clock: SystemClock,
            config,
            reporter: Box::new(reporter),
            identifier: Box::new(|path: &Path| version::identify(path)),
            scanner: MemoryScanner::builtin(),
            timer,
            version: GameVersion::Unknown,
            rejected_pid: None,
            stopped: false,
        }
    }
}

impl<L: ProcessLocator, C: Clock> Monitor<L, C> {
    /// Replace the time source
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Monitor<L, C2> {
        Monitor {
            locator: self.locator,
            clock,
            config: self.config,
            reporter: self.reporter,
            identifier: self.identifier,
            scanner: self.scanner,
            timer: self.timer,
            version: self.version,
            rejected_pid: self.rejected_pid,
            stopped: self.stopped,
        }
    }

    /// Replace the pointer tables (drops any current attachment)
    pub fn with_tables(mut self, tables: Arc<PointerTableSet>) -> Self {
        self.scanner = MemoryScanner::new(tables);
        self
    }

    /// Replace how an executable image is mapped to a build
    pub fn with_identifier<F>(mut self, identifier: F) -> Self
    where
        F: Fn(&Path) -> Result<GameVersion> + 'static,
    {
        self.identifier = Box::new(identifier);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Build of the attached (or last attached) game
    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn scanner(&self) -> &MemoryScanner<L::Process> {
        &self.scanner
    }

    /// Find the game and identify its build.
    ///
    /// Not finding the game is not an error. Failing to open or hash it is.
    /// Also re-arms a monitor that was `shutdown`.
    pub fn startup(&mut self) -> Result<()> {
        self.stopped = false;
        self.attach()?;
        Ok(())
    }

    /// True while the attached game is alive. When it has exited, looks for
    /// a new instance and re-attaches with the build identified before.
    ///
    /// Always false after `shutdown` until `startup` is called again.
    pub fn is_game_running(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        if self.scanner.is_process_running() {
            return true;
        }

        if let Some(process) = self.scanner.process() {
            info!("Game process {} exited", process.pid());
            self.scanner.dispose();
        }

        match self.attach() {
            Ok(attached) => attached && self.scanner.is_process_running(),
            Err(e) => {
                debug!("Attach failed: {}", e);
                false
            }
        }
    }

    /// Run one poll cycle.
    ///
    /// Never fails; `None` means "no data this cycle".
    pub fn pull_data(&mut self) -> Option<GameStateSnapshot> {
        if !self.is_game_running() {
            return None;
        }

        // The timer restarts only on success, so a failed resolution is
        // retried on the next poll
        let now = self.clock.now();
        if self.timer.is_due(now) {
            if let Err(e) = self.scanner.update_pointers() {
                self.handle_error(e);
                return None;
            }
            self.timer.mark(now);
        }

        match self.scanner.refresh(self.version) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                self.handle_error(e);
                None
            }
        }
    }

    /// Detach and stop attaching. Idempotent.
    pub fn shutdown(&mut self) {
        self.stopped = true;
        self.scanner.dispose();
        self.timer.reset();
        self.rejected_pid = None;
    }

    /// Locate, identify and initialize. `Ok(false)` when there is nothing
    /// to attach to.
    fn attach(&mut self) -> Result<bool> {
        let Some(process) = self.locator.find_process(&self.config.process_name)? else {
            debug!("{} is not running", self.config.process_name);
            return Ok(false);
        };

        let pid = process.pid();
        if self.rejected_pid == Some(pid) {
            return Ok(false);
        }

        let version = if self.version.is_known() {
            self.version
        } else {
            (self.identifier)(process.image_path())?
        };

        match self.scanner.initialize(process, version) {
            Ok(()) => {
                self.version = version;
                self.rejected_pid = None;
                self.timer.reset();
                Ok(true)
            }
            Err(Error::UnsupportedVersion(version)) => {
                warn!(
                    "Unsupported game build ({}) in pid {}, not scanning",
                    version, pid
                );
                self.rejected_pid = Some(pid);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn handle_error(&self, error: Error) {
        if error.is_transient() {
            debug!("Transient read failure: {}", error);
            return;
        }
        match &error {
            Error::NotAttached | Error::PointersNotResolved => {
                debug!("No data this cycle: {}", error)
            }
            _ => self.reporter.report(&error),
        }
    }
}
