//! Disambiguating identifiers for dev reloads.
//!
//! The engine host caches native libraries by file name, so each reload needs
//! a name it has not loaded before. [`CounterIdSource`] walks the whole id
//! space before repeating; [`RandomIdSource`] only makes repeats unlikely.

use crate::config::{IdStrategy, ReloadConfig};
use crate::error::{DeployError, IoContext, Result};
use crate::staging::write_creating_dirs;
use rand::Rng;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A reload id rendered zero-padded to a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReloadId {
    value: u32,
    width: usize,
}

impl ReloadId {
    pub fn new(value: u32, width: usize) -> Self {
        Self { value, width }
    }

    /// Validate an explicit id against the configured bound.
    pub fn checked(value: u32, config: &ReloadConfig) -> Result<Self> {
        if value >= config.bound {
            return Err(DeployError::InvalidReloadId {
                value,
                bound: config.bound,
            });
        }
        Ok(Self::new(value, config.width))
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for ReloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.width)
    }
}

/// Produces the id for the next reload.
pub trait IdSource {
    /// Take an id, consuming it where the source keeps state.
    fn next_id(&mut self) -> Result<ReloadId>;

    /// An id the next reload could use, without consuming anything.
    fn peek_id(&self) -> Result<ReloadId>;

    /// Whether [`IdSource::peek_id`] is the id a later `next_id` returns.
    fn peek_is_exact(&self) -> bool {
        true
    }
}

/// Uniform draw from `0..bound`. Repeats are possible.
pub struct RandomIdSource {
    config: ReloadConfig,
}

impl RandomIdSource {
    pub fn new(config: ReloadConfig) -> Self {
        Self { config }
    }
}

impl IdSource for RandomIdSource {
    fn next_id(&mut self) -> Result<ReloadId> {
        self.peek_id()
    }

    fn peek_id(&self) -> Result<ReloadId> {
        let value = rand::thread_rng().gen_range(0..self.config.bound);
        Ok(ReloadId::new(value, self.config.width))
    }

    fn peek_is_exact(&self) -> bool {
        false
    }
}

/// Counter persisted across runs. Each call returns the stored value and
/// stores the successor, wrapping at `bound`.
pub struct CounterIdSource {
    path: PathBuf,
    config: ReloadConfig,
}

impl CounterIdSource {
    pub fn new(path: impl Into<PathBuf>, config: ReloadConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored value without advancing it.
    pub fn stored(&self) -> Result<Option<u32>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .io_context(|| format!("Failed to read reload counter {}", self.path.display()))?;
        let value: u32 = content
            .trim()
            .parse()
            .map_err(|_| DeployError::CorruptCounter {
                path: self.path.clone(),
                content: content.clone(),
            })?;
        Ok(Some(value % self.config.bound))
    }
}

impl IdSource for CounterIdSource {
    fn next_id(&mut self) -> Result<ReloadId> {
        let value = self.peek_id()?.value();
        let next = (value + 1) % self.config.bound;

        write_creating_dirs(&self.path, format!("{}\n", next).as_bytes())?;
        debug!(value, next, path = %self.path.display(), "advanced reload counter");

        Ok(ReloadId::new(value, self.config.width))
    }

    fn peek_id(&self) -> Result<ReloadId> {
        // fresh checkouts start at a random point
        let value = match self.stored()? {
            Some(value) => value,
            None => rand::thread_rng().gen_range(0..self.config.bound),
        };
        Ok(ReloadId::new(value, self.config.width))
    }

    /// Unseeded counters draw a fresh seed on every peek.
    fn peek_is_exact(&self) -> bool {
        self.path.exists()
    }
}

/// Always hands out the same id.
pub struct FixedIdSource {
    id: ReloadId,
}

impl FixedIdSource {
    pub fn new(id: ReloadId) -> Self {
        Self { id }
    }
}

impl IdSource for FixedIdSource {
    fn next_id(&mut self) -> Result<ReloadId> {
        Ok(self.id)
    }

    fn peek_id(&self) -> Result<ReloadId> {
        Ok(self.id)
    }
}

/// Build the id source selected by configuration.
pub fn id_source_for(config: &ReloadConfig, counter_path: &Path) -> Box<dyn IdSource> {
    match config.strategy {
        IdStrategy::Random => Box::new(RandomIdSource::new(config.clone())),
        IdStrategy::Counter => Box::new(CounterIdSource::new(counter_path, config.clone())),
    }
}
