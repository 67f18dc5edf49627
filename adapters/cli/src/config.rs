use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use queens_master_gateway::DEFAULT_SOLVER_URL;
use serde::Deserialize;

/// Configuration file consulted when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "queens-master.toml";

/// Runtime settings merged from the configuration file and the command line.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Base address of the solver service.
    pub(crate) solver_url: String,
    /// Milliseconds between replayed steps.
    pub(crate) step_delay_ms: u64,
    /// Whether frames use ANSI colour escapes.
    pub(crate) ansi: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver_url: DEFAULT_SOLVER_URL.to_owned(),
            step_delay_ms: 1000,
            ansi: true,
        }
    }
}

impl Settings {
    /// Loads settings from `explicit`, or from the default file when it exists.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).context("failed to parse config toml")?;
        settings.validated()
    }

    /// Applies command-line overrides on top of the loaded values.
    pub(crate) fn with_overrides(
        mut self,
        solver_url: Option<String>,
        step_delay_ms: Option<u64>,
    ) -> Result<Self> {
        if let Some(solver_url) = solver_url {
            self.solver_url = solver_url;
        }
        if let Some(step_delay_ms) = step_delay_ms {
            self.step_delay_ms = step_delay_ms;
        }
        self.validated()
    }

    /// Delay between replayed steps.
    pub(crate) const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    fn validated(self) -> Result<Self> {
        if self.step_delay_ms == 0 {
            bail!("step_delay_ms must be positive");
        }
        if self.solver_url.trim().is_empty() {
            bail!("solver_url must not be empty");
        }
        Ok(self)
    }
}
