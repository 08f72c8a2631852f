use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use crystal_defence_core::{DefenderKind, SimulationConfig};
use serde::Deserialize;

use crate::placement::PlacementOrder;

const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Session parameters and opening defenders loaded from a TOML scenario file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Scenario {
    pub(crate) simulation: SimulationConfig,
    pub(crate) defenders: Vec<PlacementOrder>,
}

impl Scenario {
    /// Reads and validates the scenario stored at `path`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        parse_scenario(&contents)
            .with_context(|| format!("invalid scenario file {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    version: u32,
    #[serde(default)]
    simulation: SimulationConfig,
    #[serde(default)]
    defenders: Vec<PlacementOrder>,
}

fn parse_scenario(contents: &str) -> Result<Scenario> {
    let file: ScenarioFile =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    if file.version != SUPPORTED_SCENARIO_VERSION {
        bail!(
            "unsupported scenario version {}; expected {}",
            file.version,
            SUPPORTED_SCENARIO_VERSION
        );
    }

    let simulation = file.simulation;
    if !(simulation.max_tick_delta.is_finite() && simulation.max_tick_delta >= 0.0) {
        bail!(
            "max_tick_delta must be a non-negative number, got {}",
            simulation.max_tick_delta
        );
    }
    for order in &file.defenders {
        if DefenderKind::from_variant_id(order.variant).is_none() {
            bail!("scenario names unknown defender variant {}", order.variant);
        }
    }

    Ok(Scenario {
        simulation,
        defenders: file.defenders,
    })
}
