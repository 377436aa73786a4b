//! Scenario definition and RON file loading

use anyhow::{Context, Result};
use sandfall_core::simulation::CustomMaterialConfig;
use sandfall_core::world::{ScanOrder, WorldConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::actions::ScenarioAction;
use super::verification::VerificationCondition;

/// Top-level scenario definition loaded from RON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Scenario name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Grid size (width, height); the runner config decides when unset
    #[serde(default)]
    pub size: Option<(i32, i32)>,

    /// Scan order override
    #[serde(default)]
    pub scan_order: Option<ScanOrder>,

    /// Custom material override
    #[serde(default)]
    pub custom: Option<CustomMaterialConfig>,

    /// Seed used when the command line does not give one
    #[serde(default)]
    pub seed: Option<u64>,

    /// Grid edits run before ticking
    #[serde(default)]
    pub setup: Vec<ScenarioAction>,

    /// Ticks to run after setup; the runner config decides when unset
    #[serde(default)]
    pub ticks: Option<u64>,

    /// Verification checks to run after the last tick
    #[serde(default)]
    pub verify: Vec<VerificationCondition>,
}

impl ScenarioDefinition {
    /// Load scenario from RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        let scenario = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON scenario: {}", path.display()))?;

        Ok(scenario)
    }

    /// Save scenario to RON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize scenario to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write scenario file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// World config for this scenario, layered over the runner's
    pub fn world_config(&self, base: &WorldConfig) -> WorldConfig {
        let mut config = base.clone();
        if let Some((width, height)) = self.size {
            config.width = width;
            config.height = height;
        }
        if let Some(scan_order) = self.scan_order {
            config.scan_order = scan_order;
        }
        if let Some(custom) = &self.custom {
            config.custom = custom.clone();
        }
        config
    }

    /// Built-in scene used when no scenario file is given
    ///
    /// A sand heap and a water pool dropped onto a stone shelf with gaps.
    pub fn demo() -> Self {
        use sandfall_core::simulation::MaterialId;

        Self {
            name: "Demo".to_string(),
            description: "Sand and water poured over a broken stone shelf".to_string(),
            size: None,
            scan_order: None,
            custom: None,
            seed: None,
            setup: vec![
                ScenarioAction::Fill {
                    min_x: 4,
                    min_y: 12,
                    max_x: 26,
                    max_y: 12,
                    material: MaterialId::STONE,
                },
                ScenarioAction::Fill {
                    min_x: 36,
                    min_y: 20,
                    max_x: 58,
                    max_y: 20,
                    material: MaterialId::STONE,
                },
                ScenarioAction::Paint {
                    x: 14,
                    y: 40,
                    radius: 7,
                    material: MaterialId::SAND,
                },
                ScenarioAction::Paint {
                    x: 46,
                    y: 44,
                    radius: 8,
                    material: MaterialId::WATER,
                },
                ScenarioAction::Paint {
                    x: 30,
                    y: 54,
                    radius: 3,
                    material: MaterialId::COAL,
                },
            ],
            ticks: None,
            verify: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Region;

    #[test]
    fn test_scenario_serialization() {
        let scenario = ScenarioDefinition {
            name: "Test Scenario".to_string(),
            description: "A test scenario".to_string(),
            size: Some((3, 3)),
            scan_order: None,
            custom: None,
            seed: Some(1),
            setup: vec![ScenarioAction::Place {
                x: 1,
                y: 2,
                material: 1,
            }],
            ticks: Some(3),
            verify: vec![VerificationCondition::RegionEmpty {
                region: Region::Rect {
                    min_x: 0,
                    min_y: 1,
                    max_x: 2,
                    max_y: 2,
                },
            }],
        };

        // Test RON serialization
        let ron = ron::ser::to_string_pretty(&scenario, ron::ser::PrettyConfig::default()).unwrap();
        assert!(ron.contains("Test Scenario"));
        assert!(ron.contains("Place"));

        let deserialized: ScenarioDefinition = ron::from_str(&ron).unwrap();
        assert_eq!(deserialized.name, scenario.name);
        assert_eq!(deserialized.setup.len(), 1);
        assert_eq!(deserialized.ticks, Some(3));
    }

    #[test]
    fn test_minimal_scenario_uses_defaults() {
        let scenario: ScenarioDefinition = ron::from_str(r#"(name: "bare")"#).unwrap();
        assert!(scenario.setup.is_empty());
        assert!(scenario.verify.is_empty());
        assert!(scenario.ticks.is_none());

        let base = WorldConfig::with_size(10, 12);
        assert_eq!(scenario.world_config(&base), base);
    }

    #[test]
    fn test_world_config_overrides() {
        let scenario: ScenarioDefinition = ron::from_str(
            r#"(
                name: "sized",
                size: Some((5, 7)),
                scan_order: Some(RowMajor),
                custom: Some((density: 3)),
            )"#,
        )
        .unwrap();

        let config = scenario.world_config(&WorldConfig::default());
        assert_eq!((config.width, config.height), (5, 7));
        assert_eq!(config.scan_order, ScanOrder::RowMajor);
        assert_eq!(config.custom.density, 3);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.ron");

        ScenarioDefinition::demo().to_file(&path).unwrap();
        let loaded = ScenarioDefinition::from_file(&path).unwrap();

        assert_eq!(loaded.name, "Demo");
        assert_eq!(loaded.setup.len(), 5);
    }
}
