//! Scenario execution engine

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::IVec2;
use sandfall_core::world::{TickStats, World, WorldRng};

use super::actions::ScenarioAction;
use super::definition::ScenarioDefinition;
use super::results::{ExecutionReport, Snapshot};
use super::verification::RunObservation;
use crate::render::AsciiRenderer;

/// Configuration for scenario executor
#[derive(Debug, Clone)]
pub struct ScenarioExecutorConfig {
    /// Ticks to run when the scenario does not say
    pub default_ticks: u64,

    /// Capture an ASCII frame every N ticks (plus the first and last)
    pub snapshot_every: Option<u64>,

    /// Verbose logging
    pub verbose: bool,
}

impl Default for ScenarioExecutorConfig {
    fn default() -> Self {
        Self {
            default_ticks: 200,
            snapshot_every: None,
            verbose: false,
        }
    }
}

/// Runs scenario setup, ticks and verification against a world
pub struct ScenarioExecutor {
    /// Configuration
    config: ScenarioExecutorConfig,

    /// Completed ticks in the current run
    tick_count: u64,

    /// Counters summed over the current run
    totals: TickStats,

    /// Counters of the most recent tick
    last_tick: TickStats,

    /// Tick timings (milliseconds)
    tick_times: Vec<f64>,

    /// Action execution log
    log: Vec<String>,

    /// Frames captured
    snapshots: Vec<Snapshot>,
}

impl ScenarioExecutor {
    /// Create new executor with default config
    pub fn new() -> Self {
        Self::with_config(ScenarioExecutorConfig::default())
    }

    /// Create new executor with custom config
    pub fn with_config(config: ScenarioExecutorConfig) -> Self {
        Self {
            config,
            tick_count: 0,
            totals: TickStats::default(),
            last_tick: TickStats::default(),
            tick_times: Vec::new(),
            log: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Execute a complete scenario
    pub fn execute_scenario<R: WorldRng>(
        &mut self,
        scenario: &ScenarioDefinition,
        world: &mut World,
        rng: &mut R,
    ) -> Result<ExecutionReport> {
        let start_time = Instant::now();
        let mut report = ExecutionReport::new(scenario.name.clone());

        self.tick_count = 0;
        self.totals = TickStats::default();
        self.last_tick = TickStats::default();
        self.tick_times.clear();
        self.log.clear();
        self.snapshots.clear();

        let swaps = Rc::new(Cell::new(0u64));
        {
            let swaps = Rc::clone(&swaps);
            world.on_swap(move |_: IVec2, _: IVec2| swaps.set(swaps.get() + 1));
        }

        self.log(&format!("Starting scenario: {}", scenario.name));
        if !scenario.description.is_empty() {
            self.log(&format!("Description: {}", scenario.description));
        }

        // Execute setup actions
        let setup_start = Instant::now();
        if !scenario.setup.is_empty() {
            self.log(&format!("Running {} setup actions", scenario.setup.len()));
            for (idx, action) in scenario.setup.iter().enumerate() {
                if let Err(e) = self.execute_action(action, world, rng) {
                    let msg = format!("Setup action {} failed: {:#}", idx, e);
                    self.log(&msg);
                    return Err(e.context(msg));
                }
            }
        }
        report.actions_executed = scenario.setup.len();
        report.performance.setup_duration_ms = setup_start.elapsed().as_secs_f64() * 1000.0;

        if self.config.snapshot_every.is_some() {
            self.snapshot(world);
        }

        // Run the simulation
        let ticks = scenario.ticks.unwrap_or(self.config.default_ticks);
        let tick_start = Instant::now();
        self.log(&format!("Running {} ticks", ticks));
        self.simulate_ticks(world, ticks, rng);
        report.performance.tick_duration_ms = tick_start.elapsed().as_secs_f64() * 1000.0;

        if self.config.snapshot_every.is_some()
            && self.snapshots.last().is_none_or(|s| s.tick != self.tick_count)
        {
            self.snapshot(world);
        }

        // Run verifications
        let run = RunObservation {
            last_tick: self.last_tick,
            swaps_observed: swaps.get(),
        };
        let verify_start = Instant::now();
        if !scenario.verify.is_empty() {
            self.log(&format!("Running {} verifications", scenario.verify.len()));
            for condition in &scenario.verify {
                let result = condition.evaluate(world, &run);
                self.log(&format!(
                    "  {} {}",
                    if result.passed { "✓" } else { "✗" },
                    result.message
                ));

                if !result.passed {
                    report.verification_failures.push(result);
                }
            }
        }
        report.performance.verification_duration_ms =
            verify_start.elapsed().as_secs_f64() * 1000.0;

        // Finalize report
        report.ticks_executed = self.tick_count;
        report.stats = self.totals;
        report.swaps_observed = run.swaps_observed;
        report.passed = report.verification_failures.is_empty();
        report.performance.total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        if !self.tick_times.is_empty() {
            let total_tick_time: f64 = self.tick_times.iter().sum();
            report.performance.avg_tick_time_ms = total_tick_time / self.tick_times.len() as f64;
            report.performance.peak_tick_time_ms =
                self.tick_times.iter().copied().fold(0.0, f64::max);
        }

        self.log(&format!(
            "Scenario complete: {} ({} ticks, {} swaps, {:.1}ms)",
            if report.passed { "PASSED" } else { "FAILED" },
            self.tick_count,
            run.swaps_observed,
            report.performance.total_duration_ms
        ));
        self.log(&format!("  Performance: {}", report.performance.summary()));

        report.log = std::mem::take(&mut self.log);
        report.snapshots = std::mem::take(&mut self.snapshots);

        Ok(report)
    }

    /// Execute a single action
    fn execute_action<R: WorldRng>(
        &mut self,
        action: &ScenarioAction,
        world: &mut World,
        rng: &mut R,
    ) -> Result<()> {
        if self.config.verbose {
            self.log(&format!("[Tick {}] {:?}", self.tick_count, action));
        }

        match action {
            ScenarioAction::Place { x, y, material } => {
                if !world.set_cell(*x, *y, *material) {
                    self.log(&format!(
                        "  Place of material {} at ({}, {}) ignored",
                        material, x, y
                    ));
                }
            }

            ScenarioAction::Fill {
                min_x,
                min_y,
                max_x,
                max_y,
                material,
            } => {
                let placed = world.fill_rect(
                    IVec2::new(*min_x, *min_y),
                    IVec2::new(*max_x, *max_y),
                    *material,
                );
                self.log(&format!(
                    "  Filled ({},{}) to ({},{}) with material {}: {} cells",
                    min_x, min_y, max_x, max_y, material, placed
                ));
            }

            ScenarioAction::Paint {
                x,
                y,
                radius,
                material,
            } => {
                let placed = world.paint_circle(*x, *y, *radius, *material);
                self.log(&format!(
                    "  Painted material {} at ({}, {}) r={}: {} cells",
                    material, x, y, radius, placed
                ));
            }

            ScenarioAction::Clear => {
                world.clear();
                self.log("  Cleared grid");
            }

            ScenarioAction::SetCustom { config } => {
                world
                    .set_custom_material(config.clone())
                    .context("Rejected custom material")?;
                self.log("  Custom material replaced");
            }

            ScenarioAction::PlaceCustom { x, y, config } => {
                let placed = world
                    .set_cell_custom(*x, *y, config)
                    .context("Rejected custom cell")?;
                if !placed {
                    self.log(&format!("  Custom cell at ({}, {}) ignored", x, y));
                }
            }

            ScenarioAction::Tick { count } => {
                self.simulate_ticks(world, *count, rng);
            }

            ScenarioAction::Log { message } => {
                self.log(message);
            }
        }

        Ok(())
    }

    /// Advance `count` ticks, timing each one
    fn simulate_ticks<R: WorldRng>(&mut self, world: &mut World, count: u64, rng: &mut R) {
        for _ in 0..count {
            let tick_start = Instant::now();

            let mut stats = TickStats::default();
            world.advance_tick_with_stats(&mut stats, rng);

            self.tick_times
                .push(tick_start.elapsed().as_secs_f64() * 1000.0);
            self.totals.merge(&stats);
            self.last_tick = stats;
            self.tick_count += 1;

            if let Some(every) = self.config.snapshot_every {
                if every > 0 && self.tick_count % every == 0 {
                    self.snapshot(world);
                }
            }
        }
    }

    fn snapshot(&mut self, world: &World) {
        self.snapshots.push(Snapshot {
            tick: self.tick_count,
            ascii: AsciiRenderer::new().render(world),
        });
    }

    fn log(&mut self, message: &str) {
        log::info!("{}", message);
        self.log.push(message.to_string());
    }
}

impl Default for ScenarioExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Region, VerificationCondition};
    use sandfall_core::simulation::{CustomMaterialConfig, MaterialId};
    use sandfall_core::world::FixedRng;

    fn scenario(setup: Vec<ScenarioAction>, ticks: u64) -> ScenarioDefinition {
        ScenarioDefinition {
            name: "test".to_string(),
            description: String::new(),
            size: Some((3, 3)),
            scan_order: None,
            custom: None,
            seed: None,
            setup,
            ticks: Some(ticks),
            verify: Vec::new(),
        }
    }

    #[test]
    fn test_executor_basic() {
        let mut world = World::with_size(3, 3).unwrap();
        let mut executor = ScenarioExecutor::new();

        let action = ScenarioAction::Place {
            x: 1,
            y: 2,
            material: MaterialId::SAND,
        };
        executor
            .execute_action(&action, &mut world, &mut FixedRng(0.0))
            .unwrap();

        assert_eq!(world.get_material(1, 2), MaterialId::SAND);
    }

    #[test]
    fn test_sand_drop_passes_verification() {
        let mut definition = scenario(
            vec![ScenarioAction::Place {
                x: 1,
                y: 2,
                material: MaterialId::SAND,
            }],
            3,
        );
        definition.verify = vec![
            VerificationCondition::MaterialAt {
                x: 1,
                y: 0,
                expected: MaterialId::SAND,
            },
            VerificationCondition::FallingAt {
                x: 1,
                y: 0,
                expected: false,
            },
            VerificationCondition::Settled,
            VerificationCondition::SwapCount {
                min: 2,
                max: Some(2),
            },
        ];

        let mut world = World::with_size(3, 3).unwrap();
        let report = ScenarioExecutor::new()
            .execute_scenario(&definition, &mut world, &mut FixedRng(0.99))
            .unwrap();

        assert!(report.passed, "{:?}", report.verification_failures);
        assert_eq!(report.ticks_executed, 3);
        assert_eq!(report.swaps_observed, 2);
        assert_eq!(report.stats.cells_moved, 2);
    }

    #[test]
    fn test_failed_condition_is_reported() {
        let mut definition = scenario(Vec::new(), 1);
        definition.verify = vec![VerificationCondition::RegionFilled {
            region: Region::Whole,
        }];

        let mut world = World::with_size(3, 3).unwrap();
        let report = ScenarioExecutor::new()
            .execute_scenario(&definition, &mut world, &mut FixedRng(0.5))
            .unwrap();

        assert!(!report.passed);
        assert_eq!(report.verification_failures.len(), 1);
    }

    #[test]
    fn test_setup_ticks_count_and_snapshots() {
        let definition = scenario(
            vec![
                ScenarioAction::Place {
                    x: 0,
                    y: 2,
                    material: MaterialId::WATER,
                },
                ScenarioAction::Tick { count: 2 },
            ],
            2,
        );

        let mut world = World::with_size(3, 3).unwrap();
        let mut executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
            snapshot_every: Some(2),
            ..Default::default()
        });
        let report = executor
            .execute_scenario(&definition, &mut world, &mut FixedRng(0.0))
            .unwrap();

        assert_eq!(report.ticks_executed, 4);
        let ticks: Vec<u64> = report.snapshots.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![2, 2, 4]);
    }

    #[test]
    fn test_invalid_custom_aborts_setup() {
        let definition = scenario(
            vec![ScenarioAction::SetCustom {
                config: CustomMaterialConfig {
                    density: -1,
                    ..Default::default()
                },
            }],
            1,
        );

        let mut world = World::with_size(3, 3).unwrap();
        let result =
            ScenarioExecutor::new().execute_scenario(&definition, &mut world, &mut FixedRng(0.0));
        assert!(result.is_err());
    }
}
