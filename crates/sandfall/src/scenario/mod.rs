//! Scripted runs for checking grid behavior
//!
//! A scenario is a RON file that sizes a world, edits it, advances it a number
//! of ticks and then checks conditions against the result.
//!
//! ## Architecture
//!
//! - `definition` - Top-level scenario file format
//! - `actions` - Grid edits applied during setup
//! - `verification` - Conditions checked after the last tick
//! - `executor` - Runs a scenario against a world
//! - `results` - Execution report (JSON)
//!
//! ## Usage
//!
//! ```bash
//! sandfall --scenario scenarios/sand_drop_3x3.ron --seed 7 --report out/report.json
//! ```

mod actions;
mod definition;
mod executor;
mod results;
mod verification;

pub use actions::ScenarioAction;
pub use definition::ScenarioDefinition;
pub use executor::{ScenarioExecutor, ScenarioExecutorConfig};
pub use results::{ExecutionReport, PerformanceMetrics, Snapshot};
pub use verification::{Region, RunObservation, VerificationCondition, VerificationResult};
