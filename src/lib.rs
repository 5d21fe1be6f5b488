//! umpscout — Umpire Call-Correctness and Psychological-Impact Engine
//!
//! Turns a materialized table of pitch-by-pitch tracking events into a
//! per-batter estimate of how much incorrect ball/strike calls suppress
//! that batter's offensive performance, and projects the season-level gain
//! each batter would realize under perfectly accurate (automated)
//! officiating.
//!
//! The crate is the analysis core only. Data acquisition, schema
//! normalization, and report/artifact rendering are external collaborators:
//! callers hand in the normalized pitch and plate-appearance relations and
//! receive structured [`models::BatterSeasonRecord`]s back.
//!
//! ```no_run
//! use umpscout::engine::config::{AnalysisConfig, LeverageTable};
//! use umpscout::engine::orchestrator::analyze_season;
//!
//! # fn load() -> (Vec<umpscout::models::PitchEvent>, Vec<umpscout::models::PaOutcome>) { (vec![], vec![]) }
//! let (pitches, outcomes) = load();
//! let analysis = analyze_season(
//!     pitches,
//!     outcomes,
//!     &AnalysisConfig::default(),
//!     &LeverageTable::standard(),
//! )?;
//! for record in analysis.undervalued_targets() {
//!     println!("{}: +{:.4} xwOBA ({})", record.batter_id,
//!              record.projected_improvement, record.tier);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod engine;
pub mod models;

pub use engine::config::{AnalysisConfig, LeverageTable};
pub use engine::orchestrator::{analyze_season, SeasonAnalysis, SkippedBatter};
pub use models::BatterSeasonRecord;
