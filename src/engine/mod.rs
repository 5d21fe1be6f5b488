//! Call-Correctness and Psychological-Impact Engine
//!
//! Per-batter estimation of how much incorrect umpire ball/strike calls
//! suppress offensive performance, and the season-level gain each batter
//! would realize under perfectly accurate officiating.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Batter Analysis Orchestrator                  │
//! │  (per-batter rayon fan-out, partial-failure isolation)          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │ per batter, stages in order
//!        ▼                       ▼                       ▼
//! ┌─────────────┐        ┌─────────────┐        ┌─────────────┐
//! │ Zone        │───────▶│ Event       │───────▶│ Window      │
//! │ Classifier  │        │ Sequencer   │        │ Builder     │
//! └─────────────┘        └─────────────┘        └──────┬──────┘
//!                                                      │ clean / post sets
//!                                                      ▼
//! ┌─────────────┐        ┌─────────────┐        ┌─────────────┐
//! │ Impact      │◀───────│ Significance│◀───────│ Performance │
//! │ Projector   │        │ Gate        │        │ Aggregator  │
//! └──────┬──────┘        └─────────────┘        └─────────────┘
//!        │
//!        ▼
//!   BatterSeasonRecord (one per qualified batter)
//! ```
//!
//! # Determinism Guarantees
//!
//! - **Sequencing**: total stable order on
//!   `(game_date, game_pk, at_bat_number, pitch_number)`
//! - **Windowing**: union of windows de-duplicated by PA identity
//! - **Fan-out**: results re-sorted by batter id after the parallel stage
//!
//! Running the engine twice on identical input yields bit-identical
//! records.

pub mod aggregate;
pub mod config;
pub mod orchestrator;
pub mod projection;
pub mod significance;
pub mod timeline;
pub mod windows;
pub mod zone;
