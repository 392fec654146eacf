//! Security self-assessment scoring service.
//!
//! Organizations answer a fixed questionnaire, receive a normalized
//! compliance score (0-100) with a per-question breakdown, and can compare
//! themselves against the averages of their sector. The computational core
//! (score calculator, domain aggregator, sector aggregator) is pure and
//! synchronous; persistence and caching sit behind traits so adapters can be
//! swapped per deployment.

pub mod assessment;
pub mod config;
pub mod error;
pub mod questionnaire;
pub mod telemetry;
