//! Agent productivity dashboard.
//!
//! Ingests a daily call-center production export, normalizes its drifting
//! column names into [`types::NormalizedRecord`]s, assigns teams from an
//! optional lookup file and computes the summary figures a dashboard shows.
//!
//! The pipeline is plain functions over owned data:
//! [`ingest`] → [`normalize`] → [`aggregate`], with [`session::Session`]
//! holding the state a front end keeps between interactions.
pub mod aggregate;
pub mod columns;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod lookup;
pub mod normalize;
pub mod output;
pub mod session;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{DashboardError, Result};
pub use session::Session;
pub use types::NormalizedRecord;
