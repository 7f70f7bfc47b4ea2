// The state a front end owns between interactions: the loaded inputs, the
// last processed dataset and the current team/agent selection. Everything
// else is recomputed from these on demand.
use crate::aggregate::{self, Summary, TeamRollup};
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::ingest;
use crate::lookup::TeamDirectory;
use crate::normalize::{NormalizeReport, Normalizer};
use crate::types::{NormalizedRecord, RawTable};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::info;

pub const ALL: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(String),
}

impl Filter {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL {
            Filter::All
        } else {
            Filter::Only(s.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str(ALL),
            Filter::Only(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub team: Filter,
    pub agent: Filter,
}

pub struct Session {
    config: Config,
    delimiter: u8,
    raw: Option<RawTable>,
    directory: Option<TeamDirectory>,
    processed: Option<Vec<NormalizedRecord>>,
    selection: Selection,
    date: Option<NaiveDate>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session {
            config,
            delimiter: b',',
            raw: None,
            directory: None,
            processed: None,
            selection: Selection::default(),
            date: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Pin the date stamped on rows without one (otherwise today).
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the production table. A failed upload leaves the previous
    /// table in place.
    pub fn load_production_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let table = ingest::parse_bytes(bytes, self.delimiter)?;
        let rows = table.len();
        self.raw = Some(table);
        Ok(rows)
    }

    pub fn load_production(&mut self, path: &Path) -> Result<usize> {
        let table = ingest::load_path(path, self.delimiter)?;
        let rows = table.len();
        info!(path = %path.display(), rows, "loaded production file");
        self.raw = Some(table);
        Ok(rows)
    }

    pub fn load_lookup_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let table = ingest::parse_bytes(bytes, self.delimiter)?;
        Ok(self.set_lookup(&table))
    }

    pub fn load_lookup(&mut self, path: &Path) -> Result<usize> {
        let table = ingest::load_path(path, self.delimiter)?;
        info!(path = %path.display(), rows = table.len(), "loaded lookup file");
        Ok(self.set_lookup(&table))
    }

    fn set_lookup(&mut self, table: &RawTable) -> usize {
        let dir = TeamDirectory::from_table(table, &self.config.columns);
        let entries = dir.len();
        self.directory = Some(dir);
        entries
    }

    pub fn clear_lookup(&mut self) {
        self.directory = None;
    }

    pub fn has_production(&self) -> bool {
        self.raw.is_some()
    }

    pub fn has_lookup(&self) -> bool {
        self.directory.is_some()
    }

    /// Run a full normalization pass, replacing any previous result and
    /// resetting the selection.
    pub fn process(&mut self) -> Result<NormalizeReport> {
        let raw = self.raw.as_ref().ok_or(DashboardError::NoProductionData)?;
        let mut normalizer = Normalizer::new(&self.config);
        if let Some(dir) = &self.directory {
            normalizer = normalizer.with_directory(dir);
        }
        if let Some(date) = self.date {
            normalizer = normalizer.with_date(date);
        }
        let (records, report) = normalizer.run(raw);
        self.processed = Some(records);
        self.selection = Selection::default();
        Ok(report)
    }

    /// Drop the processed dataset and selection; loaded inputs stay.
    pub fn clear(&mut self) {
        self.processed = None;
        self.selection = Selection::default();
    }

    pub fn processed(&self) -> Result<&[NormalizedRecord]> {
        self.processed
            .as_deref()
            .ok_or(DashboardError::NotProcessed)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// "ALL" followed by every team in the processed data, sorted.
    pub fn team_options(&self) -> Result<Vec<String>> {
        let teams: BTreeSet<&str> = self.processed()?.iter().map(|r| r.team.as_str()).collect();
        Ok(with_all(teams))
    }

    /// "ALL" followed by the agents of the selected team, sorted.
    pub fn agent_options(&self) -> Result<Vec<String>> {
        let agents: BTreeSet<&str> = self
            .processed()?
            .iter()
            .filter(|r| self.selection.team.matches(&r.team))
            .map(|r| r.agent.as_str())
            .collect();
        Ok(with_all(agents))
    }

    /// Choosing a team resets the agent filter.
    pub fn select_team(&mut self, team: &str) -> Result<()> {
        let filter = Filter::parse(team);
        if let Filter::Only(name) = &filter {
            if !self.team_options()?.iter().any(|t| t == name) {
                return Err(DashboardError::UnknownTeam(name.clone()));
            }
        }
        self.selection = Selection {
            team: filter,
            agent: Filter::All,
        };
        Ok(())
    }

    pub fn select_agent(&mut self, agent: &str) -> Result<()> {
        let filter = Filter::parse(agent);
        if let Filter::Only(name) = &filter {
            if !self.agent_options()?.iter().any(|a| a == name) {
                return Err(DashboardError::UnknownAgent(name.clone()));
            }
        }
        self.selection.agent = filter;
        Ok(())
    }

    /// Processed records matching the current selection, in input order.
    pub fn filtered(&self) -> Result<Vec<NormalizedRecord>> {
        Ok(self
            .processed()?
            .iter()
            .filter(|r| self.selection.team.matches(&r.team))
            .filter(|r| self.selection.agent.matches(&r.agent))
            .cloned()
            .collect())
    }

    pub fn summary(&self) -> Result<Summary> {
        Ok(aggregate::summarize(&self.filtered()?)?)
    }

    pub fn team_rollup(&self) -> Result<Vec<TeamRollup>> {
        Ok(aggregate::team_rollup(&self.filtered()?))
    }
}

fn with_all(values: BTreeSet<&str>) -> Vec<String> {
    std::iter::once(ALL)
        .chain(values)
        .map(str::to_string)
        .collect()
}
