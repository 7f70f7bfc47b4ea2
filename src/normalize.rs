// Raw production rows -> normalized agent records.
use crate::columns::Field;
use crate::config::Config;
use crate::lookup::TeamDirectory;
use crate::types::{NormalizedRecord, RawRecord, RawTable};
use crate::util::{format_row_date, parse_count_safe, parse_percent_safe, today};
use chrono::NaiveDate;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Rows without any usable agent name. Not an error.
    pub skipped_rows: usize,
    /// Kept rows that ended up on the fallback team.
    pub fallback_team_rows: usize,
}

pub struct Normalizer<'a> {
    config: &'a Config,
    directory: Option<&'a TeamDirectory>,
    date: NaiveDate,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Normalizer {
            config,
            directory: None,
            date: today(),
        }
    }

    pub fn with_directory(mut self, directory: &'a TeamDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Date stamped on rows that carry none of the date columns.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Map one row, or `None` when it has no agent name.
    pub fn normalize_row(&self, row: &RawRecord) -> Option<NormalizedRecord> {
        let rules = &self.config.columns;
        let agent = rules.first_text(row, Field::Agent)?.to_string();

        let team = match self.directory {
            Some(dir) if !dir.is_empty() => dir.resolve(&agent, &self.config.fallback_team),
            _ => self.config.fallback_team.as_str(),
        }
        .to_string();

        let count = |field| rules.first_parsed(row, field, parse_count_safe).unwrap_or(0);
        let text = |field, default: &str| {
            rules
                .first_text(row, field)
                .map(str::to_string)
                .unwrap_or_else(|| default.to_string())
        };

        let contacts_processed = count(Field::ContactsProcessed);
        let target = count(Field::Target);

        Some(NormalizedRecord {
            agent,
            team,
            contacts_processed,
            target,
            deficit: target - contacts_processed,
            productivity: rules
                .first_parsed(row, Field::Productivity, parse_percent_safe)
                .unwrap_or(0.0),
            effective_contacts: count(Field::EffectiveContacts),
            net_contacts: count(Field::NetContacts),
            prod_hours: text(Field::ProdHours, &self.config.default_prod_hours),
            level: text(Field::Level, &self.config.default_level),
            date: text(Field::Date, &format_row_date(self.date)),
        })
    }

    /// Normalize every row, preserving input order.
    pub fn run(&self, table: &RawTable) -> (Vec<NormalizedRecord>, NormalizeReport) {
        let mut report = NormalizeReport {
            total_rows: table.len(),
            ..Default::default()
        };
        let mut out = Vec::with_capacity(table.len());

        for (idx, row) in table.records.iter().enumerate() {
            match self.normalize_row(row) {
                Some(record) => {
                    if record.team == self.config.fallback_team {
                        report.fallback_team_rows += 1;
                    }
                    out.push(record);
                }
                None => {
                    debug!(row = idx + 1, "no agent name, row skipped");
                    report.skipped_rows += 1;
                }
            }
        }

        report.kept_rows = out.len();
        info!(
            total = report.total_rows,
            kept = report.kept_rows,
            skipped = report.skipped_rows,
            fallback_team = report.fallback_team_rows,
            "normalized production data"
        );
        (out, report)
    }
}

/// Convenience wrapper: one full pass with an optional lookup directory.
pub fn normalize(
    table: &RawTable,
    directory: Option<&TeamDirectory>,
    config: &Config,
) -> (Vec<NormalizedRecord>, NormalizeReport) {
    let mut normalizer = Normalizer::new(config);
    if let Some(dir) = directory {
        normalizer = normalizer.with_directory(dir);
    }
    normalizer.run(table)
}
