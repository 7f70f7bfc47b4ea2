use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tabled::Tabled;

/// One row of an uploaded file, keyed by trimmed header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    cells: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell. The first occurrence of a duplicated header wins.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.entry(column.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// The trimmed value of `column`, or `None` when absent or blank.
    pub fn value(&self, column: &str) -> Option<&str> {
        let v = self.get(column)?.trim();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEncoding::Utf8 => write!(f, "UTF-8"),
            SourceEncoding::Latin1 => write!(f, "Latin-1"),
        }
    }
}

/// A fully decoded and parsed upload.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    pub encoding: SourceEncoding,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One team-assignment row after column resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    pub employee_name: String,
    pub team: String,
}

/// The canonical per-agent output of a normalization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Agent")]
    pub agent: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "ContactsProcessed")]
    pub contacts_processed: i64,
    #[serde(rename = "Target")]
    pub target: i64,
    #[serde(rename = "Deficit")]
    pub deficit: i64,
    #[serde(rename = "Productivity")]
    pub productivity: f64,
    #[serde(rename = "EffectiveContacts")]
    pub effective_contacts: i64,
    #[serde(rename = "NetContacts")]
    pub net_contacts: i64,
    #[serde(rename = "ProdHours")]
    pub prod_hours: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Date")]
    pub date: String,
}

impl NormalizedRecord {
    pub fn status(&self) -> PerformanceStatus {
        PerformanceStatus::classify(self.productivity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceStatus {
    Achieved,
    Close,
    Below,
}

impl PerformanceStatus {
    pub fn classify(productivity: f64) -> Self {
        if productivity >= 100.0 {
            PerformanceStatus::Achieved
        } else if productivity >= 80.0 {
            PerformanceStatus::Close
        } else {
            PerformanceStatus::Below
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceStatus::Achieved => "Achieved",
            PerformanceStatus::Close => "Close",
            PerformanceStatus::Below => "Below",
        }
    }
}

impl fmt::Display for PerformanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether processed contacts met the summed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Balance {
    Surplus,
    Deficit,
}

impl Balance {
    pub fn from_total_deficit(total_deficit: i64) -> Self {
        if total_deficit <= 0 {
            Balance::Surplus
        } else {
            Balance::Deficit
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Surplus => write!(f, "Surplus"),
            Balance::Deficit => write!(f, "Deficit"),
        }
    }
}

/// Export layout: every normalized field plus the derived status label.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Agent")]
    pub agent: &'a str,
    #[serde(rename = "Team")]
    pub team: &'a str,
    #[serde(rename = "ContactsProcessed")]
    pub contacts_processed: i64,
    #[serde(rename = "Target")]
    pub target: i64,
    #[serde(rename = "Deficit")]
    pub deficit: i64,
    #[serde(rename = "Productivity")]
    pub productivity: f64,
    #[serde(rename = "EffectiveContacts")]
    pub effective_contacts: i64,
    #[serde(rename = "NetContacts")]
    pub net_contacts: i64,
    #[serde(rename = "ProdHours")]
    pub prod_hours: &'a str,
    #[serde(rename = "Level")]
    pub level: &'a str,
    #[serde(rename = "Date")]
    pub date: &'a str,
    #[serde(rename = "Status")]
    pub status: &'static str,
}

impl<'a> From<&'a NormalizedRecord> for ExportRow<'a> {
    fn from(r: &'a NormalizedRecord) -> Self {
        ExportRow {
            agent: &r.agent,
            team: &r.team,
            contacts_processed: r.contacts_processed,
            target: r.target,
            deficit: r.deficit,
            productivity: r.productivity,
            effective_contacts: r.effective_contacts,
            net_contacts: r.net_contacts,
            prod_hours: &r.prod_hours,
            level: &r.level,
            date: &r.date,
            status: r.status().label(),
        }
    }
}

#[derive(Debug, Tabled, Clone)]
pub struct MetricsRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct TeamSummaryRow {
    #[tabled(rename = "Team")]
    pub team: String,
    #[tabled(rename = "Total Contacts")]
    pub total_contacts: String,
    #[tabled(rename = "Total Target")]
    pub total_target: String,
    #[tabled(rename = "Avg Productivity")]
    pub avg_productivity: String,
    #[tabled(rename = "Agents")]
    pub agent_count: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct AgentDetailRow {
    #[tabled(rename = "Agent Name")]
    pub agent: String,
    #[tabled(rename = "Team")]
    pub team: String,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Processed")]
    pub processed: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Deficit")]
    pub deficit: String,
    #[tabled(rename = "Productivity %")]
    pub productivity: String,
    #[tabled(rename = "Eff. Contacts")]
    pub effective_contacts: String,
    #[tabled(rename = "Status")]
    pub status: String,
}
