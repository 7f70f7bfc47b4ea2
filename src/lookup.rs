// Team assignment from the optional lookup file.
//
// Matching is a case-insensitive substring test in either direction and the
// first lookup row that matches wins. Short or nested names ("Al" against
// "Alice" and "Albert") resolve to whichever row comes first; reports built
// by the existing tool depend on exactly this behavior.
use crate::columns::{ColumnRules, Field};
use crate::types::{LookupEntry, RawTable};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    // (lowercased employee name, team) in file order
    entries: Vec<(String, String)>,
}

impl TeamDirectory {
    pub fn new(entries: Vec<LookupEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| !e.employee_name.trim().is_empty())
            .map(|e| (e.employee_name.trim().to_lowercase(), e.team.trim().to_string()))
            .collect();
        TeamDirectory { entries }
    }

    /// Resolve lookup rows through the name/team candidate columns. Rows
    /// without an employee name can never match and are left out.
    pub fn from_table(table: &RawTable, rules: &ColumnRules) -> Self {
        let entries: Vec<LookupEntry> = table
            .records
            .iter()
            .filter_map(|r| {
                let employee_name = rules.first_text(r, Field::LookupName)?.to_string();
                let team = rules
                    .first_text(r, Field::LookupTeam)
                    .unwrap_or_default()
                    .to_string();
                Some(LookupEntry {
                    employee_name,
                    team,
                })
            })
            .collect();
        debug!(
            entries = entries.len(),
            dropped = table.len() - entries.len(),
            "built team directory"
        );
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The team of the first entry whose name contains, or is contained in,
    /// `agent` (ignoring case). An empty team cell on the matching entry, or
    /// no match at all, yields `fallback`.
    pub fn resolve<'a>(&'a self, agent: &str, fallback: &'a str) -> &'a str {
        self.find(agent)
            .filter(|team| !team.is_empty())
            .unwrap_or(fallback)
    }

    /// The matching entry's raw team cell, if any entry matches.
    pub fn find(&self, agent: &str) -> Option<&str> {
        let agent = agent.trim().to_lowercase();
        if agent.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(name, _)| name.contains(&agent) || agent.contains(name.as_str()))
            .map(|(_, team)| team.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_bytes;

    fn entry(name: &str, team: &str) -> LookupEntry {
        LookupEntry {
            employee_name: name.to_string(),
            team: team.to_string(),
        }
    }

    #[test]
    fn partial_name_matches_in_either_direction() {
        let dir = TeamDirectory::new(vec![entry("John Smith", "APAC")]);
        assert_eq!(dir.resolve("Smith", "UK"), "APAC");
        assert_eq!(dir.resolve("JOHN SMITH (night)", "UK"), "APAC");
        assert_eq!(dir.resolve("Jane Doe", "UK"), "UK");
    }

    #[test]
    fn first_match_wins_for_overlapping_names() {
        let dir = TeamDirectory::new(vec![entry("Alice", "North"), entry("Albert", "South")]);
        assert_eq!(dir.resolve("Al", "UK"), "North");
        assert_eq!(dir.resolve("Albert", "UK"), "South");
    }

    #[test]
    fn empty_team_cell_falls_back() {
        let dir = TeamDirectory::new(vec![entry("Ann Lee", "  ")]);
        assert_eq!(dir.find("Ann"), Some(""));
        assert_eq!(dir.resolve("Ann", "UK"), "UK");
    }

    #[test]
    fn blank_names_never_match() {
        let dir = TeamDirectory::new(vec![entry("", "Ghost"), entry("Bo", "West")]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.resolve("Bob", "UK"), "West");
    }

    #[test]
    fn builds_from_lookup_table() {
        let table =
            parse_bytes(b"Employee name,Team\nJohn Smith,APAC\n,EMEA\nMary Jones,\n", b',')
                .unwrap();
        let dir = TeamDirectory::from_table(&table, &ColumnRules::default());
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.resolve("smith", "UK"), "APAC");
        assert_eq!(dir.resolve("Mary", "UK"), "UK");
    }

    #[test]
    fn lookup_may_use_disp_column() {
        let table = parse_bytes(b"Disp,Team\nKofi,Ghana\n", b',').unwrap();
        let dir = TeamDirectory::from_table(&table, &ColumnRules::default());
        assert_eq!(dir.resolve("Kofi Mensah", "UK"), "Ghana");
    }
}
