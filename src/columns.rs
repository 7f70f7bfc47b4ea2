// Candidate column spellings for each logical field.
//
// Exports from different source systems (and different versions of the same
// system) name the same column differently. Each field keeps an ordered list
// of spellings, newest/most specific first; the normalizer takes the first
// one that yields a usable value. Supporting a new export variant means
// adding one string here or in the config file.
use crate::types::RawRecord;
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Agent,
    ContactsProcessed,
    Target,
    EffectiveContacts,
    Productivity,
    NetContacts,
    ProdHours,
    Level,
    Date,
    LookupName,
    LookupTeam,
}

static DEFAULT_RULES: Lazy<ColumnRules> = Lazy::new(|| ColumnRules {
    agent: names(&["Disp", "Employee name"]),
    contacts_processed: names(&["Cont Procsd", "Contacts Processed"]),
    target: names(&["Cont Proc - Target", "Contact Processed Target"]),
    effective_contacts: names(&["Eff   Cont", "Effective Contacts"]),
    productivity: names(&["Cont Proc - Prod%", "Productivity Achieved %"]),
    net_contacts: names(&["Net Cont", "Net Contacts"]),
    prod_hours: names(&["Prod Hours"]),
    level: names(&["Level"]),
    date: names(&["Date", "11-11-2025", ">=25-09-2025"]),
    lookup_name: names(&["Employee name", "Disp"]),
    lookup_team: names(&["Team"]),
});

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Ordered candidate header names per field. Any list left out of a config
/// file keeps its built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnRules {
    pub agent: Vec<String>,
    pub contacts_processed: Vec<String>,
    pub target: Vec<String>,
    pub effective_contacts: Vec<String>,
    pub productivity: Vec<String>,
    pub net_contacts: Vec<String>,
    pub prod_hours: Vec<String>,
    pub level: Vec<String>,
    pub date: Vec<String>,
    pub lookup_name: Vec<String>,
    pub lookup_team: Vec<String>,
}

impl Default for ColumnRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl ColumnRules {
    pub fn candidates(&self, field: Field) -> &[String] {
        match field {
            Field::Agent => &self.agent,
            Field::ContactsProcessed => &self.contacts_processed,
            Field::Target => &self.target,
            Field::EffectiveContacts => &self.effective_contacts,
            Field::Productivity => &self.productivity,
            Field::NetContacts => &self.net_contacts,
            Field::ProdHours => &self.prod_hours,
            Field::Level => &self.level,
            Field::Date => &self.date,
            Field::LookupName => &self.lookup_name,
            Field::LookupTeam => &self.lookup_team,
        }
    }

    /// Headers are trimmed on ingest, so candidates must be too.
    pub fn trimmed(mut self) -> Self {
        for list in [
            &mut self.agent,
            &mut self.contacts_processed,
            &mut self.target,
            &mut self.effective_contacts,
            &mut self.productivity,
            &mut self.net_contacts,
            &mut self.prod_hours,
            &mut self.level,
            &mut self.date,
            &mut self.lookup_name,
            &mut self.lookup_team,
        ] {
            for name in list.iter_mut() {
                *name = name.trim().to_string();
            }
        }
        self
    }

    /// First present, non-blank text among the field's candidates.
    pub fn first_text<'r>(&self, record: &'r RawRecord, field: Field) -> Option<&'r str> {
        self.candidates(field)
            .iter()
            .find_map(|column| record.value(column))
    }

    /// First candidate whose value survives `parse`. A value that fails to
    /// parse falls through to the next candidate.
    pub fn first_parsed<T, F>(&self, record: &RawRecord, field: Field, parse: F) -> Option<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        self.candidates(field)
            .iter()
            .filter_map(|column| record.value(column))
            .find_map(parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_count_safe;

    fn record(cells: &[(&str, &str)]) -> RawRecord {
        cells.iter().copied().collect()
    }

    #[test]
    fn earlier_candidate_wins_when_both_present() {
        let rules = ColumnRules::default();
        let r = record(&[("Contacts Processed", "30"), ("Cont Procsd", "50")]);
        assert_eq!(
            rules.first_parsed(&r, Field::ContactsProcessed, parse_count_safe),
            Some(50)
        );
    }

    #[test]
    fn unparseable_candidate_falls_through() {
        let rules = ColumnRules::default();
        let r = record(&[("Cont Procsd", "n/a"), ("Contacts Processed", "30")]);
        assert_eq!(
            rules.first_parsed(&r, Field::ContactsProcessed, parse_count_safe),
            Some(30)
        );
    }

    #[test]
    fn blank_text_candidate_falls_through() {
        let rules = ColumnRules::default();
        let r = record(&[("Disp", "   "), ("Employee name", "Bea")]);
        assert_eq!(rules.first_text(&r, Field::Agent), Some("Bea"));
        assert_eq!(rules.first_text(&record(&[]), Field::Agent), None);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let rules: ColumnRules = toml::from_str(r#"agent = [" Agent Name ", "Disp"]"#).unwrap();
        let rules = rules.trimmed();
        assert_eq!(rules.agent, vec!["Agent Name", "Disp"]);
        assert_eq!(rules.target, ColumnRules::default().target);
    }
}
