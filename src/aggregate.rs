use crate::error::AggregateError;
use crate::types::{Balance, NormalizedRecord};
use crate::util::average;
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline numbers for a (filtered) set of agents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub agent_count: usize,
    pub total_contacts_processed: i64,
    pub total_target: i64,
    pub total_deficit: i64,
    pub balance: Balance,
    pub avg_productivity: f64,
    pub achievers: usize,
    /// Fraction of agents at or above 100% productivity, 0..=1.
    pub achievement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRollup {
    pub team: String,
    pub total_contacts: i64,
    pub total_target: i64,
    pub avg_productivity: f64,
    pub agent_count: usize,
}

// Counts can be as large as i64 allows, so totals clamp instead of wrapping.
fn saturating_total(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0i64, i64::saturating_add)
}

pub fn achievers(data: &[NormalizedRecord]) -> usize {
    data.iter().filter(|r| r.productivity >= 100.0).count()
}

pub fn achievement_rate(data: &[NormalizedRecord]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    achievers(data) as f64 / data.len() as f64
}

/// Totals, mean productivity and achievement for `data`.
///
/// The mean is undefined over nothing, so an empty slice is an error and the
/// caller shows a neutral state instead.
pub fn summarize(data: &[NormalizedRecord]) -> Result<Summary, AggregateError> {
    if data.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }
    let total_contacts_processed = saturating_total(data.iter().map(|r| r.contacts_processed));
    let total_target = saturating_total(data.iter().map(|r| r.target));
    let total_deficit = saturating_total(data.iter().map(|r| r.deficit));
    let productivity: Vec<f64> = data.iter().map(|r| r.productivity).collect();

    Ok(Summary {
        agent_count: data.len(),
        total_contacts_processed,
        total_target,
        total_deficit,
        balance: Balance::from_total_deficit(total_deficit),
        avg_productivity: average(&productivity),
        achievers: achievers(data),
        achievement_rate: achievement_rate(data),
    })
}

/// One row per distinct team string, ordered by team name.
///
/// Teams are grouped on the literal string: "UK" and "uk " are two teams.
pub fn team_rollup(data: &[NormalizedRecord]) -> Vec<TeamRollup> {
    #[derive(Default)]
    struct Acc {
        contacts: i64,
        target: i64,
        productivity: Vec<f64>,
    }

    let mut map: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in data {
        let e = map.entry(r.team.as_str()).or_default();
        e.contacts = e.contacts.saturating_add(r.contacts_processed);
        e.target = e.target.saturating_add(r.target);
        e.productivity.push(r.productivity);
    }

    map.into_iter()
        .map(|(team, acc)| TeamRollup {
            team: team.to_string(),
            total_contacts: acc.contacts,
            total_target: acc.target,
            avg_productivity: average(&acc.productivity),
            agent_count: acc.productivity.len(),
        })
        .collect()
}
