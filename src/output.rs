use crate::aggregate::{Summary, TeamRollup};
use crate::error::ExportError;
use crate::types::{AgentDetailRow, ExportRow, MetricsRow, NormalizedRecord, TeamSummaryRow};
use crate::util::{format_int, format_number};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn report_file_name(date: NaiveDate) -> String {
    format!("productivity_report_{}.csv", date.format("%Y%m%d"))
}

/// Serialize records plus their status label as CSV into any writer.
pub fn write_records<W: Write>(writer: W, rows: &[NormalizedRecord]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        // Header only, so an empty selection still yields a valid file.
        wtr.write_record([
            "Agent",
            "Team",
            "ContactsProcessed",
            "Target",
            "Deficit",
            "Productivity",
            "EffectiveContacts",
            "NetContacts",
            "ProdHours",
            "Level",
            "Date",
            "Status",
        ])?;
    }
    for r in rows {
        wtr.serialize(ExportRow::from(r))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn export_csv_bytes(rows: &[NormalizedRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_records(&mut buf, rows)?;
    Ok(buf)
}

pub fn write_csv(path: &Path, rows: &[NormalizedRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_records(file, rows)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub summary: Option<PathBuf>,
}

/// Write the dated report CSV into `dir`, plus `summary.json` when there
/// is a summary to write.
pub fn export_report(
    dir: &Path,
    rows: &[NormalizedRecord],
    summary: Option<&Summary>,
    date: NaiveDate,
) -> Result<ExportPaths, ExportError> {
    let csv_path = dir.join(report_file_name(date));
    write_csv(&csv_path, rows)?;
    info!(path = %csv_path.display(), rows = rows.len(), "exported report");

    let summary_path = match summary {
        Some(s) => {
            let p = dir.join("summary.json");
            write_json(&p, s)?;
            Some(p)
        }
        None => None,
    };
    Ok(ExportPaths {
        csv: csv_path,
        summary: summary_path,
    })
}

pub fn metrics_rows(s: &Summary) -> Vec<MetricsRow> {
    vec![
        MetricsRow {
            metric: "Total Contacts Processed".to_string(),
            value: format_int(s.total_contacts_processed),
            detail: format!("Target: {}", format_int(s.total_target)),
        },
        MetricsRow {
            metric: s.balance.to_string(),
            value: format_int(s.total_deficit.abs()),
            detail: "vs Target".to_string(),
        },
        MetricsRow {
            metric: "Average Productivity".to_string(),
            value: format!("{}%", format_number(s.avg_productivity, 1)),
            detail: format!("{} agents", format_int(s.agent_count)),
        },
        MetricsRow {
            metric: "Achievement Rate".to_string(),
            value: format!("{}%", format_number(s.achievement_rate * 100.0, 1)),
            detail: format!("{}/{} agents", s.achievers, s.agent_count),
        },
    ]
}

pub fn team_summary_rows(rollup: &[TeamRollup]) -> Vec<TeamSummaryRow> {
    rollup
        .iter()
        .map(|t| TeamSummaryRow {
            team: t.team.clone(),
            total_contacts: format_int(t.total_contacts),
            total_target: format_int(t.total_target),
            avg_productivity: format!("{}%", format_number(t.avg_productivity, 1)),
            agent_count: format_int(t.agent_count),
        })
        .collect()
}

pub fn agent_detail_rows(rows: &[NormalizedRecord]) -> Vec<AgentDetailRow> {
    rows.iter()
        .map(|r| AgentDetailRow {
            agent: r.agent.clone(),
            team: r.team.clone(),
            level: r.level.clone(),
            processed: format_int(r.contacts_processed),
            target: format_int(r.target),
            deficit: format_int(r.deficit),
            productivity: format_number(r.productivity, 1),
            effective_contacts: format_int(r.effective_contacts),
            status: r.status().to_string(),
        })
        .collect()
}

pub fn render_table<T>(rows: &[T], max_rows: Option<usize>) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows
        .iter()
        .take(max_rows.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: Option<usize>)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{summarize, team_rollup};
    use tempfile::TempDir;

    fn rec(agent: &str, team: &str, processed: i64, target: i64, prod: f64) -> NormalizedRecord {
        NormalizedRecord {
            agent: agent.to_string(),
            team: team.to_string(),
            contacts_processed: processed,
            target,
            deficit: target - processed,
            productivity: prod,
            effective_contacts: 3,
            net_contacts: 2,
            prod_hours: "7:30:00".to_string(),
            level: "L2".to_string(),
            date: "11-11-2025".to_string(),
        }
    }

    #[test]
    fn export_has_header_and_status() {
        let bytes = export_csv_bytes(&[rec("Ann", "UK", 50, 40, 87.5)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Agent,Team,ContactsProcessed,Target,Deficit,Productivity,EffectiveContacts,NetContacts,ProdHours,Level,Date,Status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Ann,UK,50,40,-10,87.5,3,2,7:30:00,L2,11-11-2025,Close"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_export_still_has_header() {
        let text = String::from_utf8(export_csv_bytes(&[]).unwrap()).unwrap();
        assert!(text.starts_with("Agent,Team,"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn export_report_writes_dated_files() {
        let dir = TempDir::new().unwrap();
        let rows = vec![rec("Ann", "UK", 50, 40, 125.0)];
        let summary = summarize(&rows).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 11).unwrap();
        let paths = export_report(dir.path(), &rows, Some(&summary), date).unwrap();
        assert_eq!(paths.csv, dir.path().join("productivity_report_20251111.csv"));
        assert!(paths.csv.exists());
        let json = std::fs::read_to_string(paths.summary.unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_deficit"], -10);
        assert_eq!(value["balance"], "Surplus");
    }

    #[test]
    fn metrics_and_team_rows_are_formatted() {
        let rows = vec![rec("Ann", "UK", 1500, 1000, 125.0), rec("Bo", "UK", 100, 1000, 70.0)];
        let metrics = metrics_rows(&summarize(&rows).unwrap());
        assert_eq!(metrics[0].value, "1,600");
        assert_eq!(metrics[0].detail, "Target: 2,000");
        assert_eq!(metrics[1].metric, "Deficit");
        assert_eq!(metrics[1].value, "400");
        assert_eq!(metrics[2].value, "97.5%");
        assert_eq!(metrics[3].value, "50.0%");
        assert_eq!(metrics[3].detail, "1/2 agents");

        let teams = team_summary_rows(&team_rollup(&rows));
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].total_contacts, "1,600");
        assert_eq!(teams[0].agent_count, "2");
    }

    #[test]
    fn render_table_handles_empty_and_limits() {
        let empty: Vec<AgentDetailRow> = Vec::new();
        assert_eq!(render_table(&empty, None), "(no rows)");
        let details = agent_detail_rows(&[rec("Ann", "UK", 1, 1, 100.0), rec("Bo", "UK", 1, 1, 50.0)]);
        let out = render_table(&details, Some(1));
        assert!(out.contains("Ann"));
        assert!(!out.contains("Bo"));
        assert!(out.contains("Achieved"));
    }
}
