// Entry point and terminal front end.
//
// Two ways to drive the dashboard:
// - `--batch` loads the given files, processes once, prints the dashboard
//   and writes the export.
// - Otherwise a numbered menu mirrors the upload / process / filter / export
//   flow of the browser dashboard.
use anyhow::{bail, Context, Result};
use clap::Parser;
use prod_dashboard::config::{Config, Settings};
use prod_dashboard::logging;
use prod_dashboard::normalize::NormalizeReport;
use prod_dashboard::output;
use prod_dashboard::session::Session;
use prod_dashboard::util::{format_int, today};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// One trimmed line from `reader`, or `None` once input is closed.
fn next_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Print `prompt` and read one trimmed line from stdin.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    next_line(&mut io::stdin().lock())
}

fn read_choice() -> Option<String> {
    read_line("Enter choice: ")
}

/// Ask for a path, offering `current` as the default.
fn prompt_path(label: &str, current: Option<&Path>) -> Option<PathBuf> {
    let prompt = match current {
        Some(p) => format!("{} [{}]: ", label, p.display()),
        None => format!("{}: ", label),
    };
    let input = read_line(&prompt)?;
    if input.is_empty() {
        current.map(Path::to_path_buf)
    } else {
        Some(PathBuf::from(input))
    }
}

fn handle_load_production(session: &mut Session, settings: &Settings) {
    let Some(path) = prompt_path("Production CSV", settings.production.as_deref()) else {
        println!("No file given.\n");
        return;
    };
    match session.load_production(&path) {
        Ok(rows) => println!("Loaded {} records.\n", format_int(rows)),
        Err(e) => println!("Error reading file: {}\n", e),
    }
}

fn handle_load_lookup(session: &mut Session) {
    let Some(path) = prompt_path("Lookup CSV (blank to clear)", None) else {
        session.clear_lookup();
        println!("Lookup cleared; every agent will use the fallback team.\n");
        return;
    };
    match session.load_lookup(&path) {
        Ok(entries) => println!("Loaded {} lookup records.\n", format_int(entries)),
        Err(e) => println!("Error reading file: {}\n", e),
    }
}

fn print_report(session: &Session, report: &NormalizeReport) {
    println!(
        "Processed {} rows: {} agents kept, {} rows without a name skipped.",
        format_int(report.total_rows),
        format_int(report.kept_rows),
        format_int(report.skipped_rows)
    );
    if report.fallback_team_rows > 0 {
        println!(
            "Info: {} agents assigned to fallback team {}.",
            format_int(report.fallback_team_rows),
            session.config().fallback_team
        );
    }
    println!();
}

fn handle_process(session: &mut Session) {
    match session.process() {
        Ok(report) => print_report(session, &report),
        Err(e) => println!("Error: {}\n", e),
    }
}

fn choose_from(label: &str, options: &[String]) -> Option<String> {
    println!("{}:", label);
    for (idx, opt) in options.iter().enumerate() {
        println!("  [{}] {}", idx, opt);
    }
    let input = read_choice()?;
    match input.parse::<usize>() {
        Ok(idx) if idx < options.len() => Some(options[idx].clone()),
        _ => {
            println!("Invalid choice.\n");
            None
        }
    }
}

fn handle_filter(session: &mut Session) {
    let teams = match session.team_options() {
        Ok(t) => t,
        Err(e) => {
            println!("Error: {}\n", e);
            return;
        }
    };
    let Some(team) = choose_from("Select Team", &teams) else {
        return;
    };
    if let Err(e) = session.select_team(&team) {
        println!("Error: {}\n", e);
        return;
    }
    let agents = match session.agent_options() {
        Ok(a) => a,
        Err(e) => {
            println!("Error: {}\n", e);
            return;
        }
    };
    if let Some(agent) = choose_from("Select Agent", &agents) {
        if let Err(e) = session.select_agent(&agent) {
            println!("Error: {}\n", e);
            return;
        }
    }
    let sel = session.selection();
    println!("Filter: team {}, agent {}\n", sel.team, sel.agent);
}

fn show_dashboard(session: &Session) -> prod_dashboard::Result<()> {
    let rows = session.filtered()?;
    if rows.is_empty() {
        println!("No agents match the current selection.\n");
        return Ok(());
    }
    let summary = session.summary()?;
    output::preview_table("Key Metrics", &output::metrics_rows(&summary), None);

    let sel = session.selection();
    if sel.team.is_all() && sel.agent.is_all() {
        let rollup = session.team_rollup()?;
        output::preview_table("Team Summary", &output::team_summary_rows(&rollup), None);
    }
    output::preview_table(
        "Detailed Agent Performance",
        &output::agent_detail_rows(&rows),
        None,
    );
    Ok(())
}

fn export(session: &Session, dir: &Path) -> prod_dashboard::Result<output::ExportPaths> {
    let rows = session.filtered()?;
    let summary = session.summary().ok();
    Ok(output::export_report(dir, &rows, summary.as_ref(), today())?)
}

fn handle_export(session: &Session, settings: &Settings) {
    match export(session, &settings.export_dir) {
        Ok(paths) => {
            println!("Report exported to {}", paths.csv.display());
            if let Some(p) = paths.summary {
                println!("Summary written to {}", p.display());
            }
            println!();
        }
        Err(e) => println!("Export failed: {}\n", e),
    }
}

fn run_menu(session: &mut Session, settings: &Settings) {
    loop {
        println!("Productivity Dashboard");
        println!("[1] Load production data");
        println!("[2] Load lookup data");
        println!("[3] Process data");
        println!("[4] Select team / agent");
        println!("[5] Show dashboard");
        println!("[6] Export report");
        println!("[0] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load_production(session, settings),
            "2" => handle_load_lookup(session),
            "3" => handle_process(session),
            "4" => handle_filter(session),
            "5" => {
                if let Err(e) = show_dashboard(session) {
                    println!("Error: {}\n", e);
                }
            }
            "6" => handle_export(session, settings),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-6.\n"),
        }
    }
}

fn run_batch(session: &mut Session, settings: &Settings) -> Result<()> {
    let Some(production) = settings.production.as_deref() else {
        bail!("--batch requires --production");
    };
    session
        .load_production(production)
        .with_context(|| format!("loading {}", production.display()))?;
    if let Some(lookup) = settings.lookup.as_deref() {
        session
            .load_lookup(lookup)
            .with_context(|| format!("loading {}", lookup.display()))?;
    }
    let report = session.process()?;
    print_report(session, &report);
    session.select_team(&settings.team)?;
    session.select_agent(&settings.agent)?;
    show_dashboard(session)?;
    let paths = export(session, &settings.export_dir)?;
    println!("Report exported to {}", paths.csv.display());
    Ok(())
}

fn main() -> Result<()> {
    let settings = Settings::parse();
    logging::init(&settings.log_level);

    let config = Config::load_or_default(settings.config.as_deref())
        .context("loading configuration")?;
    if !settings.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }
    let mut session = Session::new(config).with_delimiter(settings.delimiter as u8);

    if settings.batch {
        return run_batch(&mut session, &settings);
    }

    if let Some(path) = settings.production.as_deref() {
        if let Err(e) = session.load_production(path) {
            println!("Error reading file: {}\n", e);
        }
    }
    if let Some(path) = settings.lookup.as_deref() {
        if let Err(e) = session.load_lookup(path) {
            println!("Error reading file: {}\n", e);
        }
    }
    run_menu(&mut session, &settings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn next_line_trims_input() {
        let mut input = Cursor::new("  3 \n\n");
        assert_eq!(next_line(&mut input), Some("3".to_string()));
        assert_eq!(next_line(&mut input), Some(String::new()));
    }

    #[test]
    fn next_line_is_none_at_end_of_input() {
        let mut input = Cursor::new("0");
        assert_eq!(next_line(&mut input), Some("0".to_string()));
        assert_eq!(next_line(&mut input), None);
        assert_eq!(next_line(&mut Cursor::new("")), None);
    }
}
