// Entry point and interactive terminal flow.
//
// - The risk table is loaded once at startup; if it is missing the program
//   stops with a message naming the file.
// - The user picks a region, then an item grown in that region.
// - The report for that pair is rebuilt from scratch and printed, after
//   which the user can pick again, print the report as JSON, or exit.
mod app;
mod config;
mod error;
mod loader;
mod logging;
mod output;
mod reports;
mod resolver;
mod schema;
mod types;
mod util;

use app::App;
use chrono::Local;
use config::AppConfig;
use output::RenderOptions;
use std::io::{self, Write};
use std::process::ExitCode;
use types::Report;

/// Read a single trimmed line after printing `prompt`.
///
/// Returns `None` once stdin is closed.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Print a numbered menu and return the chosen entry.
fn choose<'a>(title: &str, options: &'a [String]) -> Option<&'a str> {
    println!("{}", title);
    for (idx, opt) in options.iter().enumerate() {
        println!("[{}] {}", idx + 1, opt);
    }
    loop {
        let input = read_line("Enter choice: ")?;
        match input.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Some(options[n - 1].as_str()),
            _ => println!("Invalid choice. Please enter a number from 1 to {}.", options.len()),
        }
    }
}

/// Ask a Y/N question; `None` once stdin is closed.
fn prompt_yes_no(question: &str) -> Option<bool> {
    loop {
        let resp = read_line(&format!("{} (Y/N): ", question))?.to_uppercase();
        match resp.as_str() {
            "Y" => return Some(true),
            "N" => return Some(false),
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

enum NextStep {
    Select,
    Exit,
}

fn after_report(report: &Report) -> NextStep {
    loop {
        println!("[1] Back to selection");
        println!("[2] Print this report as JSON");
        println!("[3] Exit\n");
        match read_line("Enter choice: ").as_deref() {
            Some("1") => return NextStep::Select,
            Some("2") => match output::render_json(report) {
                Ok(json) => println!("{}\n", json),
                Err(e) => eprintln!("Could not serialize report: {}\n", e),
            },
            Some("3") | None => return NextStep::Exit,
            Some(_) => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

/// One pass of region -> item -> report. `None` when the user is done.
fn run_selection(app: &mut App) -> Option<NextStep> {
    let regions = match app.regions() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            return Some(NextStep::Exit);
        }
    };
    if regions.is_empty() {
        println!("The risk table has no regions to select.\n");
        return Some(NextStep::Exit);
    }
    let region = choose("\n1. Select a region.", &regions)?.to_string();

    let items = match app.items(&region) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            return Some(NextStep::Select);
        }
    };
    if items.is_empty() {
        println!("No items are recorded for {}.\n", region);
        return Some(NextStep::Select);
    }
    let item = choose("\n2. Select your main item.", &items)?.to_string();
    let expand_details = prompt_yes_no("Show type descriptions and financial strategies?")?;

    let report = match app.report(&region, &item) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            return Some(NextStep::Select);
        }
    };
    let opts = RenderOptions {
        generated_at: Local::now().naive_local(),
        expand_details,
    };
    println!();
    println!("{}", output::render_text(&report, &opts));
    Some(after_report(&report))
}

fn main() -> ExitCode {
    logging::init();

    println!("NH Agricultural Risk Diagnosis");
    println!(
        "Analyses the strengths and weaknesses of your farm from data and points the way \
         to sustainable growth.\n"
    );

    let config = AppConfig::default();
    let mut app = match App::open(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Risk table loaded ({} rows).\n",
        util::format_int(app.risk_rows())
    );
    println!("{}", output::sidebar_note());

    loop {
        match run_selection(&mut app) {
            Some(NextStep::Select) => continue,
            Some(NextStep::Exit) | None => {
                println!("Exiting the program.");
                return ExitCode::SUCCESS;
            }
        }
    }
}
