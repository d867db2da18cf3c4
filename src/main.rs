// Entry point and high-level CLI flow.
//
// - Option [1] loads the GeoJSON feature collection, printing diagnostics.
// - Option [2] compares two periods for a chosen region and exports the
//   comparison table plus a JSON summary.
// - Option [3] builds the Ph3+ trend per country with the CH and bloc
//   averages.
// - After a report, the user can go back to the menu or exit.
use ch_report::config::Config;
use ch_report::hierarchy::RegionHierarchy;
use ch_report::loader::{self, LoadReport};
use ch_report::{aggregate, compare_snapshots, output, report, trend, util};
use ch_report::{EngineError, Feature, PeriodKey, RegionSelection, Result};
use clap::Parser;
use log::{error, info};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

// Simple in-memory app state so the file is parsed once but reports can be
// generated many times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Arc<Dataset>>,
}

struct Dataset {
    features: Vec<Feature>,
    report: LoadReport,
    hierarchy: RegionHierarchy,
}

/// Print a prompt and read one trimmed line. `None` on end of input.
fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_choice() -> Option<String> {
    prompt("Enter choice: ")
}

/// Ask whether to go back to the menu after a report.
///
/// Returns `true` for `Y`, `false` for `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = prompt("Back to Report Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Let the user pick one of `options` by number or by name. Blank input
/// means "none". Outer `None` is end of input.
fn pick_option(title: &str, options: &[&str]) -> Option<Option<String>> {
    if options.is_empty() {
        return Some(None);
    }
    println!("{title} (blank for all):");
    for (idx, opt) in options.iter().enumerate() {
        println!("  [{}] {}", idx + 1, opt);
    }
    loop {
        let input = read_choice()?;
        if input.is_empty() {
            return Some(None);
        }
        if let Ok(n) = input.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Some(Some(options[n - 1].to_string()));
            }
        }
        if let Some(opt) = options.iter().find(|o| o.eq_ignore_ascii_case(&input)) {
            return Some(Some(opt.to_string()));
        }
        println!("Invalid choice. Enter a number from the list or leave blank.");
    }
}

fn pick_period(title: &str, periods: &[PeriodKey], cfg: &Config) -> Option<PeriodKey> {
    println!("{title}:");
    for (idx, p) in periods.iter().enumerate() {
        println!("  [{}] {}", idx + 1, p.label(cfg.locale));
    }
    loop {
        let input = read_choice()?;
        match input.parse::<usize>() {
            Ok(n) if (1..=periods.len()).contains(&n) => return Some(periods[n - 1].clone()),
            _ => match PeriodKey::parse(&input) {
                Ok(key) => {
                    if let Some(found) = periods.iter().find(|p| p.triple() == key.triple()) {
                        return Some(found.clone());
                    }
                    println!("No data for {}.", key.label(cfg.locale));
                }
                Err(e) => println!("{e}"),
            },
        }
    }
}

fn loaded_data() -> Option<Arc<Dataset>> {
    let state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.data.clone()
}

/// Handle option [1]: load the feature collection and keep it in `APP_STATE`.
fn handle_load(cfg: &Config) {
    match loader::load_features(&cfg.data_path) {
        Ok((features, load_report)) => {
            println!(
                "Processing dataset... ({} features loaded, {} skipped)",
                util::format_int(load_report.loaded_features),
                util::format_int(load_report.skipped_features)
            );
            let labels: Vec<String> = load_report
                .periods
                .iter()
                .map(|p| p.label(cfg.locale))
                .collect();
            println!("Periods: {}", labels.join(", "));
            if !load_report.invalid_periods.is_empty() {
                println!(
                    "Note: ignored {} unreadable period keys: {}",
                    load_report.invalid_periods.len(),
                    load_report.invalid_periods.join(", ")
                );
            }
            println!();
            let hierarchy = RegionHierarchy::from_features(&features);
            let mut state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
            state.data = Some(Arc::new(Dataset {
                features,
                report: load_report,
                hierarchy,
            }));
        }
        Err(e) => {
            error!("failed to load {}: {}", cfg.data_path.display(), e);
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn choose_selection(data: &Dataset) -> Option<RegionSelection> {
    let h = &data.hierarchy;
    let admin0 = pick_option("Country (admin0)", &h.admin0_options())?;
    let Some(a0) = admin0 else {
        return Some(RegionSelection::all());
    };
    let admin1 = pick_option("Region (admin1)", &h.admin1_options(&a0))?;
    let Some(a1) = admin1 else {
        return Some(RegionSelection::country(&a0));
    };
    let admin2 = pick_option("District (admin2)", &h.admin2_options(&a0, Some(a1.as_str())))?;
    Some(RegionSelection::new(Some(&a0), Some(&a1), admin2.as_deref()))
}

/// Handle option [2]: compare two periods and export the table.
fn handle_compare(cfg: &Config) -> Result<()> {
    let data = loaded_data().ok_or_else(|| {
        EngineError::MissingData("no data loaded, load the file first (option 1)".to_string())
    })?;
    let periods = &data.report.periods;
    if periods.len() < 2 {
        return Err(EngineError::MissingData(
            "at least two periods are needed for a comparison".to_string(),
        ));
    }
    let Some(first) = pick_period("First period", periods, cfg) else {
        return Ok(());
    };
    let Some(second) = pick_period("Second period", periods, cfg) else {
        return Ok(());
    };
    let Some(selection) = choose_selection(&data) else {
        return Ok(());
    };

    println!("\nGenerating comparison...");
    let groups1 = aggregate(&data.features, &first, &selection);
    let groups2 = aggregate(&data.features, &second, &selection);
    let rows = compare_snapshots(&groups1, &groups2);
    info!(
        "compared {} groups between {} and {}",
        rows.len(),
        first,
        second
    );

    let table = report::comparison_table(&rows, cfg.locale);
    let file = cfg
        .out_dir
        .join(format!("comparison_{}_vs_{}.csv", first.raw(), second.raw()));
    output::write_csv(&file, &table)?;

    println!(
        "Comparison: {} vs {}\n",
        first.label(cfg.locale),
        second.label(cfg.locale)
    );
    output::preview_table_rows(&table, cfg.preview_rows);
    println!("(Full table exported to {})\n", file.display());

    let summary = report::comparison_summary(&first, &second, &selection, &rows);
    let summary_file = cfg.out_dir.join("comparison_summary.json");
    output::write_json(&summary_file, &summary)?;
    println!("Summary Stats ({}):", summary_file.display());
    println!(
        "{{\"ph3_first\": {}, \"ph3_second\": {}, \"changes\": {:?}}}\n",
        util::format_number(summary.total_ph3_first, 0),
        util::format_number(summary.total_ph3_second, 0),
        summary.changes
    );
    Ok(())
}

/// Handle option [3]: Ph3+ share per country over time.
fn handle_trend(cfg: &Config) -> Result<()> {
    let data = loaded_data().ok_or_else(|| {
        EngineError::MissingData("no data loaded, load the file first (option 1)".to_string())
    })?;
    let periods = trend::trend_periods(&data.features, &cfg.skipped_month_indexes());
    if periods.is_empty() {
        return Err(EngineError::MissingData("no period carries Ph3 figures".to_string()));
    }
    let countries = trend::available_countries(&data.features);

    println!("Generating Ph3+ trend...");
    let mut series: Vec<trend::TrendSeries> = countries
        .iter()
        .map(|c| trend::country_series(&data.features, c, &periods))
        .collect();
    let average_label = match cfg.locale {
        ch_report::Locale::En => "CH Average",
        ch_report::Locale::Fr => "Moyenne CH",
    };
    series.push(trend::average_series(
        &data.features,
        countries.as_slice(),
        &periods,
        average_label,
    ));
    series.extend(
        trend::default_blocs()
            .iter()
            .map(|b| trend::bloc_series(&data.features, b, &periods))
            .filter(trend::TrendSeries::has_data),
    );

    let rows = report::trend_rows(&series, &periods, cfg.locale);
    let file = cfg.out_dir.join("ph3_trend.csv");
    output::write_csv(&file, &rows)?;

    println!("Proportion of Population in Phase 3+ by Country\n");
    let (header, body) = report::trend_matrix(&series, &periods, cfg.locale);
    output::preview_matrix(&header, &body, cfg.preview_rows);
    println!("(Full table exported to {})\n", file.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cfg = Config::parse();
    info!("using data file {}", cfg.data_path.display());

    loop {
        println!("Select Report:");
        println!("[1] Load the file");
        println!("[2] Compare two periods");
        println!("[3] Ph3+ trend by country\n");
        let Some(choice) = read_choice() else {
            println!("Exiting the program.");
            break;
        };
        let result = match choice.as_str() {
            "1" => {
                handle_load(&cfg);
                continue;
            }
            "2" => {
                println!();
                handle_compare(&cfg)
            }
            "3" => {
                println!();
                handle_trend(&cfg)
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
                continue;
            }
        };
        if let Err(e) = result {
            error!("{e}");
            println!("Error: {e}\n");
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
}
