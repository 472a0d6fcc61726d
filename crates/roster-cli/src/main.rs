// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result, anyhow};
use config::Config;
use roster_app::{ActiveSort, PatientTable, SortColumn, SortDirection};
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `roster --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let patients_path = resolve_patients_path(&options, &config)?;
    if options.print_patients_path {
        if let Some(path) = &patients_path {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let interactive = !(options.dump || options.check_only);
    logging::init(config.log_level(), config.log_file().as_deref(), interactive)?;

    let patients = match patients_path {
        None => roster_testkit::demo_patients(),
        Some(path) => roster_data::load_patients(&path).with_context(|| {
            format!(
                "load patients {} -- set [data].patients_path or ROSTER_PATIENTS_PATH, or pass --demo",
                path.display()
            )
        })?,
    };

    let mut table = PatientTable::new(patients).with_display_offset(config.utc_offset()?);
    if let Some(query) = &options.search {
        table.set_search(query);
    }
    if let Some(sort) = options.sort {
        apply_initial_sort(&mut table, sort);
    }

    if options.check_only {
        info!(
            patients = table.all_records().len(),
            shown = table.records().len(),
            "startup check passed"
        );
        return Ok(());
    }

    if options.dump {
        print!("{}", roster_tui::render_plain(&table));
        return Ok(());
    }

    let view = roster_tui::ViewOptions {
        title: if options.demo {
            "Patients (demo)".to_owned()
        } else {
            "Patients".to_owned()
        },
        page_size: config.page_size(),
    };
    roster_tui::run_app(&mut table, &view)
}

/// The patients file path, or `None` for a demo run that never reads it.
fn resolve_patients_path(options: &CliOptions, config: &Config) -> Result<Option<PathBuf>> {
    if options.demo && !options.print_patients_path {
        return Ok(None);
    }
    let path = match &options.patients_path {
        Some(path) => {
            roster_data::validate_patients_path(path)?;
            PathBuf::from(path)
        }
        None => config.patients_path()?,
    };
    Ok(Some(path))
}

/// Replays header clicks until the table holds `target`.
fn apply_initial_sort(table: &mut PatientTable, target: ActiveSort) {
    table.on_column_header_click(target.column);
    if table.sort() != Some(target) {
        table.on_column_header_click(target.column);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    patients_path: Option<String>,
    print_config_path: bool,
    print_patients_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    dump: bool,
    search: Option<String>,
    sort: Option<ActiveSort>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        patients_path: None,
        print_config_path: false,
        print_patients_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        dump: false,
        search: None,
        sort: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--patients" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--patients requires a file path"))?;
                options.patients_path = Some(value.as_ref().to_owned());
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires a name fragment"))?;
                options.search = Some(value.as_ref().to_owned());
            }
            "--sort" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--sort requires a column, for example name:desc"))?;
                options.sort = Some(parse_sort_arg(value.as_ref())?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_patients_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--dump" => {
                options.dump = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn parse_sort_arg(raw: &str) -> Result<ActiveSort> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (column, Some(direction)),
        None => (raw, None),
    };

    let column = SortColumn::parse(column).ok_or_else(|| {
        anyhow!(
            "unknown sort column {column:?}; use one of name, start_date, end_date, procedure, surgeon, provider, adherence, rom"
        )
    })?;
    let direction = match direction {
        Some(direction) => SortDirection::parse(direction)
            .ok_or_else(|| anyhow!("unknown sort direction {direction:?}; use asc or desc"))?,
        None => SortDirection::Asc,
    };
    Ok(ActiveSort::new(column, direction))
}

fn print_help() {
    println!("roster");
    println!("  --config <path>          Use a specific config path");
    println!("  --patients <path>        Load patients from a JSON file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved patients path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Use generated demo patients");
    println!("  --check                  Validate config and patient data, then exit");
    println!("  --dump                   Print the table as plain text");
    println!("  --search <text>          Start with a name filter");
    println!("  --sort <column[:dir]>    Start sorted, for example adherence:desc");
    println!("  --help                   Show this help");
}
