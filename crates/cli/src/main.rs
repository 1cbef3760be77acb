mod args;
mod config;
mod export;
mod provenance;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dpw::{DieCalculator, ValidationPolicy};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use args::ParamArgs;
use export::Format;

#[derive(Parser)]
#[command(name = "dpw", version)]
#[command(about = "Die-per-wafer calculator")]
struct Cmd {
    /// Debug-level logs on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Count dies for one parameter set
    Calc {
        #[command(flatten)]
        params: ParamArgs,
        /// Print a JSON summary instead of the text line
        #[arg(long)]
        json: bool,
        /// Export every candidate position as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Export every candidate position as Parquet
        #[arg(long)]
        parquet: Option<PathBuf>,
        /// Append optimization suggestions
        #[arg(long)]
        advice: bool,
    },
    /// Run several validation methods on one parameter set
    Compare {
        #[command(flatten)]
        params: ParamArgs,
        /// Comma-separated subset of methods; all four when omitted
        #[arg(long, value_delimiter = ',')]
        methods: Vec<ValidationPolicy>,
        #[arg(long)]
        json: bool,
    },
    /// Sweep parameter rows from a CSV file
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Plain full-grid scan with the strip area
        #[arg(long)]
        reference: bool,
    },
    /// List wafer presets, scribe presets and validation methods
    Presets {
        #[arg(long)]
        json: bool,
    },
    /// Write the default JSON config file
    InitConfig {
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else if cmd.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cmd.action {
        Action::Calc {
            params,
            json,
            csv,
            parquet,
            advice,
        } => calc(&params, json, csv, parquet, advice),
        Action::Compare {
            params,
            methods,
            json,
        } => compare(&params, &methods, json),
        Action::Batch {
            input,
            out,
            reference,
        } => {
            let calc = if reference {
                DieCalculator::reference()
            } else {
                DieCalculator::default()
            };
            let rows = export::run_batch(&calc, &input, &out)?;
            println!("{rows} rows written to {}", out.display());
            Ok(())
        }
        Action::Presets { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report::presets_json())?);
            } else {
                print!("{}", report::presets_text());
            }
            Ok(())
        }
        Action::InitConfig { file, force } => {
            config::init(&file, force)?;
            println!("wrote {}", file.display());
            Ok(())
        }
    }
}

fn calc(
    args: &ParamArgs,
    json: bool,
    csv: Option<PathBuf>,
    parquet: Option<PathBuf>,
    advice: bool,
) -> Result<()> {
    let params = args.resolve()?;
    let result = DieCalculator::new(args.engine_cfg()).calculate_params(&params)?;
    if json {
        let summary = report::Summary::new(&result, advice);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report::text_line(&result));
        if advice {
            for hint in dpw::advice::suggestions(&result) {
                println!("- {hint}");
            }
        }
    }
    if let Some(path) = csv {
        export::export_positions(&result, &path, Format::Csv)?;
    }
    if let Some(path) = parquet {
        export::export_positions(&result, &path, Format::Parquet)?;
    }
    Ok(())
}

fn compare(args: &ParamArgs, methods: &[ValidationPolicy], json: bool) -> Result<()> {
    let params = args.resolve()?;
    // Surface validation errors here; `compare` only logs them.
    params.validate()?;
    let calc = DieCalculator::new(args.engine_cfg());
    let results = if methods.is_empty() {
        calc.compare(&params)
    } else {
        calc.compare_methods(&params, methods)
    };
    if results.is_empty() {
        bail!("no validation method produced a result");
    }
    if json {
        let doc: serde_json::Map<_, _> = results
            .iter()
            .map(|(policy, r)| {
                serde_json::to_value(report::Summary::new(r, false))
                    .map(|v| (policy.to_string(), v))
            })
            .collect::<Result<_, _>>()?;
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for r in results.values() {
            println!("{}", report::text_line(r));
        }
    }
    Ok(())
}
