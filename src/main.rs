use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use retail_rank::engine::errors::PipelineError;
use retail_rank::engine::export::{
    CsvExporter, count_by_key, total_by, write_series_csv,
};
use retail_rank::engine::index::{BulkLoader, IndexMapping, NdjsonBulkWriter};
use retail_rank::engine::pipeline::{Pipeline, RunReport};
use retail_rank::engine::source::{ColumnLayout, DelimitedSource};
use retail_rank::jobs::{self, Chart, JobDefinition, JobKind};
use retail_rank::logging;
use retail_rank::shared::config::{InputConfig, JobsConfig, Settings, load_settings};
use tracing::info;

#[derive(Parser)]
#[command(name = "retail_rank")]
#[command(about = "Filter, aggregate and rank retail order extracts", long_about = None)]
struct Cli {
    /// Configuration file. Defaults to $RETAIL_RANK_CONFIG, then ./config.toml
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one ranking job
    Run(RunArgs),
    /// Type order rows for the search index and write the bulk request body
    Index(IndexArgs),
    /// List the available jobs
    Jobs,
}

#[derive(Args)]
struct InputArgs {
    /// Input file; give several to aggregate them as parallel shards
    #[arg(short, long = "input")]
    inputs: Vec<PathBuf>,

    /// Field separator of the input files
    #[arg(short, long)]
    delimiter: Option<char>,
}

#[derive(Args)]
struct RunArgs {
    #[arg(value_enum)]
    job: JobKind,

    #[command(flatten)]
    input: InputArgs,

    /// Result table (CSV). Printed to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chart series (CSV), for jobs that produce one
    #[arg(long)]
    chart_output: Option<PathBuf>,

    /// Number of ranked entries kept
    #[arg(short, long)]
    bound: Option<usize>,

    /// Sample fraction, for sampling jobs
    #[arg(long)]
    fraction: Option<f64>,

    /// Sample seed, for sampling jobs
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    year_min: Option<i32>,

    #[arg(long)]
    year_max: Option<i32>,

    /// Two-digit postal department; repeat for several
    #[arg(long = "department")]
    departments: Vec<String>,

    /// Year matched in the order date, for the city job
    #[arg(long)]
    year: Option<String>,

    /// City matched case-insensitively, for the city job
    #[arg(long)]
    city: Option<String>,
}

#[derive(Args)]
struct IndexArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Bulk request body (NDJSON). Printed to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the index-creation body here
    #[arg(long)]
    mapping_output: Option<PathBuf>,

    #[arg(long)]
    index: Option<String>,

    #[arg(long)]
    batch_size: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).context("loading configuration")?;
    logging::init(&settings.logging)?;

    match cli.command {
        Command::Run(args) => cmd_run(settings, args),
        Command::Index(args) => cmd_index(&settings, args),
        Command::Jobs => {
            for kind in JobKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
    }
}

fn apply_overrides(jobs: &mut JobsConfig, kind: JobKind, args: &RunArgs) {
    let departments = (!args.departments.is_empty()).then(|| args.departments.clone());
    match kind {
        JobKind::TopOrders => {
            let cfg = &mut jobs.top_orders;
            override_input(&mut cfg.input, &args.input);
            set(&mut cfg.bound, args.bound);
            set(&mut cfg.year_min, args.year_min);
            set(&mut cfg.year_max, args.year_max);
            set(&mut cfg.departments, departments);
        }
        JobKind::SampledOrders => {
            let cfg = &mut jobs.sampled_orders;
            override_input(&mut cfg.input, &args.input);
            set(&mut cfg.bound, args.bound);
            set(&mut cfg.year_min, args.year_min);
            set(&mut cfg.year_max, args.year_max);
            set(&mut cfg.departments, departments);
            set(&mut cfg.fraction, args.fraction);
            set(&mut cfg.seed, args.seed);
        }
        JobKind::BestCityOrder => {
            let cfg = &mut jobs.best_city_order;
            override_input(&mut cfg.input, &args.input);
            set(&mut cfg.bound, args.bound);
            set(&mut cfg.year, args.year.clone());
            set(&mut cfg.city, args.city.clone());
        }
        JobKind::OrdersByYear => {
            let cfg = &mut jobs.orders_by_year;
            override_input(&mut cfg.input, &args.input);
            set(&mut cfg.year_min, args.year_min);
            set(&mut cfg.year_max, args.year_max);
        }
        JobKind::TopClient => {
            let cfg = &mut jobs.top_client;
            override_input(&mut cfg.input, &args.input);
            set(&mut cfg.bound, args.bound);
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn override_input(input: &mut InputConfig, args: &InputArgs) {
    if !args.inputs.is_empty() {
        input.paths = args
            .inputs
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
    }
    set(&mut input.delimiter, args.delimiter);
}

fn open_sources(input: &InputConfig) -> anyhow::Result<Vec<DelimitedSource<File>>> {
    if input.paths.is_empty() {
        bail!("no input file given (use --input or set the job's input.paths)");
    }
    if !input.delimiter.is_ascii() {
        bail!("delimiter {:?} is not a single byte", input.delimiter);
    }
    let layout = if input.columns.is_empty() {
        ColumnLayout::Header
    } else {
        ColumnLayout::Fixed(input.columns.clone())
    };
    input
        .paths
        .iter()
        .map(|path| {
            DelimitedSource::from_path(path, input.delimiter as u8, layout.clone())
                .with_context(|| format!("opening {path}"))
        })
        .collect()
}

fn output_writer(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn cmd_run(mut settings: Settings, args: RunArgs) -> anyhow::Result<()> {
    apply_overrides(&mut settings.jobs, args.job, &args);
    let definition = jobs::build(args.job, &settings.jobs);
    let JobDefinition {
        spec,
        schema,
        chart,
        input,
        ..
    } = definition;

    let mut sources = open_sources(&input)?;
    let mut exporter = CsvExporter::new(output_writer(args.output.as_deref())?, schema);
    let pipeline = Pipeline::new(spec);

    info!(job = %args.job, shards = sources.len(), "Starting job");
    let outcome = if sources.len() == 1 {
        let source = sources.remove(0);
        pipeline.run(source, &mut exporter)
    } else {
        pipeline.run_sharded(sources, &mut exporter)
    };

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            err.log_error();
            if let PipelineError::Export { report, .. } = &err {
                eprintln!("{}: {}", report.job, report.summary);
            }
            return Err(err.into());
        }
    };

    if let (Some(chart), Some(path)) = (chart, args.chart_output.as_deref()) {
        write_chart(&chart, &report, path)?;
    }
    eprintln!("{}: {}", report.job, report.summary);
    Ok(())
}

fn write_chart(chart: &Chart, report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let series = match chart {
        Chart::TotalBy { descriptive, sum } => total_by(&report.results, descriptive, sum)?,
        Chart::CountByKey { label } => count_by_key(&report.results, label),
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_series_csv(BufWriter::new(file), &series)?;
    info!(path = %path.display(), points = series.points.len(), "Wrote chart series");
    Ok(())
}

fn cmd_index(settings: &Settings, args: IndexArgs) -> anyhow::Result<()> {
    let mut input = InputConfig::default();
    override_input(&mut input, &args.input);
    let index = args.index.unwrap_or_else(|| settings.index.name.clone());
    let batch_size = args.batch_size.unwrap_or(settings.index.batch_size);
    let mapping = IndexMapping::orders();

    if let Some(path) = &args.mapping_output {
        let body = mapping.to_json(settings.index.shards, settings.index.replicas);
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &body)?;
    }

    let loader = BulkLoader::new(index).with_batch_size(batch_size);
    let mut writer = NdjsonBulkWriter::new(output_writer(args.output.as_deref())?);
    for source in open_sources(&input)? {
        match loader.load(source, &mapping, &mut writer) {
            Ok(summary) => eprintln!(
                "{}: read={} indexed={} failed={} malformed={} batches={}",
                loader.index(),
                summary.records_read,
                summary.indexed,
                summary.failed,
                summary.malformed,
                summary.batches
            ),
            Err(err) => {
                err.log_error();
                return Err(err.into());
            }
        }
    }
    Ok(())
}
