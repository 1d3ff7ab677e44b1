//! DBSCAN step-through tool
//!
//! Generates two blobs of points (or reads them from CSV), runs DBSCAN one unit
//! of work per clock tick while logging progress, and writes every point with
//! its final label as CSV.

use clap::Parser;
use csv::{ReaderBuilder, WriterBuilder};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use dbscan_stepper::cluster::{
    Bounds, CanvasScale, ClusterSimulator, PointList, RunState, SearchStrategy, SimConfig,
    StepEvent, Summary, adjusted_target, bounding_box, generate,
};
use dbscan_stepper::{Driver, Error, Point, Result};


#[derive(Parser)]
#[command(name = "dbscan_stepper")]
#[command(about = "Step-by-step DBSCAN clustering simulator", long_about = None)]
struct Args {
    /// Input CSV file with x,y columns (default: generate points)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output CSV file with labeled points (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// DBSCAN epsilon parameter (default: derived from canvas size)
    #[arg(short, long)]
    eps: Option<f64>,

    /// DBSCAN minPoints parameter (neighbours including the point itself)
    #[arg(short = 'm', long, default_value_t = 4)]
    min_points: usize,

    /// Number of points to generate
    #[arg(short = 'n', long, default_value_t = 100)]
    points: usize,

    /// Canvas width
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height
    #[arg(long, default_value_t = 430.0)]
    height: f64,

    /// Seed for point generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Neighbour search backend
    #[arg(long, value_enum, default_value_t = SearchStrategy::BruteForce)]
    search: SearchStrategy,

    /// Clock interval between ticks in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Settle delay after each unit of work in milliseconds
    #[arg(long, default_value_t = 300)]
    settle_ms: u64,

    /// Run to completion without pacing
    #[arg(long)]
    instant: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.debug { "debug" } else { "info" }));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let canvas = Bounds::canvas(args.width, args.height);
    canvas.validate()?;
    let scale = CanvasScale::for_canvas(args.width, args.height);

    let points = match &args.input {
        Some(path) => {
            let points = read_points(path)?;
            if let Some(bounds) = bounding_box(&points) {
                info!(points = points.len(), ?bounds, "read points from {:?}", path);
            }
            points
        }
        None => {
            let gen_config = scale.generator_config();
            let target = adjusted_target(args.points, canvas, &gen_config);
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let points = generate(target, canvas, &gen_config, &mut rng);
            info!(points = points.len(), requested = args.points, "generated points");
            points
        }
    };

    let config = SimConfig::new(args.eps.unwrap_or(scale.epsilon), args.min_points)
        .with_search(args.search);
    config.validate()?;
    info!(
        eps = config.epsilon,
        min_points = config.min_points,
        search = ?config.search,
        "running DBSCAN"
    );

    let mut sim = ClusterSimulator::new(points, config);
    if args.instant {
        sim.reset();
        let steps = sim.run_to_completion();
        debug!(steps, "run finished");
    } else {
        sim = drive(
            sim,
            Duration::from_millis(args.tick_ms),
            Duration::from_millis(args.settle_ms),
        )
        .into_simulator();
    }

    let summary = sim.summary();
    log_summary(&summary, sim.points());

    match &args.output {
        None => write_labeled_points(io::stdout(), sim.points())?,
        Some(path) => {
            write_labeled_points(File::create(path)?, sim.points())?;
            info!("labeled points written to {:?}", path);
        }
    }
    Ok(())
}

/// Plays the host clock: one tick per interval until the run completes
fn drive(sim: ClusterSimulator, tick: Duration, settle: Duration) -> Driver {
    let mut driver = Driver::new(sim, settle);
    driver.start();

    loop {
        if let Some(report) = driver.tick(Instant::now()) {
            for event in &report.events {
                log_event(event);
            }
            let progress = driver.progress();
            info!(percent = progress.percent, "{}", progress.label);
        }
        if driver.run_state() == RunState::Idle {
            break;
        }
        thread::sleep(tick);
    }

    if driver.skipped_ticks() > 0 {
        debug!(skipped = driver.skipped_ticks(), "ticks skipped while settling");
    }
    driver
}

fn log_event(event: &StepEvent) {
    match event {
        StepEvent::CoreChecked {
            index,
            neighbors,
            core,
        } => debug!(index, neighbors, core, "checked point"),
        StepEvent::ClusterFormed { id, size } => debug!(id, size, "formed cluster"),
        StepEvent::BorderAssigned { index, label } => {
            debug!(index, label = label.as_i64(), "assigned point")
        }
        StepEvent::PhaseChanged { from, to } => debug!(?from, ?to, "phase changed"),
    }
}

fn log_summary(summary: &Summary, points: &[Point]) {
    info!(
        clusters = summary.clusters.len(),
        noise = summary.noise.len(),
        core = summary.core,
        "clustering finished"
    );
    for cluster in &summary.clusters {
        if let Some((center, bounds)) = cluster.centroid_and_bounds(points) {
            debug!(
                id = cluster.c,
                size = cluster.points.len(),
                ?center,
                ?bounds,
                "cluster"
            );
        }
    }
}

/// Reads points from a CSV file
///
/// Expected format: `x,y` (header row is optional, extra columns are ignored).
/// Rows with NaN or infinite coordinates are skipped.
fn read_points(path: &Path) -> Result<PointList> {
    parse_points(File::open(path)?)
}

fn parse_points<R: Read>(reader: R) -> Result<PointList> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut points = PointList::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            continue;
        }

        let x = record[0].trim().parse::<f64>();
        let y = record[1].trim().parse::<f64>();
        match (x, y) {
            (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => points.push(Point::new(x, y)),
            // Header row
            _ if row == 0 => continue,
            _ => debug!(row, "skipping unparsable row"),
        }
    }

    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(points)
}

/// Writes points as `x,y,label,core`, label being the cluster id or -1 for noise
fn write_labeled_points<W: Write>(out: W, points: &[Point]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(["x", "y", "label", "core"])?;
    for p in points {
        writer.write_record([
            p.x.to_string(),
            p.y.to_string(),
            p.label.as_i64().to_string(),
            p.core.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
