//! Experiment runner: sweep algorithm × strategy × oracle × matrix kind
//! over a dataset, appending one CSV of measurements per configuration.
//!
//! ```text
//! experiment -a greedy -d wishart -m B
//! ```
//!
//! Output lands in `result/<algorithm>/<dataset>/<Strategy>-<Oracle>-<matrix>.csv`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use detmax::io::{load_binary_factor, load_dense, load_symmetric, open_csv, write_csv_row};
use detmax::{
    DenseMatrix, DirectOracle, FastOracle, GramCache, GreedyResult, InterlaceResult, KernelView,
    LazyStrategy, NonLazyStrategy, Param, RunResult, SelectError, greedy, interlace_greedy,
    random_greedy, stochastic_greedy,
};

const USAGE: &str = "Usage: experiment [options]
  -a, --algorithm <name>   greedy | random | stochastic | interlace (default: greedy)
  -d, --data <name>        wishart | wishart_fixed_k | netflix | movie_lens
  -m, --matrix <kind>      B | L (default: B)
  -h, --help               print this message";

const CHANGE_K_TIME_LIMIT: f64 = 3600.0;
const CHANGE_K_STEP: usize = 200;
const CHANGE_N_K: usize = 200;
const CHANGE_N_TIME_LIMIT: f64 = 60.0;
const LADDER_SIZES: usize = 10;

struct Args {
    algorithm: String,
    dataset: String,
    matrix: String,
}

fn parse_args(tokens: &[String]) -> detmax::Result<Option<Args>> {
    let mut algorithm = String::from("greedy");
    let mut dataset = String::new();
    let mut matrix = String::from("B");

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        let mut take = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| SelectError::InvalidParameter(format!("{name} needs a value")))
        };
        match token.as_str() {
            "-a" | "--algorithm" => algorithm = take("--algorithm")?,
            "-d" | "--data" => dataset = take("--data")?,
            "-m" | "--matrix" => matrix = take("--matrix")?,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(None);
            }
            other => {
                return Err(SelectError::InvalidParameter(format!(
                    "unknown option: {other}"
                )));
            }
        }
    }

    if dataset.is_empty() {
        println!("{USAGE}");
        return Ok(None);
    }
    if matrix != "B" && matrix != "L" {
        return Err(SelectError::InvalidParameter(format!(
            "invalid matrix kind {matrix:?}; choose B or L"
        )));
    }

    Ok(Some(Args {
        algorithm,
        dataset,
        matrix,
    }))
}

fn csv_path(algorithm: &str, dataset: &str, strategy: &str, oracle: &str, matrix: &str) -> PathBuf {
    Path::new("result")
        .join(algorithm)
        .join(dataset)
        .join(format!("{strategy}-{oracle}-{matrix}.csv"))
}

/// Uniform view of the three result shapes, mirroring what the sweeps
/// need: a finished flag, the final snapshot, and per-step snapshots.
trait SweepResult {
    fn is_finished(&self) -> bool;
    fn last_run(&self) -> RunResult;
    fn step_count(&self) -> usize;
    fn step(&self, t: usize) -> RunResult;
}

impl SweepResult for GreedyResult {
    fn is_finished(&self) -> bool {
        self.finished
    }
    fn last_run(&self) -> RunResult {
        self.last()
    }
    fn step_count(&self) -> usize {
        self.snapshots()
    }
    fn step(&self, t: usize) -> RunResult {
        self.snapshot(t)
    }
}

impl SweepResult for InterlaceResult {
    fn is_finished(&self) -> bool {
        self.finished
    }
    fn last_run(&self) -> RunResult {
        self.last()
    }
    fn step_count(&self) -> usize {
        self.snapshots()
    }
    fn step(&self, t: usize) -> RunResult {
        self.snapshot(t)
    }
}

impl SweepResult for RunResult {
    fn is_finished(&self) -> bool {
        self.finished
    }
    fn last_run(&self) -> RunResult {
        self.clone()
    }
    fn step_count(&self) -> usize {
        1
    }
    fn step(&self, _t: usize) -> RunResult {
        self.clone()
    }
}

/// One run at `k = n` under the hour budget; a CSV row per prefix size.
fn continuous_change_k<'m, M, R>(
    driver: fn(&'m M, usize, &Param) -> R,
    l: &'m M,
    path: &Path,
    seed: u64,
) -> detmax::Result<()>
where
    M: KernelView,
    R: SweepResult,
{
    let mut csv = open_csv(path)?;
    let param = Param {
        time_limit: CHANGE_K_TIME_LIMIT,
        seed,
        log_offdiagonals: false,
    };

    let result = driver(l, l.n(), &param);
    for t in 0..result.step_count() {
        write_csv_row(&mut csv, seed, l.n(), t, &result.step(t))?;
    }
    Ok(())
}

/// Independent runs for `k = 0, 200, …, n/4`; only finished runs are
/// recorded.
fn discrete_change_k<'m, M>(
    driver: fn(&'m M, usize, &Param) -> RunResult,
    l: &'m M,
    path: &Path,
    seed: u64,
) -> detmax::Result<()>
where
    M: KernelView,
{
    let mut csv = open_csv(path)?;

    let mut k = 0;
    while k <= l.n() / 4 {
        eprintln!("Running k = {k}...");
        let param = Param {
            time_limit: CHANGE_K_TIME_LIMIT,
            seed,
            log_offdiagonals: false,
        };
        let result = driver(l, k, &param);
        if result.finished {
            write_csv_row(&mut csv, seed, l.n(), k, &result)?;
        }
        if result.measurement.time > CHANGE_K_TIME_LIMIT {
            break;
        }
        k += CHANGE_K_STEP;
    }
    Ok(())
}

/// Fixed `k = 200` over the size ladder; stop once a run outgrows the
/// per-size budget.
fn change_n<'m, M, R>(
    driver: fn(&'m M, usize, &Param) -> R,
    views: &'m [M],
    path: &Path,
    seed: u64,
) -> detmax::Result<()>
where
    M: KernelView,
    R: SweepResult,
{
    let mut csv = open_csv(path)?;

    for l in views {
        let param = Param {
            time_limit: f64::INFINITY,
            seed,
            log_offdiagonals: false,
        };
        let result = driver(l, CHANGE_N_K, &param);
        let last = result.last_run();
        if result.is_finished() {
            write_csv_row(&mut csv, seed, l.n(), CHANGE_N_K, &last)?;
        }
        if last.measurement.time > CHANGE_N_TIME_LIMIT {
            break;
        }
    }
    Ok(())
}

/// Run one sweep for all four strategy × oracle combinations. The data
/// expression is evaluated per combination, so caching views start fresh
/// each time.
macro_rules! all_combos {
    ($sweep:ident, $driver:ident, $data:expr, $alg:expr, $dataset:expr, $matrix:expr, $seed:expr) => {{
        $sweep(
            $driver::<LazyStrategy, FastOracle<_>, _>,
            $data,
            &csv_path($alg, $dataset, "Lazy", "Fast", $matrix),
            $seed,
        )?;
        $sweep(
            $driver::<NonLazyStrategy, FastOracle<_>, _>,
            $data,
            &csv_path($alg, $dataset, "NonLazy", "Fast", $matrix),
            $seed,
        )?;
        $sweep(
            $driver::<LazyStrategy, DirectOracle<_>, _>,
            $data,
            &csv_path($alg, $dataset, "Lazy", "Direct", $matrix),
            $seed,
        )?;
        $sweep(
            $driver::<NonLazyStrategy, DirectOracle<_>, _>,
            $data,
            &csv_path($alg, $dataset, "NonLazy", "Direct", $matrix),
            $seed,
        )?;
    }};
}

/// Dispatch one sweep shape over the requested algorithm.
macro_rules! dispatch_algorithm {
    ($algorithm:expr, $continuous:ident, $discrete:ident, $data:expr, $dataset:expr, $matrix:expr, $seed:expr) => {{
        match $algorithm {
            "greedy" => all_combos!($continuous, greedy, $data, "greedy", $dataset, $matrix, $seed),
            "interlace" => all_combos!(
                $continuous,
                interlace_greedy,
                $data,
                "interlace",
                $dataset,
                $matrix,
                $seed
            ),
            "random" => all_combos!(
                $discrete,
                random_greedy,
                $data,
                "random",
                $dataset,
                $matrix,
                $seed
            ),
            "stochastic" => all_combos!(
                $discrete,
                stochastic_greedy,
                $data,
                "stochastic",
                $dataset,
                $matrix,
                $seed
            ),
            other => {
                return Err(SelectError::InvalidParameter(format!(
                    "unknown algorithm: {other}"
                )));
            }
        }
    }};
}

fn run(args: &Args) -> detmax::Result<()> {
    let seed: u64 = rand::random();
    let algorithm = args.algorithm.as_str();
    let dataset = args.dataset.as_str();

    if dataset == "wishart_fixed_k" {
        // Fixed k over the wishart size ladder.
        let matrix = format!("{}-{CHANGE_N_K}", args.matrix);
        if args.matrix == "B" {
            let factors = load_ladder("B.txt", load_dense)?;
            dispatch_algorithm!(
                algorithm,
                change_n,
                change_n,
                &factors.iter().map(GramCache::new).collect::<Vec<_>>()[..],
                dataset,
                &matrix,
                seed
            );
        } else {
            let kernels = load_ladder("L.txt", load_symmetric)?;
            dispatch_algorithm!(algorithm, change_n, change_n, &kernels[..], dataset, &matrix, seed);
        }
        return Ok(());
    }

    let input = if dataset == "wishart" {
        PathBuf::from("data/wishart/6000")
    } else {
        Path::new("data").join(dataset)
    };

    if args.matrix == "B" {
        let load = if dataset == "wishart" {
            load_dense
        } else {
            load_binary_factor
        };
        let b = load(&input.join("B.txt"))?;
        dispatch_algorithm!(
            algorithm,
            continuous_change_k,
            discrete_change_k,
            &GramCache::new(&b),
            dataset,
            "B",
            seed
        );
    } else {
        let l = load_symmetric(&input.join("L.txt"))?;
        dispatch_algorithm!(
            algorithm,
            continuous_change_k,
            discrete_change_k,
            &l,
            dataset,
            "L",
            seed
        );
    }
    Ok(())
}

fn load_ladder(
    file: &str,
    load: fn(&Path) -> detmax::Result<DenseMatrix>,
) -> detmax::Result<Vec<DenseMatrix>> {
    (1..=LADDER_SIZES)
        .map(|i| load(&Path::new("data/wishart").join((i * 1000).to_string()).join(file)))
        .collect()
}

fn main() -> ExitCode {
    let tokens: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&tokens) {
        Ok(Some(args)) => match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
