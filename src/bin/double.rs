//! Unconstrained double-greedy runner.
//!
//! Obtains a dataset's kernel `L` (loading `L.txt`, or computing and
//! saving it from `B.txt`), obtains its inverse the same way, then runs
//! double greedy with both oracles and appends the measurements to
//! `result/double/<dataset>/{Fast,Direct}.csv`.

use std::path::Path;
use std::process::ExitCode;

use detmax::io::{
    load_binary_factor, load_dense, load_symmetric, open_csv, save_symmetric, write_csv_row,
};
use detmax::{
    DenseMatrix, DirectOracle, FastOracle, Param, SelectError, Timer, double_greedy, linalg,
};

const USAGE: &str = "Usage: double [options]
  -d, --data <name>    netflix | movie_lens | wishart
  -i, --blend-identity use 0.9*L + 0.1*I instead of L
  -h, --help           print this message";

const TIME_LIMIT: f64 = 86_400.0;

fn obtain_kernel(input_dir: &Path, dense_factor: bool) -> detmax::Result<DenseMatrix> {
    let kernel_path = input_dir.join("L.txt");
    if kernel_path.exists() {
        return load_symmetric(&kernel_path);
    }

    let factor_path = input_dir.join("B.txt");
    let b = if dense_factor {
        load_dense(&factor_path)?
    } else {
        load_binary_factor(&factor_path)?
    };

    eprintln!("Computing L = B^T B");
    let timer = Timer::new();
    let l = b.gram();
    eprintln!("Time: {}", timer.elapsed());
    save_symmetric(&l, &kernel_path, false)?;
    Ok(l)
}

fn obtain_inverse(
    input_dir: &Path,
    x: &DenseMatrix,
    matrix_name: &str,
) -> detmax::Result<DenseMatrix> {
    let path = input_dir.join(format!("{matrix_name}_inv.txt"));
    if path.exists() {
        return load_symmetric(&path);
    }

    eprintln!("Computing inv({matrix_name})");
    let timer = Timer::new();
    let x_inv = linalg::inverse(x).ok_or(SelectError::SingularMatrix)?;
    eprintln!("Time: {}", timer.elapsed());
    save_symmetric(&x_inv, &path, true)?;
    Ok(x_inv)
}

fn experiment(dataset: &str, dense_factor: bool, blend_identity: bool) -> detmax::Result<()> {
    let input_dir = Path::new("data").join(dataset);
    let output_dir = Path::new("result/double").join(dataset);

    let l = obtain_kernel(&input_dir, dense_factor)?;
    let (x, matrix_name) = if blend_identity {
        (l.blended_with_identity(0.9, 0.1), "L_I")
    } else {
        (l, "L")
    };
    let x_inv = obtain_inverse(&input_dir, &x, matrix_name)?;

    let seed: u64 = rand::random();
    let param = Param {
        time_limit: TIME_LIMIT,
        seed,
        log_offdiagonals: false,
    };
    let n = x.rows();

    eprintln!("Running Fast");
    let result = double_greedy::<FastOracle<_>>(&x, &x_inv, &param);
    if result.finished {
        let mut csv = open_csv(&output_dir.join("Fast.csv"))?;
        write_csv_row(&mut csv, seed, n, n, &result)?;
    } else {
        eprintln!("Time limit ({TIME_LIMIT} sec) has been exceeded.");
    }

    eprintln!("Running Direct");
    let result = double_greedy::<DirectOracle<_>>(&x, &x_inv, &param);
    if result.finished {
        let mut csv = open_csv(&output_dir.join("Direct.csv"))?;
        write_csv_row(&mut csv, seed, n, n, &result)?;
    } else {
        eprintln!("Time limit ({TIME_LIMIT} sec) has been exceeded.");
    }

    Ok(())
}

fn run(dataset: &str, blend_identity: bool) -> detmax::Result<()> {
    match dataset {
        "netflix" | "movie_lens" => experiment(dataset, false, blend_identity),
        "wishart" => {
            for n in (2000..=10_000).step_by(2000) {
                if n == 6000 {
                    continue;
                }
                experiment(&format!("wishart/{n}"), true, blend_identity)?;
            }
            Ok(())
        }
        other => Err(SelectError::InvalidParameter(format!(
            "dataset must be netflix, movie_lens, or wishart; got {other:?}"
        ))),
    }
}

fn main() -> ExitCode {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    let mut dataset = String::new();
    let mut blend_identity = false;
    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "-d" | "--data" => match iter.next() {
                Some(value) => dataset = value.clone(),
                None => {
                    eprintln!("--data needs a value");
                    return ExitCode::FAILURE;
                }
            },
            "-i" | "--blend-identity" => blend_identity = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unknown option: {other}");
                return ExitCode::FAILURE;
            }
        }
    }

    if dataset.is_empty() {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&dataset, blend_identity) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
