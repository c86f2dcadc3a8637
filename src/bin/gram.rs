//! Compute and store the kernel `L = BᵀB` for a dataset's 0/1 factor.

use std::path::Path;
use std::process::ExitCode;

use detmax::Timer;
use detmax::io::{load_binary_factor, save_symmetric};

const USAGE: &str = "Usage: gram -d <dataset>
  -d, --data <name>   netflix | movie_lens
  -h, --help          print this message";

fn run(dataset: &str) -> detmax::Result<()> {
    let input_dir = Path::new("data").join(dataset);

    let b = load_binary_factor(&input_dir.join("B.txt"))?;
    eprintln!("Computing L = B^T B for {dataset} ({} x {})", b.rows(), b.cols());

    let timer = Timer::new();
    let l = b.gram();
    eprintln!("Time: {}", timer.elapsed());

    save_symmetric(&l, &input_dir.join("L.txt"), false)?;
    Ok(())
}

fn main() -> ExitCode {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    let mut dataset = String::new();
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

    match run(&dataset) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
