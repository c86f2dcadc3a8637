//! Generate the synthetic Wishart dataset ladder.
//!
//! Writes `data/wishart/<n>/B.txt` (gaussian factor) and `L.txt`
//! (`BᵀB`) for `n = 1000, 2000, …, 10000`, both with round-trip
//! precision.

use std::path::Path;
use std::process::ExitCode;

use detmax::io::{save_dense, save_symmetric};
use detmax::synth::gaussian;

const SEED: u64 = 0;

fn run() -> detmax::Result<()> {
    for n in (1000..=10_000).step_by(1000) {
        let data_dir = Path::new("data/wishart").join(n.to_string());

        let b = gaussian(n, n, SEED);
        save_dense(&b, &data_dir.join("B.txt"), true)?;

        eprintln!("Computing L = B^T B for n = {n}");
        let l = b.gram();
        save_symmetric(&l, &data_dir.join("L.txt"), true)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
