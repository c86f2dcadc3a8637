//! Text formats for factors and kernels, plus CSV measurement output.
//!
//! Three whitespace-delimited formats:
//!
//! - 0/1 factor: header `d n nnz`, then `nnz` lines `row col` marking the
//!   ones of a `d × n` matrix.
//! - dense factor: header `d n`, then `d` rows of `n` doubles.
//! - symmetric kernel: header `n`, then row `i` holds the lower triangle
//!   `L[i, 0..=i]`; the upper triangle is mirrored on load.
//!
//! Measurement rows append to per-configuration CSV files; the header is
//! written only when the file is created.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::algorithm::RunResult;
use crate::error::{Result, SelectError};
use crate::linalg::DenseMatrix;

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
    what: &str,
) -> Result<&'a str> {
    tokens
        .next()
        .ok_or_else(|| SelectError::malformed(path, format!("unexpected end of file, expected {what}")))
}

fn next_usize<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
    what: &str,
) -> Result<usize> {
    let token = next_token(tokens, path, what)?;
    token
        .parse()
        .map_err(|_| SelectError::malformed(path, format!("bad {what}: {token:?}")))
}

fn next_f64<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
    what: &str,
) -> Result<f64> {
    let token = next_token(tokens, path, what)?;
    token
        .parse()
        .map_err(|_| SelectError::malformed(path, format!("bad {what}: {token:?}")))
}

/// Load a 0/1 factor: header `d n nnz`, then `nnz` lines `row col`.
pub fn load_binary_factor(path: &Path) -> Result<DenseMatrix> {
    let text = fs::read_to_string(path)?;
    let mut tokens = text.split_ascii_whitespace();

    let d = next_usize(&mut tokens, path, "row count")?;
    let n = next_usize(&mut tokens, path, "column count")?;
    let nnz = next_usize(&mut tokens, path, "nonzero count")?;

    let mut b = DenseMatrix::zeros(d, n);
    for _ in 0..nnz {
        let row = next_usize(&mut tokens, path, "entry row")?;
        let col = next_usize(&mut tokens, path, "entry column")?;
        if row >= d || col >= n {
            return Err(SelectError::malformed(
                path,
                format!("entry ({row}, {col}) outside a {d}x{n} matrix"),
            ));
        }
        b.set(row, col, 1.0);
    }
    Ok(b)
}

/// Load a dense factor: header `d n`, then `d` rows of `n` doubles.
pub fn load_dense(path: &Path) -> Result<DenseMatrix> {
    let text = fs::read_to_string(path)?;
    let mut tokens = text.split_ascii_whitespace();

    let d = next_usize(&mut tokens, path, "row count")?;
    let n = next_usize(&mut tokens, path, "column count")?;

    let mut b = DenseMatrix::zeros(d, n);
    for i in 0..d {
        for j in 0..n {
            b.set(i, j, next_f64(&mut tokens, path, "matrix entry")?);
        }
    }
    Ok(b)
}

fn format_entry(v: f64, high_precision: bool) -> String {
    if high_precision {
        // Shortest round-trip representation; parses back to the same bits.
        format!("{v}")
    } else {
        format!("{v:.6}")
    }
}

/// Save a dense factor in the `load_dense` format, creating parent
/// directories as needed.
pub fn save_dense(b: &DenseMatrix, path: &Path, high_precision: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", b.rows(), b.cols()));
    for i in 0..b.rows() {
        for j in 0..b.cols() {
            if j > 0 {
                out.push(' ');
            }
            out.push_str(&format_entry(b.get(i, j), high_precision));
        }
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Load a symmetric kernel stored as its lower triangle.
pub fn load_symmetric(path: &Path) -> Result<DenseMatrix> {
    let text = fs::read_to_string(path)?;
    let mut tokens = text.split_ascii_whitespace();

    let n = next_usize(&mut tokens, path, "matrix order")?;

    let mut l = DenseMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let v = next_f64(&mut tokens, path, "matrix entry")?;
            l.set(i, j, v);
            l.set(j, i, v);
        }
    }
    Ok(l)
}

/// Save a symmetric kernel as its lower triangle.
pub fn save_symmetric(l: &DenseMatrix, path: &Path, high_precision: bool) -> Result<()> {
    debug_assert_eq!(l.rows(), l.cols());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let n = l.rows();
    let mut out = String::new();
    out.push_str(&format!("{n}\n"));
    for i in 0..n {
        for j in 0..=i {
            if j > 0 {
                out.push(' ');
            }
            out.push_str(&format_entry(l.get(i, j), high_precision));
        }
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// CSV header shared by every measurement file.
pub const CSV_HEADER: &str =
    "seed,n,k,solution_size,time,value,computed_entries_L,oracle_calls,computed_offdiagonals_V";

/// Open a measurement CSV in append mode, creating it (plus parent
/// directories and the header row) if missing.
pub fn open_csv(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let is_new = !path.exists();

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if is_new {
        writeln!(file, "{CSV_HEADER}")?;
    }
    Ok(file)
}

/// Append one measurement row. Floats print with round-trip precision;
/// `−∞` prints as the `-inf` token.
pub fn write_csv_row(
    out: &mut impl Write,
    seed: u64,
    n: usize,
    k: usize,
    result: &RunResult,
) -> Result<()> {
    writeln!(
        out,
        "{seed},{n},{k},{},{},{},{},{},{}",
        result.solution.len(),
        result.measurement.time,
        result.value,
        result.measurement.computed_entries,
        result.measurement.gain_evaluations,
        result.measurement.offdiagonal_count,
    )?;
    Ok(())
}
