//! Seeded synthetic feature factors for experiments and benchmarks.
//!
//! Every generator takes an explicit seed and fills a dense `rows × cols`
//! factor `B`; the kernel under study is then `L = BᵀB` (a Wishart-type
//! matrix for the plain gaussian factor).

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use crate::linalg::DenseMatrix;

/// One standard normal draw via Box–Muller. `1 − u` keeps the log
/// argument strictly positive.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Factor with i.i.d. standard normal entries, filled column by column.
#[must_use]
pub fn gaussian(rows: usize, cols: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = DenseMatrix::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            b.set(i, j, standard_normal(&mut rng));
        }
    }
    b
}

/// Gaussian factor with columns normalized and rescaled to length
/// `exp(0.01·g + 0.2)`, giving item norms clustered just above 1.
#[must_use]
pub fn chen_factor(rows: usize, cols: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = gaussian(rows, cols, seed);

    for j in 0..cols {
        let norm = b.col_dot(j, j).sqrt();
        let scale = (0.01 * standard_normal(&mut rng) + 0.2).exp() / norm;
        for i in 0..rows {
            b.set(i, j, b.get(i, j) * scale);
        }
    }
    b
}

/// Gaussian factor with every entry shifted by `offset`.
#[must_use]
pub fn distorted_gaussian(rows: usize, cols: usize, offset: f64, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = DenseMatrix::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            b.set(i, j, standard_normal(&mut rng) + offset);
        }
    }
    b
}

/// Gaussian factor shifted by 1, making most gains exceed 1.
#[must_use]
pub fn monotone_gaussian(rows: usize, cols: usize, seed: u64) -> DenseMatrix {
    distorted_gaussian(rows, cols, 1.0, seed)
}
