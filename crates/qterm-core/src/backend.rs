//! Numeric capability injected into the term engine.
//!
//! Terms never reach for a global array library. Every term carries an
//! `Arc<dyn NumericBackend>` and routes its tensor work (Kronecker products,
//! axis permutations, matrix exponentials) through it. [`NdarrayBackend`] is
//! the default implementation.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayD, Ix2, IxDyn, s};
use num_complex::Complex64;

use crate::error::TermResult;

/// Dense complex matrix used for every term representation.
pub type Matrix = Array2<Complex64>;

/// Value bound to a symbol or handed to a term constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A plain complex number.
    Scalar(Complex64),
    /// A dense tensor; only square rank-2 tensors are usable as matrices.
    Tensor(ArrayD<Complex64>),
}

impl From<Complex64> for Operand {
    fn from(value: Complex64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(Complex64::new(value, 0.0))
    }
}

impl From<Matrix> for Operand {
    fn from(matrix: Matrix) -> Self {
        Operand::Tensor(matrix.into_dyn())
    }
}

impl From<ArrayD<Complex64>> for Operand {
    fn from(tensor: ArrayD<Complex64>) -> Self {
        Operand::Tensor(tensor)
    }
}

/// Tensor operations required by terms, merges and exponentiation.
pub trait NumericBackend: fmt::Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// True if `x` is a plain number.
    fn is_scalar(&self, x: &Operand) -> bool;

    /// True if `x` is a square rank-2 tensor usable as an operator matrix.
    fn is_tensor(&self, x: &Operand) -> bool;

    /// Identity matrix of dimension `dim`.
    fn eye(&self, dim: usize) -> Matrix;

    /// Kronecker product `a ⊗ b`.
    fn kron(&self, a: &Matrix, b: &Matrix) -> Matrix;

    /// Ordinary matrix product `a · b`.
    fn matmul(&self, a: &Matrix, b: &Matrix) -> Matrix;

    /// Entry-wise product `k · a`.
    fn scale(&self, k: Complex64, a: &Matrix) -> Matrix;

    /// Row-major reshape.
    fn reshape(&self, a: ArrayD<Complex64>, shape: &[usize]) -> TermResult<ArrayD<Complex64>>;

    /// Axis permutation: axis `i` of the result is axis `axes[i]` of `a`.
    fn transpose(&self, a: ArrayD<Complex64>, axes: &[usize]) -> ArrayD<Complex64>;

    /// Collapse a rank-2 tensor into a matrix.
    fn to_matrix(&self, a: ArrayD<Complex64>) -> TermResult<Matrix>;

    /// Matrix exponential `exp(a)`.
    fn expm(&self, a: &Matrix) -> Matrix;
}

/// Shared handle to a backend.
pub type BackendRef = Arc<dyn NumericBackend>;

/// Backend used when the caller does not inject one.
pub fn default_backend() -> BackendRef {
    Arc::new(NdarrayBackend)
}

/// [`NumericBackend`] built on `ndarray` and `num-complex`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayBackend;

impl NumericBackend for NdarrayBackend {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn is_scalar(&self, x: &Operand) -> bool {
        matches!(x, Operand::Scalar(_))
    }

    fn is_tensor(&self, x: &Operand) -> bool {
        match x {
            Operand::Tensor(t) => t.ndim() == 2 && t.shape()[0] == t.shape()[1] && !t.is_empty(),
            Operand::Scalar(_) => false,
        }
    }

    fn eye(&self, dim: usize) -> Matrix {
        Matrix::eye(dim)
    }

    fn kron(&self, a: &Matrix, b: &Matrix) -> Matrix {
        let (ar, ac) = a.dim();
        let (br, bc) = b.dim();
        let mut out = Matrix::zeros((ar * br, ac * bc));
        for ((i, j), &x) in a.indexed_iter() {
            out.slice_mut(s![i * br..(i + 1) * br, j * bc..(j + 1) * bc])
                .assign(&b.mapv(|y| x * y));
        }
        out
    }

    fn matmul(&self, a: &Matrix, b: &Matrix) -> Matrix {
        a.dot(b)
    }

    fn scale(&self, k: Complex64, a: &Matrix) -> Matrix {
        a * k
    }

    fn reshape(&self, a: ArrayD<Complex64>, shape: &[usize]) -> TermResult<ArrayD<Complex64>> {
        let standard = a.as_standard_layout().into_owned();
        Ok(standard.into_shape_with_order(IxDyn(shape))?)
    }

    fn transpose(&self, a: ArrayD<Complex64>, axes: &[usize]) -> ArrayD<Complex64> {
        a.permuted_axes(IxDyn(axes))
            .as_standard_layout()
            .into_owned()
    }

    fn to_matrix(&self, a: ArrayD<Complex64>) -> TermResult<Matrix> {
        Ok(a.into_dimensionality::<Ix2>()?)
    }

    fn expm(&self, a: &Matrix) -> Matrix {
        matrix_exp(a)
    }
}

// ---------------------------------------------------------------------------
// Matrix exponential: scaling-and-squaring with a Padé(13,13) approximant
// (Higham 2005).
// ---------------------------------------------------------------------------

const THETA_13: f64 = 5.37;

const PADE_COEFFS: [f64; 14] = [
    64_764_752_532_480_000.0,
    32_382_376_266_240_000.0,
    7_771_770_303_897_600.0,
    1_187_353_796_428_800.0,
    129_060_195_264_000.0,
    10_559_470_521_600.0,
    670_442_572_800.0,
    33_522_128_640.0,
    1_323_241_920.0,
    40_840_800.0,
    960_960.0,
    16_380.0,
    182.0,
    1.0,
];

fn matrix_exp(a: &Matrix) -> Matrix {
    let n = a.nrows();
    if n == 0 {
        return Matrix::zeros((0, 0));
    }
    if n == 1 {
        return Matrix::from_elem((1, 1), a[[0, 0]].exp());
    }

    let norm = one_norm(a);
    let squarings = if norm > THETA_13 {
        (norm / THETA_13).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a * Complex64::new(2f64.powi(-squarings), 0.0);

    let mut result = pade13(&scaled);
    for _ in 0..squarings {
        result = result.dot(&result);
    }
    result
}

fn pade13(a: &Matrix) -> Matrix {
    let b = |k: usize| Complex64::new(PADE_COEFFS[k], 0.0);
    let eye = Matrix::eye(a.nrows());

    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    let w1 = &a6 * b(13) + &a4 * b(11) + &a2 * b(9);
    let w2 = w1.dot(&a6) + &a6 * b(7) + &a4 * b(5) + &a2 * b(3) + &eye * b(1);
    let u = a.dot(&w2);

    let z1 = &a6 * b(12) + &a4 * b(10) + &a2 * b(8);
    let v = z1.dot(&a6) + &a6 * b(6) + &a4 * b(4) + &a2 * b(2) + &eye * b(0);

    solve(&v - &u, &v + &u)
}

/// Solve `lhs · X = rhs` by Gaussian elimination with partial pivoting.
fn solve(mut lhs: Matrix, mut rhs: Matrix) -> Matrix {
    let n = lhs.nrows();
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| lhs[[i, col]].norm().total_cmp(&lhs[[j, col]].norm()))
            .unwrap_or(col);
        if pivot_row != col {
            for j in 0..n {
                lhs.swap([col, j], [pivot_row, j]);
            }
            for j in 0..rhs.ncols() {
                rhs.swap([col, j], [pivot_row, j]);
            }
        }
        let pivot = lhs[[col, col]];
        for row in (col + 1)..n {
            let factor = lhs[[row, col]] / pivot;
            if factor.norm() == 0.0 {
                continue;
            }
            for j in col..n {
                let v = lhs[[col, j]];
                lhs[[row, j]] -= factor * v;
            }
            for j in 0..rhs.ncols() {
                let v = rhs[[col, j]];
                rhs[[row, j]] -= factor * v;
            }
        }
    }

    let mut x = Matrix::zeros(rhs.dim());
    for row in (0..n).rev() {
        for j in 0..rhs.ncols() {
            let mut acc = rhs[[row, j]];
            for k in (row + 1)..n {
                acc -= lhs[[row, k]] * x[[k, j]];
            }
            x[[row, j]] = acc / lhs[[row, row]];
        }
    }
    x
}

fn one_norm(a: &Matrix) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}
