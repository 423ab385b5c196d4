use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Kronecker sum of two square matrices: `A ⊕ B = A ⊗ I_m + I_n ⊗ B`.
pub fn kron_sum(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    ensure_square(a, "kronecker sum left operand")?;
    ensure_square(b, "kronecker sum right operand")?;
    let (n, m) = (a.nrows(), b.nrows());
    Ok(a.kronecker(&DMatrix::identity(m, m)) + DMatrix::identity(n, n).kronecker(b))
}

/// Column-stacking vectorisation `vec(M)`.
///
/// nalgebra stores matrices column-major, so this is a reshape of the data
/// in its existing order.
pub fn vectorize(m: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_column_slice(m.as_slice())
}

/// Inverse of [`vectorize`] for square targets.
pub fn unvectorize(v: &DVector<f64>, nrows: usize) -> Result<DMatrix<f64>> {
    if v.len() != nrows * nrows {
        return Err(Error::DimensionMismatch {
            what: "vectorised square matrix",
            expected: nrows * nrows,
            actual: v.len(),
        });
    }
    Ok(DMatrix::from_column_slice(nrows, nrows, v.as_slice()))
}

/// Fails with [`Error::NotSquare`] unless `m` is square.
pub fn ensure_square(m: &DMatrix<f64>, what: &'static str) -> Result<()> {
    if m.nrows() != m.ncols() {
        return Err(Error::NotSquare {
            what,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}

/// Fails with [`Error::DimensionMismatch`] unless `m` has `rows` rows.
pub fn ensure_rows(m: &DMatrix<f64>, rows: usize, what: &'static str) -> Result<()> {
    if m.nrows() != rows {
        return Err(Error::DimensionMismatch {
            what,
            expected: rows,
            actual: m.nrows(),
        });
    }
    Ok(())
}

/// Fails with [`Error::DimensionMismatch`] unless `v` has length `len`.
pub fn ensure_len(v: &DVector<f64>, len: usize, what: &'static str) -> Result<()> {
    if v.len() != len {
        return Err(Error::DimensionMismatch {
            what,
            expected: len,
            actual: v.len(),
        });
    }
    Ok(())
}

/// Single-line `[a, b, ...]` rendering for Display impls.
pub fn format_vector(v: &DVector<f64>) -> String {
    let entries: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("[{}]", entries.join(", "))
}

/// Single-line row-major `[[..], [..]]` rendering for Display impls.
pub fn format_matrix(m: &DMatrix<f64>) -> String {
    let rows: Vec<String> = (0..m.nrows())
        .map(|i| {
            let cols: Vec<String> = (0..m.ncols()).map(|j| m[(i, j)].to_string()).collect();
            format!("[{}]", cols.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}
