// File: crates/kaplot-core/src/spline.rs
// Summary: Spline overlay fitting: linear or natural cubic interpolation, with an optional
//          second-difference smoothing pass when a smoothing factor is given.

/// Fit `(x, y)` and evaluate at `at`.
///
/// - `order == 1` interpolates linearly, higher orders use a natural cubic spline;
/// - `smooth > 0` first smooths `y` by penalized least squares (weight `smooth`);
/// - input order does not matter; repeated `x` values are averaged.
///
/// Returns `None` when fewer than two distinct `x` values remain.
pub fn fit(x: &[f64], y: &[f64], order: usize, smooth: f64, at: &[f64]) -> Option<Vec<f64>> {
    let (xs, mut ys) = sorted_unique(x, y);
    if xs.len() < 2 { return None; }
    if smooth > 0.0 && xs.len() > 2 {
        ys = smooth_second_difference(&ys, smooth);
    }
    let out = if order <= 1 || xs.len() == 2 {
        at.iter().map(|&t| linear_at(&xs, &ys, t)).collect()
    } else {
        let m = natural_second_derivatives(&xs, &ys);
        at.iter().map(|&t| cubic_at(&xs, &ys, &m, t)).collect()
    };
    Some(out)
}

fn sorted_unique(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut pts: Vec<(f64, f64)> = x
        .iter()
        .copied()
        .zip(y.iter().copied())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect();
    pts.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut xs: Vec<f64> = Vec::with_capacity(pts.len());
    let mut ys: Vec<f64> = Vec::with_capacity(pts.len());
    let mut run = 0usize;
    for (px, py) in pts {
        match xs.last() {
            Some(&last) if last == px => {
                run += 1;
                if let Some(v) = ys.last_mut() {
                    *v += (py - *v) / run as f64;
                }
            }
            _ => {
                xs.push(px);
                ys.push(py);
                run = 1;
            }
        }
    }
    (xs, ys)
}

// index of the interval [xs[i], xs[i+1]] used for t, clamped to the end intervals
fn interval(xs: &[f64], t: f64) -> usize {
    let n = xs.len();
    match xs.binary_search_by(|v| v.total_cmp(&t)) {
        Ok(i) => i.min(n - 2),
        Err(i) => i.saturating_sub(1).min(n - 2),
    }
}

fn linear_at(xs: &[f64], ys: &[f64], t: f64) -> f64 {
    let i = interval(xs, t);
    let h = xs[i + 1] - xs[i];
    ys[i] + (ys[i + 1] - ys[i]) * (t - xs[i]) / h
}

/// Second derivatives of the natural cubic spline (Thomas algorithm).
fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    if n < 3 { return m; }
    let inner = n - 2;
    let mut diag = vec![0.0; inner];
    let mut upper = vec![0.0; inner];
    let mut rhs = vec![0.0; inner];
    for k in 0..inner {
        let i = k + 1;
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        diag[k] = 2.0 * (h0 + h1);
        upper[k] = h1;
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
    }
    // forward sweep; the sub-diagonal entry of row k equals upper[k-1]
    for k in 1..inner {
        let w = upper[k - 1] / diag[k - 1];
        diag[k] -= w * upper[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }
    for k in (0..inner).rev() {
        let next = if k + 1 < inner { m[k + 2] } else { 0.0 };
        m[k + 1] = (rhs[k] - upper[k] * next) / diag[k];
    }
    m
}

fn cubic_at(xs: &[f64], ys: &[f64], m: &[f64], t: f64) -> f64 {
    let i = interval(xs, t);
    let h = xs[i + 1] - xs[i];
    let a = (xs[i + 1] - t) / h;
    let b = (t - xs[i]) / h;
    a * ys[i] + b * ys[i + 1] + ((a * a * a - a) * m[i] + (b * b * b - b) * m[i + 1]) * h * h / 6.0
}

/// Minimize `sum (y - z)^2 + lambda * sum (second difference of z)^2`.
/// The normal equations `(I + lambda * D'D) z = y` are pentadiagonal and solved in band form.
fn smooth_second_difference(y: &[f64], lambda: f64) -> Vec<f64> {
    let n = y.len();
    // band[i][d] holds A[i][i + d - 2] for d in 0..5
    let mut band = vec![[0.0f64; 5]; n];
    for r in 0..n - 2 {
        let coeffs = [(r, 1.0), (r + 1, -2.0), (r + 2, 1.0)];
        for &(i, ci) in &coeffs {
            for &(j, cj) in &coeffs {
                band[i][j + 2 - i] += lambda * ci * cj;
            }
        }
    }
    for row in band.iter_mut() {
        row[2] += 1.0;
    }
    let mut rhs = y.to_vec();
    // Gaussian elimination without pivoting; the matrix is symmetric positive definite.
    for k in 0..n {
        let pivot = band[k][2];
        for i in (k + 1)..(k + 3).min(n) {
            let f = band[i][k + 2 - i] / pivot;
            if f == 0.0 { continue; }
            for j in k..(k + 3).min(n) {
                band[i][j + 2 - i] -= f * band[k][j + 2 - k];
            }
            rhs[i] -= f * rhs[k];
        }
    }
    let mut z = vec![0.0; n];
    for k in (0..n).rev() {
        let mut acc = rhs[k];
        for j in (k + 1)..(k + 3).min(n) {
            acc -= band[k][j + 2 - k] * z[j];
        }
        z[k] = acc / band[k][2];
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_passes_through_knots() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 0.0, 1.0];
        let v = fit(&x, &y, 3, 0.0, &x).unwrap();
        for (a, b) in v.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn linear_order_interpolates_midpoints() {
        let v = fit(&[2.0, 0.0], &[4.0, 0.0], 1, 0.0, &[1.0]).unwrap();
        assert!((v[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn smoothing_flattens_a_straight_line_not_at_all() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let v = fit(&x, &y, 3, 50.0, &x).unwrap();
        for (a, b) in v.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn degenerate_input() {
        assert!(fit(&[1.0, 1.0], &[2.0, 3.0], 3, 0.0, &[1.0]).is_none());
    }
}
