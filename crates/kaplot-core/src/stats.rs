// File: crates/kaplot-core/src/stats.rs
// Summary: Percentiles, IQR outlier trimming and the seeded jitter source for box scatter overlays.

/// Linear-interpolated percentile (`q` in 0..=100) of unsorted `values`.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if v.is_empty() { return None; }
    v.sort_by(|a, b| a.total_cmp(b));
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (v.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(v[lo] + (v[hi] - v[lo]) * (rank - lo as f64))
}

/// Values inside `[Q1 - whis*IQR, Q3 + whis*IQR]`, in input order.
/// A single survivor is dropped as well; one point does not make a scatter.
pub fn iqr_trim(values: &[f64], whis: f64) -> Vec<f64> {
    let (Some(q1), Some(q3)) = (percentile(values, 25.0), percentile(values, 75.0)) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let (lo, hi) = (q1 - whis * iqr, q3 + whis * iqr);
    let kept: Vec<f64> = values.iter().copied().filter(|v| *v >= lo && *v <= hi).collect();
    if kept.len() == 1 { Vec::new() } else { kept }
}

/// Deterministic jitter: symmetric integer draws in `-4..=4`, scaled by 1/100.
#[derive(Clone, Debug)]
pub struct Jitter {
    state: u64,
}

impl Jitter {
    pub const AMPLITUDE: i64 = 4;

    pub fn new(seed: u64) -> Self { Self { state: seed } }

    // splitmix64
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    pub fn next_offset(&mut self) -> f64 {
        let span = (2 * Self::AMPLITUDE + 1) as u64;
        let draw = (self.next_u64() % span) as i64 - Self::AMPLITUDE;
        draw as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(percentile(&v, 25.0), Some(2.0));
        assert_eq!(percentile(&v, 75.0), Some(4.0));
        assert_eq!(percentile(&[1.0, 2.0], 50.0), Some(1.5));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn outlier_is_trimmed() {
        assert_eq!(iqr_trim(&[1.0, 2.0, 3.0, 4.0, 100.0], 1.5), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(iqr_trim(&[5.0], 1.5).is_empty());
    }

    #[test]
    fn jitter_is_bounded_and_seeded() {
        let mut a = Jitter::new(7);
        let mut b = Jitter::new(7);
        for _ in 0..200 {
            let (x, y) = (a.next_offset(), b.next_offset());
            assert_eq!(x, y);
            assert!((-0.04..=0.04).contains(&x));
        }
    }
}
