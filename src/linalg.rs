#[inline]
pub fn squared_l2(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut i = 0usize;
    let mut acc0 = 0.0f64;
    let mut acc1 = 0.0f64;
    let mut acc2 = 0.0f64;
    let mut acc3 = 0.0f64;
    while i + 4 <= a.len() {
        let d0 = a[i] - b[i];
        let d1 = a[i + 1] - b[i + 1];
        let d2 = a[i + 2] - b[i + 2];
        let d3 = a[i + 3] - b[i + 3];
        acc0 += d0 * d0;
        acc1 += d1 * d1;
        acc2 += d2 * d2;
        acc3 += d3 * d3;
        i += 4;
    }
    let mut out = (acc0 + acc1) + (acc2 + acc3);
    while i < a.len() {
        let d = a[i] - b[i];
        out += d * d;
        i += 1;
    }
    out
}

#[inline]
pub fn l1(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

pub fn add_inplace(dst: &mut [f64], src: &[f64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d += *s;
    }
}

pub fn scale_inplace(dst: &mut [f64], factor: f64) {
    for d in dst {
        *d *= factor;
    }
}

/// Index and value of the smallest score. Ties resolve to the lowest index;
/// NaN scores are never selected.
pub fn argmin<I>(scores: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in scores.into_iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| s < b) {
            best = Some((i, s));
        }
    }
    best
}
