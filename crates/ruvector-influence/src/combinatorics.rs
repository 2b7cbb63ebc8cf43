//! Binomial coefficients for the sample-complexity bounds.
//!
//! The union bound in `lambda` ranges over all `C(n, k)` candidate seed sets,
//! which overflows `f64` long before `n` reaches realistic graph sizes
//! (`C(10^6, 50)` is around `10^235`; `C(10^6, 100)` is out of range). The
//! estimator therefore only ever consumes [`ln_n_choose_k`]; [`n_choose_k`]
//! is exact for small arguments and saturates to `+inf` otherwise.

/// `C(n, k)` via the multiplicative formula over `min(k, n - k)` factors.
///
/// Returns `0` for `k < 0` or `k > n`, `1` for `k == 0` or `k == n`.
/// Results below `2^53` are exact integers.
///
/// ```
/// use ruvector_influence::combinatorics::n_choose_k;
///
/// assert_eq!(n_choose_k(5, 2), 10.0);
/// assert_eq!(n_choose_k(5, 7), 0.0);
/// ```
pub fn n_choose_k(n: u64, k: i64) -> f64 {
    let Some(k) = effective_k(n, k) else {
        return 0.0;
    };

    let mut result = 1.0f64;
    for i in 1..=k {
        // (n - k + i) / i keeps every partial product an exact binomial.
        result = result * (n - k + i) as f64 / i as f64;
        if !result.is_finite() {
            return f64::INFINITY;
        }
    }

    if result < (1u64 << 53) as f64 {
        result.round()
    } else {
        result
    }
}

/// `ln C(n, k)` as a sum of logarithms.
///
/// Returns `-inf` where `C(n, k) == 0`. Stable for `n` in the millions.
///
/// ```
/// use ruvector_influence::combinatorics::ln_n_choose_k;
///
/// assert!((ln_n_choose_k(5, 2) - 10f64.ln()).abs() < 1e-12);
/// assert!(ln_n_choose_k(1_000_000, 500).is_finite());
/// ```
pub fn ln_n_choose_k(n: u64, k: i64) -> f64 {
    let Some(k) = effective_k(n, k) else {
        return f64::NEG_INFINITY;
    };

    (1..=k)
        .map(|i| ((n - k + i) as f64).ln() - (i as f64).ln())
        .sum()
}

/// Map `k` onto `min(k, n - k)`, or `None` if the coefficient is zero.
#[inline]
fn effective_k(n: u64, k: i64) -> Option<u64> {
    if k < 0 {
        return None;
    }
    let k = k as u64;
    if k > n {
        return None;
    }
    Some(k.min(n - k))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
