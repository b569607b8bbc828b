/// `numerator / denominator * 100`, or `None` when the denominator is not positive
/// or the result is not finite.
pub fn percent_of(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator <= 0.0 || !denominator.is_finite() {
        return None;
    }
    let pct = numerator / denominator * 100.0;
    pct.is_finite().then_some(pct)
}

/// Sum that starts from `+0.0`, so an empty or all-zero input never yields `-0.0`.
pub fn sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Share of `part` in `whole` as a percentage; `None` for an empty whole.
pub fn ratio_pct(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

/// Mean of `total` over `count` items; `None` when there are none.
pub fn mean(total: f64, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(total / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_guards_zero() {
        assert_eq!(percent_of(5.0, 0.0), None);
        assert_eq!(percent_of(5.0, -1.0), None);
        assert_eq!(percent_of(0.0, 0.0), None);
        let pct = percent_of(5.0, 20.0).unwrap();
        assert!((pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_of_rejects_non_finite() {
        assert_eq!(percent_of(1.0, f64::INFINITY), None);
        assert_eq!(percent_of(f64::NAN, 10.0), None);
    }

    #[test]
    fn test_sum_never_negative_zero() {
        assert!(sum(Vec::new()).is_sign_positive());
        assert!(sum(vec![-0.0, -0.0]).is_sign_positive());
        assert!((sum(vec![1.5, -0.5]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_pct() {
        assert_eq!(ratio_pct(0, 0), None);
        assert!((ratio_pct(1, 2).unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(10.0, 0), None);
        assert!((mean(10.0, 4).unwrap() - 2.5).abs() < 1e-9);
    }
}
