// mann_whitney.rs - Two-sided Mann-Whitney U test

use crate::stats::ranks::rank_average;
use crate::stats::special::normal_sf;
use crate::stats::TestResult;

/// Both samples must be smaller than this, and tie-free, for the exact distribution
const EXACT_LIMIT: usize = 8;

/// Number of orderings giving each U value, for samples of size m and n
fn u_counts(m: usize, n: usize) -> Vec<f64> {
    // table[j] holds the counts for (i, j) while i advances
    let max_u = m * n;
    let mut table: Vec<Vec<f64>> = (0..=n)
        .map(|_| {
            let mut counts = vec![0.0; max_u + 1];
            counts[0] = 1.0;
            counts
        })
        .collect();

    for _i in 1..=m {
        let mut next: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        let mut base = vec![0.0; max_u + 1];
        base[0] = 1.0;
        next.push(base);
        for j in 1..=n {
            // the new x is larger than all j ys, or the largest y sits on top
            let mut counts = vec![0.0; max_u + 1];
            for u in 0..=max_u {
                let from_x = if u >= j { table[j][u - j] } else { 0.0 };
                counts[u] = from_x + next[j - 1][u];
            }
            next.push(counts);
        }
        table = next;
    }
    table.swap_remove(n)
}

fn exact_p_value(u: f64, m: usize, n: usize) -> f64 {
    let counts = u_counts(m, n);
    let total: f64 = counts.iter().sum();
    let threshold = u.round() as usize;
    let upper: f64 = counts.iter().skip(threshold).sum();
    2.0 * upper / total
}

/// Mann-Whitney U with continuity correction. Exact distribution for small
/// tie-free samples, normal approximation with tie correction otherwise.
/// The reported statistic is U for the first sample.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestResult, String> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return Err("Mann-Whitney U needs two non-empty samples".to_string());
    }

    let pooled: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let ranking = rank_average(&pooled);
    let rank_sum_x: f64 = ranking.ranks[..n1].iter().sum();

    let (m1, m2) = (n1 as f64, n2 as f64);
    let u1 = rank_sum_x - m1 * (m1 + 1.0) / 2.0;
    let u2 = m1 * m2 - u1;
    let u = u1.max(u2);

    let p_value = if n1 < EXACT_LIMIT && n2 < EXACT_LIMIT && ranking.tie_groups.is_empty() {
        exact_p_value(u, n1, n2)
    } else {
        let n = m1 + m2;
        let mu = m1 * m2 / 2.0;
        let variance = m1 * m2 / 12.0 * ((n + 1.0) - ranking.tie_term() / (n * (n - 1.0)));
        if variance <= 0.0 {
            1.0
        } else {
            let z = (u - mu - 0.5) / variance.sqrt();
            2.0 * normal_sf(z)
        }
    };

    Ok(TestResult {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u_distribution() {
        // m = n = 2: U in 0..=4 with counts 1,1,2,1,1
        assert_eq!(u_counts(2, 2), vec![1.0, 1.0, 2.0, 1.0, 1.0]);
        let total: f64 = u_counts(3, 4).iter().sum();
        assert_eq!(total, 35.0);
    }

    #[test]
    fn test_exact_small_samples() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_identical_groups_not_significant() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64 * 0.37).collect();
        let result = mann_whitney_u(&values, &values).unwrap();
        assert!(result.p_value >= 0.05);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.statistic, 200.0);
    }

    #[test]
    fn test_separated_large_groups() {
        let x: Vec<f64> = (0..30).map(|v| v as f64).collect();
        let y: Vec<f64> = (0..30).map(|v| v as f64 + 100.0).collect();
        let result = mann_whitney_u(&x, &y).unwrap();
        assert!(result.p_value < 1e-6);
        assert_eq!(result.statistic, 0.0);
    }

    #[test]
    fn test_constant_samples() {
        let result = mann_whitney_u(&[2.0; 10], &[2.0; 10]).unwrap();
        assert_eq!(result.p_value, 1.0);
        assert!(mann_whitney_u(&[], &[1.0]).is_err());
    }
}
