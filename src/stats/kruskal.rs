// kruskal.rs - Kruskal-Wallis H test for several independent groups

use crate::stats::ranks::rank_average;
use crate::stats::special::chi2_sf;
use crate::stats::TestResult;

/// H statistic (tie corrected) and chi-square p-value with k - 1 degrees
/// of freedom. Groups may differ in size; empty groups are ignored.
pub fn kruskal_wallis(groups: &[Vec<f64>]) -> Result<TestResult, String> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    if groups.len() < 2 {
        return Err(format!("Kruskal-Wallis needs at least 2 non-empty groups, got {}", groups.len()));
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    let ranking = rank_average(&pooled);

    let correction = 1.0 - ranking.tie_term() / (n * n * n - n);
    if correction <= 0.0 {
        return Err("Kruskal-Wallis is undefined when all values are identical".to_string());
    }

    let mut offset = 0;
    let mut rank_term = 0.0;
    for group in &groups {
        let rank_sum: f64 = ranking.ranks[offset..offset + group.len()].iter().sum();
        rank_term += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }

    let h = (12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0)) / correction;
    let df = (groups.len() - 1) as f64;
    Ok(TestResult {
        statistic: h,
        p_value: chi2_sf(h, df),
    })
}
