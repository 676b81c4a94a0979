// ranks.rs - Average ranks with tie bookkeeping

use std::cmp::Ordering;

/// Ranks of a sample (1-based, ties share their average rank) and the
/// sizes of every tie group
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub ranks: Vec<f64>,
    pub tie_groups: Vec<usize>,
}

impl Ranking {
    /// Sum of t^3 - t over all tie groups
    pub fn tie_term(&self) -> f64 {
        self.tie_groups
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

/// Rank values; NaN must be removed beforehand
pub fn rank_average(values: &[f64]) -> Ranking {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_groups = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j share ranks i+1..=j
        let average = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = average;
        }
        if j - i > 1 {
            tie_groups.push(j - i);
        }
        i = j;
    }

    Ranking { ranks, tie_groups }
}
