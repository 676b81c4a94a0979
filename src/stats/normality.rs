// normality.rs - Goodness-of-fit tests against the normal distribution

use crate::stats::special::{kolmogorov_sf, normal_cdf, normal_ppf, normal_sf};
use crate::stats::TestResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::PI;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Normality test selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalityTest {
    /// One-sample Kolmogorov-Smirnov test against the standard normal
    #[default]
    #[serde(rename = "kstest")]
    KolmogorovSmirnov,
    /// Shapiro-Wilk W test
    #[serde(rename = "shapiro")]
    ShapiroWilk,
}

impl NormalityTest {
    pub fn name(&self) -> &'static str {
        match self {
            NormalityTest::KolmogorovSmirnov => "kstest",
            NormalityTest::ShapiroWilk => "shapiro",
        }
    }

    /// Report label; names how the p-value is obtained when it is not exact
    pub fn label(&self) -> &'static str {
        match self {
            NormalityTest::KolmogorovSmirnov => "kstest, asymptotic p-value",
            NormalityTest::ShapiroWilk => "shapiro",
        }
    }

    pub fn run(&self, values: &[f64]) -> Result<TestResult, String> {
        match self {
            NormalityTest::KolmogorovSmirnov => ks_test_normal(values),
            NormalityTest::ShapiroWilk => shapiro_wilk(values),
        }
    }
}

impl Display for NormalityTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NormalityTest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kstest" => Ok(NormalityTest::KolmogorovSmirnov),
            "shapiro" => Ok(NormalityTest::ShapiroWilk),
            _ => Err(format!("Unsupported normality test '{}'. Use: kstest, shapiro", s)),
        }
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    x
}

/// Kolmogorov-Smirnov statistic against N(0, 1), asymptotic p-value with
/// Stephens' small-sample correction
pub fn ks_test_normal(values: &[f64]) -> Result<TestResult, String> {
    if values.is_empty() {
        return Err("kstest needs at least one value".to_string());
    }
    let x = sorted(values);
    let n = x.len() as f64;

    let mut d = 0.0f64;
    for (i, &v) in x.iter().enumerate() {
        let cdf = normal_cdf(v);
        let d_plus = (i + 1) as f64 / n - cdf;
        let d_minus = cdf - i as f64 / n;
        d = d.max(d_plus).max(d_minus);
    }

    let sqrt_n = n.sqrt();
    let p_value = kolmogorov_sf((sqrt_n + 0.12 + 0.11 / sqrt_n) * d);
    Ok(TestResult { statistic: d, p_value })
}

fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk coefficients (Royston's approximation)
fn shapiro_coefficients(n: usize) -> Vec<f64> {
    if n == 3 {
        let s = 0.5f64.sqrt();
        return vec![-s, 0.0, s];
    }
    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| normal_ppf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2: f64 = m.iter().map(|v| v * v).sum();
    let ssumm2 = summ2.sqrt();
    let u = 1.0 / nf.sqrt();

    let mut a = vec![0.0; n];
    let a_n = m[n - 1] / ssumm2 + poly(&C1, u);
    a[n - 1] = a_n;
    a[0] = -a_n;

    if n > 5 {
        let a_n1 = m[n - 2] / ssumm2 + poly(&C2, u);
        a[n - 2] = a_n1;
        a[1] = -a_n1;
        let phi = (summ2 - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
        let root = phi.sqrt();
        for i in 2..n - 2 {
            a[i] = m[i] / root;
        }
    } else {
        let phi = (summ2 - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
        let root = phi.sqrt();
        for i in 1..n - 1 {
            a[i] = m[i] / root;
        }
    }
    a
}

/// Shapiro-Wilk W test with Royston's p-value approximation (3 <= n <= 5000)
pub fn shapiro_wilk(values: &[f64]) -> Result<TestResult, String> {
    let n = values.len();
    if n < 3 {
        return Err(format!("shapiro needs at least 3 values, got {}", n));
    }
    if n > 5000 {
        return Err(format!("shapiro supports at most 5000 values, got {}", n));
    }

    let x = sorted(values);
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    if ss <= 0.0 {
        return Err("shapiro is undefined for identical values".to_string());
    }

    let a = shapiro_coefficients(n);
    let numerator: f64 = a.iter().zip(&x).map(|(a, x)| a * x).sum();
    let w = (numerator * numerator / ss).min(1.0);

    let nf = n as f64;
    let p_value = if n == 3 {
        (6.0 / PI * (w.sqrt().asin() - (0.75f64).sqrt().asin())).max(0.0)
    } else if n <= 11 {
        let gamma = poly(&G, nf);
        let m = poly(&C3, nf);
        let s = poly(&C4, nf).exp();
        let y = (1.0 - w).ln();
        if y >= gamma {
            1e-99
        } else {
            normal_sf((-(gamma - y).ln() - m) / s)
        }
    } else {
        let xx = nf.ln();
        let m = poly(&C5, xx);
        let s = poly(&C6, xx).exp();
        normal_sf(((1.0 - w).ln() - m) / s)
    };

    Ok(TestResult {
        statistic: w,
        p_value: p_value.clamp(0.0, 1.0),
    })
}
