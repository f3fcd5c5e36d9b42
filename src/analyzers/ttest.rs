//! Two-sample t-tests.
//!
//! [`TwoSampleTest`] is the seam the comparison driver calls through.
//! [`StudentT`] pools the variances of both samples. [`WelchT`] does not.
//! Both report a two-sided p-value from the Student t distribution.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::analyzers::utility::{mean, sample_variance};
use crate::error::{PipelineError, Result};

/// Result of a two-sample test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// A two-sample hypothesis test comparing the means of `a` and `b`.
pub trait TwoSampleTest {
    fn name(&self) -> &'static str;

    fn test(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome>;
}

/// Student's t-test with pooled variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentT;

/// Welch's t-test for samples with unequal variances.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchT;

struct Moments {
    n: f64,
    mean: f64,
    variance: f64,
}

fn moments(sample: &[f64], label: &str) -> Result<Moments> {
    if sample.len() < 2 {
        return Err(PipelineError::InsufficientData(format!(
            "sample {label} has {} value(s), need at least 2",
            sample.len()
        )));
    }
    let m = mean(sample);
    Ok(Moments {
        n: sample.len() as f64,
        mean: m,
        variance: sample_variance(sample, m),
    })
}

fn outcome(difference: f64, standard_error: f64, df: f64) -> Result<TestOutcome> {
    if !(standard_error > 0.0 && standard_error.is_finite()) {
        return Err(PipelineError::InsufficientData(
            "non-finite or zero standard error".to_string(),
        ));
    }
    let statistic = difference / standard_error;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| PipelineError::InsufficientData(e.to_string()))?;
    let p_value = (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0);

    Ok(TestOutcome {
        statistic,
        p_value,
        degrees_of_freedom: df,
    })
}

impl TwoSampleTest for StudentT {
    fn name(&self) -> &'static str {
        "student"
    }

    fn test(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome> {
        let a = moments(a, "a")?;
        let b = moments(b, "b")?;

        let df = a.n + b.n - 2.0;
        let pooled = ((a.n - 1.0) * a.variance + (b.n - 1.0) * b.variance) / df;
        let standard_error = (pooled * (1.0 / a.n + 1.0 / b.n)).sqrt();

        outcome(a.mean - b.mean, standard_error, df)
    }
}

impl TwoSampleTest for WelchT {
    fn name(&self) -> &'static str {
        "welch"
    }

    fn test(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome> {
        let a = moments(a, "a")?;
        let b = moments(b, "b")?;

        let va = a.variance / a.n;
        let vb = b.variance / b.n;
        let standard_error = (va + vb).sqrt();
        let df = (va + vb).powi(2) / (va.powi(2) / (a.n - 1.0) + vb.powi(2) / (b.n - 1.0));

        outcome(a.mean - b.mean, standard_error, df)
    }
}
