//! Binary logistic regression trained with batch gradient descent.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ml::N_FEATURES;

/// Logistic regression over the fixed `[Age, Sex, Height, Weight]` feature
/// vector. Features are standardized internally during optimization; the
/// stored weights and intercept are folded back to raw feature scale, so the
/// reported coefficients refer to the original units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
    learning_rate: f64,
    max_iter: usize,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            intercept: 0.0,
            learning_rate: 0.1,
            max_iter: 1000,
        }
    }

    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    /// Fits the model on raw (unstandardized) feature rows and 0/1 labels.
    pub fn fit(&mut self, x: &[[f64; N_FEATURES]], y: &[u8]) -> Result<()> {
        anyhow::ensure!(!x.is_empty(), "training set is empty");
        anyhow::ensure!(
            x.len() == y.len(),
            "feature rows ({}) and labels ({}) differ in length",
            x.len(),
            y.len()
        );

        let n = x.len() as f64;

        // Standardize each feature for stable gradient descent.
        let mut means = [0.0; N_FEATURES];
        for row in x {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }
        let mut stds = [0.0; N_FEATURES];
        for row in x {
            for j in 0..N_FEATURES {
                let d = row[j] - means[j];
                stds[j] += d * d;
            }
        }
        for s in &mut stds {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        let mut w = [0.0; N_FEATURES];
        let mut b = 0.0;
        for _ in 0..self.max_iter {
            let mut grad_w = [0.0; N_FEATURES];
            let mut grad_b = 0.0;
            for (row, &label) in x.iter().zip(y) {
                let mut z = b;
                for j in 0..N_FEATURES {
                    z += w[j] * (row[j] - means[j]) / stds[j];
                }
                let err = Self::sigmoid(z) - f64::from(label);
                for j in 0..N_FEATURES {
                    grad_w[j] += err * (row[j] - means[j]) / stds[j];
                }
                grad_b += err;
            }
            for j in 0..N_FEATURES {
                w[j] -= self.learning_rate * grad_w[j] / n;
            }
            b -= self.learning_rate * grad_b / n;
        }

        // Fold the standardization into the stored parameters.
        let mut weights = vec![0.0; N_FEATURES];
        let mut intercept = b;
        for j in 0..N_FEATURES {
            weights[j] = w[j] / stds[j];
            intercept -= w[j] * means[j] / stds[j];
        }
        self.weights = weights;
        self.intercept = intercept;
        Ok(())
    }

    /// Probability of the positive (medal) class for one raw feature row.
    pub fn predict_proba(&self, x: &[f64; N_FEATURES]) -> f64 {
        let mut z = self.intercept;
        for (w, v) in self.weights.iter().zip(x) {
            z += w * v;
        }
        Self::sigmoid(z)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}
