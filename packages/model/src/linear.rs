//! Ordinary linear regression.

use crime_dash_crime_models::FeatureSchema;
use serde::Deserialize;

use crate::{ModelError, RegressionModel};

/// `intercept + Σ coefficient · input`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    /// Input features in model order.
    pub feature_names: FeatureSchema,
    /// One coefficient per feature, in model order.
    pub coefficients: Vec<f64>,
    /// Constant term.
    pub intercept: f64,
}

impl LinearModel {
    /// Checks that there is exactly one coefficient per feature.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Invalid`] on a length mismatch.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::Invalid {
                message: format!(
                    "{} coefficients for {} features",
                    self.coefficients.len(),
                    self.feature_names.len()
                ),
            });
        }
        Ok(())
    }
}

impl RegressionModel for LinearModel {
    fn feature_names(&self) -> &FeatureSchema {
        &self.feature_names
    }

    fn predict_ordered(&self, inputs: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(inputs)
            .fold(self.intercept, |acc, (c, x)| c.mul_add(*x, acc))
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel {
            feature_names: FeatureSchema::new(vec![
                "Year".to_owned(),
                "State_X".to_owned(),
                "Crime_Type_Theft".to_owned(),
            ])
            .unwrap(),
            coefficients: vec![2.0, 100.0, 10.0],
            intercept: -4000.0,
        }
    }

    #[test]
    fn sums_weighted_inputs() {
        let prediction = model().predict_ordered(&[2025.0, 1.0, 1.0]);
        assert!((prediction - 160.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coefficient_count_must_match() {
        let mut bad = model();
        bad.coefficients.pop();
        assert!(matches!(bad.validate(), Err(ModelError::Invalid { .. })));
        assert!(model().validate().is_ok());
    }
}
