//! Regression trees and tree ensembles.
//!
//! Trees are stored in the flattened array layout tree learners export:
//! parallel `children_left`, `children_right`, `feature`, `threshold`, and
//! `value` arrays, where a leaf has `children_left == -1`.

use crime_dash_crime_models::FeatureSchema;
use serde::Deserialize;

use crate::{ModelError, RegressionModel};

/// Flattened tree arrays as they appear in the artifact.
#[derive(Debug, Clone, Deserialize)]
struct TreeArrays {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree.
///
/// Every split's children come after it in node order, so evaluation
/// always terminates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "TreeArrays")]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Evaluates the tree on inputs given in schema order.
    ///
    /// Descends left when the input is less than or equal to the split
    /// threshold.
    #[must_use]
    pub fn evaluate(&self, inputs: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if inputs[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf { .. } => None,
            })
            .max()
    }
}

impl TryFrom<TreeArrays> for DecisionTree {
    type Error = String;

    fn try_from(arrays: TreeArrays) -> Result<Self, Self::Error> {
        let count = arrays.value.len();
        if count == 0 {
            return Err("tree has no nodes".to_owned());
        }
        if arrays.children_left.len() != count
            || arrays.children_right.len() != count
            || arrays.feature.len() != count
            || arrays.threshold.len() != count
        {
            return Err(format!("tree arrays disagree in length (expected {count})"));
        }

        let child = |node: usize, raw: i64| -> Result<usize, String> {
            usize::try_from(raw)
                .ok()
                .filter(|&c| c > node && c < count)
                .ok_or_else(|| format!("node {node} has invalid child {raw}"))
        };

        let mut nodes = Vec::with_capacity(count);
        for index in 0..count {
            let left = arrays.children_left[index];
            let right = arrays.children_right[index];
            if left < 0 {
                if right >= 0 {
                    return Err(format!("node {index} has only a right child"));
                }
                nodes.push(TreeNode::Leaf {
                    value: arrays.value[index],
                });
                continue;
            }

            let feature = usize::try_from(arrays.feature[index])
                .map_err(|_| format!("node {index} splits on invalid feature"))?;
            nodes.push(TreeNode::Split {
                feature,
                threshold: arrays.threshold[index],
                left: child(index, left)?,
                right: child(index, right)?,
            });
        }

        Ok(Self { nodes })
    }
}

fn validate_trees(trees: &[DecisionTree], schema: &FeatureSchema) -> Result<(), ModelError> {
    if trees.is_empty() {
        return Err(ModelError::Invalid {
            message: "ensemble has no trees".to_owned(),
        });
    }
    for (i, tree) in trees.iter().enumerate() {
        if let Some(feature) = tree.max_feature()
            && feature >= schema.len()
        {
            return Err(ModelError::Invalid {
                message: format!(
                    "tree {i} splits on feature {feature} but the schema has {} features",
                    schema.len()
                ),
            });
        }
    }
    Ok(())
}

/// Averaging ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomForestModel {
    /// Input features in model order.
    pub feature_names: FeatureSchema,
    /// Member trees.
    pub trees: Vec<DecisionTree>,
}

impl RandomForestModel {
    /// Checks that the ensemble is non-empty and every split references a
    /// schema feature.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_trees(&self.trees, &self.feature_names)
    }
}

impl RegressionModel for RandomForestModel {
    fn feature_names(&self) -> &FeatureSchema {
        &self.feature_names
    }

    #[allow(clippy::cast_precision_loss)]
    fn predict_ordered(&self, inputs: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(inputs)).sum();
        total / self.trees.len() as f64
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

/// Additive ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradientBoostingModel {
    /// Input features in model order.
    pub feature_names: FeatureSchema,
    /// Baseline prediction before any tree is added.
    pub init: f64,
    /// Shrinkage applied to every tree's output.
    pub learning_rate: f64,
    /// Boosting stages.
    pub trees: Vec<DecisionTree>,
}

impl GradientBoostingModel {
    /// Checks that the ensemble is non-empty and every split references a
    /// schema feature.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_trees(&self.trees, &self.feature_names)
    }
}

impl RegressionModel for GradientBoostingModel {
    fn feature_names(&self) -> &FeatureSchema {
        &self.feature_names
    }

    fn predict_ordered(&self, inputs: &[f64]) -> f64 {
        let stages: f64 = self.trees.iter().map(|t| t.evaluate(inputs)).sum();
        self.learning_rate.mul_add(stages, self.init)
    }

    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `Year <= 2020.5 ? 10 : (State_X <= 0.5 ? 20 : 30)`
    fn stump_json() -> &'static str {
        r#"{
            "children_left":  [1, -1, 3, -1, -1],
            "children_right": [2, -1, 4, -1, -1],
            "feature":        [0, -2, 1, -2, -2],
            "threshold":      [2020.5, -2.0, 0.5, -2.0, -2.0],
            "value":          [0.0, 10.0, 0.0, 20.0, 30.0]
        }"#
    }

    #[test]
    fn evaluates_flattened_tree() {
        let tree: DecisionTree = serde_json::from_str(stump_json()).unwrap();
        assert_eq!(tree.node_count(), 5);
        assert!((tree.evaluate(&[2019.0, 1.0]) - 10.0).abs() < f64::EPSILON);
        assert!((tree.evaluate(&[2030.0, 0.0]) - 20.0).abs() < f64::EPSILON);
        assert!((tree.evaluate(&[2030.0, 1.0]) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_ties_go_left() {
        let tree: DecisionTree = serde_json::from_str(stump_json()).unwrap();
        assert!((tree.evaluate(&[2020.5, 1.0]) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_backward_children() {
        let err = serde_json::from_str::<DecisionTree>(
            r#"{
                "children_left":  [0, -1],
                "children_right": [1, -1],
                "feature":        [0, -2],
                "threshold":      [1.0, -2.0],
                "value":          [0.0, 1.0]
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid child"));
    }

    #[test]
    fn rejects_ragged_arrays() {
        let err = serde_json::from_str::<DecisionTree>(
            r#"{
                "children_left":  [-1],
                "children_right": [-1, -1],
                "feature":        [-2],
                "threshold":      [-2.0],
                "value":          [1.0]
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("disagree"));
    }

    #[test]
    fn forest_averages_trees() {
        let tree: DecisionTree = serde_json::from_str(stump_json()).unwrap();
        let leaf: DecisionTree = serde_json::from_str(
            r#"{"children_left":[-1],"children_right":[-1],"feature":[-2],"threshold":[-2.0],"value":[40.0]}"#,
        )
        .unwrap();
        let forest = RandomForestModel {
            feature_names: FeatureSchema::new(vec!["Year".to_owned(), "State_X".to_owned()])
                .unwrap(),
            trees: vec![tree, leaf],
        };
        forest.validate().unwrap();
        assert!((forest.predict_ordered(&[2019.0, 0.0]) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boosting_scales_and_offsets() {
        let tree: DecisionTree = serde_json::from_str(stump_json()).unwrap();
        let model = GradientBoostingModel {
            feature_names: FeatureSchema::new(vec!["Year".to_owned(), "State_X".to_owned()])
                .unwrap(),
            init: 100.0,
            learning_rate: 0.5,
            trees: vec![tree.clone(), tree],
        };
        model.validate().unwrap();
        assert!((model.predict_ordered(&[2030.0, 1.0]) - 130.0).abs() < f64::EPSILON);
    }

    #[test]
    fn split_on_unknown_feature_is_invalid() {
        let tree: DecisionTree = serde_json::from_str(stump_json()).unwrap();
        let forest = RandomForestModel {
            feature_names: FeatureSchema::new(vec!["Year".to_owned()]).unwrap(),
            trees: vec![tree],
        };
        assert!(matches!(
            forest.validate(),
            Err(ModelError::Invalid { .. })
        ));
    }
}
