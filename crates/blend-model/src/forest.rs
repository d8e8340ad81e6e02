//! Multi-output random forest regressor.
//!
//! The forest is exported from training as JSON:
//!
//! ```json
//! {
//!   "feature_names": ["Component1_fraction", "...", "WeightedAvg_Property10"],
//!   "n_outputs": 10,
//!   "trees": [
//!     { "nodes": [
//!         { "split": { "feature": 0, "threshold": 0.25, "left": 1, "right": 2 } },
//!         { "leaf": { "values": [0.1, 0.2, "..."] } },
//!         { "leaf": { "values": [0.3, 0.4, "..."] } }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Node 0 is the root of each tree. A row goes to `left` when its feature value
//! is `<= threshold`. The forest prediction is the mean of the leaf values
//! reached in every tree.

use crate::error::{ModelError, Result};
use crate::predictor::{FeatureMatrix, Predictor, check_feature_names};
use crate::types::{ModelInfo, PredictionMatrix};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A node of a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        values: Vec<f64>,
    },
}

/// A single regression tree stored as a flat node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Leaf values reached by `row`.
    ///
    /// Relies on the invariants checked by [`ForestModel::validate`]: children
    /// always point forward, so the walk terminates.
    fn leaf_for(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { values } => return values,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// A random forest that averages the outputs of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    feature_names: Vec<String>,
    n_outputs: usize,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Build a forest from parts, validating its structure.
    pub fn new(feature_names: Vec<String>, n_outputs: usize, trees: Vec<Tree>) -> Result<Self> {
        let model = Self {
            feature_names,
            n_outputs,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    /// Loads a forest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`ModelError::ModelNotFound`])
    /// - The file is not valid model JSON ([`ModelError::Json`])
    /// - The forest structure is inconsistent ([`ModelError::InvalidModel`])
    #[must_use = "returns the loaded model; use it or handle the error"]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ModelError::ModelNotFound {
                path: path.display().to_string(),
            });
        }

        let json = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&json)?;
        info!(
            "Loaded random forest from {} ({} trees, {} features, {} outputs)",
            path.display(),
            model.trees.len(),
            model.feature_names.len(),
            model.n_outputs
        );
        Ok(model)
    }

    /// Parses and validates a forest from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Saves the forest as JSON. Parent directories must exist.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Metadata about the forest.
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: "random_forest".to_string(),
            n_estimators: self.trees.len(),
            n_outputs: self.n_outputs,
            feature_names: self.feature_names.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.n_outputs == 0 {
            return Err(ModelError::InvalidModel("n_outputs must be at least 1".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidModel("forest has no trees".to_string()));
        }

        let n_features = self.feature_names.len();
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::InvalidModel(format!("tree {} has no nodes", t)));
            }
            let n_nodes = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= n_features {
                            return Err(ModelError::InvalidModel(format!(
                                "tree {} node {} splits on feature {} but the model has {} features",
                                t, i, feature, n_features
                            )));
                        }
                        if threshold.is_nan() {
                            return Err(ModelError::InvalidModel(format!(
                                "tree {} node {} has a NaN threshold",
                                t, i
                            )));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= n_nodes {
                                return Err(ModelError::InvalidModel(format!(
                                    "tree {} node {} points to invalid child {}",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    Node::Leaf { values } => {
                        if values.len() != self.n_outputs {
                            return Err(ModelError::InvalidModel(format!(
                                "tree {} leaf {} has {} values, expected {}",
                                t,
                                i,
                                values.len(),
                                self.n_outputs
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64], out: &mut [f64]) {
        out.fill(0.0);
        for tree in &self.trees {
            for (acc, value) in out.iter_mut().zip(tree.leaf_for(row)) {
                *acc += value;
            }
        }
        let n_trees = self.trees.len() as f64;
        for acc in out.iter_mut() {
            *acc /= n_trees;
        }
    }
}

impl Predictor for ForestModel {
    fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }

    fn predict(&self, features: &DataFrame) -> Result<PredictionMatrix> {
        check_feature_names(features, &self.feature_names)?;
        let matrix = FeatureMatrix::from_dataframe(features)?;

        let n_rows = matrix.n_rows();
        let mut values = vec![0.0; n_rows * self.n_outputs];
        values
            .par_chunks_mut(self.n_outputs)
            .enumerate()
            .for_each(|(row, out)| self.predict_row(matrix.row(row), out));

        debug!("Scored {} rows with {} trees", n_rows, self.trees.len());
        PredictionMatrix::new(values, n_rows, self.n_outputs)
    }
}

// A single forest instance is shared across request threads.
static_assertions::assert_impl_all!(ForestModel: Send, Sync);
