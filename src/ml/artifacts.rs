//! JSON persistence for the pre-trained model artifacts.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::ServiceError;
use crate::ml::{LogisticRegression, RandomForestClassifier};

/// Both pre-trained models, loaded read-only at startup and never mutated.
#[derive(Debug)]
pub struct ModelBundle {
    pub lr: LogisticRegression,
    pub rf: RandomForestClassifier,
}

impl ModelBundle {
    pub fn load<P: AsRef<Path>>(lr_path: P, rf_path: P) -> Result<Self, ServiceError> {
        let lr = load_model(lr_path.as_ref())?;
        info!(path = %lr_path.as_ref().display(), "Logistic regression model loaded");
        let rf: RandomForestClassifier = load_model(rf_path.as_ref())?;
        info!(
            path = %rf_path.as_ref().display(),
            trees = rf.n_trees(),
            "Random forest model loaded"
        );
        Ok(Self { lr, rf })
    }

    pub fn save<P: AsRef<Path>>(&self, lr_path: P, rf_path: P) -> Result<(), ServiceError> {
        save_model(&self.lr, lr_path.as_ref())?;
        save_model(&self.rf, rf_path.as_ref())?;
        Ok(())
    }
}

fn load_model<T: DeserializeOwned>(path: &Path) -> Result<T, ServiceError> {
    let file = File::open(path).map_err(|e| {
        ServiceError::Artifact(format!("failed to open {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn save_model<T: Serialize>(model: &T, path: &Path) -> Result<(), ServiceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), model)?;
    Ok(())
}
