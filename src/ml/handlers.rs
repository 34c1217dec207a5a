use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::ml::{FEATURE_NAMES, encode_sex};
use crate::state::AppState;

/// Static description of the fitted models: linear coefficients and forest
/// feature importances, keyed by feature name. Nothing is computed per
/// request beyond reading the loaded artifacts.
pub async fn train_model(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut features = Map::new();
    for (name, coef) in FEATURE_NAMES.iter().zip(state.models.lr.coefficients()) {
        features.insert((*name).to_string(), json!(coef));
    }
    let mut importance = Map::new();
    for (name, imp) in FEATURE_NAMES.iter().zip(state.models.rf.feature_importances()) {
        importance.insert((*name).to_string(), json!(imp));
    }
    Json(json!({
        "features": features,
        "feature_importance": importance,
        "model": "Pre-trained Logistic Regression + Random Forest"
    }))
}

fn default_height() -> f64 {
    170.0
}

fn default_weight() -> f64 {
    70.0
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    age: f64,
    sex: String,
    #[serde(default = "default_height")]
    height: f64,
    #[serde(default = "default_weight")]
    weight: f64,
}

/// Scores the ensemble classifier on the supplied inputs. Inputs are not
/// range-checked; any numeric value is accepted.
pub async fn predict_medal(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictParams>,
) -> Json<Value> {
    let sex_enc = encode_sex(&params.sex);
    let features = [params.age, sex_enc, params.height, params.weight];
    let proba = state.models.rf.predict_proba(&features);

    Json(json!({
        "medal_probability": round2(proba * 100.0),
        "model": "Random Forest",
        "inputs": {
            "age": params.age,
            "sex": params.sex,
            "height": params.height,
            "weight": params.weight
        }
    }))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(99.996), 100.0);
    }
}
