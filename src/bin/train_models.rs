//! Offline trainer: builds both model artifacts from the source CSVs.
//!
//! Run once, outside the service lifecycle. The server never trains; it only
//! loads the JSON artifacts this binary writes.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use olympics_ml_backend::dataset;
use olympics_ml_backend::ml::{
    LogisticRegression, ModelBundle, RandomForestClassifier, training,
};
use olympics_ml_backend::Config;

const SPLIT_SEED: u64 = 42;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "olympics_ml_backend=info,train_models=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let ds = dataset::load_dataset(&config.athletes_csv, &config.regions_csv)?;
    tracing::info!("Loaded {} athlete event rows", ds.len());

    let set = training::build_training_set(&ds);
    anyhow::ensure!(!set.is_empty(), "no trainable rows after filtering");
    let positives = set.y.iter().filter(|&&l| l == 1).count();
    tracing::info!(
        "Training on {} rows ({} medalists, {} non-medalists)",
        set.len(),
        positives,
        set.len() - positives
    );

    let (train, test) = training::train_test_split(&set, 0.2, SPLIT_SEED);

    let mut lr = LogisticRegression::new();
    lr.fit(&train.x, &train.y)?;
    let lr_accuracy = training::accuracy(|row| lr.predict_proba(row), &test);
    tracing::info!("LR Accuracy: {:.4}", lr_accuracy);

    let mut rf = RandomForestClassifier::new();
    rf.fit(&train.x, &train.y)?;
    let rf_accuracy = training::accuracy(|row| rf.predict_proba(row), &test);
    tracing::info!("RF Accuracy: {:.4}", rf_accuracy);

    let bundle = ModelBundle { lr, rf };
    bundle.save(&config.lr_model_path, &config.rf_model_path)?;
    tracing::info!(
        "Saved model artifacts to {} and {}",
        config.lr_model_path,
        config.rf_model_path
    );

    Ok(())
}
