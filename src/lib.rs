//! Olympics ML backend: read-only query endpoints over the historical
//! athlete-events table plus medal-probability scoring against pre-trained
//! models. The server binary lives in `main.rs`; the offline trainer that
//! produces the model artifacts is `bin/train_models.rs`.

pub mod config;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod routes;
pub mod state;
pub mod stats;

pub use config::Config;
pub use dataset::{AthleteRow, Dataset};
pub use error::ServiceError;
pub use ml::ModelBundle;
pub use state::AppState;
