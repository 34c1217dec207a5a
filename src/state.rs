use crate::config::Config;
use crate::dataset::Dataset;
use crate::ml::ModelBundle;

/// Everything the handlers read: built once at startup, shared immutably
/// through an `Arc`, never written afterwards.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub dataset: Dataset,
    pub models: ModelBundle,
}
