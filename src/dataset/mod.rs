pub mod loader;
pub mod table;

pub use loader::load_dataset;
pub use table::{AthleteRow, Dataset, Medal, Sex};
