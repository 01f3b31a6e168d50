pub mod keywords;
pub mod model;
pub mod rules;
pub mod service;
pub mod stats;
pub mod store;
pub mod suggest;
pub mod vendor;

pub use model::{Model, TrainingRecord};
pub use rules::{RuleError, RuleTable, VendorRule};
pub use service::{CategorizeError, Categorizer, SourceError, TrainingSource};
pub use stats::{CategoryCoverage, ModelStats, VendorSummary};
pub use store::ModelStore;
pub use suggest::Suggestion;
pub use vendor::{similarity, GermanVendorMatcher, VendorMatcher};
