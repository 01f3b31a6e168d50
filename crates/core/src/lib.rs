pub mod expense;
pub mod normalize;

pub use expense::Expense;
pub use normalize::{levenshtein, normalize_vendor};
