use std::sync::Arc;

use thiserror::Error;

use crate::model::{Model, TrainingRecord};
use crate::rules::RuleTable;
use crate::stats::{self, ModelStats};
use crate::store::ModelStore;
use crate::suggest::{self, Suggestion};
use crate::vendor::VendorMatcher;

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// The historical data source: yields all rows eligible for training
/// (category confirmed, not soft-deleted, not duplicate-flagged). The engine
/// owns no schema or persistence logic.
pub trait TrainingSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<TrainingRecord>, SourceError>;
}

impl<F> TrainingSource for F
where
    F: Fn() -> Result<Vec<TrainingRecord>, SourceError> + Send + Sync,
{
    fn fetch(&self) -> Result<Vec<TrainingRecord>, SourceError> {
        self()
    }
}

#[derive(Debug, Error)]
pub enum CategorizeError {
    /// A failed source query is passed through untouched: no retry, no
    /// reinterpretation. Everything else the engine treats as a valid,
    /// merely empty, input.
    #[error("training data source failed: {0}")]
    Source(#[from] SourceError),
}

/// Facade over the whole engine: owns the data source, the vendor matcher,
/// the rule table, and the model store. One instance per application context;
/// all operations take `&self` (see `ModelStore` for the swap discipline).
pub struct Categorizer<M: VendorMatcher> {
    source: Box<dyn TrainingSource>,
    matcher: M,
    rules: RuleTable,
    store: ModelStore,
}

impl<M: VendorMatcher> Categorizer<M> {
    pub fn new(source: Box<dyn TrainingSource>, matcher: M, rules: RuleTable) -> Self {
        Self {
            source,
            matcher,
            rules,
            store: ModelStore::new(),
        }
    }

    /// Fetches the history, builds a fresh model, and swaps it in. Zero
    /// records is a valid outcome (empty model); only a failing source query
    /// is an error.
    pub fn train(&self) -> Result<(), CategorizeError> {
        self.train_installed()?;
        Ok(())
    }

    /// Suggests categories for a new expense, training first if no model is
    /// installed yet.
    pub fn suggest(
        &self,
        vendor: &str,
        description: &str,
        amount_cents: i64,
    ) -> Result<Vec<Suggestion>, CategorizeError> {
        let model = self.ensure_trained()?;
        Ok(suggest::suggest(
            &model,
            &self.rules,
            &self.matcher,
            vendor,
            description,
            amount_cents,
        ))
    }

    /// Read-only model summary, training first if necessary.
    pub fn stats(&self) -> Result<ModelStats, CategorizeError> {
        let model = self.ensure_trained()?;
        Ok(stats::report(&model))
    }

    /// Discards the installed model; the next call trains from scratch.
    pub fn reset(&self) {
        self.store.reset();
    }

    pub fn is_trained(&self) -> bool {
        self.store.is_trained()
    }

    fn ensure_trained(&self) -> Result<Arc<Model>, CategorizeError> {
        if let Some(model) = self.store.current() {
            return Ok(model);
        }
        self.train_installed()
    }

    fn train_installed(&self) -> Result<Arc<Model>, CategorizeError> {
        let records = self.source.fetch()?;
        let model = Model::train(&records, &self.matcher);
        Ok(self.store.install(model))
    }
}
