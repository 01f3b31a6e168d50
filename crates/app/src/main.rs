use std::sync::Arc;

use anyhow::Context;
use fibu_categorize::{
    Categorizer, GermanVendorMatcher, RuleTable, SourceError, TrainingRecord, TrainingSource,
};
use fibu_storage::DbPool;
use tokio::runtime::Handle;

/// Bridges the synchronous categorization engine to the async expense store:
/// the engine calls `fetch` from a blocking thread, the adapter drives the
/// query on the runtime it was created on.
struct DbExpenseSource {
    pool: DbPool,
    handle: Handle,
}

impl TrainingSource for DbExpenseSource {
    fn fetch(&self) -> Result<Vec<TrainingRecord>, SourceError> {
        let expenses = self
            .handle
            .block_on(fibu_storage::fetch_categorized_expenses(&self.pool))?;
        Ok(expenses
            .into_iter()
            .map(|e| TrainingRecord {
                vendor: e.vendor,
                description: e.description,
                category: e.category.unwrap_or_default(),
                amount_cents: e.amount_cents,
            })
            .collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let project_dirs = directories::ProjectDirs::from("de", "fibu", "Fibu")
        .context("could not determine data directory")?;
    let data_dir = project_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let db_path = data_dir.join("fibu.db");
    let db = fibu_storage::create_db(&db_path)
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    tracing::info!("expense store ready: {}", db_path.display());

    let source = DbExpenseSource {
        pool: db.clone(),
        handle: Handle::current(),
    };
    let categorizer = Arc::new(Categorizer::new(
        Box::new(source),
        GermanVendorMatcher,
        RuleTable::builtin(),
    ));

    // Train once at startup and report on the model.
    let stats = {
        let categorizer = Arc::clone(&categorizer);
        tokio::task::spawn_blocking(move || {
            categorizer.train()?;
            categorizer.stats()
        })
        .await??
    };
    tracing::info!(
        records = stats.total_records,
        categories = stats.total_categories,
        vendors = stats.total_vendors,
        "categorization model trained"
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);

    // Suggest categories for everything still waiting on one.
    let pending = fibu_storage::fetch_uncategorized_expenses(&db).await?;
    if pending.is_empty() {
        tracing::info!("no uncategorized expenses");
        return Ok(());
    }

    let suggestions = {
        let categorizer = Arc::clone(&categorizer);
        tokio::task::spawn_blocking(move || {
            pending
                .into_iter()
                .map(|e| {
                    let suggested =
                        categorizer.suggest(&e.vendor, &e.description, e.amount_cents)?;
                    Ok((e, suggested))
                })
                .collect::<Result<Vec<_>, fibu_categorize::CategorizeError>>()
        })
        .await??
    };

    for (expense, suggested) in &suggestions {
        match suggested.first() {
            Some(top) => tracing::info!(
                vendor = %expense.vendor,
                category = %top.category,
                confidence = top.confidence,
                reason = %top.reason,
                "suggestion"
            ),
            None => tracing::info!(vendor = %expense.vendor, "no suggestion"),
        }
    }

    Ok(())
}
