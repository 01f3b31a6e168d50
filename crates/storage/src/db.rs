use std::path::Path;

use chrono::NaiveDate;
use fibu_core::Expense;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database, used by tests and available to callers that want a
/// throwaway store.
pub async fn create_db_in_memory() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            vendor TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            category TEXT,
            amount_cents INTEGER NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_duplicate INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category) WHERE category IS NOT NULL",
    )
    .execute(pool)
    .await?;

    Ok(())
}

// ── Expense CRUD ──────────────────────────────────────────────────────────────

pub async fn insert_expense(pool: &DbPool, expense: &Expense) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO expenses (date, vendor, description, category, amount_cents, is_deleted, is_duplicate)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(expense.date.to_string())
    .bind(&expense.vendor)
    .bind(&expense.description)
    .bind(expense.category.as_deref())
    .bind(expense.amount_cents)
    .bind(expense.is_deleted)
    .bind(expense.is_duplicate)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn set_expense_category(
    pool: &DbPool,
    id: i64,
    category: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE expenses SET category = ? WHERE id = ?")
        .bind(category)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn mark_expense_deleted(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE expenses SET is_deleted = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn mark_expense_duplicate(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE expenses SET is_duplicate = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_expenses(pool: &DbPool) -> Result<Vec<Expense>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, date, vendor, description, category, amount_cents, is_deleted, is_duplicate
         FROM expenses WHERE is_deleted = 0 ORDER BY date DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(expense_from_row).collect())
}

// ── Engine-facing queries ─────────────────────────────────────────────────────

/// The training query: every row eligible to feed the categorization model.
/// Soft-deleted rows, duplicate-flagged rows, and rows without a confirmed
/// category never reach the engine.
pub async fn fetch_categorized_expenses(pool: &DbPool) -> Result<Vec<Expense>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, date, vendor, description, category, amount_cents, is_deleted, is_duplicate
         FROM expenses
         WHERE category IS NOT NULL AND TRIM(category) != ''
           AND is_deleted = 0 AND is_duplicate = 0",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(expense_from_row).collect())
}

/// Rows still waiting for a category, newest first; the app suggests
/// categories for these at startup.
pub async fn fetch_uncategorized_expenses(pool: &DbPool) -> Result<Vec<Expense>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        "SELECT id, date, vendor, description, category, amount_cents, is_deleted, is_duplicate
         FROM expenses
         WHERE (category IS NULL OR TRIM(category) = '')
           AND is_deleted = 0 AND is_duplicate = 0
         ORDER BY date DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(expense_from_row).collect())
}

type ExpenseRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    i64,
    i64,
    i64,
);

fn expense_from_row(r: ExpenseRow) -> Expense {
    Expense {
        id: Some(r.0),
        date: NaiveDate::parse_from_str(&r.1, "%Y-%m-%d").unwrap_or_default(),
        vendor: r.2,
        description: r.3,
        category: r.4,
        amount_cents: r.5,
        is_deleted: r.6 != 0,
        is_duplicate: r.7 != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(vendor: &str, category: Option<&str>, amount_cents: i64) -> Expense {
        let mut e = Expense::new(
            NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            vendor,
            "Testbuchung",
            amount_cents,
        );
        e.category = category.map(str::to_string);
        e
    }

    #[tokio::test]
    async fn insert_and_list_roundtrip() {
        let pool = create_db_in_memory().await.unwrap();
        let id = insert_expense(&pool, &expense("Telekom", Some("telecom"), 4999))
            .await
            .unwrap();
        assert!(id > 0);

        let all = list_expenses(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].vendor, "Telekom");
        assert_eq!(all[0].category.as_deref(), Some("telecom"));
        assert_eq!(all[0].amount_cents, 4999);
    }

    #[tokio::test]
    async fn training_query_filters_flags_and_missing_category() {
        let pool = create_db_in_memory().await.unwrap();

        insert_expense(&pool, &expense("Telekom", Some("telecom"), 4999))
            .await
            .unwrap();
        let deleted = insert_expense(&pool, &expense("Hetzner", Some("hosting"), 1200))
            .await
            .unwrap();
        let duplicate = insert_expense(&pool, &expense("Hetzner", Some("hosting"), 1200))
            .await
            .unwrap();
        insert_expense(&pool, &expense("Allianz", None, 9000))
            .await
            .unwrap();
        insert_expense(&pool, &expense("Aral", Some("  "), 6500))
            .await
            .unwrap();

        mark_expense_deleted(&pool, deleted).await.unwrap();
        mark_expense_duplicate(&pool, duplicate).await.unwrap();

        let rows = fetch_categorized_expenses(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vendor, "Telekom");
    }

    #[tokio::test]
    async fn uncategorized_query_excludes_flagged_rows() {
        let pool = create_db_in_memory().await.unwrap();

        insert_expense(&pool, &expense("Allianz", None, 9000))
            .await
            .unwrap();
        let flagged = insert_expense(&pool, &expense("Aral", None, 6500))
            .await
            .unwrap();
        mark_expense_duplicate(&pool, flagged).await.unwrap();

        let rows = fetch_uncategorized_expenses(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vendor, "Allianz");
    }

    #[tokio::test]
    async fn set_category_moves_row_into_training_set() {
        let pool = create_db_in_memory().await.unwrap();
        let id = insert_expense(&pool, &expense("Allianz", None, 9000))
            .await
            .unwrap();
        assert!(fetch_categorized_expenses(&pool).await.unwrap().is_empty());

        set_expense_category(&pool, id, "insurance").await.unwrap();

        let rows = fetch_categorized_expenses(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category.as_deref(), Some("insurance"));
    }

    #[tokio::test]
    async fn create_db_on_disk_is_reopenable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fibu.db");

        {
            let pool = create_db(&path).await.unwrap();
            insert_expense(&pool, &expense("Telekom", Some("telecom"), 4999))
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = create_db(&path).await.unwrap();
        assert_eq!(list_expenses(&pool).await.unwrap().len(), 1);
    }
}
