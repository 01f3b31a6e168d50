pub mod db;

pub use db::{
    create_db, create_db_in_memory, fetch_categorized_expenses, fetch_uncategorized_expenses, insert_expense,
    list_expenses, mark_expense_deleted, mark_expense_duplicate, set_expense_category, DbPool,
};
pub use fibu_core::Expense;
