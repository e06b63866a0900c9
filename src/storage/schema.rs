//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Log table schema.
#[derive(Iden)]
pub enum CostLogs {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "message"]
    Message,
}

/// SQL for creating the log table.
///
/// `message` is nullable so that rows written by other tools can be read
/// back and reported instead of failing the whole scan.
pub const CREATE_COST_LOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cost_logs (
    id TEXT PRIMARY KEY,
    message TEXT
)
"#;
