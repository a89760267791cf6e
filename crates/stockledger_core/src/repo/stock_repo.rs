//! Ledger store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable persistence APIs over the canonical `stock_records`
//!   table: key lookups, insert, quantity updates, delete, full scan.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The store does not enforce (item_type, description) uniqueness; the
//!   inventory service owns that invariant.
//! - `insert` leaves `last_exit_at` absent; the entry/exit update paths
//!   each touch only their own timestamp column.
//! - Read paths reject rows with non-positive quantity instead of masking
//!   them.

use crate::db::DbError;
use crate::model::record::{RecordId, RecordValidationError, StockRecord};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STOCK_SELECT_SQL: &str = "SELECT
    id,
    item_type,
    description,
    quantity,
    last_entry_at,
    last_exit_at
FROM stock_records";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "item_type",
    "description",
    "quantity",
    "last_entry_at",
    "last_exit_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for ledger persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(RecordId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "stock record not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted ledger data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "ledger connection is not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "ledger is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "ledger table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Ledger store interface for stock record persistence.
pub trait StockRepository {
    /// Finds the record matching both key fields exactly, if any.
    fn find_by_natural_key(
        &self,
        item_type: &str,
        description: &str,
    ) -> RepoResult<Option<StockRecord>>;
    /// Finds a record by its store-assigned id.
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<StockRecord>>;
    /// Creates a record with no exit timestamp and returns the assigned id.
    ///
    /// The caller has already verified no natural-key collision exists.
    fn insert(
        &self,
        item_type: &str,
        description: &str,
        quantity: i64,
        entry_at: i64,
    ) -> RepoResult<RecordId>;
    /// Sets quantity and the stock-in timestamp; exit timestamp untouched.
    fn update_quantity_on_entry(
        &self,
        id: RecordId,
        quantity: i64,
        entry_at: i64,
    ) -> RepoResult<()>;
    /// Sets quantity and the stock-out timestamp; entry timestamp untouched.
    fn update_quantity_on_exit(&self, id: RecordId, quantity: i64, exit_at: i64)
        -> RepoResult<()>;
    /// Removes the record entirely.
    fn delete(&self, id: RecordId) -> RepoResult<()>;
    /// Returns a fresh full snapshot in stable id order.
    fn list_all(&self) -> RepoResult<Vec<StockRecord>>;
}

/// SQLite-backed ledger store.
pub struct SqliteStockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStockRepository<'conn> {
    /// Constructs a store from a migrated, ready connection.
    ///
    /// Rejects connections whose schema has not been applied or whose
    /// `stock_records` shape is incompatible, so later operations cannot
    /// fail halfway through a mutation.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StockRepository for SqliteStockRepository<'_> {
    fn find_by_natural_key(
        &self,
        item_type: &str,
        description: &str,
    ) -> RepoResult<Option<StockRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STOCK_SELECT_SQL}
             WHERE item_type = ?1 AND description = ?2
             ORDER BY id
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query(params![item_type, description])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_stock_row(row)?));
        }

        Ok(None)
    }

    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<StockRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STOCK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_stock_row(row)?));
        }

        Ok(None)
    }

    fn insert(
        &self,
        item_type: &str,
        description: &str,
        quantity: i64,
        entry_at: i64,
    ) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO stock_records (item_type, description, quantity, last_entry_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![item_type, description, quantity, entry_at],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_quantity_on_entry(
        &self,
        id: RecordId,
        quantity: i64,
        entry_at: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE stock_records
             SET quantity = ?2, last_entry_at = ?3
             WHERE id = ?1;",
            params![id, quantity, entry_at],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn update_quantity_on_exit(
        &self,
        id: RecordId,
        quantity: i64,
        exit_at: i64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE stock_records
             SET quantity = ?2, last_exit_at = ?3
             WHERE id = ?1;",
            params![id, quantity, exit_at],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM stock_records WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<StockRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STOCK_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_stock_row(row)?);
        }

        Ok(records)
    }
}

fn parse_stock_row(row: &Row<'_>) -> RepoResult<StockRecord> {
    let record = StockRecord {
        id: row.get("id")?,
        item_type: row.get("item_type")?,
        description: row.get("description")?,
        quantity: row.get("quantity")?,
        last_entry_at: row.get("last_entry_at")?,
        last_exit_at: row.get("last_exit_at")?,
    };
    record.validate()?;
    Ok(record)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = crate::db::migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type = 'table' AND name = 'stock_records'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("stock_records"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('stock_records');")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(0)?);
    }

    for &column in REQUIRED_COLUMNS {
        if !present.iter().any(|name| name.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "stock_records",
                column,
            });
        }
    }

    Ok(())
}
