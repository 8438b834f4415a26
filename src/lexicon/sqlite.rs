//! SQLite-backed frequency dictionary.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::{Row, RowLookup};
use crate::annotation::repetitions::format_score;
use crate::error::FluencyError;

pub struct SqliteLexicon {
    conn: Connection,
    table: String,
    key_column: String,
    columns: Vec<String>,
}

impl SqliteLexicon {
    /// Open an existing database read-only.
    pub fn open(path: &Path, table: &str, key_column: &str) -> Result<Self, FluencyError> {
        if !path.is_file() {
            return Err(FluencyError::invalid_input(format!(
                "database {} does not exist",
                path.display()
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| FluencyError::database("opening frequency database", e))?;
        Self::from_connection(conn, table, key_column)
    }

    pub fn from_connection(
        conn: Connection,
        table: &str,
        key_column: &str,
    ) -> Result<Self, FluencyError> {
        let columns = table_columns(&conn, table)?;
        if columns.is_empty() {
            return Err(FluencyError::invalid_input(format!(
                "table '{table}' not found in frequency database"
            )));
        }
        if !columns.iter().any(|column| column == key_column) {
            return Err(FluencyError::invalid_input(format!(
                "table '{table}' has no '{key_column}' column"
            )));
        }
        tracing::debug!(table, columns = columns.len(), "opened frequency table");
        Ok(Self {
            conn,
            table: table.to_string(),
            key_column: key_column.to_string(),
            columns,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl RowLookup for SqliteLexicon {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn key_column(&self) -> &str {
        &self.key_column
    }

    fn lookup(&self, key: &str) -> Result<Option<Row>, FluencyError> {
        let sql = format!(
            "SELECT * FROM {} WHERE LOWER({}) = LOWER(?1) LIMIT 1",
            quote_identifier(&self.table),
            quote_identifier(&self.key_column)
        );
        let mut stmt = self
            .conn
            .prepare_cached(&sql)
            .map_err(|e| FluencyError::database("preparing frequency lookup", e))?;
        stmt.query_row(params![key], |row| {
            self.columns
                .iter()
                .enumerate()
                .map(|(i, column)| Ok((column.clone(), value_to_string(row.get_ref(i)?))))
                .collect::<rusqlite::Result<Row>>()
        })
        .optional()
        .map_err(|e| FluencyError::database("looking up word", e))
    }
}

pub(crate) fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, FluencyError> {
    let sql = format!("PRAGMA table_info({})", quote_identifier(table));
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| FluencyError::database("reading table columns", e))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| FluencyError::database("reading table columns", e))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| FluencyError::database("reading table columns", e))?;
    Ok(columns)
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format_score(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_lexicon() -> SqliteLexicon {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE "subtlex" ("WordForm" TEXT, "FREQcount" INTEGER, "Lg10WF" REAL, "Note" TEXT);
            INSERT INTO "subtlex" VALUES ('The', 1501908, 6.1766, NULL);
            INSERT INTO "subtlex" VALUES ('aal', 3, 0.6021, 'rare');
            "#,
        )
        .unwrap();
        SqliteLexicon::from_connection(conn, "subtlex", "WordForm").unwrap()
    }

    #[test]
    fn columns_in_table_order() {
        let lexicon = memory_lexicon();
        assert_eq!(lexicon.columns(), ["WordForm", "FREQcount", "Lg10WF", "Note"]);
        assert_eq!(lexicon.table(), "subtlex");
    }

    #[test]
    fn lookup_is_case_insensitive_and_exact() {
        let lexicon = memory_lexicon();
        let row = lexicon.lookup("THE").unwrap().expect("row for 'the'");
        assert_eq!(row[1], ("FREQcount".to_string(), "1501908".to_string()));
        assert_eq!(row[2].1, "6.1766");
        assert_eq!(row[3].1, "");
        assert!(lexicon.lookup("th").unwrap().is_none());
        assert!(lexicon.lookup("%").unwrap().is_none());
    }

    #[test]
    fn missing_table_or_key_column_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(r#"CREATE TABLE "t" ("Lemma" TEXT);"#).unwrap();
        assert!(matches!(
            SqliteLexicon::from_connection(conn, "t", "WordForm"),
            Err(FluencyError::InvalidInput { .. })
        ));
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            SqliteLexicon::from_connection(conn, "absent", "WordForm"),
            Err(FluencyError::InvalidInput { .. })
        ));
    }

    #[test]
    fn missing_database_file_is_rejected() {
        let err = SqliteLexicon::open(Path::new("/nonexistent/freq.db"), "subtlex", "WordForm")
            .err()
            .expect("open should fail");
        assert!(matches!(err, FluencyError::InvalidInput { .. }));
    }

    #[test]
    fn real_values_keep_a_fractional_part() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE "t" ("WordForm" TEXT, "Zipf" REAL);
            INSERT INTO "t" VALUES ('six', 6.0);
            INSERT INTO "t" VALUES ('tiny', 0.00001);
            "#,
        )
        .unwrap();
        let lexicon = SqliteLexicon::from_connection(conn, "t", "WordForm").unwrap();
        assert_eq!(lexicon.lookup("six").unwrap().expect("row")[1].1, "6.0");
        assert_eq!(lexicon.lookup("tiny").unwrap().expect("row")[1].1, "1e-05");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
