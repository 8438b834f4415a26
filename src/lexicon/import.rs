//! Loading delimited frequency dictionaries into SQLite.

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection};

use super::sqlite::quote_identifier;
use super::DEFAULT_KEY_COLUMN;
use crate::error::FluencyError;

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IfExists {
    #[default]
    Fail,
    Replace,
}

const RESERVED_TABLE_NAME: &str = "default";

/// Import a delimited file with a `WordForm` header into `table`.
///
/// The key column is stored first; the other columns keep file order.
/// Returns the number of imported rows.
pub fn import_dictionary(
    csv_path: &Path,
    db_path: &Path,
    table: &str,
    separator: u8,
    if_exists: IfExists,
) -> Result<usize, FluencyError> {
    if table.trim().is_empty() || table == RESERVED_TABLE_NAME {
        return Err(FluencyError::invalid_input(format!(
            "'{table}' cannot be used as a dictionary name"
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .from_path(csv_path)
        .map_err(|e| FluencyError::csv("opening dictionary file", e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FluencyError::csv("reading dictionary header", e))?
        .iter()
        .map(str::to_string)
        .collect();
    let Some(key_index) = headers.iter().position(|h| h == DEFAULT_KEY_COLUMN) else {
        return Err(FluencyError::invalid_input(format!(
            "dictionary file has no '{DEFAULT_KEY_COLUMN}' column"
        )));
    };
    let order: Vec<usize> = std::iter::once(key_index)
        .chain((0..headers.len()).filter(|&i| i != key_index))
        .collect();

    let mut conn =
        Connection::open(db_path).map_err(|e| FluencyError::database("opening database", e))?;
    let tx = conn
        .transaction()
        .map_err(|e| FluencyError::database("starting import", e))?;
    // drop, create and inserts commit together
    prepare_table(&tx, table, &headers, &order, if_exists)?;
    let mut rows = 0usize;
    {
        let placeholders = vec!["?"; order.len()].join(", ");
        let mut insert = tx
            .prepare(&format!(
                "INSERT INTO {} VALUES ({placeholders})",
                quote_identifier(table)
            ))
            .map_err(|e| FluencyError::database("preparing insert", e))?;
        for record in reader.records() {
            let record = record.map_err(|e| FluencyError::csv("reading dictionary row", e))?;
            let values = order.iter().map(|&i| record.get(i).unwrap_or(""));
            insert
                .execute(params_from_iter(values))
                .map_err(|e| FluencyError::database("inserting dictionary row", e))?;
            rows += 1;
        }
    }
    tx.commit()
        .map_err(|e| FluencyError::database("committing import", e))?;

    tracing::info!(table, rows, path = %csv_path.display(), "imported frequency dictionary");
    Ok(rows)
}

fn prepare_table(
    conn: &Connection,
    table: &str,
    headers: &[String],
    order: &[usize],
    if_exists: IfExists,
) -> Result<(), FluencyError> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )
        .map_err(|e| FluencyError::database("checking existing tables", e))?;

    let quoted = quote_identifier(table);
    match (exists, if_exists) {
        (true, IfExists::Fail) => {
            return Err(FluencyError::invalid_input(format!(
                "table '{table}' already exists"
            )));
        }
        (true, IfExists::Replace) => {
            tracing::warn!(table, "replacing existing frequency table");
            conn.execute_batch(&format!("DROP TABLE {quoted};"))
                .map_err(|e| FluencyError::database("dropping existing table", e))?;
        }
        (false, _) => {}
    }

    let columns = order
        .iter()
        .map(|&i| format!("{} TEXT", quote_identifier(&headers[i])))
        .collect::<Vec<_>>()
        .join(", ");
    let index = quote_identifier(&format!("ix_{table}_{DEFAULT_KEY_COLUMN}"));
    conn.execute_batch(&format!(
        "CREATE TABLE {quoted} ({columns});
         CREATE INDEX {index} ON {quoted} (LOWER({}));",
        quote_identifier(DEFAULT_KEY_COLUMN)
    ))
    .map_err(|e| FluencyError::database("creating dictionary table", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{RowLookup, SqliteLexicon};

    fn temp_paths(stem: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir();
        let csv_path = dir.join(format!("dynamicfluency_rs_{stem}.csv"));
        let db_path = dir.join(format!("dynamicfluency_rs_{stem}.db"));
        let _ = std::fs::remove_file(&db_path);
        (csv_path, db_path)
    }

    #[test]
    fn import_puts_key_column_first() {
        let (csv_path, db_path) = temp_paths("import_order");
        std::fs::write(&csv_path, "FREQcount\tWordForm\tLg10WF\n3\taal\t0.6021\n21\tAardvark\t1.3424\n")
            .unwrap();
        let rows = import_dictionary(&csv_path, &db_path, "subtlex", b'\t', IfExists::Fail).unwrap();
        assert_eq!(rows, 2);

        let lexicon = SqliteLexicon::open(&db_path, "subtlex", DEFAULT_KEY_COLUMN).unwrap();
        assert_eq!(lexicon.columns(), ["WordForm", "FREQcount", "Lg10WF"]);
        let row = lexicon.lookup("aardvark").unwrap().expect("row");
        assert_eq!(row[1].1, "21");

        let _ = std::fs::remove_file(&csv_path);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn existing_table_fails_unless_replaced() {
        let (csv_path, db_path) = temp_paths("import_exists");
        std::fs::write(&csv_path, "WordForm,FREQcount\naal,3\n").unwrap();
        import_dictionary(&csv_path, &db_path, "subtlex", b',', IfExists::Fail).unwrap();
        assert!(matches!(
            import_dictionary(&csv_path, &db_path, "subtlex", b',', IfExists::Fail),
            Err(FluencyError::InvalidInput { .. })
        ));

        std::fs::write(&csv_path, "WordForm,FREQcount\naal,4\nab,9\n").unwrap();
        let rows = import_dictionary(&csv_path, &db_path, "subtlex", b',', IfExists::Replace).unwrap();
        assert_eq!(rows, 2);
        let lexicon = SqliteLexicon::open(&db_path, "subtlex", DEFAULT_KEY_COLUMN).unwrap();
        assert_eq!(lexicon.lookup("aal").unwrap().expect("row")[1].1, "4");

        let _ = std::fs::remove_file(&csv_path);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn failed_replace_keeps_previous_table() {
        let (csv_path, db_path) = temp_paths("import_failed_replace");
        std::fs::write(&csv_path, "WordForm,FREQcount\naal,3\n").unwrap();
        import_dictionary(&csv_path, &db_path, "subtlex", b',', IfExists::Fail).unwrap();

        std::fs::write(&csv_path, "WordForm,FREQcount\nab,9\nbad,1,extra\n").unwrap();
        assert!(matches!(
            import_dictionary(&csv_path, &db_path, "subtlex", b',', IfExists::Replace),
            Err(FluencyError::Csv { .. })
        ));

        let lexicon = SqliteLexicon::open(&db_path, "subtlex", DEFAULT_KEY_COLUMN).unwrap();
        assert_eq!(lexicon.lookup("aal").unwrap().expect("row")[1].1, "3");
        assert!(lexicon.lookup("ab").unwrap().is_none());

        let _ = std::fs::remove_file(&csv_path);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn rejects_reserved_name_and_missing_key() {
        let (csv_path, db_path) = temp_paths("import_invalid");
        std::fs::write(&csv_path, "Lemma,FREQcount\naal,3\n").unwrap();
        assert!(matches!(
            import_dictionary(&csv_path, &db_path, "default", b',', IfExists::Fail),
            Err(FluencyError::InvalidInput { .. })
        ));
        assert!(matches!(
            import_dictionary(&csv_path, &db_path, "subtlex", b',', IfExists::Fail),
            Err(FluencyError::InvalidInput { .. })
        ));
        let _ = std::fs::remove_file(&csv_path);
        let _ = std::fs::remove_file(&db_path);
    }
}
