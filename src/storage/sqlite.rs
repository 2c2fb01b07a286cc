//! SQLite-backed catalog implementations.
//!
//! Durability is deliberately relaxed (`PRAGMA synchronous = OFF`,
//! `journal_mode = MEMORY`): working and master catalogs are
//! rebuildable artifacts, not systems of record (spec §6).

use std::path::Path;

use rusqlite::Connection;

use crate::error::CatalogError;

use super::{MasterCatalog, WorkingCatalog};

/// A working catalog backed by a SQLite table `(filepath PRIMARY KEY, signature)`.
pub struct SqliteWorkingCatalog {
    conn: Connection,
}

impl SqliteWorkingCatalog {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch(
            "PRAGMA synchronous = OFF;
             PRAGMA journal_mode = MEMORY;
             CREATE TABLE IF NOT EXISTS signatures (
                 filepath TEXT PRIMARY KEY,
                 signature TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory catalog, handy for tests.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS signatures (
                 filepath TEXT PRIMARY KEY,
                 signature TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }
}

impl WorkingCatalog for SqliteWorkingCatalog {
    fn insert(&mut self, filepath: &str, signature: &str) -> Result<(), CatalogError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO signatures (filepath, signature) VALUES (?1, ?2)",
            rusqlite::params![filepath, signature],
        )?;
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[(String, String)]) -> Result<(), CatalogError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO signatures (filepath, signature) VALUES (?1, ?2)",
            )?;
            for (filepath, signature) in rows {
                stmt.execute(rusqlite::params![filepath, signature])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn scan(&self) -> Result<Vec<(String, String)>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT filepath, signature FROM signatures ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn delete(&mut self, filepath: &str) -> Result<(), CatalogError> {
        self.conn
            .execute("DELETE FROM signatures WHERE filepath = ?1", [filepath])?;
        Ok(())
    }

    fn delete_many(&mut self, filepaths: &[String]) -> Result<(), CatalogError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM signatures WHERE filepath = ?1")?;
            for filepath in filepaths {
                stmt.execute([filepath])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn compact(&mut self) -> Result<(), CatalogError> {
        self.conn.execute_batch("VACUUM;")?;
        Ok(())
    }
}

/// A master catalog backed by a SQLite table `(name PRIMARY KEY, signature)`.
pub struct SqliteMasterCatalog {
    conn: Connection,
}

impl SqliteMasterCatalog {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch(
            "PRAGMA synchronous = OFF;
             PRAGMA journal_mode = MEMORY;
             CREATE TABLE IF NOT EXISTS master_signatures (
                 name TEXT PRIMARY KEY,
                 signature TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }

    /// Open an existing master catalog read-only (spec: a supplied
    /// pre-existing master is read-only).
    pub fn open_readonly(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        )
        .map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS master_signatures (
                 name TEXT PRIMARY KEY,
                 signature TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }
}

impl MasterCatalog for SqliteMasterCatalog {
    fn upsert(&mut self, name: &str, signature: &str) -> Result<(), CatalogError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO master_signatures (name, signature) VALUES (?1, ?2)",
            rusqlite::params![name, signature],
        )?;
        Ok(())
    }

    fn scan_signatures(&self) -> Result<Vec<String>, CatalogError> {
        let mut stmt = self.conn.prepare("SELECT signature FROM master_signatures")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_scan_delete_roundtrip() {
        let mut cat = SqliteWorkingCatalog::open_in_memory().unwrap();
        cat.insert("a.txt", "deadbeef").unwrap();
        cat.insert("b.txt", "cafef00d").unwrap();

        let mut rows = cat.scan().unwrap();
        rows.sort();
        assert_eq!(
            rows,
            vec![
                ("a.txt".to_string(), "deadbeef".to_string()),
                ("b.txt".to_string(), "cafef00d".to_string()),
            ]
        );

        cat.delete("a.txt").unwrap();
        let rows = cat.scan().unwrap();
        assert_eq!(rows, vec![("b.txt".to_string(), "cafef00d".to_string())]);
    }

    #[test]
    fn insert_or_replace_is_upsert() {
        let mut cat = SqliteWorkingCatalog::open_in_memory().unwrap();
        cat.insert("a.txt", "111").unwrap();
        cat.insert("a.txt", "222").unwrap();
        let rows = cat.scan().unwrap();
        assert_eq!(rows, vec![("a.txt".to_string(), "222".to_string())]);
    }

    #[test]
    fn batch_insert_and_delete_many() {
        let mut cat = SqliteWorkingCatalog::open_in_memory().unwrap();
        let rows = vec![
            ("a.txt".to_string(), "111".to_string()),
            ("b.txt".to_string(), "222".to_string()),
            ("c.txt".to_string(), "333".to_string()),
        ];
        cat.insert_batch(&rows).unwrap();
        assert_eq!(cat.scan().unwrap().len(), 3);

        cat.delete_many(&["a.txt".to_string(), "c.txt".to_string()])
            .unwrap();
        let remaining = cat.scan().unwrap();
        assert_eq!(remaining, vec![("b.txt".to_string(), "222".to_string())]);
    }

    #[test]
    fn master_catalog_upsert_is_primary_key() {
        let mut master = SqliteMasterCatalog::open_in_memory().unwrap();
        master.upsert("cluster.a1b2c", "deadbeef").unwrap();
        master.upsert("cluster.a1b2c", "cafef00d").unwrap();
        let sigs = master.scan_signatures().unwrap();
        assert_eq!(sigs, vec!["cafef00d".to_string()]);
    }
}
