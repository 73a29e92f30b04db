use crate::error::{CharFreqError, Result};
use crate::freq::{CharCounter, Collection, FrequencyTable};
use crate::model::{RepoId, SCHEMA_VERSION};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// SQLite file holding one persisted [`Collection`].
pub struct FreqStore {
    conn: Connection,
    path: PathBuf,
}

impl FreqStore {
    pub fn exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(&path)?;
        let mut store = Self { conn, path };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS repos (
                id TEXT PRIMARY KEY
            );
            CREATE TABLE IF NOT EXISTS extensions (
                repo TEXT NOT NULL,
                extension TEXT NOT NULL,
                PRIMARY KEY (repo, extension),
                FOREIGN KEY (repo) REFERENCES repos(id)
            );
            CREATE TABLE IF NOT EXISTS char_counts (
                repo TEXT NOT NULL,
                extension TEXT NOT NULL,
                ch TEXT NOT NULL,
                count INTEGER NOT NULL,
                PRIMARY KEY (repo, extension, ch),
                FOREIGN KEY (repo, extension) REFERENCES extensions(repo, extension)
            );
            CREATE INDEX IF NOT EXISTS idx_char_counts_ch ON char_counts(ch);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(CharFreqError::Store(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Read every persisted table into a fresh collection bound to this store.
    pub fn load(&self) -> Result<Collection> {
        let mut repos: BTreeMap<RepoId, FrequencyTable> = BTreeMap::new();

        let mut stmt = self.conn.prepare("SELECT id FROM repos")?;
        for id in stmt.query_map([], |row| row.get::<_, String>(0))? {
            repos.insert(id?, FrequencyTable::new());
        }

        let mut stmt = self.conn.prepare("SELECT repo, extension FROM extensions")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (repo, extension) = row?;
            repos
                .entry(repo)
                .or_default()
                .append_counter(&extension, &CharCounter::new());
        }

        let mut stmt = self
            .conn
            .prepare("SELECT repo, extension, ch, count FROM char_counts")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;
        for row in rows {
            let (repo, extension, ch, count) = row?;
            let ch = single_char(&ch)?;
            let count = u64::try_from(count)
                .map_err(|_| CharFreqError::Store(format!("Negative count {count} for {ch:?}")))?;
            let counter: CharCounter = [(ch, count)].into_iter().collect();
            repos.entry(repo).or_default().append_counter(&extension, &counter);
        }

        Ok(Collection::from_tables(repos, Some(self.path.clone())))
    }

    /// Replace the persisted state with `collection` in a single transaction.
    pub fn dump(&mut self, collection: &Collection) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "
            DELETE FROM char_counts;
            DELETE FROM extensions;
            DELETE FROM repos;
            ",
        )?;

        let mut insert_repo_stmt = tx.prepare("INSERT INTO repos (id) VALUES (?)")?;
        let mut insert_ext_stmt =
            tx.prepare("INSERT INTO extensions (repo, extension) VALUES (?, ?)")?;
        let mut insert_count_stmt = tx.prepare(
            "INSERT INTO char_counts (repo, extension, ch, count) VALUES (?, ?, ?, ?)",
        )?;

        for (repo, table) in collection.iter() {
            insert_repo_stmt.execute(params![repo])?;
            for (extension, counter) in table.extensions() {
                insert_ext_stmt.execute(params![repo, extension])?;
                for (ch, count) in counter.iter() {
                    let count = i64::try_from(count)
                        .map_err(|_| CharFreqError::Store(format!("Count overflow for {ch:?}")))?;
                    insert_count_stmt.execute(params![repo, extension, ch.to_string(), count])?;
                }
            }
        }

        drop(insert_repo_stmt);
        drop(insert_ext_stmt);
        drop(insert_count_stmt);

        tx.commit()?;
        Ok(())
    }
}

fn single_char(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(CharFreqError::Store(format!("Malformed character key {s:?}"))),
    }
}
