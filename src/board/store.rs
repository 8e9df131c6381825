// Reading and writing the CSV backing file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::board::*;

/// The CSV file holding the whole standings table.
///
/// Every load reads the complete file and every save rewrites it. There is
/// no locking: the last save wins.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    layout: Layout,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>, layout: Layout) -> Store {
        Store {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    /// Writes the starter table if the file does not exist yet.
    /// Returns true if the file was created.
    pub fn initialize(&self) -> BoardResult<bool> {
        if self.path.exists() {
            debug!("initialize: {:?} already exists", self.path);
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context(CreateDirSnafu {
                    path: parent.display().to_string(),
                })?;
            }
        }
        self.save(&Table::seeded(self.layout))?;
        Ok(true)
    }

    /// Reads the whole table, in file order.
    pub fn load(&self) -> BoardResult<Table> {
        let path = self.path_str();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .context(CsvOpenSnafu { path: path.clone() })?;

        let header = rdr
            .headers()
            .context(CsvLineParseSnafu {
                path: path.clone(),
                lineno: 1_usize,
            })?
            .clone();
        let column_idx = |column: &str| -> BoardResult<usize> {
            header
                .iter()
                .position(|h| h == column)
                .context(MissingColumnSnafu {
                    path: path.clone(),
                    column,
                })
        };
        let event_idx = column_idx(EVENT_COLUMN)?;
        let category_idx = if self.layout.is_categorized() {
            Some(column_idx(CATEGORY_COLUMN)?)
        } else {
            None
        };
        let place_idx: Vec<usize> = Place::ALL
            .iter()
            .map(|p| column_idx(p.column()))
            .collect::<BoardResult<Vec<usize>>>()?;

        let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
        let mut rows: Vec<Standing> = Vec::new();
        for (idx, line_r) in rdr.records().enumerate() {
            // The header is line 1.
            let lineno = idx + 2;
            let line = line_r.context(CsvLineParseSnafu {
                path: path.clone(),
                lineno,
            })?;
            let field = |i: usize, column: &str| -> BoardResult<String> {
                line.get(i)
                    .map(|s| s.to_string())
                    .context(CsvLineTooShortSnafu {
                        path: path.clone(),
                        lineno,
                        column,
                    })
            };
            let event = field(event_idx, EVENT_COLUMN)?;
            let category = match category_idx {
                Some(i) => Some(field(i, CATEGORY_COLUMN)?),
                None => None,
            };
            if !seen.insert((event.clone(), category.clone())) {
                return DuplicateRowSnafu {
                    path: path.clone(),
                    lineno,
                    event,
                    category,
                }
                .fail();
            }
            let standing = Standing {
                event,
                category,
                first: field(place_idx[0], Place::First.column())?,
                second: field(place_idx[1], Place::Second.column())?,
                third: field(place_idx[2], Place::Third.column())?,
            };
            debug!("load: line {}: {:?}", lineno, standing);
            rows.push(standing);
        }
        Ok(Table::new(self.layout, rows))
    }

    /// Overwrites the file with the whole table.
    pub fn save(&self, table: &Table) -> BoardResult<()> {
        let path = self.path_str();
        let layout = table.layout();
        let mut wtr = csv::WriterBuilder::new()
            .from_path(&self.path)
            .context(CsvOpenSnafu { path: path.clone() })?;
        wtr.write_record(layout.columns())
            .context(CsvWriteSnafu { path: path.clone() })?;
        for s in table.rows() {
            let mut record: Vec<&str> = vec![s.event.as_str()];
            if layout.is_categorized() {
                record.push(s.category.as_deref().unwrap_or(""));
            }
            record.extend(Place::ALL.iter().map(|p| s.get(*p)));
            wtr.write_record(&record)
                .context(CsvWriteSnafu { path: path.clone() })?;
        }
        wtr.flush().context(CsvFlushSnafu { path })?;
        debug!("save: wrote {} rows to {:?}", table.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir, layout: Layout) -> Store {
        Store::new(dir.path().join("standings.csv"), layout)
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, Layout::Categorized);
        assert!(store.initialize().unwrap());
        let first = fs::read(store.path()).unwrap();

        let mut table = store.load().unwrap();
        let key = table.key("Ball Throw", Some("CWSN"));
        table
            .update_standings(
                key,
                Placings {
                    first: "Dia".to_string(),
                    ..Placings::default()
                },
            )
            .unwrap();
        store.save(&table).unwrap();
        let edited = fs::read(store.path()).unwrap();
        assert_ne!(first, edited);

        assert!(!store.initialize().unwrap());
        assert_eq!(fs::read(store.path()).unwrap(), edited);
    }

    #[test]
    fn seeded_file_has_the_expected_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, Layout::Flat);
        store.initialize().unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "Event,1st Place,2nd Place,3rd Place\n\
             100m Run,,,\n\
             400m Run,,,\n\
             Long Jump,,,\n\
             High Jump,,,\n"
        );

        let store = Store::new(dir.path().join("board").join("cat.csv"), Layout::Categorized);
        store.initialize().unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("Event,Category,1st Place,2nd Place,3rd Place")
        );
        assert_eq!(lines.next(), Some("100m Run,Boys A,,,"));
        assert_eq!(lines.count(), 14);
    }

    #[test]
    fn save_of_load_keeps_the_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, Layout::Categorized);
        store.initialize().unwrap();
        let mut table = store.load().unwrap();
        table.add_event("Sack Race, 50m", Some("Girls C")).unwrap();
        let key = table.key("100m Run", Some("Girls A"));
        table
            .update_standings(
                key,
                Placings {
                    first: "Rina \"Rocket\" Das".to_string(),
                    second: "Mou".to_string(),
                    third: String::new(),
                },
            )
            .unwrap();
        store.save(&table).unwrap();

        let before = fs::read(store.path()).unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, table);
        store.save(&reloaded).unwrap();
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn load_locates_columns_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, Layout::Flat);
        fs::write(
            store.path(),
            "3rd Place,Event,Notes,2nd Place,1st Place\nCarol,100m Run,windy,Bob,Alice\n",
        )
        .unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.len(), 1);
        let s = &table.rows()[0];
        assert_eq!(
            (s.event.as_str(), s.first.as_str(), s.second.as_str(), s.third.as_str()),
            ("100m Run", "Alice", "Bob", "Carol")
        );
        assert_eq!(s.category, None);
    }

    #[test]
    fn malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, Layout::Categorized);
        assert!(matches!(store.load(), Err(BoardError::CsvOpen { .. })));

        fs::write(store.path(), "Event,1st Place,2nd Place,3rd Place\nRun,,,\n").unwrap();
        match store.load() {
            Err(BoardError::MissingColumn { column, .. }) => assert_eq!(column, "Category"),
            x => panic!("unexpected {:?}", x),
        }

        fs::write(
            store.path(),
            "Event,Category,1st Place,2nd Place,3rd Place\nRun,Boys A,,\n",
        )
        .unwrap();
        assert!(matches!(
            store.load(),
            Err(BoardError::CsvLineParse { lineno: 2, .. })
        ));

        fs::write(
            store.path(),
            "Event,Category,1st Place,2nd Place,3rd Place\nRun,Boys A,,,\nJump,Boys A,,,\nRun,Boys A,x,,\n",
        )
        .unwrap();
        assert!(matches!(
            store.load(),
            Err(BoardError::DuplicateRow { lineno: 4, .. })
        ));
    }
}
