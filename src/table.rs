use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{SpliceError, SpliceResult};
use crate::io::open_maybe_gz;

/// Header name given to an unnamed leading index column (SUPPA2 writes one
/// header field fewer than data fields).
pub const INDEX_COLUMN: &str = "event_id";

#[derive(Debug, Clone)]
pub struct Table {
    source: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(source: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        let index = build_index(&columns);
        Self {
            source: source.into(),
            columns,
            index,
            rows,
        }
    }

    pub fn empty(source: impl Into<String>, columns: Vec<String>) -> Self {
        Self::new(source, columns, Vec::new())
    }

    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut records = rdr.records();
        let mut columns: Vec<String> = match records.next() {
            Some(header) => header?.iter().map(|s| s.trim().to_string()).collect(),
            None => return Ok(Self::empty(source, Vec::new())),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.len() == 1 && record.get(0).map(str::is_empty).unwrap_or(true) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if let Some(first) = rows.first() {
            if first.len() == columns.len() + 1 {
                columns.insert(0, INDEX_COLUMN.to_string());
            }
        }

        Ok(Self::new(source, columns, rows))
    }

    pub fn read_tsv(path: &Path) -> SpliceResult<Self> {
        if !path.exists() {
            return Err(SpliceError::InputNotFound(path.to_path_buf()));
        }
        let reader = open_maybe_gz(path)?;
        Self::from_reader(reader, &path.display().to_string()).map_err(|source| {
            SpliceError::Table {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn read_concat(paths: &[PathBuf]) -> SpliceResult<Self> {
        let mut tables = Vec::with_capacity(paths.len());
        for path in paths {
            tables.push(Self::read_tsv(path)?);
        }
        Ok(Self::concat(tables))
    }

    pub fn concat(tables: Vec<Table>) -> Self {
        let mut iter = tables.into_iter();
        let Some(mut out) = iter.next() else {
            return Self::empty("", Vec::new());
        };
        for table in iter {
            for col in &table.columns {
                if !out.index.contains_key(col) {
                    out.index.insert(col.clone(), out.columns.len());
                    out.columns.push(col.clone());
                }
            }
            let width = out.columns.len();
            for row in out.rows.iter_mut() {
                row.resize(width, String::new());
            }
            for row in table.rows {
                let mut mapped = vec![String::new(); width];
                for (i, value) in row.into_iter().enumerate() {
                    let target = out.index[&table.columns[i]];
                    mapped[target] = value;
                }
                out.rows.push(mapped);
            }
            out.source = format!("{}+{}", out.source, table.source);
        }
        out
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn require(&self, name: &str) -> SpliceResult<usize> {
        self.column(name).ok_or_else(|| SpliceError::MissingColumn {
            column: name.to_string(),
            context: self.source.clone(),
        })
    }

    pub fn columns_containing(&self, pattern: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.contains(pattern))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn require_containing(&self, pattern: &str) -> SpliceResult<usize> {
        self.columns_containing(pattern)
            .first()
            .copied()
            .ok_or_else(|| SpliceError::MissingColumn {
                column: format!("*{}*", pattern),
                context: self.source.clone(),
            })
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].as_str()
    }

    pub fn row(&self, row: usize) -> &[String] {
        &self.rows[row]
    }

    pub fn select(&self, rows: &[usize]) -> Table {
        Table {
            source: self.source.clone(),
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows: rows.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Appends a column, or overwrites it when the name already exists.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        let col = match self.column(name) {
            Some(col) => col,
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.columns.push(name.to_string());
                for row in self.rows.iter_mut() {
                    row.push(String::new());
                }
                self.columns.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = value;
        }
    }
}

fn build_index(columns: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    index
}

/// Lenient numeric parse: `NA`, `nan`, empty and unparsable fields are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.trim().trim_matches('"');
    if v.is_empty() {
        return None;
    }
    match v.parse::<f64>() {
        Ok(x) if !x.is_nan() => Some(x),
        _ => None,
    }
}
