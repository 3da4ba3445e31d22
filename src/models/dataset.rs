use std::collections::BTreeSet;

use anyhow::{bail, Result};

use super::record::{Column, Record};

/// An in-memory snapshot of one loaded CSV. Reports never mutate it;
/// loading another file replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// File name the data came from, for messages.
    pub source: String,
    /// Columns the file's header actually carried.
    pub columns: BTreeSet<Column>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(source: String, columns: BTreeSet<Column>, records: Vec<Record>) -> Self {
        Self {
            source,
            columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has(&self, col: Column) -> bool {
        self.columns.contains(&col)
    }

    /// Check that every column a report needs is present, naming the first
    /// missing one. Called up front so a report fails before computing.
    pub fn require(&self, cols: &[Column]) -> Result<()> {
        for col in cols {
            if !self.columns.contains(col) {
                bail!("column '{}' not present in {}", col.header(), self.source);
            }
        }
        Ok(())
    }
}
