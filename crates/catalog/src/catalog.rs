use quarry_common::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use crate::partition::Partition;

/// Table metadata visible to the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table name as registered in the catalog.
    pub name: String,
    /// Number of clustering columns. Every partition of the table must carry
    /// exactly this many key values.
    pub clustering_cols: usize,
    /// All partitions of the table, in catalog order.
    #[serde(default)]
    pub partitions: Vec<Arc<Partition>>,
}

/// Name-keyed table registry, loaded from the external catalog service or
/// from a JSON snapshot.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableMeta>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    pub fn register_table(&mut self, table: TableMeta) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Result<&TableMeta> {
        self.tables
            .get(name)
            .ok_or_else(|| QuarryError::Planning(format!("unknown table: {name}")))
    }

    pub fn load_from_json(path: &str) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let tables: Vec<TableMeta> =
            serde_json::from_str(&s).map_err(|e| QuarryError::InvalidConfig(e.to_string()))?;
        let mut cat = Catalog::new();
        for t in tables {
            cat.register_table(t);
        }
        Ok(cat)
    }
}
