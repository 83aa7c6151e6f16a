use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named top-level node of the data view with its ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub name: String,
    pub entries: IndexMap<String, String>,
}

/// One flattened, display-ready row of the data view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    pub key: String,
    pub value: String,
    pub depth: usize,
}

/// Contents of the data view: an ordered list of top-level items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTree {
    items: Vec<DataItem>,
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level item
    pub fn add_top_level_item(
        &mut self,
        name: impl Into<String>,
        entries: IndexMap<String, String>,
    ) {
        self.items.push(DataItem {
            name: name.into(),
            entries,
        });
    }

    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flatten into rows: each item at depth 0 followed by its entries at depth 1
    pub fn rows(&self) -> Vec<DataRow> {
        let mut rows = Vec::new();
        for item in &self.items {
            rows.push(DataRow {
                key: item.name.clone(),
                value: format!("{{{} entries}}", item.entries.len()),
                depth: 0,
            });
            rows.extend(item.entries.iter().map(|(key, value)| DataRow {
                key: key.clone(),
                value: value.clone(),
                depth: 1,
            }));
        }
        rows
    }

    /// The static result published by the initial loader
    ///
    /// A single item named `something` mapping `"0"..="9"` to themselves.
    pub fn placeholder() -> Self {
        let entries = (0..10)
            .map(|i| (i.to_string(), i.to_string()))
            .collect::<IndexMap<_, _>>();

        let mut tree = Self::new();
        tree.add_top_level_item("something", entries);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_shape() {
        let tree = DataTree::placeholder();
        assert_eq!(tree.len(), 1);

        let item = &tree.items()[0];
        assert_eq!(item.name, "something");
        assert_eq!(item.entries.len(), 10);
        assert_eq!(item.entries.get("7").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_rows_preserve_order() {
        let tree = DataTree::placeholder();
        let rows = tree.rows();

        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].key, "something");
        assert_eq!(rows[0].depth, 0);
        let keys: Vec<_> = rows[1..].iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        assert!(rows[1..].iter().all(|r| r.depth == 1));
    }

    #[test]
    fn test_empty_tree_has_no_rows() {
        assert!(DataTree::new().rows().is_empty());
    }
}
