//! Graph document assembly: normalized node rows plus expanded edges.

pub mod expand;
pub mod normalize;

pub use expand::expand_edges;
pub use normalize::normalize_rows;

use crate::Result;
use crate::sheet::Table;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, Serializer};

/// A directed reference between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// The full `{nodes, edges}` document handed to the visualizer.
///
/// Nodes are the table rows in original order; edges are deduplicated
/// and self-loop-free (see [`expand_edges`]).
#[derive(Debug, Clone)]
pub struct GraphDoc {
    pub nodes: Table,
    pub edges: Vec<Edge>,
}

/// Expand the normalized table into the final graph document.
pub fn build(table: Table) -> Result<GraphDoc> {
    let edges = expand_edges(&table)?;
    Ok(GraphDoc {
        nodes: table,
        edges,
    })
}

impl Serialize for GraphDoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut doc = serializer.serialize_struct("GraphDoc", 2)?;
        doc.serialize_field("nodes", &NodeRecords(&self.nodes))?;
        doc.serialize_field("edges", &self.edges)?;
        doc.end()
    }
}

/// Table rows as a sequence of column-name -> cell-text maps, keeping
/// the sheet's column order (a plain map type would sort the keys).
struct NodeRecords<'a>(&'a Table);

impl Serialize for NodeRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&NodeRecord {
                columns: &self.0.columns,
                cells: row,
            })?;
        }
        seq.end()
    }
}

struct NodeRecord<'a> {
    columns: &'a [String],
    cells: &'a [String],
}

impl Serialize for NodeRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn document_shape_and_counts_survive_a_round_trip() {
        let doc = build(table(
            &["id", "source", "target"],
            &[
                &["1", "", "2,3"],
                &["2", "1", ""],
                &["3", "1", ""],
            ],
        ))
        .unwrap();

        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["edges"].as_array().unwrap().len(), 4);
        assert_eq!(parsed["nodes"][0]["id"], "1");
        assert_eq!(parsed["edges"][0]["source"], "1");
        assert_eq!(parsed["edges"][0]["target"], "2");
    }

    #[test]
    fn node_records_keep_sheet_column_order() {
        let doc = build(table(&["id", "details", "anything"], &[&["n1", "d", "x"]])).unwrap();
        let json = serde_json::to_string(&doc).unwrap();

        let id_at = json.find("\"id\"").unwrap();
        let details_at = json.find("\"details\"").unwrap();
        let anything_at = json.find("\"anything\"").unwrap();
        assert!(id_at < details_at && details_at < anything_at);
    }

    #[test]
    fn extra_columns_pass_through_unchanged() {
        let doc = build(table(
            &["id", "kind", "weight"],
            &[&["a", "page", "0.5"]],
        ))
        .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        assert_eq!(parsed["nodes"][0]["kind"], "page");
        assert_eq!(parsed["nodes"][0]["weight"], "0.5");
    }
}
