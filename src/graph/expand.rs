//! Edge expansion: comma-separated `source`/`target` lists become
//! directed edges.
//!
//! Per row, with `current_id` = the trimmed `id` cell:
//! - each token in `source` emits `token -> current_id`
//! - each token in `target` emits `current_id -> token`
//!
//! Tokens are trimmed; empty tokens and self-loops are dropped. The
//! accumulated list is deduplicated by exact `(source, target)` pair,
//! first occurrence wins. Endpoints are not checked against the node-id
//! set: dangling edges are the visualizer's concern.

use crate::Result;
use crate::graph::Edge;
use crate::sheet::Table;

use anyhow::bail;
use std::collections::BTreeSet;

/// Expand and deduplicate all edges of the table.
///
/// Fails if the sheet has no `id` column. Rows with an empty id still
/// contribute edges with an empty endpoint, matching the loose contract
/// of the source data.
pub fn expand_edges(table: &Table) -> Result<Vec<Edge>> {
    let id_col = match table.column_index("id") {
        Some(idx) => idx,
        None => bail!("input sheet has no 'id' column"),
    };
    let source_col = table.column_index("source");
    let target_col = table.column_index("target");

    let mut edges: Vec<Edge> = Vec::new();

    for row in &table.rows {
        let current_id = row[id_col].trim();

        if let Some(col) = source_col {
            for token in split_list(&row[col]) {
                if token != current_id {
                    edges.push(Edge {
                        source: token.to_string(),
                        target: current_id.to_string(),
                    });
                }
            }
        }

        if let Some(col) = target_col {
            for token in split_list(&row[col]) {
                if token != current_id {
                    edges.push(Edge {
                        source: current_id.to_string(),
                        target: token.to_string(),
                    });
                }
            }
        }
    }

    Ok(dedup_edges(edges))
}

/// Split a comma-separated cell into trimmed, non-empty tokens.
fn split_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Drop duplicate `(source, target)` pairs, keeping first-seen order.
fn dedup_edges(edges: Vec<Edge>) -> Vec<Edge> {
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    edges
        .into_iter()
        .filter(|e| seen.insert((e.source.clone(), e.target.clone())))
        .collect()
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

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn source_tokens_point_at_the_row_id() {
        let t = table(&["id", "source"], &[&["A", "B, C"]]);
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![edge("B", "A"), edge("C", "A")]
        );
    }

    #[test]
    fn target_tokens_are_pointed_at_by_the_row_id() {
        let t = table(&["id", "target"], &[&["A", "B,C"]]);
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![edge("A", "B"), edge("A", "C")]
        );
    }

    #[test]
    fn both_columns_contribute_independently() {
        let t = table(&["id", "source", "target"], &[&["A", "B", "C"]]);
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![edge("B", "A"), edge("A", "C")]
        );
    }

    #[test]
    fn self_references_never_produce_an_edge() {
        let t = table(&["id", "source", "target"], &[&["A", "A, B", " A ,C"]]);
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![edge("B", "A"), edge("A", "C")]
        );
    }

    #[test]
    fn empty_cells_and_empty_segments_contribute_nothing() {
        let t = table(&["id", "source", "target"], &[&["A", "", "B,,C,"]]);
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![edge("A", "B"), edge("A", "C")]
        );
    }

    #[test]
    fn duplicate_pairs_collapse_to_the_first_occurrence() {
        let t = table(
            &["id", "source"],
            &[&["A", "B,B"], &["A", "B"], &["C", "B"]],
        );
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![edge("B", "A"), edge("B", "C")]
        );
    }

    #[test]
    fn missing_id_column_is_an_error() {
        let t = table(&["source", "target"], &[&["A", "B"]]);
        assert!(expand_edges(&t).is_err());
    }

    #[test]
    fn missing_list_columns_mean_no_edges() {
        let t = table(&["id", "details"], &[&["A", "x"]]);
        assert_eq!(expand_edges(&t).unwrap(), vec![]);
    }

    #[test]
    fn empty_id_still_emits_edges_with_an_empty_endpoint() {
        let t = table(&["id", "source"], &[&["  ", "B"]]);
        assert_eq!(expand_edges(&t).unwrap(), vec![edge("B", "")]);
    }

    // The worked example from the conversion contract: three rows, four
    // edges, nothing deduplicated away.
    #[test]
    fn three_row_example_expands_to_four_edges() {
        let t = table(
            &["id", "source", "target"],
            &[
                &["1", "", "2,3"],
                &["2", "1", ""],
                &["3", "1", ""],
            ],
        );
        assert_eq!(
            expand_edges(&t).unwrap(),
            vec![
                edge("1", "2"),
                edge("1", "3"),
                edge("2", "1"),
                edge("3", "1"),
            ]
        );
    }
}
