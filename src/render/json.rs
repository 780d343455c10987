//! Serialize the graph document as pretty-printed UTF-8 JSON.
//!
//! serde_json's pretty printer already gives 2-space indentation and
//! leaves non-ASCII text unescaped, which is what the visualizer wants.

use crate::Result;
use crate::graph::{Edge, GraphDoc};

use anyhow::Context;
use std::collections::HashMap;
use std::fs;

/// Write the document to `out`, overwriting any previous artifact.
///
/// The JSON goes to a temporary sibling path first and is renamed into
/// place, so a failed serialization never leaves a truncated artifact.
pub fn write_graph_json(doc: &GraphDoc, out: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;

    let tmp = format!("{}.tmp", out);
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp))?;
    fs::rename(&tmp, out).with_context(|| format!("rename {} to {}", tmp, out))?;

    Ok(())
}

/// Print node/edge counts and the busiest source ids.
pub fn print_summary(doc: &GraphDoc, out: &str) {
    println!("Wrote {}", out);
    println!("  nodes: {}", doc.nodes.len());
    println!("  edges: {}", doc.edges.len());

    let top = top_sources(&doc.edges, 10);
    if !top.is_empty() {
        println!("  top sources by outgoing edges:");
        for (id, count) in top {
            println!("    {}  {}", id, count);
        }
    }
}

/// The `limit` source ids with the most outgoing edges, most first.
///
/// The sort is stable, so sources with equal counts keep the order in
/// which they first appeared in the edge list.
pub fn top_sources(edges: &[Edge], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for edge in edges {
        match index.get(edge.source.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(&edge.source, counts.len());
                counts.push((edge.source.clone(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
