//! Topological evaluation order with cycle detection

use indexmap::IndexSet;
use tracing::trace;
use trellis_domain::{ResolveError, ResolveResult};

use super::graph::DependencyGraph;

/// Orders computed fields so every field follows the fields it reads.
///
/// Roots are visited in declaration order and dependencies in the order they
/// were first referenced, so the result is stable for a given contract.
/// Dependencies that are not nodes of the graph are skipped.
///
/// The depth-first walk keeps its own stack, so long dependency chains do
/// not grow the call stack.
///
/// # Errors
///
/// Returns `CircularDependency` naming the cycle, from its first repeated
/// field to the closing reference (`a -> b -> a`, or `a -> a`).
pub fn evaluation_order(graph: &DependencyGraph) -> ResolveResult<Vec<String>> {
    let mut order = Vec::with_capacity(graph.len());
    let mut done: IndexSet<&str> = IndexSet::with_capacity(graph.len());

    for root in graph.names() {
        if done.contains(root) {
            continue;
        }

        // `visiting` is the current DFS path; `frames` holds each node's
        // position in its dependency list.
        let mut visiting: IndexSet<&str> = IndexSet::new();
        let mut frames: Vec<(&str, usize)> = vec![(root, 0)];
        visiting.insert(root);

        while let Some((node, cursor)) = frames.last_mut() {
            let node: &str = *node;
            let next = graph
                .dependencies(node)
                .and_then(|deps| deps.get_index(*cursor))
                .map(String::as_str);

            let Some(dependency) = next else {
                trace!(field = node, "ordered computed field");
                order.push(node.to_string());
                done.insert(node);
                visiting.pop();
                frames.pop();
                continue;
            };
            *cursor += 1;

            if done.contains(dependency) || !graph.contains(dependency) {
                continue;
            }

            if let Some(position) = visiting.get_index_of(dependency) {
                let mut cycle: Vec<String> = visiting
                    .iter()
                    .skip(position)
                    .map(|name| (*name).to_string())
                    .collect();
                cycle.push(dependency.to_string());
                return Err(ResolveError::CircularDependency { cycle });
            }

            visiting.insert(dependency);
            frames.push((dependency, 0));
        }
    }

    Ok(order)
}
