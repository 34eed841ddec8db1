//! Deterministic step ordering.
//!
//! With no connections the canvas's vertical order is the best available
//! signal; otherwise Kahn's algorithm over the connection graph. Cycles
//! degrade gracefully: unreached nodes are appended in list order, so every
//! node appears exactly once no matter what.

use std::collections::{HashMap, VecDeque};

use riveter_types::{Connection, StepNode};

/// Order `nodes` for serialization, returning indices into the slice.
pub fn topological_order(nodes: &[StepNode], connections: &[Connection]) -> Vec<usize> {
    if connections.is_empty() {
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by(|&a, &b| {
            nodes[a]
                .position
                .y
                .partial_cmp(&nodes[b].position.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        return order;
    }

    let index_of: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for conn in connections {
        // Connections with a missing endpoint carry no ordering information.
        let (Some(&from), Some(&to)) = (
            index_of.get(conn.source.as_str()),
            index_of.get(conn.target.as_str()),
        ) else {
            continue;
        };
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    let mut placed = vec![false; nodes.len()];

    while let Some(current) = queue.pop_front() {
        order.push(current);
        placed[current] = true;
        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    // Anything still unplaced sits on a cycle; keep list order.
    for i in 0..nodes.len() {
        if !placed[i] {
            order.push(i);
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use riveter_types::{ConfigMap, Position};

    fn node(id: &str, y: f64) -> StepNode {
        StepNode {
            id: id.to_string(),
            kind: "run".to_string(),
            name: id.to_string(),
            position: Position::new(0.0, y),
            config: ConfigMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    fn conn(source: &str, target: &str) -> Connection {
        Connection {
            id: format!("conn-{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            source_slot: None,
            target_slot: None,
        }
    }

    fn ids(nodes: &[StepNode], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| nodes[i].id.clone()).collect()
    }

    #[test]
    fn no_connections_sorts_by_vertical_position() {
        let nodes = vec![node("a", 50.0), node("b", 10.0)];
        let order = topological_order(&nodes, &[]);
        assert_eq!(ids(&nodes, &order), vec!["b", "a"]);
    }

    #[test]
    fn vertical_sort_is_stable_for_equal_y() {
        let nodes = vec![node("a", 10.0), node("b", 10.0), node("c", 5.0)];
        let order = topological_order(&nodes, &[]);
        assert_eq!(ids(&nodes, &order), vec!["c", "a", "b"]);
    }

    #[test]
    fn edges_override_position() {
        // b sits above a on the canvas, but a feeds b.
        let nodes = vec![node("a", 100.0), node("b", 0.0)];
        let order = topological_order(&nodes, &[conn("a", "b")]);
        assert_eq!(ids(&nodes, &order), vec!["a", "b"]);
    }

    #[test]
    fn every_edge_source_precedes_its_target() {
        let nodes = vec![
            node("a", 0.0),
            node("b", 0.0),
            node("c", 0.0),
            node("d", 0.0),
            node("e", 0.0),
        ];
        let connections = vec![
            conn("a", "c"),
            conn("b", "c"),
            conn("c", "d"),
            conn("c", "e"),
            conn("a", "e"),
        ];
        let order = topological_order(&nodes, &connections);
        let pos: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(rank, &i)| (nodes[i].id.as_str(), rank))
            .collect();
        for c in &connections {
            assert!(
                pos[c.source.as_str()] < pos[c.target.as_str()],
                "{} should precede {}",
                c.source,
                c.target
            );
        }
    }

    #[test]
    fn cycle_still_emits_every_node_once() {
        let nodes = vec![node("a", 0.0), node("b", 1.0), node("c", 2.0)];
        let connections = vec![conn("a", "b"), conn("b", "a"), conn("b", "c")];
        let order = topological_order(&nodes, &connections);

        assert_eq!(order.len(), 3);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3, "no duplicates, no omissions");
    }

    #[test]
    fn pure_cycle_keeps_list_order() {
        let nodes = vec![node("a", 9.0), node("b", 1.0)];
        let connections = vec![conn("a", "b"), conn("b", "a")];
        let order = topological_order(&nodes, &connections);
        assert_eq!(ids(&nodes, &order), vec!["a", "b"]);
    }

    #[test]
    fn dangling_connection_endpoints_are_ignored() {
        let nodes = vec![node("a", 0.0), node("b", 1.0)];
        let connections = vec![conn("ghost", "b"), conn("a", "b")];
        let order = topological_order(&nodes, &connections);
        assert_eq!(ids(&nodes, &order), vec!["a", "b"]);
    }
}
