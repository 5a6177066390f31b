//! Pathfinding algorithms
//!
//! Depth-bounded breadth-first expansion and Dijkstra over a `GraphView`.

use super::common::{GraphView, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

/// Result of a pathfinding algorithm
#[derive(Debug, Clone)]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Vec<NodeId>,
    pub cost: f64,
}

/// Breadth-first expansion ignoring edge direction, bounded to `max_depth` levels.
///
/// Returns `(NodeId, depth)` pairs in visitation order, starting with the
/// source at depth 0. Returns `None` if the source is not in the view.
pub fn bfs_levels(
    view: &GraphView,
    source: NodeId,
    max_depth: usize,
) -> Option<Vec<(NodeId, usize)>> {
    let source_idx = *view.node_to_index.get(&source)?;

    let mut depth: HashMap<usize, usize> = HashMap::new();
    let mut order = vec![(source, 0)];
    let mut queue = VecDeque::new();

    depth.insert(source_idx, 0);
    queue.push_back(source_idx);

    while let Some(current_idx) = queue.pop_front() {
        let current_depth = depth[&current_idx];
        if current_depth >= max_depth {
            continue;
        }

        let neighbors = view
            .successors(current_idx)
            .iter()
            .chain(view.predecessors(current_idx).iter());

        for &next_idx in neighbors {
            if !depth.contains_key(&next_idx) {
                depth.insert(next_idx, current_depth + 1);
                order.push((view.index_to_node[next_idx], current_depth + 1));
                queue.push_back(next_idx);
            }
        }
    }

    Some(order)
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
pub(crate) struct State {
    pub(crate) cost: f64,
    pub(crate) node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra with a caller-supplied mapping from stored edge weight to traversal cost.
///
/// Negative costs are skipped.
pub fn dijkstra_with<F>(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    cost_of: F,
) -> Option<PathResult>
where
    F: Fn(f64) -> f64,
{
    let source_idx = *view.node_to_index.get(&source)?;
    let target_idx = *view.node_to_index.get(&target)?;

    let mut dist = HashMap::new();
    let mut parent: HashMap<usize, Option<usize>> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source_idx, 0.0);
    parent.insert(source_idx, None);
    heap.push(State { cost: 0.0, node_idx: source_idx });

    while let Some(State { cost, node_idx }) = heap.pop() {
        if node_idx == target_idx {
            let path = reconstruct(view, &parent, target_idx);
            return Some(PathResult {
                source,
                target,
                path,
                cost,
            });
        }

        if cost > *dist.get(&node_idx).unwrap_or(&f64::INFINITY) {
            continue;
        }

        for (next_idx, weight) in view.weighted_successors(node_idx) {
            let step = cost_of(weight);
            if step < 0.0 {
                continue;
            }

            let next_cost = cost + step;

            if next_cost < *dist.get(&next_idx).unwrap_or(&f64::INFINITY) {
                dist.insert(next_idx, next_cost);
                parent.insert(next_idx, Some(node_idx));
                heap.push(State { cost: next_cost, node_idx: next_idx });
            }
        }
    }

    None
}

fn reconstruct(view: &GraphView, parent: &HashMap<usize, Option<usize>>, target_idx: usize) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut curr = Some(target_idx);
    while let Some(idx) = curr {
        path.push(view.index_to_node[idx]);
        curr = parent.get(&idx).copied().flatten();
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::view_from;

    #[test]
    fn test_bfs_levels_ignores_direction() {
        // 1->0, 0->2, 2->3
        let view = view_from(4, &[(1, 0, 1.0), (0, 2, 1.0), (2, 3, 1.0)], false);

        let levels: HashMap<_, _> = bfs_levels(&view, 0, 1).unwrap().into_iter().collect();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[&0], 0);
        assert_eq!(levels[&1], 1);
        assert_eq!(levels[&2], 1);

        let all: HashMap<_, _> = bfs_levels(&view, 0, 5).unwrap().into_iter().collect();
        assert_eq!(all[&3], 2);

        assert_eq!(bfs_levels(&view, 0, 0).unwrap(), vec![(0, 0)]);
        assert!(bfs_levels(&view, 99, 1).is_none());
    }

    #[test]
    fn test_dijkstra_weights_as_distances() {
        // 0->1 (10.0), 1->2 (5.0), 0->2 (50.0)
        let view = view_from(3, &[(0, 1, 10.0), (0, 2, 50.0), (1, 2, 5.0)], false);

        let result = dijkstra_with(&view, 0, 2, |w| w).unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.cost, 15.0);
    }

    #[test]
    fn test_dijkstra_with_inverted_weights_prefers_strong_links() {
        // Direct 0-2 is weak; 0-1-2 is strong.
        let view = view_from(3, &[(0, 2, 1.0), (0, 1, 10.0), (1, 2, 10.0)], true);

        let result = dijkstra_with(&view, 0, 2, |w| 1.0 / w.max(1e-9)).unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert!((result.cost - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_dijkstra_source_equals_target() {
        let view = view_from(2, &[(0, 1, 1.0)], true);
        let result = dijkstra_with(&view, 1, 1, |w| w).unwrap();
        assert_eq!(result.path, vec![1]);
        assert_eq!(result.cost, 0.0);
    }
}
