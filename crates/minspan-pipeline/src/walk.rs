//! Tree walk: turn a spanning tree into a visiting order.
//!
//! Starting from a leaf, the walker always leaves each vertex along the
//! edge that turns furthest to the left relative to the edge it arrived
//! on. On a planar tree this traces the boundary of its single face,
//! which is the Euler tour of the doubled tree. Recording each vertex the
//! first time the walker stands on it shortcuts repeated vertices, so the
//! closed tour is at most twice the tree length.
//!
//! The walk runs on grid coordinates produced by
//! [`normalize`](crate::normalize), which guarantees that no two vertices
//! coincide and every direction is well defined.

use crate::geometry::{direction, turn_angle};
use crate::types::{Edge, Point, QuantizedPoint};

/// Build the adjacency lists of an undirected edge set over `n` vertices.
///
/// Each edge appends one entry in each direction, so neighbor lists keep
/// edge discovery order.
#[must_use]
pub fn adjacency(n: usize, edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut graph = vec![Vec::new(); n];
    for &Edge(a, b) in edges {
        graph[a].push(b);
        graph[b].push(a);
    }
    graph
}

/// Walk the spanning tree `edges` over `points` and return every vertex
/// index exactly once, in visiting order.
///
/// The walk starts at the lowest-indexed leaf and steps to its first
/// neighbor. It finishes once every vertex has been recorded, which a
/// tree guarantees within `2(n - 1)` steps. Should the step cap be
/// reached anyway (the edges are not a spanning tree), the missing
/// vertices are appended in index order.
#[must_use = "returns the visiting order"]
pub fn walk_tree(points: &[QuantizedPoint], edges: &[Edge]) -> Vec<usize> {
    let n = points.len();
    if n < 2 {
        return (0..n).collect();
    }

    let graph = adjacency(n, edges);
    let grid: Vec<Point> = points.iter().map(|q| q.as_grid_point()).collect();

    let start = graph.iter().position(|adj| adj.len() == 1).unwrap_or(0);

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[start] = true;
    order.push(start);

    if let Some(&first) = graph[start].first() {
        let mut previous = start;
        let mut walker = first;
        let max_steps = 2 * (n - 1) + 1;
        let mut steps = 0;

        while order.len() < n && steps < max_steps {
            steps += 1;
            let heading = direction(grid[walker], grid[previous]);
            let next = leftmost_exit(&graph[walker], walker, heading, &grid).unwrap_or(previous);

            if !visited[walker] {
                visited[walker] = true;
                order.push(walker);
            }

            previous = walker;
            walker = next;
        }
    }

    if order.len() < n {
        tracing::warn!(
            visited = order.len(),
            total = n,
            "tree walk ended early; appending unvisited vertices in index order",
        );
        order.extend((0..n).filter(|&v| !visited[v]));
    }

    order
}

/// Pick the neighbor of `walker` reached by the largest turn angle from
/// `heading`. The first neighbor wins ties.
fn leftmost_exit(
    neighbors: &[usize],
    walker: usize,
    heading: Point,
    grid: &[Point],
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &candidate in neighbors {
        let angle = turn_angle(heading, direction(grid[candidate], grid[walker]));
        if best.is_none_or(|(_, best_angle)| angle > best_angle) {
            best = Some((candidate, angle));
        }
    }
    best.map(|(candidate, _)| candidate)
}
