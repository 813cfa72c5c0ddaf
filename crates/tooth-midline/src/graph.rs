//! Weighted vertex graph and shortest-path search.
//!
//! The graph has one node per mesh vertex and one undirected edge per mesh
//! edge, weighted by Euclidean edge length. Shortest paths follow mesh edges,
//! so distances approximate (and never undercut) true surface geodesics.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::Mesh;

/// Adjacency list for mesh vertices with edge lengths.
#[derive(Debug, Clone)]
pub struct VertexGraph {
    /// For each vertex, (neighbor index, edge length) pairs in first-seen order.
    neighbors: Vec<Vec<(u32, f64)>>,
}

impl VertexGraph {
    /// Build the edge graph of a mesh.
    ///
    /// Face indices must be in range for `mesh.vertices`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut neighbors: Vec<Vec<(u32, f64)>> = vec![Vec::new(); mesh.vertices.len()];

        for &[i0, i1, i2] in &mesh.faces {
            for (a, b) in [(i0, i1), (i1, i2), (i2, i0)] {
                if a == b {
                    continue;
                }
                let length =
                    (mesh.vertices[a as usize].position - mesh.vertices[b as usize].position).norm();
                Self::add_edge(&mut neighbors, a, b, length);
            }
        }

        Self { neighbors }
    }

    fn add_edge(neighbors: &mut [Vec<(u32, f64)>], v0: u32, v1: u32, length: f64) {
        if !neighbors[v0 as usize].iter().any(|&(n, _)| n == v1) {
            neighbors[v0 as usize].push((v1, length));
        }
        if !neighbors[v1 as usize].iter().any(|&(n, _)| n == v0) {
            neighbors[v1 as usize].push((v0, length));
        }
    }

    /// Number of nodes (mesh vertices).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Neighbors of a vertex as (neighbor index, edge length) pairs.
    #[inline]
    pub fn neighbors(&self, vertex: u32) -> &[(u32, f64)] {
        self.neighbors
            .get(vertex as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Single-source Dijkstra.
    ///
    /// Equal tentative distances are settled in ascending vertex order and a
    /// predecessor only changes on a strictly shorter path, so the result is
    /// fully deterministic for a given mesh.
    pub fn shortest_paths(&self, source: u32) -> ShortestPaths {
        let vertex_count = self.vertex_count();
        let mut distances = vec![f64::INFINITY; vertex_count];
        let mut predecessors: Vec<Option<u32>> = vec![None; vertex_count];

        if (source as usize) >= vertex_count {
            return ShortestPaths {
                source,
                distances,
                predecessors,
            };
        }

        let mut heap = BinaryHeap::with_capacity(vertex_count);
        distances[source as usize] = 0.0;
        heap.push(State {
            vertex: source,
            distance: 0.0,
        });

        while let Some(State { vertex, distance }) = heap.pop() {
            if distance > distances[vertex as usize] {
                continue;
            }

            for &(neighbor, edge_length) in self.neighbors(vertex) {
                let candidate = distance + edge_length;
                if candidate < distances[neighbor as usize] {
                    distances[neighbor as usize] = candidate;
                    predecessors[neighbor as usize] = Some(vertex);
                    heap.push(State {
                        vertex: neighbor,
                        distance: candidate,
                    });
                }
            }
        }

        ShortestPaths {
            source,
            distances,
            predecessors,
        }
    }

    /// Label every vertex with a connected-component id.
    ///
    /// Ids are assigned in order of each component's lowest vertex, so vertex 0
    /// is always in component 0. Returns (labels, component count).
    pub fn connected_components(&self) -> (Vec<u32>, usize) {
        let mut labels = vec![u32::MAX; self.vertex_count()];
        let mut queue = VecDeque::new();
        let mut count = 0u32;

        for start in 0..self.vertex_count() {
            if labels[start] != u32::MAX {
                continue;
            }
            labels[start] = count;
            queue.push_back(start as u32);

            while let Some(v) = queue.pop_front() {
                for &(n, _) in self.neighbors(v) {
                    if labels[n as usize] == u32::MAX {
                        labels[n as usize] = count;
                        queue.push_back(n);
                    }
                }
            }
            count += 1;
        }

        (labels, count as usize)
    }
}

/// Priority queue entry; orders as a min-heap on distance, then vertex id.
#[derive(Debug, Clone, Copy)]
struct State {
    vertex: u32,
    distance: f64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Output of a single-source shortest-path search.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: u32,
    distances: Vec<f64>,
    predecessors: Vec<Option<u32>>,
}

impl ShortestPaths {
    /// The search source.
    pub fn source(&self) -> u32 {
        self.source
    }

    /// Distance to a vertex; `f64::INFINITY` if unreachable or unknown.
    pub fn distance(&self, vertex: u32) -> f64 {
        self.distances
            .get(vertex as usize)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Number of vertices reachable from the source (including itself).
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Number of vertices the search could not reach.
    pub fn unreachable_count(&self) -> usize {
        self.distances.len() - self.reachable_count()
    }

    /// Reachable vertex with the greatest distance; ties go to the lowest id.
    pub fn farthest(&self) -> Option<(u32, f64)> {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .fold(None, |best: Option<(u32, f64)>, (v, &d)| match best {
                Some((_, best_d)) if d <= best_d => best,
                _ => Some((v as u32, d)),
            })
    }

    /// Vertices along the shortest path from the source to `target`, inclusive.
    ///
    /// Returns None if `target` is unreachable.
    pub fn path_to(&self, target: u32) -> Option<Vec<u32>> {
        if !self.distance(target).is_finite() {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.predecessors[current as usize] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}
