// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Breadth-first placement of scanners into the root frame.
//!
//! The overlap graph is an arena: nodes are scanner slots, edges are stored
//! once per unordered pair and referenced from both endpoints' adjacency lists
//! by index. No back-references, no shared ownership.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use blake3::Hasher;
use probe_geom::{Point3, Transform};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::scanner::{ScannerId, ScannerSet};

/// Blake3 digest (32 bytes).
pub type Hash32 = [u8; 32];

/// A resolved overlap edge: `transform` maps `b`'s local frame into `a`'s.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// Slot of the first endpoint.
    pub a: usize,
    /// Slot of the second endpoint.
    pub b: usize,
    /// `b` local → `a` local.
    pub transform: Transform,
}

/// Overlap graph over scanner slots.
#[derive(Debug, Clone, Default)]
pub struct OverlapGraph {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<GraphEdge>,
}

impl OverlapGraph {
    /// Graph with `node_count` isolated nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edges: Vec::new(),
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Adds an edge; returns `false` (and ignores it) when either slot is out
    /// of range or the edge is a self-loop.
    pub fn add_edge(&mut self, a: usize, b: usize, transform: Transform) -> bool {
        if a == b || a >= self.adjacency.len() || b >= self.adjacency.len() {
            return false;
        }
        let id = self.edges.len();
        self.edges.push(GraphEdge { a, b, transform });
        self.adjacency[a].push(id);
        self.adjacency[b].push(id);
        true
    }

    /// Neighbours of `slot` in edge insertion order, each with the transform
    /// from the neighbour's frame into `slot`'s frame.
    pub fn neighbors(&self, slot: usize) -> impl Iterator<Item = (usize, Transform)> + '_ {
        self.adjacency
            .get(slot)
            .into_iter()
            .flatten()
            .filter_map(move |&id| {
                let e = self.edges.get(id)?;
                if e.a == slot {
                    Some((e.b, e.transform))
                } else {
                    Some((e.a, e.transform.inverse()))
                }
            })
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }
}

/// The assembled global frame.
///
/// Invariants:
/// - the root's transform is the identity and its position is the origin,
/// - every placed scanner has both a transform and a position,
/// - `points` holds every placed scanner's points in root coordinates, once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFrame {
    root: ScannerId,
    transforms: BTreeMap<ScannerId, Transform>,
    positions: BTreeMap<ScannerId, Point3>,
    points: BTreeSet<Point3>,
    unplaced: BTreeSet<ScannerId>,
}

impl GlobalFrame {
    /// Empty frame rooted at `root`.
    pub fn new(root: ScannerId) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Root scanner id.
    pub const fn root(&self) -> ScannerId {
        self.root
    }

    /// Inserts a point in root coordinates; `false` when already present.
    pub fn insert_point(&mut self, p: Point3) -> bool {
        self.points.insert(p)
    }

    /// Records a placed scanner. First writer wins: returns `false` and keeps
    /// the existing placement if `id` was already placed.
    pub fn place(&mut self, id: ScannerId, to_root: Transform) -> bool {
        if self.transforms.contains_key(&id) {
            return false;
        }
        self.transforms.insert(id, to_root);
        self.positions.insert(id, to_root.origin());
        self.unplaced.remove(&id);
        true
    }

    /// Marks a scanner as unreachable from the root.
    pub fn mark_unplaced(&mut self, id: ScannerId) {
        if !self.transforms.contains_key(&id) {
            self.unplaced.insert(id);
        }
    }

    /// Size of the deduplicated global point set.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Deduplicated points in root coordinates, ascending.
    pub fn points(&self) -> &BTreeSet<Point3> {
        &self.points
    }

    /// Transform of `id` into the root frame.
    pub fn transform(&self, id: ScannerId) -> Option<Transform> {
        self.transforms.get(&id).copied()
    }

    /// Position of scanner `id` in the root frame.
    pub fn position(&self, id: ScannerId) -> Option<Point3> {
        self.positions.get(&id).copied()
    }

    /// All placed scanner positions, by id.
    pub fn positions(&self) -> &BTreeMap<ScannerId, Point3> {
        &self.positions
    }

    /// Scanners unreachable from the root.
    pub fn unplaced(&self) -> &BTreeSet<ScannerId> {
        &self.unplaced
    }

    /// `true` when every scanner was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Largest Manhattan distance between any two placed scanners (0 with
    /// fewer than two).
    pub fn max_scanner_manhattan_distance(&self) -> i64 {
        let positions: Vec<Point3> = self.positions.values().copied().collect();
        positions
            .iter()
            .enumerate()
            .flat_map(|(i, a)| positions[i + 1..].iter().map(move |b| a.manhattan_distance(b)))
            .max()
            .unwrap_or(0)
    }

    /// Canonical blake3 digest of positions, points and unplaced ids.
    ///
    /// Encoding: version tag, then each section as a little-endian `u64`
    /// length followed by its entries in ascending order.
    pub fn digest(&self) -> Hash32 {
        let mut h = Hasher::new();
        h.update(&1u16.to_le_bytes());
        h.update(&self.root.to_le_bytes());
        h.update(&(self.positions.len() as u64).to_le_bytes());
        for (id, p) in &self.positions {
            h.update(&id.to_le_bytes());
            hash_point(&mut h, p);
        }
        h.update(&(self.points.len() as u64).to_le_bytes());
        for p in &self.points {
            hash_point(&mut h, p);
        }
        h.update(&(self.unplaced.len() as u64).to_le_bytes());
        for id in &self.unplaced {
            h.update(&id.to_le_bytes());
        }
        h.finalize().into()
    }

    /// The three output metrics.
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            global_point_count: self.point_count(),
            max_scanner_manhattan_distance: self.max_scanner_manhattan_distance(),
            unplaced_scanner_ids: self.unplaced.iter().copied().collect(),
        }
    }
}

fn hash_point(h: &mut Hasher, p: &Point3) {
    for c in p.to_array() {
        h.update(&c.to_le_bytes());
    }
}

/// Output metrics handed to reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    /// Size of the deduplicated global point set.
    pub global_point_count: usize,
    /// Largest Manhattan distance between placed scanners.
    pub max_scanner_manhattan_distance: i64,
    /// Scanners unreachable from the root, ascending.
    pub unplaced_scanner_ids: Vec<ScannerId>,
}

/// Places every scanner reachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAssembler {
    root_slot: usize,
}

impl FrameAssembler {
    /// Assembler rooted at arena slot `root_slot`.
    pub const fn new(root_slot: usize) -> Self {
        Self { root_slot }
    }

    /// Breadth-first traversal from the root composing `f_y = f_x ∘ T_edge`.
    ///
    /// First visit wins; BFS bounds the composed chain length. Scanners never
    /// reached are reported in [`GlobalFrame::unplaced`].
    #[instrument(skip_all, fields(root = self.root_slot, edges = graph.edge_count()))]
    pub fn assemble(&self, scanners: &ScannerSet, graph: &OverlapGraph) -> GlobalFrame {
        let Some(root) = scanners.get(self.root_slot) else {
            let mut frame = GlobalFrame::default();
            for s in scanners.iter() {
                frame.mark_unplaced(s.id());
            }
            return frame;
        };
        let mut frame = GlobalFrame::new(root.id());
        let mut to_root: Vec<Option<Transform>> = vec![None; scanners.len()];

        to_root[self.root_slot] = Some(Transform::identity());
        frame.place(root.id(), Transform::identity());
        for p in root.scanner().points() {
            frame.insert_point(*p);
        }

        let mut queue = VecDeque::from([self.root_slot]);
        while let Some(x) = queue.pop_front() {
            let Some(f_x) = to_root[x] else {
                continue;
            };
            for (y, t_edge) in graph.neighbors(x) {
                if to_root[y].is_some() {
                    continue;
                }
                let Some(scanner_y) = scanners.get(y) else {
                    continue;
                };
                let f_y = f_x.compose(&t_edge);
                to_root[y] = Some(f_y);
                frame.place(scanner_y.id(), f_y);
                for p in scanner_y.scanner().points() {
                    frame.insert_point(f_y.apply(p));
                }
                debug!(scanner = scanner_y.id(), position = %f_y.origin(), "placed");
                queue.push_back(y);
            }
        }

        for (slot, s) in scanners.iter().enumerate() {
            if to_root[slot].is_none() {
                frame.mark_unplaced(s.id());
            }
        }
        if !frame.is_complete() {
            warn!(unplaced = ?frame.unplaced(), "overlap graph is disconnected");
        }
        info!(
            placed = frame.positions().len(),
            points = frame.point_count(),
            "frame assembled"
        );
        frame
    }
}
