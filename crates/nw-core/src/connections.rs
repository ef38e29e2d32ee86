//! Directed connection graph between entities.
//!
//! Edges only; endpoint validation (existence, socket compatibility) and the
//! weighted-input bookkeeping on aggregating nodes live in `Document`, which
//! owns both this graph and the entity store.

use crate::id::EntityId;
use crate::model::Connection;
use kurbo::{CubicBez, Point};
use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;

#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    graph: DiGraphMap<EntityId, ()>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, from: EntityId, to: EntityId) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// Add an edge. Returns `false` if it already existed.
    pub fn insert(&mut self, from: EntityId, to: EntityId) -> bool {
        if self.contains(from, to) {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    /// Remove an edge. Returns `false` if it was absent.
    pub fn remove(&mut self, from: EntityId, to: EntityId) -> bool {
        let removed = self.graph.remove_edge(from, to).is_some();
        self.prune(from);
        self.prune(to);
        removed
    }

    /// Drop every edge touching `id`; returns the removed connections.
    pub fn remove_all(&mut self, id: EntityId) -> Vec<Connection> {
        if !self.graph.contains_node(id) {
            return Vec::new();
        }
        let mut removed: Vec<Connection> = self
            .incoming(id)
            .map(|from| Connection { from, to: id })
            .collect();
        removed.extend(self.outgoing(id).map(|to| Connection { from: id, to }));
        let neighbours: Vec<EntityId> = removed
            .iter()
            .map(|c| if c.from == id { c.to } else { c.from })
            .collect();
        self.graph.remove_node(id);
        for n in neighbours {
            self.prune(n);
        }
        removed
    }

    // Nodes without edges carry no information.
    fn prune(&mut self, id: EntityId) {
        if self.graph.contains_node(id)
            && self.graph.neighbors_directed(id, Direction::Incoming).next().is_none()
            && self.graph.neighbors_directed(id, Direction::Outgoing).next().is_none()
        {
            self.graph.remove_node(id);
        }
    }

    pub fn incoming(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.graph.neighbors_directed(id, Direction::Incoming)
    }

    pub fn outgoing(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// All connections, sorted by `(from, to)` so output is history-independent.
    pub fn connections(&self) -> Vec<Connection> {
        let mut all: Vec<Connection> = self
            .graph
            .all_edges()
            .map(|(from, to, _)| Connection { from, to })
            .collect();
        all.sort_by_key(|c| (c.from, c.to));
        all
    }
}

/// Cubic Bézier used to draw a connection between two socket anchors.
///
/// Control points sit horizontally out from each end by half the horizontal
/// distance, so wires leave outputs to the right and enter inputs from the left.
pub fn curve_between(from: Point, to: Point) -> CubicBez {
    let k = (to.x - from.x).abs() * 0.5;
    CubicBez::new(
        from,
        Point::new(from.x + k, from.y),
        Point::new(to.x - k, to.y),
        to,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(n: u64) -> EntityId {
        EntityId::from_raw(n)
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut g = ConnectionGraph::new();
        assert!(g.insert(id(1), id(2)));
        assert!(!g.insert(id(1), id(2)));
        assert!(g.insert(id(2), id(1)));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn remove_all_returns_both_directions() {
        let mut g = ConnectionGraph::new();
        g.insert(id(1), id(2));
        g.insert(id(2), id(3));
        g.insert(id(4), id(3));
        let mut removed = g.remove_all(id(2));
        removed.sort_by_key(|c| (c.from, c.to));
        assert_eq!(
            removed,
            vec![
                Connection { from: id(1), to: id(2) },
                Connection { from: id(2), to: id(3) },
            ]
        );
        assert_eq!(
            g.connections(),
            vec![Connection { from: id(4), to: id(3) }]
        );
        assert!(g.remove_all(id(2)).is_empty());
    }

    #[test]
    fn connections_are_sorted() {
        let mut g = ConnectionGraph::new();
        g.insert(id(5), id(1));
        g.insert(id(2), id(9));
        g.insert(id(2), id(3));
        let pairs: Vec<_> = g.connections().iter().map(|c| (c.from.raw(), c.to.raw())).collect();
        assert_eq!(pairs, vec![(2, 3), (2, 9), (5, 1)]);
    }

    #[test]
    fn curve_control_points() {
        let c = curve_between(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert_eq!(c.p1, Point::new(50.0, 0.0));
        assert_eq!(c.p2, Point::new(50.0, 50.0));

        // Backwards wires still bulge outward.
        let c = curve_between(Point::new(100.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(c.p1, Point::new(150.0, 0.0));
        assert_eq!(c.p2, Point::new(-50.0, 0.0));
    }
}
