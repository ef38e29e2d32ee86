//! The canvas document: entities, connections, selection, shapes and text blocks.
//!
//! `Document` is the only owner of these stores, so every operation that has
//! to keep two of them in step (delete cascading to selection and edges,
//! connect appending a weighted input) completes inside one `&mut self`
//! call. Readers never observe an edge without its weighted-input record.

use crate::config::EditorConfig;
use crate::connections::ConnectionGraph;
use crate::error::{ConnectionRejection, EditError, Result};
use crate::id::EntityId;
use crate::model::{
    Connection, Entity, EntityPatch, Lane, Payload, Shape, TextBlock, WeightedInput,
};
use crate::selection::Selection;
use crate::store::EntityStore;
use kurbo::{Point, Rect, Size, Vec2};

#[derive(Debug, Clone, Default)]
pub struct Document {
    store: EntityStore,
    connections: ConnectionGraph,
    selection: Selection,
    shapes: Vec<Shape>,
    texts: Vec<TextBlock>,
    config: EditorConfig,
}

impl Document {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn texts(&self) -> &[TextBlock] {
        &self.texts
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    /// Entities back to front.
    pub fn entities(&self) -> impl DoubleEndedIterator<Item = &Entity> + '_ {
        self.store.iter()
    }

    pub fn shape(&self, id: EntityId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn text(&self, id: EntityId) -> Option<&TextBlock> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty() && self.shapes.is_empty() && self.texts.is_empty()
    }

    // ─── Entities ────────────────────────────────────────────────────────

    /// Create an entity with the default size for its lane.
    pub fn create_entity(&mut self, payload: Payload, position: Point, lane: Lane) -> EntityId {
        let size = match lane {
            Lane::Nodes => self.config.node_size,
            Lane::Assets => self.config.asset_size,
        };
        self.create_entity_sized(payload, position, size, lane)
    }

    pub fn create_entity_sized(
        &mut self,
        payload: Payload,
        position: Point,
        size: Size,
        lane: Lane,
    ) -> EntityId {
        // Weighted inputs only ever come from `connect`.
        let payload = match payload {
            Payload::Mix { .. } => Payload::Mix {
                inputs: Default::default(),
            },
            other => other,
        };
        self.store.create(payload, position, size, lane)
    }

    /// Merge a partial update into an entity.
    ///
    /// Weighted inputs belong to the connection graph: a `Mix` payload in the
    /// patch keeps the entity's current inputs. Use `set_input_weight` to
    /// change a weight.
    pub fn update_entity(&mut self, id: EntityId, mut patch: EntityPatch) -> Result<()> {
        if let Some(Payload::Mix { inputs }) = patch.payload.as_mut() {
            let current = self
                .store
                .get(id)
                .ok_or(EditError::NotFound(id))?
                .payload()
                .inputs();
            *inputs = current.iter().copied().collect();
        }
        self.store.update(id, patch)
    }

    /// Remove an entity, its selection membership, every edge touching it and
    /// the weighted inputs those edges fed. Returns `false` if it was already gone.
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        for conn in self.connections.remove_all(id) {
            if conn.from == id {
                self.drop_weighted_input(conn.to, id);
            }
        }
        self.selection.remove(id);
        log::debug!("delete entity {id}");
        true
    }

    /// Translate entities by a world-space delta. Unknown ids are skipped.
    pub fn move_entities(&mut self, ids: &[EntityId], delta: Vec2) -> usize {
        let mut moved = 0;
        for id in ids {
            if let Some(e) = self.store.get_mut(*id) {
                e.position += delta;
                moved += 1;
            }
        }
        moved
    }

    /// Bounds of every entity, back to front.
    pub fn entity_bounds(&self) -> impl Iterator<Item = Rect> + '_ {
        self.store.iter().map(Entity::bounds)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Toggle a live entity in the selection; returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: EntityId) -> Result<bool> {
        if !self.store.contains(id) {
            return Err(EditError::NotFound(id));
        }
        Ok(self.selection.toggle(id))
    }

    pub fn select(&mut self, id: EntityId) -> Result<()> {
        if !self.store.contains(id) {
            return Err(EditError::NotFound(id));
        }
        self.selection.insert(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected entities in selection order.
    pub fn selected_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.selection.iter().filter_map(|id| self.store.get(id))
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Add a directed connection.
    ///
    /// Checked in order: both endpoints exist, no self-loop, the source has an
    /// output socket and the target an input socket, the edge is new. An
    /// aggregating target gains a `{ source, weight }` record with the
    /// default weight.
    pub fn connect(
        &mut self,
        from: EntityId,
        to: EntityId,
    ) -> std::result::Result<(), ConnectionRejection> {
        let (Some(source), Some(target)) = (self.store.kind_of(from), self.store.kind_of(to))
        else {
            return Err(ConnectionRejection::UnknownEndpoint);
        };
        if from == to {
            return Err(ConnectionRejection::SelfLoop);
        }
        if !source.has_output() || !target.has_input() {
            return Err(ConnectionRejection::IncompatibleKinds);
        }
        if !self.connections.insert(from, to) {
            return Err(ConnectionRejection::Duplicate);
        }

        if target.aggregates_inputs() {
            let weight = self.config.default_mix_weight;
            if let Some(Payload::Mix { inputs }) = self.store.get_mut(to).map(Entity::payload_mut)
            {
                inputs.push(WeightedInput {
                    source: from,
                    weight,
                });
            }
        }
        log::debug!("connect {from} -> {to}");
        Ok(())
    }

    /// Remove one connection and its weighted-input record.
    pub fn disconnect(&mut self, from: EntityId, to: EntityId) -> bool {
        if !self.connections.remove(from, to) {
            return false;
        }
        self.drop_weighted_input(to, from);
        log::debug!("disconnect {from} -> {to}");
        true
    }

    /// Remove every connection touching `id`. Returns how many were removed.
    pub fn disconnect_all(&mut self, id: EntityId) -> usize {
        let removed = self.connections.remove_all(id);
        for conn in &removed {
            self.drop_weighted_input(conn.to, conn.from);
        }
        removed.len()
    }

    fn drop_weighted_input(&mut self, target: EntityId, source: EntityId) {
        if let Some(Payload::Mix { inputs }) = self.store.get_mut(target).map(Entity::payload_mut) {
            inputs.retain(|w| w.source != source);
        }
    }

    /// Set the weight of `source` on aggregating node `target`, clamped to 0..=100.
    pub fn set_input_weight(&mut self, target: EntityId, source: EntityId, weight: i64) -> Result<()> {
        let entity = self.store.get_mut(target).ok_or(EditError::NotFound(target))?;
        let Payload::Mix { inputs } = entity.payload_mut() else {
            return Err(EditError::NotFound(source));
        };
        let input = inputs
            .iter_mut()
            .find(|w| w.source == source)
            .ok_or(EditError::NotFound(source))?;
        input.weight = weight.clamp(0, 100) as u8;
        Ok(())
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.connections.connections()
    }

    pub fn is_connected(&self, from: EntityId, to: EntityId) -> bool {
        self.connections.contains(from, to)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Commit a rectangle spanned by two corners, in any order.
    pub fn add_shape(&mut self, a: Point, b: Point) -> Result<EntityId> {
        let rect = Rect::from_points(a, b);
        let min = self.config.min_shape_size;
        if rect.width() < min || rect.height() < min {
            return Err(EditError::DegenerateGeometry {
                width: rect.width(),
                height: rect.height(),
            });
        }
        let id = self.store.allocate_id();
        self.shapes.push(Shape { id, rect });
        log::debug!("add shape {id} {rect:?}");
        Ok(id)
    }

    pub fn move_shape(&mut self, id: EntityId, delta: Vec2) -> Result<()> {
        let shape = self.shape_mut(id)?;
        shape.rect = shape.rect + delta;
        Ok(())
    }

    /// Resize from the top-left corner; each side is kept at least `min_resize`.
    pub fn resize_shape(&mut self, id: EntityId, size: Size) -> Result<()> {
        let min = self.config.min_resize;
        let shape = self.shape_mut(id)?;
        let size = Size::new(size.width.max(min), size.height.max(min));
        shape.rect = Rect::from_origin_size(shape.rect.origin(), size);
        Ok(())
    }

    pub fn delete_shape(&mut self, id: EntityId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() != before
    }

    fn shape_mut(&mut self, id: EntityId) -> Result<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(EditError::NotFound(id))
    }

    // ─── Text blocks ─────────────────────────────────────────────────────

    pub fn add_text(&mut self, position: Point, text: impl Into<String>) -> EntityId {
        let id = self.store.allocate_id();
        self.texts.push(TextBlock {
            id,
            position,
            text: text.into(),
        });
        log::debug!("add text {id}");
        id
    }

    pub fn move_text(&mut self, id: EntityId, position: Point) -> Result<()> {
        self.text_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_text(&mut self, id: EntityId, text: impl Into<String>) -> Result<()> {
        self.text_mut(id)?.text = text.into();
        Ok(())
    }

    pub fn delete_text(&mut self, id: EntityId) -> bool {
        let before = self.texts.len();
        self.texts.retain(|t| t.id != id);
        self.texts.len() != before
    }

    fn text_mut(&mut self, id: EntityId) -> Result<&mut TextBlock> {
        self.texts
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(EditError::NotFound(id))
    }

    // ─── Invariants ──────────────────────────────────────────────────────

    /// Check every cross-store invariant:
    /// lanes resolve, selection ⊆ live entities, edges join live entities with
    /// compatible sockets, and each aggregating node's weighted inputs match
    /// its incoming edges one-to-one.
    pub fn is_consistent(&self) -> bool {
        if !self.store.lanes_consistent() {
            return false;
        }
        if !self.selection.iter().all(|id| self.store.contains(id)) {
            return false;
        }
        let edges_ok = self.connections.connections().iter().all(|c| {
            match (self.store.kind_of(c.from), self.store.kind_of(c.to)) {
                (Some(f), Some(t)) => c.from != c.to && f.has_output() && t.has_input(),
                _ => false,
            }
        });
        if !edges_ok {
            return false;
        }
        self.store.iter().all(|e| {
            if !e.kind().aggregates_inputs() {
                return e.payload().inputs().is_empty();
            }
            let mut sources: Vec<EntityId> = e.payload().inputs().iter().map(|w| w.source).collect();
            let mut incoming: Vec<EntityId> = self.connections.incoming(e.id).collect();
            sources.sort();
            incoming.sort();
            sources == incoming
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use pretty_assertions::assert_eq;

    fn node(doc: &mut Document, kind: EntityKind) -> EntityId {
        doc.create_entity(Payload::default_for(kind), Point::ZERO, Lane::Nodes)
    }

    #[test]
    fn connect_rejections_in_order() {
        let mut doc = Document::default();
        let text = node(&mut doc, EntityKind::Text);
        let mix = node(&mut doc, EntityKind::Mix);
        let three_d = node(&mut doc, EntityKind::AiOutput3d);
        let ghost = EntityId::from_raw(999);

        assert_eq!(doc.connect(ghost, mix), Err(ConnectionRejection::UnknownEndpoint));
        assert_eq!(doc.connect(mix, mix), Err(ConnectionRejection::SelfLoop));
        assert_eq!(doc.connect(mix, text), Err(ConnectionRejection::IncompatibleKinds));
        assert_eq!(doc.connect(three_d, mix), Err(ConnectionRejection::IncompatibleKinds));
        assert_eq!(doc.connect(text, mix), Ok(()));
        assert_eq!(doc.connect(text, mix), Err(ConnectionRejection::Duplicate));
        assert!(doc.is_consistent());
    }

    #[test]
    fn mix_target_gets_weighted_input() {
        let mut doc = Document::default();
        let a = node(&mut doc, EntityKind::Text);
        let b = node(&mut doc, EntityKind::Image);
        let mix = node(&mut doc, EntityKind::Mix);
        doc.connect(a, mix).unwrap();
        doc.connect(b, mix).unwrap();
        assert_eq!(
            doc.entity(mix).unwrap().payload().inputs(),
            &[
                WeightedInput { source: a, weight: 50 },
                WeightedInput { source: b, weight: 50 },
            ]
        );

        assert!(doc.disconnect(a, mix));
        assert!(!doc.disconnect(a, mix));
        assert_eq!(
            doc.entity(mix).unwrap().payload().inputs(),
            &[WeightedInput { source: b, weight: 50 }]
        );
        assert!(doc.is_consistent());
    }

    #[test]
    fn non_aggregating_target_has_no_inputs() {
        let mut doc = Document::default();
        let a = node(&mut doc, EntityKind::Color);
        let out = node(&mut doc, EntityKind::AiOutputImage);
        doc.connect(a, out).unwrap();
        assert!(doc.entity(out).unwrap().payload().inputs().is_empty());
        assert!(doc.is_connected(a, out));
    }

    #[test]
    fn delete_cascades_and_is_idempotent() {
        let mut doc = Document::default();
        let a = node(&mut doc, EntityKind::Text);
        let mix = node(&mut doc, EntityKind::Mix);
        let out = node(&mut doc, EntityKind::AiOutput3d);
        doc.connect(a, mix).unwrap();
        doc.connect(mix, out).unwrap();
        doc.select(a).unwrap();
        doc.select(mix).unwrap();

        assert!(doc.delete_entity(a));
        assert!(!doc.delete_entity(a));
        assert!(!doc.selection().contains(a));
        assert!(doc.entity(mix).unwrap().payload().inputs().is_empty());
        assert_eq!(doc.connections(), vec![Connection { from: mix, to: out }]);

        assert!(doc.delete_entity(mix));
        assert_eq!(doc.connection_count(), 0);
        assert!(doc.selection().is_empty());
        assert!(doc.is_consistent());
    }

    #[test]
    fn weights_are_clamped() {
        let mut doc = Document::default();
        let a = node(&mut doc, EntityKind::Text);
        let mix = node(&mut doc, EntityKind::Mix);
        doc.connect(a, mix).unwrap();
        doc.set_input_weight(mix, a, 140).unwrap();
        assert_eq!(doc.entity(mix).unwrap().payload().inputs()[0].weight, 100);
        doc.set_input_weight(mix, a, -3).unwrap();
        assert_eq!(doc.entity(mix).unwrap().payload().inputs()[0].weight, 0);
        assert_eq!(
            doc.set_input_weight(mix, mix, 10),
            Err(EditError::NotFound(mix))
        );
    }

    #[test]
    fn patch_cannot_rewrite_mix_inputs() {
        let mut doc = Document::default();
        let a = node(&mut doc, EntityKind::Text);
        let mix = node(&mut doc, EntityKind::Mix);
        doc.connect(a, mix).unwrap();
        doc.update_entity(
            mix,
            EntityPatch {
                payload: Some(Payload::Mix {
                    inputs: Default::default(),
                }),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(doc.entity(mix).unwrap().payload().inputs().len(), 1);
        assert!(doc.is_consistent());
    }

    #[test]
    fn rectangle_is_normalized() {
        let mut doc = Document::default();
        let id = doc
            .add_shape(Point::new(10.0, 10.0), Point::new(-5.0, -5.0))
            .unwrap();
        assert_eq!(doc.shape(id).unwrap().rect, Rect::new(-5.0, -5.0, 10.0, 10.0));
    }

    #[test]
    fn tiny_rectangle_is_rejected() {
        let mut doc = Document::default();
        let err = doc
            .add_shape(Point::new(0.0, 0.0), Point::new(4.0, 50.0))
            .unwrap_err();
        assert_eq!(
            err,
            EditError::DegenerateGeometry {
                width: 4.0,
                height: 50.0
            }
        );
        assert!(doc.shapes().is_empty());
    }

    #[test]
    fn resize_keeps_minimum() {
        let mut doc = Document::default();
        let id = doc
            .add_shape(Point::new(0.0, 0.0), Point::new(100.0, 100.0))
            .unwrap();
        doc.resize_shape(id, Size::new(3.0, 250.0)).unwrap();
        assert_eq!(doc.shape(id).unwrap().rect, Rect::new(0.0, 0.0, 20.0, 250.0));
    }

    #[test]
    fn text_blocks_lifecycle() {
        let mut doc = Document::default();
        let id = doc.add_text(Point::new(3.0, 4.0), "New Text");
        doc.set_text(id, "hello").unwrap();
        doc.move_text(id, Point::new(10.0, 10.0)).unwrap();
        let t = doc.text(id).unwrap();
        assert_eq!(t.text, "hello");
        assert_eq!(t.position, Point::new(10.0, 10.0));
        assert!(doc.delete_text(id));
        assert!(!doc.delete_text(id));
        assert_eq!(doc.set_text(id, "x"), Err(EditError::NotFound(id)));
    }

    #[test]
    fn shapes_and_entities_share_the_id_space() {
        let mut doc = Document::default();
        let e = node(&mut doc, EntityKind::Text);
        let s = doc
            .add_shape(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
            .unwrap();
        let t = doc.add_text(Point::ZERO, "t");
        assert_ne!(e, s);
        assert_ne!(s, t);
        assert_ne!(e, t);
    }

    #[test]
    fn toggle_requires_live_entity() {
        let mut doc = Document::default();
        let ghost = EntityId::from_raw(42);
        assert_eq!(doc.toggle_selection(ghost), Err(EditError::NotFound(ghost)));
    }
}
