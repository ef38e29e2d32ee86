//! Hit testing: world point → pointer target.
//!
//! Walks front to back in paint order. Entities paint above text blocks,
//! which paint above shapes, so entities win any overlap. Within an entity,
//! sockets are tested before the body because they straddle its edges.

use kurbo::{Point, Rect, Vec2};
use nw_core::{Document, EntityId};

/// What sits under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Background,
    Entity(EntityId),
    OutputSocket(EntityId),
    InputSocket(EntityId),
    ShapeBody(EntityId),
    ResizeHandle(EntityId),
    TextBlock(EntityId),
}

/// Find the topmost element at `world`.
pub fn hit_test(doc: &Document, world: Point) -> HitTarget {
    let config = doc.config();

    for entity in doc.entities().rev() {
        if config.sockets_enabled {
            let kind = entity.kind();
            if kind.has_output() && within(world, entity.output_anchor(), config.socket_radius) {
                return HitTarget::OutputSocket(entity.id);
            }
            if kind.has_input() && within(world, entity.input_anchor(), config.socket_radius) {
                return HitTarget::InputSocket(entity.id);
            }
        }
        if entity.bounds().contains(world) {
            return HitTarget::Entity(entity.id);
        }
    }

    for text in doc.texts().iter().rev() {
        if text.bounds(config.text_block_size).contains(world) {
            return HitTarget::TextBlock(text.id);
        }
    }

    for shape in doc.shapes().iter().rev() {
        if handle_rect(shape.rect, config.resize_handle).contains(world) {
            return HitTarget::ResizeHandle(shape.id);
        }
        if shape.rect.contains(world) {
            return HitTarget::ShapeBody(shape.id);
        }
    }

    HitTarget::Background
}

fn within(p: Point, center: Point, radius: f64) -> bool {
    (p - center).hypot2() <= radius * radius
}

/// Square handle centered on the bottom-right corner.
fn handle_rect(rect: Rect, side: f64) -> Rect {
    let corner = Point::new(rect.x1, rect.y1);
    let half = Vec2::new(side / 2.0, side / 2.0);
    Rect::from_points(corner - half, corner + half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nw_core::{EditorConfig, EntityKind, Lane, Payload};
    use pretty_assertions::assert_eq;

    fn doc_with(kind: EntityKind, at: Point) -> (Document, EntityId) {
        let mut doc = Document::default();
        let id = doc.create_entity(Payload::default_for(kind), at, Lane::Nodes);
        (doc, id)
    }

    #[test]
    fn background_when_empty() {
        let doc = Document::default();
        assert_eq!(hit_test(&doc, Point::new(5.0, 5.0)), HitTarget::Background);
    }

    #[test]
    fn entity_body() {
        let (doc, id) = doc_with(EntityKind::Text, Point::new(0.0, 0.0));
        assert_eq!(hit_test(&doc, Point::new(90.0, 50.0)), HitTarget::Entity(id));
        assert_eq!(hit_test(&doc, Point::new(500.0, 50.0)), HitTarget::Background);
    }

    #[test]
    fn sockets_follow_kind_capabilities() {
        let (doc, mix) = doc_with(EntityKind::Mix, Point::new(0.0, 0.0));
        assert_eq!(hit_test(&doc, Point::new(182.0, 50.0)), HitTarget::OutputSocket(mix));
        assert_eq!(hit_test(&doc, Point::new(-3.0, 48.0)), HitTarget::InputSocket(mix));

        // Text has no input socket: the left edge is plain body.
        let (doc, text) = doc_with(EntityKind::Text, Point::new(0.0, 0.0));
        assert_eq!(hit_test(&doc, Point::new(1.0, 50.0)), HitTarget::Entity(text));
        assert_eq!(hit_test(&doc, Point::new(-3.0, 50.0)), HitTarget::Background);
    }

    #[test]
    fn sockets_off_in_freeform_variant() {
        let mut doc = Document::new(EditorConfig {
            sockets_enabled: false,
            ..Default::default()
        });
        let id = doc.create_entity(
            Payload::default_for(EntityKind::Mix),
            Point::ZERO,
            Lane::Nodes,
        );
        assert_eq!(hit_test(&doc, Point::new(178.0, 50.0)), HitTarget::Entity(id));
    }

    #[test]
    fn topmost_entity_wins() {
        let mut doc = Document::default();
        let back = doc.create_entity(
            Payload::default_for(EntityKind::Text),
            Point::ZERO,
            Lane::Nodes,
        );
        let front = doc.create_entity(
            Payload::default_for(EntityKind::GenericAsset),
            Point::new(50.0, 20.0),
            Lane::Assets,
        );
        assert_eq!(hit_test(&doc, Point::new(60.0, 30.0)), HitTarget::Entity(front));
        assert_eq!(hit_test(&doc, Point::new(20.0, 10.0)), HitTarget::Entity(back));
    }

    #[test]
    fn shape_handle_before_body() {
        let mut doc = Document::default();
        let s = doc
            .add_shape(Point::new(0.0, 0.0), Point::new(100.0, 100.0))
            .unwrap();
        assert_eq!(hit_test(&doc, Point::new(99.0, 99.0)), HitTarget::ResizeHandle(s));
        assert_eq!(hit_test(&doc, Point::new(50.0, 50.0)), HitTarget::ShapeBody(s));
    }

    #[test]
    fn text_block_above_shape() {
        let mut doc = Document::default();
        doc.add_shape(Point::new(0.0, 0.0), Point::new(300.0, 300.0))
            .unwrap();
        let t = doc.add_text(Point::new(10.0, 10.0), "label");
        assert_eq!(hit_test(&doc, Point::new(20.0, 20.0)), HitTarget::TextBlock(t));
    }
}
