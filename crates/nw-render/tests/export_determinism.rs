//! Integration tests: SVG export is a pure function of document state.

use nw_core::{Document, EntityKind, Lane, Payload, Point, Vec2};
use nw_render::export_svg;

fn build(doc: &mut Document) {
    let text = doc.create_entity(
        Payload::Text {
            content: "castle at dusk".into(),
        },
        Point::new(10.0, 20.0),
        Lane::Nodes,
    );
    let image = doc.create_entity(
        Payload::default_for(EntityKind::Image),
        Point::new(10.0, 200.0),
        Lane::Nodes,
    );
    let mix = doc.create_entity(
        Payload::default_for(EntityKind::Mix),
        Point::new(400.0, 100.0),
        Lane::Nodes,
    );
    let out = doc.create_entity(
        Payload::default_for(EntityKind::AiOutput3d),
        Point::new(800.0, 100.0),
        Lane::Assets,
    );
    doc.connect(text, mix).unwrap();
    doc.connect(image, mix).unwrap();
    doc.connect(mix, out).unwrap();
    doc.add_shape(Point::new(-50.0, -50.0), Point::new(-10.0, -5.0))
        .unwrap();
    doc.add_text(Point::new(0.0, 400.0), "x < y");
}

#[test]
fn identical_states_export_identical_bytes() {
    let mut a = Document::default();
    let mut b = Document::default();
    build(&mut a);
    build(&mut b);
    assert_eq!(export_svg(&a).unwrap(), export_svg(&b).unwrap());
    // Exporting twice does not disturb anything.
    assert_eq!(export_svg(&a).unwrap(), export_svg(&a).unwrap());
}

#[test]
fn export_tracks_moves() {
    let mut doc = Document::default();
    build(&mut doc);
    let before = export_svg(&doc).unwrap().markup;
    let ids: Vec<_> = doc.entities().map(|e| e.id).collect();
    doc.move_entities(&ids[..1], Vec2::new(5.0, 0.0));
    assert_ne!(before, export_svg(&doc).unwrap().markup);
}

#[test]
fn every_connection_is_drawn() {
    let mut doc = Document::default();
    build(&mut doc);
    let markup = export_svg(&doc).unwrap().markup;
    assert_eq!(markup.matches("<path ").count(), doc.connection_count());
}
