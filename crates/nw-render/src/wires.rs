//! Wire geometry shared by the live canvas and the SVG export.

use kurbo::CubicBez;
use nw_core::{Connection, Document, curve_between};

/// Curve from the source's output anchor to the target's input anchor.
/// `None` if either endpoint is gone.
pub fn connection_curve(doc: &Document, conn: Connection) -> Option<CubicBez> {
    let from = doc.entity(conn.from)?;
    let to = doc.entity(conn.to)?;
    Some(curve_between(from.output_anchor(), to.input_anchor()))
}

/// SVG path data (`M … C …`) for a cubic.
pub fn path_data(c: &CubicBez) -> String {
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        c.p0.x, c.p0.y, c.p1.x, c.p1.y, c.p2.x, c.p2.y, c.p3.x, c.p3.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nw_core::{EntityKind, Lane, Payload, Point};
    use pretty_assertions::assert_eq;

    #[test]
    fn curve_runs_between_socket_anchors() {
        let mut doc = Document::default();
        let a = doc.create_entity(
            Payload::default_for(EntityKind::Text),
            Point::new(0.0, 0.0),
            Lane::Nodes,
        );
        let b = doc.create_entity(
            Payload::default_for(EntityKind::Mix),
            Point::new(400.0, 100.0),
            Lane::Nodes,
        );
        doc.connect(a, b).unwrap();
        let c = connection_curve(&doc, Connection { from: a, to: b }).unwrap();
        assert_eq!(path_data(&c), "M 180 50 C 290 50, 290 150, 400 150");
    }
}
