//! SVG export.
//!
//! Serializes the whole document into a standalone SVG whose viewBox is the
//! union of every element's bounds plus a margin. Painting is back to front:
//! connections, shapes, text blocks, entities. Output depends only on the
//! document state, so identical states export byte-identical markup.

use crate::wires::{connection_curve, path_data};
use kurbo::Rect;
use nw_core::{Document, EditError, Entity, Payload, Result};

pub const EXPORT_FILENAME: &str = "canvas-export.svg";

const WIRE_COLOR: &str = "#0ea5e9";

/// A finished export, ready to hand to the host for download.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgExport {
    pub filename: &'static str,
    pub markup: String,
}

pub fn export_svg(doc: &Document) -> Result<SvgExport> {
    let config = doc.config();
    let bounds = doc
        .entity_bounds()
        .chain(doc.shapes().iter().map(|s| s.rect))
        .chain(doc.texts().iter().map(|t| t.bounds(config.text_block_size)))
        .reduce(|acc, r| acc.union(r))
        .ok_or(EditError::EmptyExport)?;
    let view = bounds.inflate(config.export_padding, config.export_padding);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
        view.width(),
        view.height(),
        view.x0,
        view.y0,
        view.width(),
        view.height()
    ));
    svg.push_str("<defs>\n");
    svg.push_str(&format!(
        "  <marker id=\"arrow\" markerWidth=\"10\" markerHeight=\"7\" refX=\"5\" refY=\"3.5\" orient=\"auto\" markerUnits=\"strokeWidth\"><polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{WIRE_COLOR}\" /></marker>\n"
    ));
    svg.push_str("</defs>\n");

    for conn in doc.connections() {
        if let Some(curve) = connection_curve(doc, conn) {
            svg.push_str(&format!(
                "<path d=\"{}\" stroke=\"{WIRE_COLOR}\" stroke-width=\"2\" fill=\"none\" marker-end=\"url(#arrow)\" />\n",
                path_data(&curve)
            ));
        }
    }

    for shape in doc.shapes() {
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#000\" stroke-width=\"1.5\" />\n",
            shape.rect.x0,
            shape.rect.y0,
            shape.rect.width(),
            shape.rect.height()
        ));
    }

    for text in doc.texts() {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"black\" font-family=\"sans-serif\">{}</text>\n",
            text.position.x,
            text.position.y + 14.0,
            escape(&text.text)
        ));
    }

    for entity in doc.entities() {
        render_entity(&mut svg, doc, entity);
    }

    svg.push_str("</svg>\n");
    log::debug!("export: {} bytes, viewBox {view:?}", svg.len());

    Ok(SvgExport {
        filename: EXPORT_FILENAME,
        markup: svg,
    })
}

fn render_entity(out: &mut String, doc: &Document, entity: &Entity) {
    let Rect { x0: x, y0: y, .. } = entity.bounds();
    out.push_str(&format!(
        "<rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" fill=\"#111827\" stroke=\"#ccc\" rx=\"10\" ry=\"10\" />\n",
        entity.size.width, entity.size.height
    ));
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" fill=\"white\" font-family=\"sans-serif\" font-size=\"13\" font-weight=\"bold\">{} - ID {}</text>\n",
        x + 10.0,
        y + 20.0,
        entity.kind().label(),
        entity.id
    ));
    for (i, line) in content_lines(doc, entity).iter().enumerate() {
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"#ccc\" font-family=\"sans-serif\" font-size=\"12\">{}</text>\n",
            x + 10.0,
            y + 38.0 + i as f64 * 16.0,
            escape(line)
        ));
    }
}

/// Kind-specific body lines under an entity's header.
fn content_lines(doc: &Document, entity: &Entity) -> Vec<String> {
    match entity.payload() {
        Payload::Text { content } => vec![format!("\"{content}\"")],
        Payload::Image { file } => vec![if file.is_some() {
            "(Uploaded Image)".to_string()
        } else {
            "(No file)".to_string()
        }],
        Payload::Color { color, opacity } => vec![format!("{} @ {opacity}%", color.to_hex())],
        Payload::Size { x, y, z } => {
            let axis = |v: &Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
            vec![format!("x: {}, y: {}, z: {}", axis(x), axis(y), axis(z))]
        }
        Payload::AiOutputImage { content, .. } => vec![if content.is_empty() {
            format!("Generated_Image_{}.png", entity.id)
        } else {
            content.clone()
        }],
        Payload::AiOutput3d { content, .. } => vec![if content.is_empty() {
            format!("Generated_Model_{}.glb", entity.id)
        } else {
            content.clone()
        }],
        Payload::Mix { inputs } => {
            let mut lines = vec!["Mix:".to_string()];
            for input in inputs {
                let name = match doc.entity(input.source).map(Entity::payload) {
                    Some(Payload::Text { content }) => {
                        format!("\"{}...\"", content.chars().take(15).collect::<String>())
                    }
                    Some(Payload::Image { .. }) => "Image".to_string(),
                    Some(Payload::AiOutputImage { content, .. }) if !content.is_empty() => {
                        content.clone()
                    }
                    Some(Payload::AiOutputImage { .. }) => format!("Image_{}", input.source),
                    _ => "Unknown Input".to_string(),
                };
                lines.push(format!("{name} - {}%", input.weight));
            }
            lines
        }
        Payload::GenericAsset { label } => vec![label.clone()],
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
