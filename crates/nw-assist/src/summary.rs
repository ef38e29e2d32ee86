//! Readable per-entity context sent along with a prompt.

use nw_core::{Entity, EntityId, EntityKind, Payload};
use serde::Serialize;

/// What the collaborator gets to know about one selected entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub id: EntityId,
    pub kind: EntityKind,
    pub detail: SummaryDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SummaryDetail {
    Text { content: String },
    Image { file_name: Option<String> },
    Color { color: String, opacity: u8 },
    Size { x: Option<f64>, y: Option<f64>, z: Option<f64> },
    Mix { input_ids: Vec<EntityId> },
    Generated { source_prompt: String },
    Asset { label: String },
}

impl EntitySummary {
    pub fn of(entity: &Entity) -> Self {
        let detail = match entity.payload() {
            Payload::Text { content } => SummaryDetail::Text {
                content: content.clone(),
            },
            Payload::Image { file } => SummaryDetail::Image {
                file_name: file.as_deref().map(short_file_name),
            },
            Payload::Color { color, opacity } => SummaryDetail::Color {
                color: color.to_hex(),
                opacity: *opacity,
            },
            Payload::Size { x, y, z } => SummaryDetail::Size {
                x: *x,
                y: *y,
                z: *z,
            },
            Payload::Mix { inputs } => SummaryDetail::Mix {
                input_ids: inputs.iter().map(|w| w.source).collect(),
            },
            Payload::AiOutputImage { source_prompt, .. }
            | Payload::AiOutput3d { source_prompt, .. } => SummaryDetail::Generated {
                source_prompt: source_prompt.clone(),
            },
            Payload::GenericAsset { label } => SummaryDetail::Asset {
                label: label.clone(),
            },
        };
        Self {
            id: entity.id,
            kind: entity.kind(),
            detail,
        }
    }

    /// One-line English description, e.g. `contains text: "..."`.
    pub fn describe(&self) -> String {
        match &self.detail {
            SummaryDetail::Text { content } => {
                let head: String = content.chars().take(50).collect();
                format!("contains text: \"{head}...\"")
            }
            SummaryDetail::Image { file_name } => format!(
                "is an image named \"{}\"",
                file_name.as_deref().unwrap_or("unnamed")
            ),
            SummaryDetail::Color { color, opacity } => {
                format!("is the color {color} at {opacity}% opacity")
            }
            SummaryDetail::Size { x, y, z } => {
                let axis = |v: &Option<f64>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
                format!("is a size of {} × {} × {}", axis(x), axis(y), axis(z))
            }
            SummaryDetail::Mix { input_ids } => {
                let ids: Vec<String> = input_ids.iter().map(ToString::to_string).collect();
                format!("mixes {} nodes with IDs: {}", input_ids.len(), ids.join(", "))
            }
            SummaryDetail::Generated { source_prompt } => match self.kind {
                EntityKind::AiOutput3d => {
                    format!("is a 3D model generated from the prompt: \"{source_prompt}\"")
                }
                _ => format!("is an AI image generated from the prompt: \"{source_prompt}\""),
            },
            SummaryDetail::Asset { .. } => format!("is an asset of type {}", self.kind),
        }
    }
}

/// Last path segment without query string, at most 20 characters.
fn short_file_name(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    let last = last.split('?').next().unwrap_or(last);
    last.chars().take(20).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nw_core::{Lane, Point, Document};
    use pretty_assertions::assert_eq;

    #[test]
    fn text_is_truncated_to_fifty_chars() {
        let mut doc = Document::default();
        let long = "x".repeat(80);
        let id = doc.create_entity(
            Payload::Text {
                content: long.clone(),
            },
            Point::ZERO,
            Lane::Nodes,
        );
        let s = EntitySummary::of(doc.entity(id).unwrap());
        assert_eq!(s.describe(), format!("contains text: \"{}...\"", "x".repeat(50)));
    }

    #[test]
    fn image_file_name_is_shortened() {
        assert_eq!(
            short_file_name("https://cdn.example.com/a/b/sunset-over-the-harbour.png?w=300"),
            "sunset-over-the-harb"
        );
        assert_eq!(short_file_name("cat.png"), "cat.png");
    }

    #[test]
    fn mix_lists_input_ids() {
        let mut doc = Document::default();
        let a = doc.create_entity(Payload::default_for(EntityKind::Text), Point::ZERO, Lane::Nodes);
        let b = doc.create_entity(Payload::default_for(EntityKind::Image), Point::ZERO, Lane::Nodes);
        let mix = doc.create_entity(Payload::default_for(EntityKind::Mix), Point::ZERO, Lane::Nodes);
        doc.connect(a, mix).unwrap();
        doc.connect(b, mix).unwrap();
        let s = EntitySummary::of(doc.entity(mix).unwrap());
        assert_eq!(s.describe(), format!("mixes 2 nodes with IDs: {a}, {b}"));
    }

    #[test]
    fn generated_assets_quote_their_prompt() {
        let mut doc = Document::default();
        let id = doc.create_entity(
            Payload::AiOutput3d {
                content: String::new(),
                source_prompt: "@3d a chair".into(),
                parent: None,
            },
            Point::ZERO,
            Lane::Assets,
        );
        let s = EntitySummary::of(doc.entity(id).unwrap());
        assert_eq!(
            s.describe(),
            "is a 3D model generated from the prompt: \"@3d a chair\""
        );
    }
}
