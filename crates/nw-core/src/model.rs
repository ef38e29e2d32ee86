//! Canvas data model.
//!
//! Three element families live on the canvas:
//!
//! - **Entities**: typed nodes/assets (`EntityKind`) that can be selected,
//!   wired together and sent to the assistant as context.
//! - **Shapes**: free rectangles drawn with the rectangle tool.
//! - **Text blocks**: free-floating labels placed with the text tool.
//!
//! An entity's payload is a tagged union with one case per kind; the kind is
//! fixed at creation and only payload fields, position and size change later.

use crate::error::{EditError, Result};
use crate::id::EntityId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let channel = |hi: u8, lo: u8| -> Option<f32> {
            Some((hex_val(hi)? << 4 | hex_val(lo)?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => {
                let short = |c: u8| -> Option<f32> { Some((hex_val(c)? * 17) as f32 / 255.0) };
                Some(Self::rgba(
                    short(bytes[0])?,
                    short(bytes[1])?,
                    short(bytes[2])?,
                    1.0,
                ))
            }
            6 => Some(Self::rgba(
                channel(bytes[0], bytes[1])?,
                channel(bytes[2], bytes[3])?,
                channel(bytes[4], bytes[5])?,
                1.0,
            )),
            8 => Some(Self::rgba(
                channel(bytes[0], bytes[1])?,
                channel(bytes[2], bytes[3])?,
                channel(bytes[4], bytes[5])?,
                channel(bytes[6], bytes[7])?,
            )),
            _ => None,
        }
    }

    /// Emit as uppercase `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Default for Color {
    /// The color a fresh color node starts with (`#000DFF`).
    fn default() -> Self {
        Self::rgba(0.0, 13.0 / 255.0, 1.0, 1.0)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid hex color: {s}"))
    }
}

// ─── Entity kinds ────────────────────────────────────────────────────────

/// The closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Text,
    Image,
    Color,
    Size,
    Mix,
    AiOutputImage,
    #[serde(rename = "ai-output-3d")]
    AiOutput3d,
    GenericAsset,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Text,
        EntityKind::Image,
        EntityKind::Color,
        EntityKind::Size,
        EntityKind::Mix,
        EntityKind::AiOutputImage,
        EntityKind::AiOutput3d,
        EntityKind::GenericAsset,
    ];

    /// Wire name, as used in JSON and tool names.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Text => "text",
            EntityKind::Image => "image",
            EntityKind::Color => "color",
            EntityKind::Size => "size",
            EntityKind::Mix => "mix",
            EntityKind::AiOutputImage => "ai-output-image",
            EntityKind::AiOutput3d => "ai-output-3d",
            EntityKind::GenericAsset => "generic-asset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Display label for node headers.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Text => "Text Node",
            EntityKind::Image => "Image Node",
            EntityKind::Color => "Color Node",
            EntityKind::Size => "Size Node",
            EntityKind::Mix => "Mix Node",
            EntityKind::AiOutputImage => "AI Generated Image",
            EntityKind::AiOutput3d => "AI Generated 3D Model",
            EntityKind::GenericAsset => "Asset",
        }
    }

    /// Whether this kind exposes an output socket (may start a connection).
    pub fn has_output(self) -> bool {
        matches!(
            self,
            EntityKind::Text
                | EntityKind::Image
                | EntityKind::Color
                | EntityKind::Size
                | EntityKind::Mix
                | EntityKind::AiOutputImage
        )
    }

    /// Whether this kind exposes an input socket (may end a connection).
    pub fn has_input(self) -> bool {
        matches!(
            self,
            EntityKind::Mix | EntityKind::AiOutputImage | EntityKind::AiOutput3d
        )
    }

    /// Aggregating kinds keep one weighted-input record per incoming connection.
    pub fn aggregates_inputs(self) -> bool {
        matches!(self, EntityKind::Mix)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Payloads ────────────────────────────────────────────────────────────

/// A `{ source, weight }` record on an aggregating entity. Weight is a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedInput {
    pub source: EntityId,
    pub weight: u8,
}

/// Kind-specific entity data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Payload {
    Text {
        content: String,
    },
    Image {
        /// Data URL or other byte reference; `None` until a file is chosen.
        file: Option<String>,
    },
    Color {
        color: Color,
        /// Percent, 0..=100.
        opacity: u8,
    },
    Size {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    Mix {
        inputs: SmallVec<[WeightedInput; 4]>,
    },
    AiOutputImage {
        content: String,
        source_prompt: String,
        parent: Option<EntityId>,
        file_url: Option<String>,
    },
    #[serde(rename = "ai-output-3d")]
    AiOutput3d {
        content: String,
        source_prompt: String,
        parent: Option<EntityId>,
    },
    GenericAsset {
        label: String,
    },
}

impl Payload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Payload::Text { .. } => EntityKind::Text,
            Payload::Image { .. } => EntityKind::Image,
            Payload::Color { .. } => EntityKind::Color,
            Payload::Size { .. } => EntityKind::Size,
            Payload::Mix { .. } => EntityKind::Mix,
            Payload::AiOutputImage { .. } => EntityKind::AiOutputImage,
            Payload::AiOutput3d { .. } => EntityKind::AiOutput3d,
            Payload::GenericAsset { .. } => EntityKind::GenericAsset,
        }
    }

    /// Fresh payload for a hand-created node of `kind`.
    pub fn default_for(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Text => Payload::Text {
                content: String::new(),
            },
            EntityKind::Image => Payload::Image { file: None },
            EntityKind::Color => Payload::Color {
                color: Color::default(),
                opacity: 100,
            },
            EntityKind::Size => Payload::Size {
                x: None,
                y: None,
                z: None,
            },
            EntityKind::Mix => Payload::Mix {
                inputs: SmallVec::new(),
            },
            EntityKind::AiOutputImage => Payload::AiOutputImage {
                content: format!("Mock {} result", kind.name()),
                source_prompt: String::new(),
                parent: None,
                file_url: None,
            },
            EntityKind::AiOutput3d => Payload::AiOutput3d {
                content: format!("Mock {} result", kind.name()),
                source_prompt: String::new(),
                parent: None,
            },
            EntityKind::GenericAsset => Payload::GenericAsset {
                label: String::new(),
            },
        }
    }

    /// Weighted inputs, if this payload aggregates them.
    pub fn inputs(&self) -> &[WeightedInput] {
        match self {
            Payload::Mix { inputs } => inputs,
            _ => &[],
        }
    }

    /// The prompt a generated asset came from.
    pub fn source_prompt(&self) -> Option<&str> {
        match self {
            Payload::AiOutputImage { source_prompt, .. }
            | Payload::AiOutput3d { source_prompt, .. } => Some(source_prompt),
            _ => None,
        }
    }
}

// ─── Entities ────────────────────────────────────────────────────────────

/// A positioned, typed node or asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    kind: EntityKind,
    /// Top-left corner in world space.
    pub position: Point,
    pub size: Size,
    payload: Payload,
}

impl Entity {
    pub fn new(id: EntityId, position: Point, size: Size, payload: Payload) -> Self {
        Self {
            id,
            kind: payload.kind(),
            position,
            size,
            payload,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Replace the payload. Fails if it would change the entity's kind.
    pub fn set_payload(&mut self, payload: Payload) -> Result<()> {
        if payload.kind() != self.kind {
            return Err(EditError::KindMismatch {
                id: self.id,
                expected: self.kind,
                found: payload.kind(),
            });
        }
        self.payload = payload;
        Ok(())
    }

    /// In-crate access for edits that cannot change the kind (weighted inputs).
    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Output socket anchor: right edge, vertical middle.
    pub fn output_anchor(&self) -> Point {
        Point::new(
            self.position.x + self.size.width,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Input socket anchor: left edge, vertical middle.
    pub fn input_anchor(&self) -> Point {
        Point::new(self.position.x, self.position.y + self.size.height / 2.0)
    }
}

/// Partial update merged into an entity by `EntityStore::update`.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub payload: Option<Payload>,
}

/// Canvas membership lane. Render order is `Nodes` then `Assets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lane {
    /// Hand-created graph nodes.
    Nodes,
    /// Assets produced by the assistant.
    Assets,
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A directed edge between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: EntityId,
    pub to: EntityId,
}

// ─── Shapes & text blocks ────────────────────────────────────────────────

/// A free rectangle. Always stored normalized (non-negative size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shape {
    pub id: EntityId,
    pub rect: Rect,
}

/// A free-floating text label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub id: EntityId,
    pub position: Point,
    pub text: String,
}

impl TextBlock {
    /// Approximate bounds; text blocks have no measured size.
    pub fn bounds(&self, approx: Size) -> Rect {
        Rect::from_origin_size(self.position, approx)
    }
}
