//! Editor tuning knobs.
//!
//! Every field has a default, so hosts may pass a partial JSON object and
//! only override what they care about.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Configuration shared by the document, the interaction machine and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Additive zoom step per wheel notch. Default: **0.1**.
    pub zoom_step: f64,
    pub min_scale: f64,
    pub max_scale: f64,

    /// Drawn rectangles smaller than this on either side are discarded.
    pub min_shape_size: f64,
    /// Lower bound for each side while resizing a shape.
    pub min_resize: f64,

    /// Margin around the union bounding box in SVG export.
    pub export_padding: f64,

    /// Weight (percent) given to a new input on an aggregating node.
    pub default_mix_weight: u8,

    /// Size of hand-created nodes.
    pub node_size: Size,
    /// Size of assistant-generated assets.
    pub asset_size: Size,
    /// Vertical gap between generated rows and horizontal gap within a row.
    pub row_margin: f64,
    /// Width of the chat panel covering the right side of the canvas.
    pub chat_panel_width: f64,

    /// Text blocks have no measured size; this box stands in for hit testing and export.
    pub text_block_size: Size,
    pub text_placeholder: String,

    /// Hit radius of node sockets, in world units.
    pub socket_radius: f64,
    /// Side of the square resize handle at a shape's bottom-right corner.
    pub resize_handle: f64,

    /// Socket-based wiring (programmable node-graph variant).
    pub sockets_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            min_scale: 0.2,
            max_scale: 3.0,
            min_shape_size: 5.0,
            min_resize: 20.0,
            export_padding: 40.0,
            default_mix_weight: 50,
            node_size: Size::new(180.0, 100.0),
            asset_size: Size::new(300.0, 300.0),
            row_margin: 20.0,
            chat_panel_width: 600.0,
            text_block_size: Size::new(150.0, 24.0),
            text_placeholder: "New Text".to_string(),
            socket_radius: 8.0,
            resize_handle: 12.0,
            sockets_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EditorConfig =
            serde_json::from_str(r#"{"zoomStep":0.25,"socketsEnabled":false}"#).unwrap();
        assert_eq!(cfg.zoom_step, 0.25);
        assert!(!cfg.sockets_enabled);
        assert_eq!(cfg.min_scale, 0.2);
        assert_eq!(cfg.default_mix_weight, 50);
        assert_eq!(cfg.text_placeholder, "New Text");
    }
}
