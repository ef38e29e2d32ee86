pub mod hit;
pub mod svg;
pub mod wires;

pub use hit::{HitTarget, hit_test};
pub use svg::{EXPORT_FILENAME, SvgExport, export_svg};
pub use wires::{connection_curve, path_data};
