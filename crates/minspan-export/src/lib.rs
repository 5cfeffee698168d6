//! minspan-export: Pure format serializers (sans-IO)
//!
//! Converts tours and spanning trees into output formats. Currently
//! supports SVG.

pub mod svg;

pub use svg::{SvgMetadata, TreeOverlay, build_path_data, to_svg};
