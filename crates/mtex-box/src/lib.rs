//! # mtex-box
//!
//! The box and glue layout engine of TeX, restricted to what is needed
//!     to typeset math text in plot labels.
//!
//! Layout works on trees of [node::Horizontal] and [node::Vertical] nodes.
//! Lists of nodes are packed into boxes with [list::HList::hpack] and
//!     [list::VList::vpack], which set the glue inside them.
//! Packed boxes are drawn with a [render::Backend].
//!
//! ```
//! use mtex_box::{GlueKind, HList, Horizontal, HBox, Glue, Fit};
//!
//! let mut list = HList::new(vec![
//!     Horizontal::HBox(HBox::new(10.0)),
//!     Glue::from(GlueKind::Fil).into(),
//! ]);
//! assert_eq!(list.hpack(20.0, false), Fit::Stretched);
//! assert_eq!(list.glue.set, 10.0);
//! ```
//!
//! Fonts are not loaded here.
//! Glyph dimensions come from a [font::FontMetrics] implementation.

pub mod font;
pub mod glue;
pub mod list;
pub mod node;
pub mod render;

pub use font::{FontConstants, FontId, FontMetrics, GlyphMetrics, State};
pub use glue::{GlueKind, UnknownGlueKind};
pub use list::{Fit, GlueSetting, HList, List, VList};
pub use node::{
    Accent, Block, Char, Glue, HBox, Horizontal, Kern, Rule, Scale, VBox, Vertical,
};
pub use render::{Backend, Glyph};
