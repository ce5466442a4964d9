//! Data structures for boxes
//!
//! This module contains the primitives of the box-and-glue model:
//!     boxes, characters, rules, glue and kerns.
//! Lists of these primitives are in the [crate::list] module.
//!
//! Like in TeX, nodes are split into [Horizontal] and [Vertical] nodes.
//! Characters can only appear in horizontal lists.

use crate::font::{FontId, FontMetrics, GlyphMetrics, State};
use crate::glue::{GlueKind, UnknownGlueKind};
use crate::list::{HList, VList};
use mtex_core::{GlueTotals, SizeLevel};

/// Horizontal node.
#[derive(Debug, Clone, PartialEq)]
pub enum Horizontal {
    Block(Block),
    HBox(HBox),
    VBox(VBox),
    Char(Char),
    Accent(Accent),
    HList(HList),
    VList(VList),
    Rule(Rule),
    Glue(Glue),
    Kern(Kern),
}

/// Vertical node.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertical {
    Block(Block),
    HBox(HBox),
    VBox(VBox),
    HList(HList),
    VList(VList),
    Rule(Rule),
    Glue(Glue),
    Kern(Kern),
}

macro_rules! from_impls {
    ( $enum: ident, $( $variant: ident, )+ ) => {
        $(
            impl From<$variant> for $enum {
                fn from(value: $variant) -> Self {
                    $enum::$variant(value)
                }
            }
        )+
    };
}

from_impls!(Horizontal, Block, HBox, VBox, Char, Accent, HList, VList, Rule, Glue, Kern,);
from_impls!(Vertical, Block, HBox, VBox, HList, VList, Rule, Glue, Kern,);

/// Changing the size level of a node.
///
/// Text in scripts is smaller than the surrounding text.
/// Each shrink moves a node one size level down, multiplying its
///     dimensions by [mtex_core::SHRINK_FACTOR];
///     each grow undoes one shrink.
/// See [SizeLevel] for what happens at the smallest level.
pub trait Scale {
    fn shrink(&mut self);
    fn grow(&mut self);
}

/// A box with a width, height and depth, and no content.
///
/// This is the empty box of TeX.
/// It renders nothing but takes up space.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Block {
    pub size: SizeLevel,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Block {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Block {
            size: Default::default(),
            width,
            height,
            depth,
        }
    }

    fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
        self.depth *= factor;
    }
}

impl Scale for Block {
    fn shrink(&mut self) {
        let factor = self.size.shrink();
        self.scale(factor);
    }
    fn grow(&mut self) {
        let factor = self.size.grow();
        self.scale(factor);
    }
}

/// A box with only a width.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HBox {
    pub size: SizeLevel,
    pub width: f64,
}

impl HBox {
    pub fn new(width: f64) -> Self {
        HBox {
            size: Default::default(),
            width,
        }
    }
}

impl Scale for HBox {
    fn shrink(&mut self) {
        self.width *= self.size.shrink();
    }
    fn grow(&mut self) {
        self.width *= self.size.grow();
    }
}

/// A box with only a height and depth.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VBox {
    pub size: SizeLevel,
    pub height: f64,
    pub depth: f64,
}

impl VBox {
    pub fn new(height: f64, depth: f64) -> Self {
        VBox {
            size: Default::default(),
            height,
            depth,
        }
    }
}

impl Scale for VBox {
    fn shrink(&mut self) {
        let factor = self.size.shrink();
        self.height *= factor;
        self.depth *= factor;
    }
    fn grow(&mut self) {
        let factor = self.size.grow();
        self.height *= factor;
        self.depth *= factor;
    }
}

/// A character in a specific font.
///
/// Unlike TeX, the font size and metrics are stored with each character.
/// Fonts describe glyphs with an advance as well as a width;
///     the difference becomes a [Kern] when the character is put in a
///     list with [HList::with_kerning].
///
/// This node can only appear in horizontal mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    pub c: char,
    pub font: FontId,
    pub font_size: f64,
    pub dpi: f64,
    pub math: bool,
    pub size: SizeLevel,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Metrics of the glyph at the current font size.
    pub metrics: GlyphMetrics,
}

impl Char {
    /// Creates a character in the current font of the state.
    pub fn new(c: char, state: &State) -> Self {
        let metrics =
            state
                .fonts
                .glyph_metrics(state.font, c, state.font_size, state.dpi, state.math);
        Char {
            c,
            font: state.font,
            font_size: state.font_size,
            dpi: state.dpi,
            math: state.math,
            size: Default::default(),
            width: metrics.width,
            height: metrics.height,
            depth: metrics.depth,
            metrics,
        }
    }

    /// Space to insert between this character and the next node.
    ///
    /// This is the part of the advance not covered by the width,
    ///     plus the font's kerning if the next node is also a character.
    pub fn kerning(&self, next: &Horizontal, fonts: &dyn FontMetrics) -> f64 {
        let advance = self.metrics.advance - self.width;
        let kern = match next {
            Horizontal::Char(next) => fonts.kern(self, next),
            Horizontal::Accent(next) => fonts.kern(self, &next.char),
            _ => 0.0,
        };
        advance + kern
    }

    fn scale(&mut self, factor: f64) {
        self.font_size *= factor;
        self.width *= factor;
        self.height *= factor;
        self.depth *= factor;
        self.metrics = self.metrics.scaled(factor);
    }
}

impl Scale for Char {
    fn shrink(&mut self) {
        let factor = self.size.shrink();
        self.scale(factor);
    }
    fn grow(&mut self) {
        let factor = self.size.grow();
        self.scale(factor);
    }
}

/// An accent character.
///
/// The glyphs of accents are already offset from the baseline,
///     so the dimensions of an accent are those of its ink bounding box
///     and it has no depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Accent {
    pub char: Char,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Accent {
    pub fn new(char: Char) -> Self {
        let mut accent = Accent {
            char,
            width: 0.0,
            height: 0.0,
            depth: 0.0,
        };
        accent.update_metrics();
        accent
    }

    fn update_metrics(&mut self) {
        let m = &self.char.metrics;
        self.width = m.xmax - m.xmin;
        self.height = m.ymax - m.ymin;
        self.depth = 0.0;
    }
}

impl Scale for Accent {
    fn shrink(&mut self) {
        self.char.shrink();
        self.update_metrics();
    }
    fn grow(&mut self) {
        self.char.grow();
        self.update_metrics();
    }
}

/// A rule stands for a solid black rectangle.
///
/// If any of the dimensions is infinite, the actual value is
///     determined by running the rule up to the boundary of the innermost
///     enclosing box.
/// This is called a "running dimension".
/// The width is never running in an hlist; the height and depth are never running
///     in a vlist.
///
/// Described in TeX.2021.138.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub size: SizeLevel,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Rule {
    pub const RUNNING: f64 = f64::INFINITY;

    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Rule {
            size: Default::default(),
            width,
            height,
            depth,
        }
    }

    /// A horizontal rule, centered on the baseline, with running width.
    pub fn horizontal(thickness: f64) -> Self {
        Rule::new(Rule::RUNNING, 0.5 * thickness, 0.5 * thickness)
    }

    /// A vertical rule with running height and depth.
    pub fn vertical(thickness: f64) -> Self {
        Rule::new(thickness, Rule::RUNNING, Rule::RUNNING)
    }
}

impl Scale for Rule {
    fn shrink(&mut self) {
        let factor = self.size.shrink();
        self.width *= factor;
        self.height *= factor;
        self.depth *= factor;
    }
    fn grow(&mut self) {
        let factor = self.size.grow();
        self.width *= factor;
        self.height *= factor;
        self.depth *= factor;
    }
}

/// A piece of glue.
///
/// Described in TeX.2021.149.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Glue {
    pub size: SizeLevel,
    pub spec: mtex_core::Glue,
}

impl Glue {
    pub fn new(spec: mtex_core::Glue) -> Self {
        Glue {
            size: Default::default(),
            spec,
        }
    }

    /// Glue of a named kind, like `fil` or `ss`.
    pub fn named(name: &str) -> Result<Self, UnknownGlueKind> {
        let kind: GlueKind = name.parse()?;
        Ok(kind.into())
    }

    fn scale(&mut self, factor: f64) {
        self.spec.width *= factor;
        self.spec.stretch *= factor;
        self.spec.shrink *= factor;
    }
}

impl From<GlueKind> for Glue {
    fn from(kind: GlueKind) -> Self {
        Glue::new(kind.spec())
    }
}

impl Scale for Glue {
    fn shrink(&mut self) {
        let factor = self.size.shrink();
        self.scale(factor);
    }
    fn grow(&mut self) {
        let factor = self.size.grow();
        self.scale(factor);
    }
}

/// A kern.
///
/// In a horizontal list this is usually a small, often negative, space
///     between two characters, like the space between A and V.
/// In a vertical list the width is a vertical distance.
///
/// Described in TeX.2021.155.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Kern {
    pub size: SizeLevel,
    pub width: f64,
}

impl Kern {
    pub fn new(width: f64) -> Self {
        Kern {
            size: Default::default(),
            width,
        }
    }
}

impl Scale for Kern {
    fn shrink(&mut self) {
        self.width *= self.size.shrink();
    }
    fn grow(&mut self) {
        self.width *= self.size.grow();
    }
}

macro_rules! dispatch {
    ($enum: ident, $node: expr, $n: ident => $e: expr, [ $( $variant: ident ),+ ]) => {
        match $node {
            $( $enum::$variant($n) => $e, )+
        }
    };
}

impl Scale for Horizontal {
    fn shrink(&mut self) {
        dispatch!(Horizontal, self, n => n.shrink(), [Block, HBox, VBox, Char, Accent, HList, VList, Rule, Glue, Kern])
    }
    fn grow(&mut self) {
        dispatch!(Horizontal, self, n => n.grow(), [Block, HBox, VBox, Char, Accent, HList, VList, Rule, Glue, Kern])
    }
}

impl Scale for Vertical {
    fn shrink(&mut self) {
        dispatch!(Vertical, self, n => n.shrink(), [Block, HBox, VBox, HList, VList, Rule, Glue, Kern])
    }
    fn grow(&mut self) {
        dispatch!(Vertical, self, n => n.grow(), [Block, HBox, VBox, HList, VList, Rule, Glue, Kern])
    }
}

impl Horizontal {
    /// Space to insert between this node and the next one.
    ///
    /// This is zero for everything except characters.
    pub fn kerning(&self, next: &Horizontal, fonts: &dyn FontMetrics) -> f64 {
        match self {
            Horizontal::Char(c) => c.kerning(next, fonts),
            Horizontal::Accent(a) => a.char.kerning(next, fonts),
            _ => 0.0,
        }
    }

    /// Adds the dimensions of this node to the totals of an hlist being packed.
    pub(crate) fn hpack_dims(&self, t: &mut Totals) {
        use Horizontal::*;
        match self {
            Block(b) => t.hbox(b.width, b.height, b.depth),
            HBox(b) => t.width += b.width,
            VBox(b) => t.hbox(0.0, b.height, b.depth),
            Char(c) => t.hbox(c.width, c.height, c.depth),
            Accent(a) => t.hbox(a.width, a.height, a.depth),
            HList(l) => l.hpack_dims(t),
            VList(l) => l.hpack_dims(t),
            Rule(r) => t.hbox(r.width, r.height, r.depth),
            Glue(g) => t.hglue(&g.spec),
            Kern(k) => t.width += k.width,
        }
    }
}

impl Vertical {
    /// Adds the dimensions of this node to the totals of a vlist being packed.
    pub(crate) fn vpack_dims(&self, t: &mut Totals) {
        use Vertical::*;
        match self {
            Block(b) => t.vbox(b.width, b.height, b.depth),
            HBox(b) => t.vbox(b.width, 0.0, 0.0),
            VBox(b) => t.vbox(0.0, b.height, b.depth),
            HList(l) => l.vpack_dims(t),
            VList(l) => l.vpack_dims(t),
            Rule(r) => t.vbox(r.width, r.height, r.depth),
            Glue(g) => t.vglue(&g.spec),
            Kern(k) => t.vkern(k.width),
        }
    }
}

/// Running totals while packing a list.
///
/// Described in TeX.2021.646 and TeX.2021.668.
#[derive(Debug, Default)]
pub(crate) struct Totals {
    /// Natural width of an hlist; maximum width in a vlist.
    pub width: f64,
    /// Maximum height in an hlist; natural height of a vlist.
    pub height: f64,
    /// Maximum depth in an hlist; depth of the last box in a vlist.
    pub depth: f64,
    pub stretch: GlueTotals,
    pub shrink: GlueTotals,
}

impl Totals {
    /// A box in an hlist.
    ///
    /// Boxes with a running height or depth do not affect the maxima.
    pub fn hbox(&mut self, width: f64, height: f64, depth: f64) {
        self.width += width;
        if height.is_infinite() || depth.is_infinite() {
            return;
        }
        self.height = self.height.max(height);
        self.depth = self.depth.max(depth);
    }

    /// A box in a vlist.
    ///
    /// The depth of the previous box becomes part of the height.
    pub fn vbox(&mut self, width: f64, height: f64, depth: f64) {
        self.height += self.depth + height;
        self.depth = depth;
        if width.is_infinite() {
            return;
        }
        self.width = self.width.max(width);
    }

    pub fn hglue(&mut self, glue: &mtex_core::Glue) {
        self.width += glue.width;
        self.stretch.add(glue.stretch, glue.stretch_order);
        self.shrink.add(glue.shrink, glue.shrink_order);
    }

    pub fn vglue(&mut self, glue: &mtex_core::Glue) {
        self.vkern(glue.width);
        self.stretch.add(glue.stretch, glue.stretch_order);
        self.shrink.add(glue.shrink, glue.shrink_order);
    }

    pub fn vkern(&mut self, width: f64) {
        self.height += self.depth + width;
        self.depth = 0.0;
    }
}
