//! Shipping out packed boxes to a rendering backend.
//!
//! Coordinates are in device units with y increasing downwards.
//! A box is rendered at the left end of its baseline.
//!
//! Described in TeX.2021.619 to TeX.2021.637.

use crate::font::FontId;
use crate::list::{HList, VList};
use crate::node::{Accent, Char, Horizontal, Rule, Vertical};
use mtex_core::GlueSign;

/// A glyph to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub c: char,
    pub font: FontId,
    pub font_size: f64,
    pub dpi: f64,
    pub math: bool,
}

/// Something that can draw glyphs and rectangles, like a canvas.
pub trait Backend {
    /// Draws a glyph with its origin at `(x, y)`.
    fn render_glyph(&mut self, x: f64, y: f64, glyph: &Glyph);

    /// Draws a filled rectangle with corners `(x1, y1)` and `(x2, y2)`.
    fn render_rect_filled(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
}

impl Char {
    pub fn glyph(&self) -> Glyph {
        Glyph {
            c: self.c,
            font: self.font,
            font_size: self.font_size,
            dpi: self.dpi,
            math: self.math,
        }
    }

    pub fn render(&self, backend: &mut dyn Backend, x: f64, y: f64) {
        backend.render_glyph(x, y, &self.glyph());
    }
}

impl Accent {
    /// Renders the accent so that its ink starts at `(x, y)`.
    pub fn render(&self, backend: &mut dyn Backend, x: f64, y: f64) {
        let m = &self.char.metrics;
        backend.render_glyph(x - m.xmin, y + m.ymin, &self.char.glyph());
    }
}

impl Rule {
    /// Draws the rule with the left end of its baseline at `(x, y)`.
    ///
    /// Running dimensions are resolved by the enclosing list before this is called.
    /// Rules with no area or an unresolved dimension draw nothing.
    pub fn render(&self, backend: &mut dyn Backend, x: f64, y: f64) {
        let extent = self.height + self.depth;
        if self.width.is_finite() && extent.is_finite() && self.width > 0.0 && extent > 0.0 {
            backend.render_rect_filled(x, y - self.height, x + self.width, y + self.depth);
        }
    }

    /// Replaces running dimensions with the dimensions of the enclosing box.
    fn resolve(&self, width: f64, height: f64, depth: f64) -> Rule {
        let run = |d: f64, enclosing: f64| if d.is_infinite() { enclosing } else { d };
        Rule {
            size: self.size,
            width: run(self.width, width),
            height: run(self.height, height),
            depth: run(self.depth, depth),
        }
    }
}

/// Glue that has been set so far in a list.
///
/// Accumulating the stretch or shrink, instead of computing each glue
///     separately, keeps the total set glue exact.
///
/// Described in TeX.2021.625.
struct GlueCursor {
    sign: GlueSign,
    order: mtex_core::GlueOrder,
    ratio: f64,
    total: f64,
    set: f64,
}

impl GlueCursor {
    fn new(list_glue: &crate::list::GlueSetting) -> Self {
        GlueCursor {
            sign: list_glue.sign,
            order: list_glue.order,
            ratio: list_glue.ratio,
            total: 0.0,
            set: 0.0,
        }
    }

    /// Returns the size of the glue after setting it.
    fn advance(&mut self, glue: &mtex_core::Glue) -> f64 {
        let previous = self.set;
        match self.sign {
            GlueSign::Stretching if glue.stretch_order == self.order => {
                self.total += glue.stretch;
            }
            GlueSign::Shrinking if glue.shrink_order == self.order => {
                self.total -= glue.shrink;
            }
            _ => return glue.width,
        }
        self.set = self.ratio * self.total;
        glue.width + self.set - previous
    }
}

impl HList {
    /// Renders the box with the left end of its baseline at `(x, y)`.
    pub fn render(&self, backend: &mut dyn Backend, x: f64, y: f64) {
        let mut h = x;
        let mut glue = GlueCursor::new(&self.glue);
        for child in &self.children {
            match child {
                Horizontal::Char(c) => {
                    c.render(backend, h, y);
                    h += c.width;
                }
                Horizontal::Accent(a) => {
                    a.render(backend, h, y);
                    h += a.width;
                }
                Horizontal::HList(l) => {
                    if !l.is_empty() {
                        l.render(backend, h, y + l.shift);
                    }
                    h += l.width;
                }
                Horizontal::VList(l) => {
                    if !l.is_empty() {
                        l.render(backend, h, y + l.shift);
                    }
                    h += l.width;
                }
                Horizontal::Rule(r) => {
                    r.resolve(r.width, self.height, self.depth)
                        .render(backend, h, y);
                    h += r.width;
                }
                Horizontal::Glue(g) => h += glue.advance(&g.spec),
                Horizontal::Kern(k) => h += k.width,
                Horizontal::Block(b) => h += b.width,
                Horizontal::HBox(b) => h += b.width,
                Horizontal::VBox(_) => {}
            }
        }
    }
}

impl VList {
    /// Renders the box with the left end of its baseline at `(x, y)`.
    pub fn render(&self, backend: &mut dyn Backend, x: f64, y: f64) {
        let mut v = y - self.height;
        let mut glue = GlueCursor::new(&self.glue);
        for child in &self.children {
            match child {
                Vertical::HList(l) => {
                    v += l.height;
                    if !l.is_empty() {
                        l.render(backend, x + l.shift, v);
                    }
                    v += l.depth;
                }
                Vertical::VList(l) => {
                    v += l.height;
                    if !l.is_empty() {
                        l.render(backend, x + l.shift, v);
                    }
                    v += l.depth;
                }
                Vertical::Rule(r) => {
                    let rule = r.resolve(self.width, r.height, r.depth);
                    v += rule.height + rule.depth;
                    rule.render(backend, x, v - rule.depth);
                }
                Vertical::Glue(g) => v += glue.advance(&g.spec),
                Vertical::Kern(k) => v += k.width,
                Vertical::Block(b) => v += b.height + b.depth,
                Vertical::VBox(b) => v += b.height + b.depth,
                Vertical::HBox(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::Mono;
    use crate::font::State;
    use crate::glue::GlueKind;
    use crate::node::{Block, Glue, HBox, Kern, Rule};

    #[derive(Debug, PartialEq)]
    enum Op {
        Glyph(char, f64, f64),
        Rect(f64, f64, f64, f64),
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl Backend for Recorder {
        fn render_glyph(&mut self, x: f64, y: f64, glyph: &Glyph) {
            self.0.push(Op::Glyph(glyph.c, x, y));
        }
        fn render_rect_filled(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
            self.0.push(Op::Rect(x1, y1, x2, y2));
        }
    }

    fn render_h(list: &HList) -> Vec<Op> {
        let mut recorder = Recorder::default();
        list.render(&mut recorder, 100.0, 50.0);
        recorder.0
    }

    #[test]
    fn chars_and_kerns() {
        let state = State::new(&Mono, 10.0, 72.0);
        let list = HList::with_kerning(vec![state.char('V').into(), state.char('x').into()], &Mono);
        assert_eq!(
            render_h(&list),
            vec![Op::Glyph('V', 100.0, 50.0), Op::Glyph('x', 106.0, 50.0)]
        );
    }

    #[test]
    fn stretched_glue() {
        let state = State::new(&Mono, 10.0, 72.0);
        let mut list = HList::new(vec![
            state.char('a').into(),
            Glue::from(GlueKind::Fil).into(),
            state.char('b').into(),
            Glue::from(GlueKind::Fil).into(),
            state.char('c').into(),
        ]);
        list.hpack(35.0, false);
        assert_eq!(
            render_h(&list),
            vec![
                Op::Glyph('a', 100.0, 50.0),
                Op::Glyph('b', 115.0, 50.0),
                Op::Glyph('c', 130.0, 50.0),
            ]
        );
    }

    #[test]
    fn running_rule_in_hlist() {
        let list = HList::new(vec![
            Block::new(2.0, 6.0, 1.0).into(),
            Rule::vertical(0.5).into(),
            Kern::new(1.0).into(),
            Rule::new(3.0, 2.0, 0.0).into(),
        ]);
        assert_eq!(
            render_h(&list),
            vec![
                Op::Rect(102.0, 44.0, 102.5, 51.0),
                Op::Rect(103.5, 48.0, 106.5, 50.0),
            ]
        );
    }

    #[test]
    fn fraction_like_vlist() {
        let state = State::new(&Mono, 10.0, 72.0);
        let numerator = HList::centered(vec![state.char('a').into()]);
        let denominator = HList::centered(vec![state.char('b').into(), state.char('c').into()]);
        let mut numerator = numerator;
        numerator.hpack(10.0, false);
        let list = VList::new(vec![
            numerator.into(),
            Kern::new(1.0).into(),
            state.hrule(Some(2.0)).into(),
            Kern::new(1.0).into(),
            denominator.into(),
        ]);
        assert_eq!(list.width, 10.0);
        assert_eq!(list.height, 7.0 + 1.0 + 2.0 + 1.0 + 7.0);
        let mut recorder = Recorder::default();
        list.render(&mut recorder, 0.0, 18.0);
        assert_eq!(
            recorder.0,
            vec![
                Op::Glyph('a', 2.5, 7.0),
                Op::Rect(0.0, 8.0, 10.0, 10.0),
                Op::Glyph('b', 0.0, 18.0),
                Op::Glyph('c', 5.0, 18.0),
            ]
        );
    }

    #[test]
    fn accent_offset() {
        let state = State::new(&Mono, 10.0, 72.0);
        let list = HList::new(vec![state.accent('^').into(), HBox::new(1.0).into()]);
        assert_eq!(render_h(&list), vec![Op::Glyph('^', 99.5, 55.0)]);
    }

    #[test]
    fn empty_lists_only_advance() {
        let mut empty = HList::new(vec![]);
        empty.width = 4.0;
        let state = State::new(&Mono, 10.0, 72.0);
        let list = HList::new(vec![empty.into(), state.char('z').into()]);
        assert_eq!(render_h(&list), vec![Op::Glyph('z', 104.0, 50.0)]);
    }
}
