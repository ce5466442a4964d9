//! Horizontal and vertical lists, and packing them into boxes.

use crate::font::FontMetrics;
use crate::glue::GlueKind;
use crate::node::{Glue, Horizontal, Kern, Scale, Totals, Vertical};
use mtex_core::{GlueOrder, GlueSign, GlueTotals, SizeLevel};

/// A box made from a list of nodes.
///
/// Described in TeX.2021.135 and TeX.2021.137.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct List<T> {
    pub size: SizeLevel,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// How much this box should be lowered (if it appears in a horizontal list),
    /// or how much it should be moved to the right (if it appears in a vertical
    /// list).
    pub shift: f64,
    pub children: Vec<T>,
    pub glue: GlueSetting,
}

/// A box made from a horizontal list.
pub type HList = List<Horizontal>;

/// A box made from a vertical list.
pub type VList = List<Vertical>;

/// How the glue of a list is set.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlueSetting {
    /// Total distance the glue moved, negative if it shrank.
    pub set: f64,
    pub sign: GlueSign,
    /// Only glue of this order stretches or shrinks.
    pub order: GlueOrder,
    /// Ratio by which glue stretches or shrinks.
    ///
    /// This is multiplied by the stretch or shrink of each glue node of the
    ///     right order.
    pub ratio: f64,
}

/// Outcome of packing a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fit {
    /// The box has its natural size; glue is not set.
    Natural,
    Stretched,
    Shrunk,
    /// The box is bigger than its contents and there is no glue to stretch.
    Underfull,
    /// The contents do not fit in the box, even with all glue shrunk.
    Overfull,
}

impl<T> List<T> {
    fn from_children(children: Vec<T>) -> Self {
        List {
            size: Default::default(),
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            shift: 0.0,
            children,
            glue: Default::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds this box's dimensions to the totals of an enclosing hlist.
    pub(crate) fn hpack_dims(&self, t: &mut Totals) {
        t.hbox(self.width, self.height - self.shift, self.depth + self.shift);
    }

    /// Adds this box's dimensions to the totals of an enclosing vlist.
    pub(crate) fn vpack_dims(&self, t: &mut Totals) {
        t.vbox(self.width + self.shift, self.height, self.depth);
    }

    /// Sets the glue so that the contents fill an extra `excess` of space.
    ///
    /// Described in TeX.2021.657 to TeX.2021.667.
    fn set_glue(
        &mut self,
        kind: &'static str,
        excess: f64,
        stretch: &GlueTotals,
        shrink: &GlueTotals,
    ) -> Fit {
        self.glue = GlueSetting::default();
        if excess == 0.0 {
            return Fit::Natural;
        }
        let (totals, sign) = if excess > 0.0 {
            (stretch, GlueSign::Stretching)
        } else {
            (shrink, GlueSign::Shrinking)
        };
        let order = totals.highest_order();
        let total = totals.get(order);
        if total == 0.0 {
            let fit = if excess > 0.0 {
                Fit::Underfull
            } else {
                Fit::Overfull
            };
            if !self.is_empty() {
                tracing::warn!(kind, ?fit, excess, "no glue to set");
            }
            return fit;
        }
        let (mut ratio, mut fit) = match sign {
            GlueSign::Stretching => (excess / total, Fit::Stretched),
            _ => (-excess / total, Fit::Shrunk),
        };
        if sign == GlueSign::Shrinking && order == GlueOrder::Normal && ratio > 1.0 {
            tracing::warn!(
                kind,
                overflow = -excess - total,
                "overfull box: glue cannot shrink enough"
            );
            ratio = 1.0;
            fit = Fit::Overfull;
        }
        self.glue = GlueSetting {
            set: match sign {
                GlueSign::Stretching => ratio * total,
                _ => -ratio * total,
            },
            sign,
            order,
            ratio,
        };
        fit
    }
}

impl<T: Scale> Scale for List<T> {
    fn shrink(&mut self) {
        for child in &mut self.children {
            child.shrink();
        }
        let factor = self.size.shrink();
        self.scale(factor);
    }
    fn grow(&mut self) {
        for child in &mut self.children {
            child.grow();
        }
        let factor = self.size.grow();
        self.scale(factor);
    }
}

impl<T> List<T> {
    fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
        self.depth *= factor;
        self.shift *= factor;
        self.glue.set *= factor;
    }
}

impl HList {
    /// Creates an hlist packed to its natural width.
    pub fn new(children: Vec<Horizontal>) -> Self {
        let mut list = List::from_children(children);
        list.hpack(0.0, true);
        list
    }

    /// Creates an hlist, inserting kerns between characters.
    ///
    /// For each pair of adjacent nodes the left node decides how much
    ///     space goes between them; see [Horizontal::kerning].
    pub fn with_kerning(children: Vec<Horizontal>, fonts: &dyn FontMetrics) -> Self {
        let mut kerned = Vec::with_capacity(children.len());
        let mut iter = children.into_iter().peekable();
        while let Some(node) = iter.next() {
            let kern = match iter.peek() {
                Some(next) => node.kerning(next, fonts),
                None => 0.0,
            };
            kerned.push(node);
            if kern != 0.0 {
                kerned.push(Kern::new(kern).into());
            }
        }
        HList::new(kerned)
    }

    /// Creates an hlist whose contents are centered within the enclosing box.
    pub fn centered(children: Vec<Horizontal>) -> Self {
        let mut nodes = Vec::with_capacity(children.len() + 2);
        nodes.push(Glue::from(GlueKind::Ss).into());
        nodes.extend(children);
        nodes.push(Glue::from(GlueKind::Ss).into());
        HList::new(nodes)
    }

    /// Computes the dimensions of the box and sets its glue.
    ///
    /// If `additional` is false, the box is exactly `width` wide.
    /// Otherwise it is `width` wider than the natural width of the contents.
    ///
    /// The computed sizes normally enclose all of the material inside the box,
    ///     but some items may stick out if negative glue is used or if the box
    ///     is overfull.
    ///
    /// Described in TeX.2021.649.
    pub fn hpack(&mut self, width: f64, additional: bool) -> Fit {
        let mut t = Totals::default();
        for child in &self.children {
            child.hpack_dims(&mut t);
        }
        self.height = t.height;
        self.depth = t.depth;
        self.width = if additional { width + t.width } else { width };
        let fit = self.set_glue("hlist", self.width - t.width, &t.stretch, &t.shrink);
        tracing::debug!(
            width = self.width,
            height = self.height,
            depth = self.depth,
            ?fit,
            "packed hlist"
        );
        fit
    }
}

impl VList {
    /// Creates a vlist packed to its natural height.
    pub fn new(children: Vec<Vertical>) -> Self {
        let mut list = List::from_children(children);
        list.vpack(0.0, true, f64::INFINITY);
        list
    }

    /// Creates a vlist whose contents are centered within the enclosing box.
    pub fn centered(children: Vec<Vertical>) -> Self {
        let mut nodes = Vec::with_capacity(children.len() + 2);
        nodes.push(Glue::from(GlueKind::Ss).into());
        nodes.extend(children);
        nodes.push(Glue::from(GlueKind::Ss).into());
        VList::new(nodes)
    }

    /// Computes the dimensions of the box and sets its glue.
    ///
    /// If `additional` is false, the box is exactly `height` tall.
    /// Otherwise it is `height` taller than the natural height of the contents.
    /// If the depth of the last box exceeds `max_depth`, the excess is moved
    ///     into the height.
    ///
    /// Described in TeX.2021.668.
    pub fn vpack(&mut self, height: f64, additional: bool, max_depth: f64) -> Fit {
        let mut t = Totals::default();
        for child in &self.children {
            child.vpack_dims(&mut t);
        }
        self.width = t.width;
        let mut natural = t.height;
        if t.depth > max_depth {
            natural += t.depth - max_depth;
            self.depth = max_depth;
        } else {
            self.depth = t.depth;
        }
        self.height = if additional { height + natural } else { height };
        let fit = self.set_glue("vlist", self.height - natural, &t.stretch, &t.shrink);
        tracing::debug!(
            width = self.width,
            height = self.height,
            depth = self.depth,
            ?fit,
            "packed vlist"
        );
        fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::Mono;
    use crate::font::State;
    use crate::node::{Block, Char, HBox, Rule, VBox};

    fn fil(stretch: f64) -> Horizontal {
        Glue::new(mtex_core::Glue {
            stretch,
            stretch_order: GlueOrder::Fil,
            ..Default::default()
        })
        .into()
    }

    fn finite(width: f64, stretch: f64, shrink: f64) -> Horizontal {
        Glue::new(mtex_core::Glue {
            width,
            stretch,
            shrink,
            ..Default::default()
        })
        .into()
    }

    #[test]
    fn empty_list() {
        let list = HList::new(vec![]);
        assert_eq!((list.width, list.height, list.depth), (0.0, 0.0, 0.0));
        assert_eq!(list.glue, GlueSetting::default());
        let list = VList::new(vec![]);
        assert_eq!((list.width, list.height, list.depth), (0.0, 0.0, 0.0));
    }

    #[test]
    fn stretch_fil_glue() {
        let mut list = HList::new(vec![HBox::new(10.0).into(), fil(5.0)]);
        assert_eq!(list.width, 10.0);
        let fit = list.hpack(20.0, false);
        assert_eq!(fit, Fit::Stretched);
        assert_eq!(list.width, 20.0);
        assert_eq!(list.glue.sign, GlueSign::Stretching);
        assert_eq!(list.glue.order, GlueOrder::Fil);
        assert_eq!(list.glue.ratio, 2.0);
        assert_eq!(list.glue.set, 10.0);
    }

    #[test]
    fn higher_order_wins() {
        let mut list = HList::new(vec![finite(1.0, 100.0, 0.0), fil(4.0), fil(1.0)]);
        list.hpack(11.0, false);
        assert_eq!(list.glue.order, GlueOrder::Fil);
        assert_eq!(list.glue.ratio, 2.0);
    }

    #[test]
    fn shrink_finite_glue() {
        let mut list = HList::new(vec![HBox::new(10.0).into(), finite(4.0, 0.0, 2.0)]);
        let fit = list.hpack(13.0, false);
        assert_eq!(fit, Fit::Shrunk);
        assert_eq!(list.glue.sign, GlueSign::Shrinking);
        assert_eq!(list.glue.ratio, 0.5);
        assert_eq!(list.glue.set, -1.0);
    }

    #[test]
    fn overfull_caps_the_ratio() {
        let mut list = HList::new(vec![HBox::new(10.0).into(), finite(4.0, 0.0, 2.0)]);
        let fit = list.hpack(8.0, false);
        assert_eq!(fit, Fit::Overfull);
        assert_eq!(list.glue.ratio, 1.0);
        assert_eq!(list.width, 8.0);
    }

    #[test]
    fn underfull_without_glue() {
        let mut list = HList::new(vec![HBox::new(10.0).into()]);
        let fit = list.hpack(12.0, false);
        assert_eq!(fit, Fit::Underfull);
        assert_eq!(list.glue.sign, GlueSign::Normal);
        assert_eq!(list.glue.ratio, 0.0);
        let fit = list.hpack(-3.0, false);
        assert_eq!(fit, Fit::Overfull);
        assert_eq!(list.width, -3.0);
    }

    #[test]
    fn additional_width() {
        let mut list = HList::new(vec![HBox::new(10.0).into(), fil(1.0)]);
        list.hpack(5.0, true);
        assert_eq!(list.width, 15.0);
        assert_eq!(list.glue.ratio, 5.0);
    }

    #[test]
    fn heights_and_shifted_lists() {
        let mut inner = HList::new(vec![Block::new(1.0, 4.0, 1.0).into()]);
        inner.shift = 2.0;
        let list = HList::new(vec![
            Block::new(1.0, 3.0, 0.5).into(),
            inner.into(),
            Rule::vertical(1.0).into(),
        ]);
        assert_eq!((list.width, list.height, list.depth), (3.0, 3.0, 3.0));
    }

    #[test]
    fn kerning_is_inserted() {
        let state = State::new(&Mono, 10.0, 72.0);
        let list = HList::with_kerning(
            vec![
                state.char('A').into(),
                state.char('V').into(),
                state.char('x').into(),
            ],
            &Mono,
        );
        assert_eq!(list.children.len(), 4);
        assert!(matches!(list.children[2], Horizontal::Kern(Kern { width, .. }) if width == 1.0));
        assert_eq!(list.width, 16.0);
    }

    #[test]
    fn centered() {
        let mut list = HList::centered(vec![HBox::new(4.0).into()]);
        list.hpack(10.0, false);
        assert_eq!(list.glue.order, GlueOrder::Fil);
        assert_eq!(list.glue.ratio, 3.0);
        let fit = list.hpack(2.0, false);
        assert_eq!(fit, Fit::Shrunk);
        assert_eq!(list.glue.ratio, -1.0);
    }

    #[test]
    fn vpack_max_depth() {
        let mut list = VList::new(vec![
            Block::new(3.0, 2.0, 1.0).into(),
            Block::new(5.0, 2.0, 4.0).into(),
        ]);
        assert_eq!((list.width, list.height, list.depth), (5.0, 5.0, 4.0));
        list.vpack(0.0, true, 1.5);
        assert_eq!((list.height, list.depth), (7.5, 1.5));
    }

    #[test]
    fn vpack_stretch() {
        let mut list = VList::centered(vec![Block::new(1.0, 2.0, 1.0).into()]);
        let fit = list.vpack(9.0, false, f64::INFINITY);
        assert_eq!(fit, Fit::Stretched);
        assert_eq!(list.glue.ratio, 3.0);
        assert_eq!(list.depth, 0.0);
    }

    #[test]
    fn shrink_list() {
        let mut list = HList::new(vec![HBox::new(10.0).into(), fil(1.0)]);
        list.hpack(20.0, false);
        list.shift = 1.0;
        list.shrink();
        assert!((list.width - 14.0).abs() < 1e-12);
        assert!((list.glue.set - 7.0).abs() < 1e-12);
        assert!((list.shift - 0.7).abs() < 1e-12);
        assert_eq!(list.glue.ratio, 10.0);
        let Horizontal::HBox(b) = &list.children[0] else {
            panic!("expected a box")
        };
        assert!((b.width - 7.0).abs() < 1e-12);
        list.grow();
        assert!((list.width - 20.0).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_blocks() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
            prop::collection::vec((0.0..100.0, 0.0..100.0, 0.0..100.0), 0..12)
        }

        fn blocks(dims: &[(f64, f64, f64)]) -> Vec<Horizontal> {
            dims.iter()
                .map(|&(w, h, d)| Block::new(w, h, d).into())
                .collect()
        }

        /// Node kinds, each with two dimensions in `0..20`.
        fn arb_nodes() -> impl Strategy<Value = Vec<(u8, f64, f64)>> {
            prop::collection::vec((0_u8..9, 0.0..20.0, 0.0..20.0), 0..12)
        }

        fn node(kind: u8, a: f64, b: f64) -> Horizontal {
            let state = State::new(&Mono, 10.0, 72.0);
            let c = ['A', 'V', 'g', 'x'][a as usize % 4];
            match kind {
                0 => Block::new(a, b, 1.0).into(),
                1 => HBox::new(a).into(),
                2 => VBox::new(a, b).into(),
                3 => state.char(c).into(),
                4 => state.accent(c).into(),
                5 => Rule::vertical(a).into(),
                6 => finite(a, b, a / 2.0),
                7 => Kern::new(a - 10.0).into(),
                _ => {
                    let line = HList::with_kerning(
                        vec![state.char('A').into(), state.char(c).into()],
                        &Mono,
                    );
                    let mut list = VList::new(vec![
                        line.into(),
                        Kern::new(a).into(),
                        Glue::from(GlueKind::Fil).into(),
                        state.hrule(None).into(),
                        Block::new(b, 1.0, 2.0).into(),
                    ]);
                    list.vpack(b, true, f64::INFINITY);
                    list.shift = a;
                    list.into()
                }
            }
        }

        fn mixed(nodes: &[(u8, f64, f64)], extra: f64) -> HList {
            let children = nodes.iter().map(|&(k, a, b)| node(k, a, b)).collect();
            let mut list = HList::with_kerning(children, &Mono);
            list.hpack(extra, true);
            list
        }

        /// Every dimension in the tree, depth first.
        fn dims_list<T>(list: &List<T>, each: fn(&T, &mut Vec<f64>), out: &mut Vec<f64>) {
            out.push(list.size.0 as f64);
            out.extend([list.width, list.height, list.depth, list.shift]);
            out.extend([list.glue.set, list.glue.ratio]);
            for child in &list.children {
                each(child, out);
            }
        }

        fn dims_char(c: &Char, out: &mut Vec<f64>) {
            let m = &c.metrics;
            out.push(c.size.0 as f64);
            out.extend([c.font_size, c.width, c.height, c.depth]);
            out.extend([m.advance, m.width, m.height, m.depth]);
            out.extend([m.xmin, m.xmax, m.ymin, m.ymax]);
        }

        fn dims_glue(g: &Glue, out: &mut Vec<f64>) {
            out.push(g.size.0 as f64);
            out.extend([g.spec.width, g.spec.stretch, g.spec.shrink]);
        }

        fn dims_h(node: &Horizontal, out: &mut Vec<f64>) {
            match node {
                Horizontal::Block(b) => out.extend([b.size.0 as f64, b.width, b.height, b.depth]),
                Horizontal::HBox(b) => out.extend([b.size.0 as f64, b.width]),
                Horizontal::VBox(b) => out.extend([b.size.0 as f64, b.height, b.depth]),
                Horizontal::Char(c) => dims_char(c, out),
                Horizontal::Accent(a) => {
                    dims_char(&a.char, out);
                    out.extend([a.width, a.height, a.depth]);
                }
                Horizontal::HList(l) => dims_list(l, dims_h, out),
                Horizontal::VList(l) => dims_list(l, dims_v, out),
                Horizontal::Rule(r) => out.extend([r.size.0 as f64, r.width, r.height, r.depth]),
                Horizontal::Glue(g) => dims_glue(g, out),
                Horizontal::Kern(k) => out.extend([k.size.0 as f64, k.width]),
            }
        }

        fn dims_v(node: &Vertical, out: &mut Vec<f64>) {
            match node {
                Vertical::Block(b) => out.extend([b.size.0 as f64, b.width, b.height, b.depth]),
                Vertical::HBox(b) => out.extend([b.size.0 as f64, b.width]),
                Vertical::VBox(b) => out.extend([b.size.0 as f64, b.height, b.depth]),
                Vertical::HList(l) => dims_list(l, dims_h, out),
                Vertical::VList(l) => dims_list(l, dims_v, out),
                Vertical::Rule(r) => out.extend([r.size.0 as f64, r.width, r.height, r.depth]),
                Vertical::Glue(g) => dims_glue(g, out),
                Vertical::Kern(k) => out.extend([k.size.0 as f64, k.width]),
            }
        }

        fn dims(list: &HList) -> Vec<f64> {
            let mut out = vec![];
            dims_list(list, dims_h, &mut out);
            out
        }

        fn close(a: f64, b: f64) -> bool {
            a == b || (a - b).abs() <= 1e-9 * b.abs().max(1.0)
        }

        proptest! {
            #[test]
            fn prop_shrink_then_grow_restores_size(
                nodes in arb_nodes(),
                extra in -20.0..20.0,
                levels in 0_usize..12,
            ) {
                let original = mixed(&nodes, extra);
                let mut list = original.clone();
                for _ in 0..levels {
                    list.shrink();
                }
                for _ in 0..levels {
                    list.grow();
                }
                let (got, want) = (dims(&list), dims(&original));
                assert_eq!(got.len(), want.len());
                for (i, (g, w)) in got.iter().zip(&want).enumerate() {
                    assert!(close(*g, *w), "dimension {i}: got {g}, want {w}");
                }
                assert_eq!(list.glue.sign, original.glue.sign);
                assert_eq!(list.glue.order, original.glue.order);
            }

            #[test]
            fn prop_hpack_without_glue_is_exact(dims in arb_blocks(), width in -100.0..100.0) {
                let mut list = HList::new(blocks(&dims));
                let fit = list.hpack(width, false);
                assert_eq!(list.width, width);
                assert_eq!(list.glue, GlueSetting::default());
                let natural = dims.iter().fold(0.0, |acc, (w, _, _)| acc + w);
                let expected = if width == natural {
                    Fit::Natural
                } else if width > natural {
                    Fit::Underfull
                } else {
                    Fit::Overfull
                };
                assert_eq!(fit, expected);
            }

            #[test]
            fn prop_natural_width_is_sum_of_widths(dims in arb_blocks()) {
                let list = HList::new(blocks(&dims));
                let expected = dims.iter().fold(0.0, |acc, (w, _, _)| acc + w);
                assert_eq!(list.width, expected);
                assert_eq!(list.glue, GlueSetting::default());
            }

            #[test]
            fn prop_filll_glue_dominates(
                lower in prop::collection::vec((0.1..10.0, 0.1..10.0), 0..6),
                filll in 0.1..10.0,
                excess in 0.1..50.0,
            ) {
                let mut children = vec![HBox::new(10.0).into()];
                for &(finite_stretch, fil_stretch) in &lower {
                    children.push(finite(0.0, finite_stretch, 0.0));
                    children.push(fil(fil_stretch));
                }
                children.push(Glue::new(mtex_core::Glue {
                    stretch: filll,
                    stretch_order: GlueOrder::Filll,
                    ..Default::default()
                }).into());
                let mut list = HList::new(children);
                list.hpack(10.0 + excess, false);
                assert_eq!(list.glue.order, GlueOrder::Filll);
                assert_eq!(list.glue.ratio, (list.width - 10.0) / filll);
            }
        }
    }
}
