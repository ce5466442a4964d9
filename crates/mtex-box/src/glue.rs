//! Named kinds of glue.

use mtex_core::GlueOrder;

/// Glue with a name, like TeX's `\hfil` or `\hss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueKind {
    /// Stretches with first-order infinity.
    Fil,
    Fill,
    Filll,
    /// Shrinks with first-order infinity.
    NegFil,
    NegFill,
    NegFilll,
    /// No width, no stretch, no shrink.
    Empty,
    /// Stretches or shrinks with first-order infinity, like TeX's `\hss`.
    Ss,
}

impl GlueKind {
    pub const ALL: [GlueKind; 8] = [
        GlueKind::Fil,
        GlueKind::Fill,
        GlueKind::Filll,
        GlueKind::NegFil,
        GlueKind::NegFill,
        GlueKind::NegFilll,
        GlueKind::Empty,
        GlueKind::Ss,
    ];

    pub fn name(self) -> &'static str {
        use GlueKind::*;
        match self {
            Fil => "fil",
            Fill => "fill",
            Filll => "filll",
            NegFil => "neg_fil",
            NegFill => "neg_fill",
            NegFilll => "neg_filll",
            Empty => "empty",
            Ss => "ss",
        }
    }

    /// The glue this kind stands for.
    pub fn spec(self) -> mtex_core::Glue {
        use GlueKind::*;
        let stretch = |order| mtex_core::Glue {
            stretch: 1.0,
            stretch_order: order,
            ..Default::default()
        };
        let shrink = |order| mtex_core::Glue {
            shrink: 1.0,
            shrink_order: order,
            ..Default::default()
        };
        match self {
            Fil => stretch(GlueOrder::Fil),
            Fill => stretch(GlueOrder::Fill),
            Filll => stretch(GlueOrder::Filll),
            NegFil => shrink(GlueOrder::Fil),
            NegFill => shrink(GlueOrder::Fill),
            NegFilll => shrink(GlueOrder::Filll),
            Empty => Default::default(),
            Ss => mtex_core::Glue {
                width: 0.0,
                stretch: 1.0,
                stretch_order: GlueOrder::Fil,
                shrink: -1.0,
                shrink_order: GlueOrder::Fil,
            },
        }
    }
}

impl std::fmt::Display for GlueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when parsing a glue kind from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown glue kind `{0}`")]
pub struct UnknownGlueKind(pub String);

impl std::str::FromStr for GlueKind {
    type Err = UnknownGlueKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlueKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownGlueKind(s.to_string()))
    }
}
