//! Core types shared by the mtex crates.
//!
//! These are the glue types of Knuth's box-and-glue model.
//! Unlike TeX, dimensions are `f64` values in device units:
//!     formulas are laid out for a specific font size and DPI
//!     and running dimensions are represented by infinity.

/// How much text shrinks when going to the next-smallest size level.
///
/// [GROW_FACTOR] must be the inverse of this value.
pub const SHRINK_FACTOR: f64 = 0.7;

/// How much text grows when going to the next-largest size level.
pub const GROW_FACTOR: f64 = 1.0 / SHRINK_FACTOR;

/// The number of size levels below the base size.
///
/// Beyond this many shrinks, things will not get any smaller.
pub const NUM_SIZE_LEVELS: i32 = 6;

/// Discrete size level of a node.
///
/// A fresh node is at level 0.
/// Each shrink moves down one level and each grow moves up one level.
/// The counter is unbounded in both directions,
///     but only levels above `-NUM_SIZE_LEVELS` actually change
///     the physical dimensions of a node.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeLevel(pub i32);

impl SizeLevel {
    /// Moves down one level and returns the factor to apply to dimensions.
    ///
    /// The factor is 1 once the level has reached the floor.
    pub fn shrink(&mut self) -> f64 {
        self.0 -= 1;
        if self.0 > -NUM_SIZE_LEVELS {
            SHRINK_FACTOR
        } else {
            1.0
        }
    }

    /// Moves up one level and returns the factor to apply to dimensions.
    ///
    /// Growing out of a level at or below the floor does not scale,
    ///     because the shrink into that level did not scale either.
    pub fn grow(&mut self) -> f64 {
        let scaled = self.0 > -NUM_SIZE_LEVELS;
        self.0 += 1;
        if scaled {
            GROW_FACTOR
        } else {
            1.0
        }
    }
}

/// Glue.
///
/// Described in TeX.2021.150.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glue {
    pub width: f64,
    pub stretch: f64,
    pub stretch_order: GlueOrder,
    pub shrink: f64,
    pub shrink_order: GlueOrder,
}

/// Order of infinity of a glue stretch or shrink.
///
/// When setting a list of boxes, glue is stretched or shrunk.
/// In some cases it is desirable that only some subset of the
/// glue is stretched.
/// For example, when setting centered material, only the two glues
/// at each end of the list are stretched and all other glue stays intact.
///
/// To achieve this, each glue stretch or shrink has an order of infinity.
/// If a list contains glue of some order (e.g. [GlueOrder::Fil]),
/// then glues of a lower order (e.g. [GlueOrder::Normal]) are not stretched
/// or shrunk.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueOrder {
    #[default]
    Normal,
    Fil,
    Fill,
    Filll,
}

impl GlueOrder {
    /// All orders, from lowest to highest.
    pub const ALL: [GlueOrder; 4] = [
        GlueOrder::Normal,
        GlueOrder::Fil,
        GlueOrder::Fill,
        GlueOrder::Filll,
    ];

    /// Parses an infinite glue order from a keyword.
    pub fn parse(s: &str) -> Option<Self> {
        use GlueOrder::*;
        Some(match s {
            "fil" => Fil,
            "fill" => Fill,
            "filll" => Filll,
            _ => return None,
        })
    }

    /// Index of this order in a 4-element totals array.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for GlueOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use GlueOrder::*;
        let s = match self {
            Normal => "",
            Fil => "fil",
            Fill => "fill",
            Filll => "filll",
        };
        write!(f, "{s}")
    }
}

/// Description of whether the glue of a list should stretch, shrink, or remain rigid.
///
/// Described in TeX.2021.135.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueSign {
    Stretching,
    Shrinking,
    #[default]
    Normal,
}

/// Totals of glue stretch or shrink, bucketed by order of infinity.
///
/// Described in TeX.2021.646.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct GlueTotals(pub [f64; 4]);

impl GlueTotals {
    /// Adds an amount of stretch or shrink at the given order.
    pub fn add(&mut self, amount: f64, order: GlueOrder) {
        self.0[order.index()] += amount;
    }

    /// Returns the highest order with a non-zero total.
    ///
    /// If every total is zero, [GlueOrder::Normal] is returned.
    ///
    /// Described in TeX.2021.659.
    pub fn highest_order(&self) -> GlueOrder {
        GlueOrder::ALL
            .into_iter()
            .rev()
            .find(|o| self.0[o.index()] != 0.0)
            .unwrap_or(GlueOrder::Normal)
    }

    /// Total at the given order.
    pub fn get(&self, order: GlueOrder) -> f64 {
        self.0[order.index()]
    }
}
