//! Fonts, as seen by the layout engine.
//!
//! The engine does not load fonts.
//! It asks a [FontMetrics] implementation for the dimensions of glyphs.

use crate::node::{Accent, Char, Rule};

/// Identifier of a font, assigned by the [FontMetrics] implementation.
pub type FontId = u32;

/// Metrics of one glyph at a specific size and DPI.
///
/// The width, height and depth are TeX dimensions.
/// The bounding box is the ink of the glyph relative to its origin,
///     with y increasing upwards.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphMetrics {
    /// Horizontal distance from this glyph's origin to the next glyph's origin.
    pub advance: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl GlyphMetrics {
    /// Returns the metrics with every dimension multiplied by the factor.
    pub fn scaled(&self, factor: f64) -> GlyphMetrics {
        GlyphMetrics {
            advance: self.advance * factor,
            width: self.width * factor,
            height: self.height * factor,
            depth: self.depth * factor,
            xmin: self.xmin * factor,
            xmax: self.xmax * factor,
            ymin: self.ymin * factor,
            ymax: self.ymax * factor,
        }
    }
}

/// Source of font metrics.
pub trait FontMetrics {
    /// Metrics of a glyph in the given font.
    fn glyph_metrics(&self, font: FontId, c: char, size: f64, dpi: f64, math: bool)
        -> GlyphMetrics;

    /// Kerning between two adjacent characters, in addition to their advances.
    fn kern(&self, left: &Char, right: &Char) -> f64 {
        let _ = (left, right);
        0.0
    }

    /// Thickness of an underline in the given font, used for rules.
    fn underline_thickness(&self, font: FontId, size: f64, dpi: f64) -> f64;
}

/// Parameters for placing sub- and superscripts.
///
/// Most values are a fraction of the x-height of the current font.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontConstants {
    /// Additional horizontal space after scripts.
    pub script_space: f64,
    /// How far scripts drop below the baseline.
    pub sub_drop: f64,
    /// How far superscripts are raised above the baseline.
    pub sup1: f64,
    /// How far subscripts drop below the baseline.
    pub sub1: f64,
    /// How far subscripts drop below the baseline when there is also a superscript.
    pub sub2: f64,
    /// Horizontal offset of scripts relative to an upright nucleus.
    pub delta: f64,
    /// Additional superscript offset for slanted nuclei,
    ///     as a fraction of the last character's height above 2/3 of the x-height.
    pub delta_slanted: f64,
    /// Horizontal offset of scripts for integrals.
    pub delta_integral: f64,
}

impl Default for FontConstants {
    fn default() -> Self {
        FontConstants {
            script_space: 0.05,
            sub_drop: 0.4,
            sup1: 0.7,
            sub1: 0.3,
            sub2: 0.5,
            delta: 0.025,
            delta_slanted: 0.2,
            delta_integral: 0.1,
        }
    }
}

/// Current font settings; builds nodes from them.
#[derive(Clone, Copy)]
pub struct State<'f> {
    pub fonts: &'f dyn FontMetrics,
    pub font: FontId,
    pub font_size: f64,
    pub dpi: f64,
    pub math: bool,
}

impl<'f> State<'f> {
    /// State for math in font 0.
    pub fn new(fonts: &'f dyn FontMetrics, font_size: f64, dpi: f64) -> Self {
        State {
            fonts,
            font: 0,
            font_size,
            dpi,
            math: true,
        }
    }

    pub fn char(&self, c: char) -> Char {
        Char::new(c, self)
    }

    pub fn accent(&self, c: char) -> Accent {
        Accent::new(self.char(c))
    }

    /// Horizontal rule whose width runs to the edges of the enclosing box.
    ///
    /// Without an explicit thickness the underline thickness of the font is used.
    pub fn hrule(&self, thickness: Option<f64>) -> Rule {
        Rule::horizontal(thickness.unwrap_or_else(|| self.underline_thickness()))
    }

    /// Vertical rule as thick as an underline, running the height of the enclosing box.
    pub fn vrule(&self) -> Rule {
        Rule::vertical(self.underline_thickness())
    }

    fn underline_thickness(&self) -> f64 {
        self.fonts
            .underline_thickness(self.font, self.font_size, self.dpi)
    }
}

impl std::fmt::Debug for State<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("font", &self.font)
            .field("font_size", &self.font_size)
            .field("dpi", &self.dpi)
            .field("math", &self.math)
            .finish_non_exhaustive()
    }
}
