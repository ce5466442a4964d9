//! Arity table for the supported macros.
//!
//! The parser does not know what macros mean.
//! It only consults this table to decide how many arguments follow
//!     a macro name and how to parse them.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Mode in which the arguments of a macro are parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgMode {
    /// Arguments are math, even if the macro appears in text.
    Math,
    /// Arguments are text, even if the macro appears in math; e.g. `\text`.
    Text,
}

/// How a macro takes its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacroSpec {
    /// Number of required `{...}` arguments.
    pub required: usize,
    /// Maximum number of optional `[...]` arguments, which come first.
    pub optional: usize,
    /// Whether a required argument may be a single bare token, as in `\frac12`.
    pub bare: bool,
    pub mode: ArgMode,
}

impl MacroSpec {
    /// A macro without arguments, like `\alpha` or `\,`.
    pub const SYMBOL: MacroSpec = MacroSpec {
        required: 0,
        optional: 0,
        bare: false,
        mode: ArgMode::Math,
    };

    const fn math(required: usize, optional: usize) -> MacroSpec {
        MacroSpec {
            required,
            optional,
            bare: true,
            mode: ArgMode::Math,
        }
    }

    const TEXT: MacroSpec = MacroSpec {
        required: 1,
        optional: 0,
        bare: false,
        mode: ArgMode::Text,
    };
}

const TWO_ARGS: &[&str] = &[
    r"\frac",
    r"\dfrac",
    r"\tfrac",
    r"\binom",
    r"\stackrel",
    r"\overset",
    r"\underset",
];

const ONE_ARG: &[&str] = &[
    r"\hat",
    r"\bar",
    r"\vec",
    r"\dot",
    r"\ddot",
    r"\tilde",
    r"\acute",
    r"\grave",
    r"\breve",
    r"\check",
    r"\overline",
    r"\underline",
    r"\widehat",
    r"\widetilde",
    r"\mathbf",
    r"\mathit",
    r"\mathrm",
    r"\mathcal",
    r"\mathbb",
    r"\mathsf",
    r"\mathtt",
    r"\mathfrak",
    r"\boldsymbol",
    r"\operatorname",
    // The argument is the delimiter, e.g. `\left(`.
    r"\left",
    r"\right",
];

const TEXT_ARG: &[&str] = &[
    r"\text",
    r"\textbf",
    r"\textit",
    r"\textrm",
    r"\textsf",
    r"\texttt",
    r"\mbox",
    r"\emph",
];

const SYMBOLS: &[&str] = &[
    // Greek
    r"\alpha",
    r"\beta",
    r"\gamma",
    r"\delta",
    r"\epsilon",
    r"\varepsilon",
    r"\zeta",
    r"\eta",
    r"\theta",
    r"\vartheta",
    r"\iota",
    r"\kappa",
    r"\lambda",
    r"\mu",
    r"\nu",
    r"\xi",
    r"\pi",
    r"\varpi",
    r"\rho",
    r"\varrho",
    r"\sigma",
    r"\varsigma",
    r"\tau",
    r"\upsilon",
    r"\phi",
    r"\varphi",
    r"\chi",
    r"\psi",
    r"\omega",
    r"\Gamma",
    r"\Delta",
    r"\Theta",
    r"\Lambda",
    r"\Xi",
    r"\Pi",
    r"\Sigma",
    r"\Upsilon",
    r"\Phi",
    r"\Psi",
    r"\Omega",
    // Big operators and functions
    r"\sum",
    r"\prod",
    r"\int",
    r"\oint",
    r"\lim",
    r"\sin",
    r"\cos",
    r"\tan",
    r"\log",
    r"\ln",
    r"\exp",
    r"\max",
    r"\min",
    // Relations and binary operators
    r"\pm",
    r"\mp",
    r"\times",
    r"\div",
    r"\cdot",
    r"\ast",
    r"\circ",
    r"\leq",
    r"\geq",
    r"\neq",
    r"\approx",
    r"\equiv",
    r"\sim",
    r"\simeq",
    r"\propto",
    r"\ll",
    r"\gg",
    r"\in",
    r"\subset",
    r"\cup",
    r"\cap",
    r"\to",
    r"\rightarrow",
    r"\leftarrow",
    r"\Rightarrow",
    r"\infty",
    r"\partial",
    r"\nabla",
    r"\hbar",
    r"\ell",
    r"\prime",
    r"\degree",
    r"\AA",
    r"\langle",
    r"\rangle",
    r"\vert",
    r"\ldots",
    r"\cdots",
    // Spacing
    r"\,",
    r"\:",
    r"\;",
    r"\!",
    r"\quad",
    r"\qquad",
    // Escaped characters
    r"\{",
    r"\}",
    r"\$",
    r"\%",
    r"\_",
    r"\#",
    r"\&",
    r"\\",
    r"\|",
];

/// Table from macro names (with backslash) to how they take arguments.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    specs: HashMap<String, MacroSpec>,
}

impl MacroTable {
    /// An empty table.
    ///
    /// With an empty table, every macro is unknown.
    pub fn new() -> MacroTable {
        Default::default()
    }

    /// Table of the built-in macros.
    pub fn builtin() -> &'static MacroTable {
        static BUILTIN: OnceLock<MacroTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut table = MacroTable::new();
            for name in SYMBOLS {
                table.insert(name, MacroSpec::SYMBOL);
            }
            for name in ONE_ARG {
                table.insert(name, MacroSpec::math(1, 0));
            }
            for name in TWO_ARGS {
                table.insert(name, MacroSpec::math(2, 0));
            }
            for name in TEXT_ARG {
                table.insert(name, MacroSpec::TEXT);
            }
            table.insert(r"\sqrt", MacroSpec::math(1, 1));
            table
        })
    }

    /// Adds or replaces a macro; the name includes the backslash.
    pub fn insert(&mut self, name: &str, spec: MacroSpec) {
        self.specs.insert(name.to_string(), spec);
    }

    pub fn get(&self, name: &str) -> Option<MacroSpec> {
        self.specs.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
