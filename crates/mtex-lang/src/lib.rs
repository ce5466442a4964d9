//! # mtex language
//!
//! This crate lexes and parses the subset of LaTeX used in plot labels,
//!     like `$\sigma_1 = 22x$` in an axis title.
//! Text outside of `$...$` is kept mostly as is;
//!     inside math mode the parser builds variables, operators, macros
//!     with their arguments, and super- and subscripts.
//!
//! The parser does not know what macros mean.
//! It consults a [MacroTable] to decide how many arguments a macro takes,
//!     and whether these arguments are math or text.
//!
//! ```
//! use mtex_lang::ast::Node;
//!
//! let list = mtex_lang::parse(r"mass $m_0 = \frac12 \mu$g").unwrap();
//! assert_eq!(list.len(), 4);
//! let Node::MathExpr(expr) = &list.0[2] else {
//!     panic!("expected math")
//! };
//! assert_eq!(
//!     format!["{}", expr.list],
//!     r#"List{Var{"m"}, Sub{Lit{"0"}}, Op{"="}, Macro{"\\frac", Args: Lit{"1"}, Lit{"2"}}, Macro{"\\mu"}}"#,
//! );
//! ```
//!
//! Errors carry byte offsets.
//! They can be resolved to lines and columns with a [Source],
//!     or turned into [ariadne](https://docs.rs/ariadne) reports
//!     when the `ariadne` feature is enabled.
//!
//! ```
//! use mtex_lang::{Error, Source};
//!
//! let text = r"$\frac{1}{2$";
//! let err = mtex_lang::parse(text).unwrap_err();
//! assert_eq!(err, Error::UnmatchedBrace { pos: mtex_lang::Pos(9) });
//! let diagnostic = err.diagnostic(&Source::new("title", text));
//! assert_eq!(format!["{diagnostic}"], "title:1:10: unmatched `{`");
//! ```

pub mod ast;
mod error;
pub mod lexer;
mod macros;
pub mod parse;
pub mod token;

pub use error::{Diagnostic, Error, ErrorClass, ErrorLabel};
pub use lexer::{tokenize, Lexer};
pub use macros::{ArgMode, MacroSpec, MacroTable};
pub use parse::{parse, Parser, UnknownMacros};
pub use token::{Pos, Position, Source, Token, TokenKind};
