use crate::token::{Pos, Position, Source};
use std::ops::Range;

/// Error encountered when parsing a formula.
///
/// Parsing stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A character that no token rule accepts, like a control character.
    #[error("invalid character {text:?}")]
    InvalidToken { span: Range<usize>, text: String },

    /// A `{` without a matching `}`.
    #[error("unmatched `{{`")]
    UnmatchedBrace { pos: Pos },

    /// A `[` starting an optional argument without a matching `]`.
    #[error("unmatched `[`")]
    UnmatchedBracket { pos: Pos },

    /// A `$` without a matching `$`.
    #[error("unmatched `$`")]
    UnmatchedDollar { pos: Pos },

    /// A `}` that closes nothing.
    #[error("unexpected `}}`")]
    UnexpectedClosingBrace { pos: Pos },

    /// A `^` or `_` in text mode.
    #[error("`{script}` is only allowed in math mode")]
    ScriptOutsideMath { pos: Pos, script: char },

    /// Two superscripts on the same base, like `x^1^2`.
    #[error("double superscript")]
    DoubleSuperscript { first: Pos, second: Pos },

    /// Two subscripts on the same base, like `x_1_2`.
    #[error("double subscript")]
    DoubleSubscript { first: Pos, second: Pos },

    /// A `^` or `_` that is not followed by something to attach.
    #[error("missing argument for `{script}`")]
    MissingScript {
        pos: Pos,
        script: char,
        found: Range<usize>,
        found_description: &'static str,
    },

    /// A macro with fewer arguments than it requires.
    #[error("the `{name}` macro requires {expected} argument{}, got {got}", plural(.expected))]
    MissingArgument {
        name: String,
        name_span: Range<usize>,
        expected: usize,
        got: usize,
        found: Range<usize>,
        found_description: &'static str,
    },

    /// A blank line, i.e. a paragraph break, inside math mode.
    #[error("blank line in math mode")]
    BlankLineInMath {
        span: Range<usize>,
        /// The `$` that opened math mode, if math mode was entered by `$`.
        dollar: Option<Pos>,
    },

    /// Groups or macros nested more deeply than the parser allows.
    #[error("formula is nested too deeply")]
    TooDeeplyNested { pos: Pos, limit: usize },

    /// A macro that is not in the macro table, when unknown macros are rejected.
    #[error("unknown symbol `{name}`")]
    UnknownSymbol { name: String, span: Range<usize> },
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

fn char_span(pos: Pos) -> Range<usize> {
    pos.0..pos.0 + 1
}

/// Broad class of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input that the lexer could not turn into a meaningful token.
    LexInvalid,
    /// Input that does not follow the grammar.
    Syntax,
    /// A macro that is not known.
    UnknownSymbol,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        use Error::*;
        match self {
            InvalidToken { .. } => ErrorClass::LexInvalid,
            UnknownSymbol { .. } => ErrorClass::UnknownSymbol,
            UnmatchedBrace { .. }
            | UnmatchedBracket { .. }
            | UnmatchedDollar { .. }
            | UnexpectedClosingBrace { .. }
            | ScriptOutsideMath { .. }
            | DoubleSuperscript { .. }
            | DoubleSubscript { .. }
            | MissingScript { .. }
            | MissingArgument { .. }
            | BlankLineInMath { .. }
            | TooDeeplyNested { .. } => ErrorClass::Syntax,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn main_span(&self) -> Range<usize> {
        use Error::*;
        match self {
            InvalidToken { span, .. } | BlankLineInMath { span, .. } | UnknownSymbol { span, .. } => {
                span.clone()
            }
            UnmatchedBrace { pos }
            | UnmatchedBracket { pos }
            | UnmatchedDollar { pos }
            | UnexpectedClosingBrace { pos }
            | ScriptOutsideMath { pos, .. }
            | MissingScript { pos, .. }
            | TooDeeplyNested { pos, .. } => char_span(*pos),
            DoubleSuperscript { second, .. } | DoubleSubscript { second, .. } => char_span(*second),
            MissingArgument { name_span, .. } => name_span.clone(),
        }
    }

    pub fn labels(&self) -> Vec<ErrorLabel> {
        use Error::*;
        match self {
            InvalidToken { .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: "this character is not allowed in a formula".into(),
            }],
            UnmatchedBrace { .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: "this brace is never closed".into(),
            }],
            UnmatchedBracket { .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: "this optional argument is never closed".into(),
            }],
            UnmatchedDollar { .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: "math mode starts here and is never closed".into(),
            }],
            UnexpectedClosingBrace { .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: "there is no `{` for this brace to close".into(),
            }],
            ScriptOutsideMath { script, .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: format!["`{script}` appears here, outside of `$...$`"],
            }],
            DoubleSuperscript { first, second } | DoubleSubscript { first, second } => vec![
                ErrorLabel {
                    span: char_span(*second),
                    text: "the second script appears here".into(),
                },
                ErrorLabel {
                    span: char_span(*first),
                    text: "the first script appears here".into(),
                },
            ],
            MissingScript {
                found,
                found_description,
                ..
            } => vec![
                ErrorLabel {
                    span: self.main_span(),
                    text: "this script has no argument".into(),
                },
                ErrorLabel {
                    span: found.clone(),
                    text: format!["expected a token or a braced group, found {found_description}"],
                },
            ],
            MissingArgument {
                name,
                name_span,
                got,
                found,
                found_description,
                ..
            } => vec![
                ErrorLabel {
                    span: name_span.clone(),
                    text: format!["`{name}` is given {got} argument{}", plural(got)],
                },
                ErrorLabel {
                    span: found.clone(),
                    text: format!["expected an argument, found {found_description}"],
                },
            ],
            BlankLineInMath { span, dollar } => {
                let mut labels = vec![ErrorLabel {
                    span: span.clone(),
                    text: "the blank line appears here".into(),
                }];
                if let Some(dollar) = dollar {
                    labels.push(ErrorLabel {
                        span: char_span(*dollar),
                        text: "math mode starts here".into(),
                    });
                }
                labels
            }
            TooDeeplyNested { limit, .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: format!["this goes past the limit of {limit} nested groups and macros"],
            }],
            UnknownSymbol { name, span } => vec![ErrorLabel {
                span: span.clone(),
                text: format!["`{name}` is not a known macro"],
            }],
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use Error::*;
        match self {
            ScriptOutsideMath { .. } => {
                vec![r"Use `\^{}` or `\_` for a literal character".into()]
            }
            DoubleSuperscript { .. } | DoubleSubscript { .. } => {
                vec!["Use braces to make the nesting explicit, like `x^{a^b}`".into()]
            }
            MissingArgument { .. } => vec![
                "Braced and bracketed arguments must directly follow the macro name or the previous argument".into(),
            ],
            BlankLineInMath { .. } => vec!["Math mode cannot span paragraphs".into()],
            TooDeeplyNested { .. } => {
                vec!["The limit can be raised with `Parser::max_depth`".into()]
            }
            InvalidToken { .. }
            | UnmatchedBrace { .. }
            | UnmatchedBracket { .. }
            | UnmatchedDollar { .. }
            | UnexpectedClosingBrace { .. }
            | MissingScript { .. }
            | UnknownSymbol { .. } => vec![],
        }
    }

    /// Resolves the start of the main span to a line and column.
    pub fn position(&self, source: &Source) -> Position {
        source.position(Pos(self.main_span().start))
    }

    /// Returns a one-line diagnostic for this error.
    pub fn diagnostic(&self, source: &Source) -> Diagnostic {
        Diagnostic {
            position: self.position(source),
            message: self.message(),
        }
    }
}

/// Label on an error message.
///
/// A label identifies a particular piece of source code and some
/// information about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLabel {
    pub span: Range<usize>,
    pub text: String,
}

/// An error message with a resolved position.
///
/// Displays as `file:line:column: message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl Error {
    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'b>(
        &self,
        file_name: &'b str,
    ) -> ariadne::Report<'static, (&'b str, Range<usize>)> {
        let mut report =
            ariadne::Report::build(ariadne::ReportKind::Error, (file_name, self.main_span()))
                .with_config(ariadne::Config::default().with_index_type(ariadne::IndexType::Byte))
                .with_message(self.message());
        let mut color = ariadne::Color::BrightRed;
        for label in self.labels() {
            report = report.with_label(
                ariadne::Label::new((file_name, label.span))
                    .with_message(label.text)
                    .with_color(color),
            );
            color = ariadne::Color::BrightYellow;
        }
        for note in self.notes() {
            report = report.with_note(note);
        }
        report.finish()
    }
}
