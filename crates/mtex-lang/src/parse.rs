//! Recursive descent parser for the LaTeX subset.
//!
//! The parser reads one token ahead.
//! For bare arguments like the `1` in `\frac12` it can split the first
//!     character off a word or number token and keep the rest for later.
//!
//! Open delimiters are tracked on a stack so that a closing delimiter
//!     in the wrong place reports the innermost unmatched opener.
//!
//! Groups and macros nest recursively.
//! Nesting is limited (see [Parser::max_depth]) so that deep input fails
//!     with an error instead of exhausting the stack.

use crate::ast::*;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::macros::{ArgMode, MacroSpec, MacroTable};
use crate::token::{Pos, Token, TokenKind};

/// What to do with macros that are not in the macro table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownMacros {
    /// Parse the macro as a symbol without arguments.
    #[default]
    Accept,
    /// Fail with [Error::UnknownSymbol].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelimKind {
    Brace,
    Bracket,
    Dollar,
}

impl DelimKind {
    fn closer(self) -> TokenKind {
        match self {
            DelimKind::Brace => TokenKind::Rbrace,
            DelimKind::Bracket => TokenKind::Rbrack,
            DelimKind::Dollar => TokenKind::Dollar,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Delim {
    kind: DelimKind,
    pos: Pos,
}

impl Delim {
    fn unmatched(self) -> Error {
        let pos = self.pos;
        match self.kind {
            DelimKind::Brace => Error::UnmatchedBrace { pos },
            DelimKind::Bracket => Error::UnmatchedBracket { pos },
            DelimKind::Dollar => Error::UnmatchedDollar { pos },
        }
    }
}

/// Scripts already attached to the current base.
#[derive(Default)]
struct Scripts {
    sup: Option<Pos>,
    sub: Option<Pos>,
}

/// Parser for one formula.
///
/// ```
/// use mtex_lang::{Parser, UnknownMacros};
///
/// let list = Parser::new(r"$\alpha + \beta$")
///     .unknown_macros(UnknownMacros::Reject)
///     .parse()
///     .unwrap();
/// assert_eq!(list.len(), 1);
/// ```
pub struct Parser<'a, 't> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    /// End of the last consumed token, for argument adjacency.
    prev_end: Pos,
    open: Vec<Delim>,
    /// Number of groups and macros currently being parsed.
    depth: usize,
    max_depth: usize,
    macros: &'t MacroTable,
    unknown_macros: UnknownMacros,
}

impl<'a> Parser<'a, 'static> {
    /// Default for [Parser::max_depth].
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Creates a parser using the built-in macro table.
    pub fn new(source: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            peeked: None,
            prev_end: Pos(0),
            open: vec![],
            depth: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            macros: MacroTable::builtin(),
            unknown_macros: Default::default(),
        }
    }
}

impl<'a, 't> Parser<'a, 't> {
    /// Uses a different macro table.
    pub fn macros<'u>(self, macros: &'u MacroTable) -> Parser<'a, 'u> {
        Parser {
            lexer: self.lexer,
            peeked: self.peeked,
            prev_end: self.prev_end,
            open: self.open,
            depth: self.depth,
            max_depth: self.max_depth,
            macros,
            unknown_macros: self.unknown_macros,
        }
    }

    pub fn unknown_macros(mut self, unknown_macros: UnknownMacros) -> Self {
        self.unknown_macros = unknown_macros;
        self
    }

    /// Sets how deeply groups and macros may nest.
    ///
    /// Each `{`, `[` or `$` group and each macro with arguments counts as a level.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole source as text.
    pub fn parse(mut self) -> Result<List<'a>, Error> {
        let list = self.list(false)?;
        let t = self.peek();
        if t.kind != TokenKind::EOF {
            return Err(self.mismatch(t));
        }
        tracing::debug!(nodes = list.len(), "parsed formula");
        Ok(list)
    }

    fn peek(&mut self) -> Token<'a> {
        *self.peeked.get_or_insert_with(|| self.lexer.advance())
    }

    fn next(&mut self) -> Token<'a> {
        let t = match self.peeked.take() {
            Some(t) => t,
            None => self.lexer.advance(),
        };
        self.prev_end = t.end();
        t
    }

    /// Consumes the first character of the next token.
    fn next_char(&mut self) -> Token<'a> {
        let t = self.next();
        let Some(c) = t.text.chars().next() else {
            return t;
        };
        let n = c.len_utf8();
        if n < t.text.len() {
            self.peeked = Some(Token {
                pos: t.pos + n,
                text: &t.text[n..],
                ..t
            });
        }
        self.prev_end = t.pos + n;
        Token {
            text: &t.text[..n],
            ..t
        }
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek().kind, TokenKind::Space | TokenKind::Comment) {
            self.next();
        }
    }

    /// Enters one level of nesting at the token starting at `pos`.
    fn enter(&mut self, pos: Pos) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            return Err(Error::TooDeeplyNested {
                pos,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn top(&self) -> Option<DelimKind> {
        self.open.last().map(|d| d.kind)
    }

    /// Error for a token that ends a list but does not close the innermost delimiter.
    fn mismatch(&self, t: Token<'a>) -> Error {
        let brace_open = self.open.iter().any(|d| d.kind == DelimKind::Brace);
        match self.open.last() {
            Some(&top)
                if !(t.kind == TokenKind::Rbrace
                    && top.kind == DelimKind::Dollar
                    && !brace_open) =>
            {
                top.unmatched()
            }
            _ => Error::UnexpectedClosingBrace { pos: t.pos },
        }
    }

    fn list(&mut self, math: bool) -> Result<List<'a>, Error> {
        let mut nodes = vec![];
        let mut scripts = Scripts::default();
        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::EOF | TokenKind::Rbrace => break,
                TokenKind::Rbrack if self.top() == Some(DelimKind::Bracket) => break,
                TokenKind::Dollar if math => break,
                TokenKind::Hat | TokenKind::Underscore if math => {
                    let script = self.script(&mut scripts)?;
                    nodes.push(script);
                }
                _ if math => {
                    let n = nodes.len();
                    self.math_item(&mut nodes)?;
                    if nodes.len() > n {
                        scripts = Scripts::default();
                    }
                }
                _ => self.text_item(&mut nodes)?,
            }
        }
        Ok(List(nodes))
    }

    /// Parses a delimited group, returning the positions of both delimiters.
    fn group(&mut self, kind: DelimKind, math: bool) -> Result<(Pos, List<'a>, Pos), Error> {
        let open = self.next();
        self.enter(open.pos)?;
        self.open.push(Delim {
            kind,
            pos: open.pos,
        });
        let list = self.list(math)?;
        let close = self.peek();
        if close.kind != kind.closer() {
            return Err(self.mismatch(close));
        }
        self.next();
        self.open.pop();
        self.depth -= 1;
        Ok((open.pos, list, close.pos))
    }

    fn arg(&mut self, math: bool) -> Result<Node<'a>, Error> {
        let (lbrace, list, rbrace) = self.group(DelimKind::Brace, math)?;
        Ok(Node::Arg(Arg {
            lbrace,
            list,
            rbrace,
        }))
    }

    fn text_item(&mut self, nodes: &mut Vec<Node<'a>>) -> Result<(), Error> {
        let t = self.peek();
        let node = match t.kind {
            TokenKind::Comment => {
                self.next();
                return Ok(());
            }
            TokenKind::Macro => self.macro_node()?,
            TokenKind::Lbrace => self.arg(false)?,
            TokenKind::Dollar => {
                let (left, list, right) = self.group(DelimKind::Dollar, true)?;
                Node::MathExpr(MathExpr { left, list, right })
            }
            TokenKind::Hat | TokenKind::Underscore => {
                return Err(Error::ScriptOutsideMath {
                    pos: t.pos,
                    script: script_char(t.kind),
                })
            }
            TokenKind::Invalid => return Err(invalid(t)),
            _ => {
                self.next();
                literal(t)
            }
        };
        nodes.push(node);
        Ok(())
    }

    fn math_item(&mut self, nodes: &mut Vec<Node<'a>>) -> Result<(), Error> {
        let t = self.peek();
        let node = match t.kind {
            TokenKind::Space | TokenKind::Comment => {
                self.next();
                return Ok(());
            }
            TokenKind::EmptyLine => {
                return Err(Error::BlankLineInMath {
                    span: t.span(),
                    dollar: self
                        .open
                        .iter()
                        .rev()
                        .find(|d| d.kind == DelimKind::Dollar)
                        .map(|d| d.pos),
                })
            }
            TokenKind::Word => {
                self.next();
                for (i, c) in t.text.char_indices() {
                    nodes.push(Node::Var(Var {
                        pos: t.pos + i,
                        name: &t.text[i..i + c.len_utf8()],
                    }));
                }
                return Ok(());
            }
            TokenKind::Macro => self.macro_node()?,
            TokenKind::Lbrace => self.arg(true)?,
            TokenKind::Invalid => return Err(invalid(t)),
            // In math a quote is a prime, like in `f'(x) + g'(x)`.
            TokenKind::Verbatim if t.text.starts_with('\'') => {
                self.next();
                self.lexer.rewind(t.pos + 1);
                self.prev_end = t.pos + 1;
                op(Token {
                    text: &t.text[..1],
                    ..t
                })
            }
            kind if kind.is_symbol() => {
                self.next();
                op(t)
            }
            _ => {
                self.next();
                literal(t)
            }
        };
        nodes.push(node);
        Ok(())
    }

    fn script(&mut self, scripts: &mut Scripts) -> Result<Node<'a>, Error> {
        let t = self.next();
        let is_super = t.kind == TokenKind::Hat;
        let last = if is_super {
            &mut scripts.sup
        } else {
            &mut scripts.sub
        };
        if let Some(first) = *last {
            let second = t.pos;
            return Err(if is_super {
                Error::DoubleSuperscript { first, second }
            } else {
                Error::DoubleSubscript { first, second }
            });
        }
        *last = Some(t.pos);
        self.skip_spaces();
        let Some(node) = self.single(true, true)? else {
            let found = self.peek();
            return Err(Error::MissingScript {
                pos: t.pos,
                script: script_char(t.kind),
                found: found.span(),
                found_description: found.kind.description(),
            });
        };
        let node = Box::new(node);
        Ok(if is_super {
            Node::Super(Super { hat: t.pos, node })
        } else {
            Node::Sub(Sub {
                underscore: t.pos,
                node,
            })
        })
    }

    /// Parses a single bare token, or a braced group if `braces` is set.
    ///
    /// Returns [None] without consuming anything if the next token
    ///     cannot be an argument.
    fn single(&mut self, math: bool, braces: bool) -> Result<Option<Node<'a>>, Error> {
        let t = self.peek();
        let node = match t.kind {
            TokenKind::Lbrace if braces => self.arg(math)?,
            TokenKind::Word | TokenKind::Number => {
                let c = self.next_char();
                if math && c.kind == TokenKind::Word {
                    Node::Var(Var {
                        pos: c.pos,
                        name: c.text,
                    })
                } else {
                    literal(c)
                }
            }
            TokenKind::Macro => self.macro_node()?,
            TokenKind::Rbrack if self.top() == Some(DelimKind::Bracket) => return Ok(None),
            kind if kind.is_symbol() => {
                self.next();
                if math {
                    op(t)
                } else {
                    literal(t)
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(node))
    }

    fn macro_spec(&self, t: Token<'a>) -> Result<MacroSpec, Error> {
        match (self.macros.get(t.text), self.unknown_macros) {
            (Some(spec), _) => Ok(spec),
            (None, UnknownMacros::Accept) => Ok(MacroSpec::SYMBOL),
            (None, UnknownMacros::Reject) => Err(Error::UnknownSymbol {
                name: t.text.to_string(),
                span: t.span(),
            }),
        }
    }

    fn macro_node(&mut self) -> Result<Node<'a>, Error> {
        let t = self.next();
        let spec = self.macro_spec(t)?;
        let nested = spec.optional + spec.required > 0;
        if nested {
            self.enter(t.pos)?;
        }
        let math = spec.mode == ArgMode::Math;
        let mut args = vec![];
        for _ in 0..spec.optional {
            let next = self.peek();
            if next.kind != TokenKind::Lbrack || next.pos != self.prev_end {
                break;
            }
            let (lbrack, list, rbrack) = self.group(DelimKind::Bracket, math)?;
            args.push(Node::OptArg(OptArg {
                lbrack,
                list,
                rbrack,
            }));
        }
        for got in 0..spec.required {
            let next = self.peek();
            let arg = if next.kind == TokenKind::Lbrace && next.pos == self.prev_end {
                Some(self.arg(math)?)
            } else if spec.bare {
                self.skip_spaces();
                self.single(math, false)?
            } else {
                None
            };
            let Some(arg) = arg else {
                let found = self.peek();
                return Err(Error::MissingArgument {
                    name: t.text.to_string(),
                    name_span: t.span(),
                    expected: spec.required,
                    got,
                    found: found.span(),
                    found_description: found.kind.description(),
                });
            };
            args.push(arg);
        }
        if nested {
            self.depth -= 1;
        }
        tracing::trace!(name = t.text, args = args.len(), "parsed macro");
        Ok(Node::Macro(Macro {
            name: Ident {
                pos: t.pos,
                name: t.text,
            },
            args,
        }))
    }
}

fn script_char(kind: TokenKind) -> char {
    if kind == TokenKind::Hat {
        '^'
    } else {
        '_'
    }
}

fn invalid(t: Token) -> Error {
    Error::InvalidToken {
        span: t.span(),
        text: t.text.to_string(),
    }
}

fn literal(t: Token) -> Node {
    Node::Literal(Literal {
        pos: t.pos,
        text: t.text,
    })
}

fn op(t: Token) -> Node {
    Node::Op(Op {
        pos: t.pos,
        text: t.text,
    })
}

/// Parses a formula with the built-in macro table.
pub fn parse(source: &str) -> Result<List<'_>, Error> {
    Parser::new(source).parse()
}
