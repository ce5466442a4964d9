//! Tokens and source positions.

/// Byte offset into the source of a formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(pub usize);

impl Pos {
    /// Out-of-range marker used for the position of an empty list.
    ///
    /// An empty list has no position, and reporting offset zero would make it
    ///     look adjacent to whatever starts the formula.
    pub const NONE: Pos = Pos(usize::MAX);

    pub fn is_none(self) -> bool {
        self == Pos::NONE
    }

    pub fn offset(self) -> usize {
        self.0
    }
}

impl std::ops::Add<usize> for Pos {
    type Output = Pos;
    fn add(self, rhs: usize) -> Self::Output {
        Pos(self.0 + rhs)
    }
}

/// Kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A character that no rule accepts, e.g. a control character.
    Invalid,
    /// Control sequence like `\sigma` or `\,`; the text includes the backslash.
    Macro,
    /// Whitespace containing at least two line breaks.
    EmptyLine,
    /// A `%` comment up to the end of the line.
    Comment,
    Space,
    /// Maximal run of alphabetic characters.
    Word,
    /// Integer or decimal number like `22`, `23.4` or `42.`.
    Number,
    Dollar,
    Lbrace,
    Rbrace,
    Lbrack,
    Rbrack,
    Equal,
    Underscore,
    Lparen,
    Rparen,
    Lt,
    Gt,
    Hat,
    Div,
    Mul,
    Sub,
    Add,
    Not,
    Colon,
    /// A backslash that does not start a control sequence.
    Backslash,
    /// Any other character.
    Other,
    /// Quoted string or character, quotes included.
    Verbatim,
    EOF,
}

impl TokenKind {
    /// Human readable description, used in error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            Invalid => "an invalid character",
            Macro => "a macro",
            EmptyLine => "a blank line",
            Comment => "a comment",
            Space => "whitespace",
            Word => "a word",
            Number => "a number",
            Dollar => "`$`",
            Lbrace => "`{`",
            Rbrace => "`}`",
            Lbrack => "`[`",
            Rbrack => "`]`",
            Equal => "`=`",
            Underscore => "`_`",
            Lparen => "`(`",
            Rparen => "`)`",
            Lt => "`<`",
            Gt => "`>`",
            Hat => "`^`",
            Div => "`/`",
            Mul => "`*`",
            Sub => "`-`",
            Add => "`+`",
            Not => "`!`",
            Colon => "`:`",
            Backslash => "a backslash",
            Other => "a symbol",
            Verbatim => "a quoted string",
            EOF => "the end of the input",
        }
    }

    /// Whether this is a single-character operator or punctuation token.
    pub fn is_symbol(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | Lparen
                | Rparen
                | Lbrack
                | Rbrack
                | Lt
                | Gt
                | Div
                | Mul
                | Sub
                | Add
                | Not
                | Colon
                | Other
        )
    }
}

/// A token.
///
/// The text borrows from the source; for [TokenKind::EOF] it is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub pos: Pos,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Position just past the end of the token.
    pub fn end(&self) -> Pos {
        self.pos + self.text.len()
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.pos.0..self.end().0
    }
}

impl<'a> std::fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Resolved location of a position, for diagnostics.
///
/// Lines and columns start at 1; columns count characters, not bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub file: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A named piece of source text.
///
/// The name is only used in diagnostics; for plot labels it is typically
///     something like `"title"` or the path of a file of formulas.
#[derive(Clone, Copy, Debug)]
pub struct Source<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl<'a> Source<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Source { name, text }
    }

    /// Resolves a byte offset to a line and column.
    ///
    /// Offsets past the end of the text (including [Pos::NONE])
    ///     resolve to the end of the text.
    pub fn position(&self, pos: Pos) -> Position {
        let mut offset = pos.0.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let mut line = 1;
        let mut line_start = 0;
        for (i, c) in self.text[..offset].char_indices() {
            if c == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let column = self.text[line_start..offset].chars().count() + 1;
        Position {
            file: self.name.to_string(),
            offset,
            line,
            column,
        }
    }
}
