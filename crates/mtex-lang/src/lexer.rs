//! Lexer for the LaTeX subset.
//!
//! The lexer never fails.
//! Input that matches no rule becomes an [TokenKind::Other] or
//!     [TokenKind::Invalid] token and it is up to the parser to reject it.

use crate::token::{Pos, Token, TokenKind};

/// LaTeX-subset lexer.
pub struct Lexer<'a> {
    /// The full source being lexed.
    s: &'a str,
    /// Start of the part of the source that has not been lexed yet.
    l: usize,
    /// Whether the EOF token has been returned by the iterator.
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    pub fn new(source: &'a str) -> Self {
        Self {
            s: source,
            l: 0,
            done: false,
        }
    }

    /// The full source being lexed.
    pub fn source(&self) -> &'a str {
        self.s
    }

    /// Continues lexing from an earlier position of the source.
    ///
    /// The position must be at a character boundary and not after the
    ///     end of the last returned token.
    pub fn rewind(&mut self, pos: Pos) {
        debug_assert!(pos.0 <= self.l && self.s.is_char_boundary(pos.0));
        self.l = pos.0;
        self.done = false;
    }

    /// Returns the next token.
    ///
    /// Once the input is exhausted this returns an EOF token on every call.
    pub fn advance(&mut self) -> Token<'a> {
        let start = self.l;
        let rest = &self.s[start..];
        let Some(c) = rest.chars().next() else {
            return Token {
                kind: TokenKind::EOF,
                pos: Pos(start),
                text: "",
            };
        };
        use TokenKind::*;
        let (kind, len) = match c {
            '%' => (Comment, rest.find(['\r', '\n']).unwrap_or(rest.len())),
            c if c.is_whitespace() => whitespace(rest),
            '\\' => {
                let name = &rest[1..];
                match name.chars().next() {
                    Some(n) if n.is_ascii_alphabetic() => (
                        Macro,
                        1 + name
                            .find(|n: char| !n.is_ascii_alphabetic())
                            .unwrap_or(name.len()),
                    ),
                    Some(n) if !n.is_whitespace() => (Macro, 1 + n.len_utf8()),
                    _ => (Backslash, 1),
                }
            }
            '0'..='9' => (Number, number(rest)),
            '\'' | '"' => {
                let body = &rest[1..];
                let line = &body[..body.find(['\r', '\n']).unwrap_or(body.len())];
                match line.find(c) {
                    Some(i) => (Verbatim, i + 2),
                    // A lone quote, e.g. the prime in `f'`.
                    None => (Other, 1),
                }
            }
            '$' => (Dollar, 1),
            '{' => (Lbrace, 1),
            '}' => (Rbrace, 1),
            '[' => (Lbrack, 1),
            ']' => (Rbrack, 1),
            '=' => (Equal, 1),
            '_' => (Underscore, 1),
            '(' => (Lparen, 1),
            ')' => (Rparen, 1),
            '<' => (Lt, 1),
            '>' => (Gt, 1),
            '^' => (Hat, 1),
            '/' => (Div, 1),
            '*' => (Mul, 1),
            '-' => (Sub, 1),
            '+' => (Add, 1),
            '!' => (Not, 1),
            ':' => (Colon, 1),
            c if c.is_alphabetic() => (
                Word,
                rest.find(|n: char| !n.is_alphabetic())
                    .unwrap_or(rest.len()),
            ),
            c if c.is_control() => (Invalid, c.len_utf8()),
            c => (Other, c.len_utf8()),
        };
        self.l += len;
        let token = Token {
            kind,
            pos: Pos(start),
            text: &self.s[start..self.l],
        };
        tracing::trace!(kind = ?token.kind, text = token.text, pos = start, "lexed token");
        token
    }
}

/// Lexes a run of whitespace, returning the kind and the length in bytes.
///
/// A run with two or more line breaks is a blank line.
/// `\r\n` counts as a single line break.
fn whitespace(s: &str) -> (TokenKind, usize) {
    let len = s.find(|c: char| !c.is_whitespace()).unwrap_or(s.len());
    let run = &s[..len];
    let mut breaks = 0;
    let mut chars = run.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => breaks += 1,
            '\r' if chars.peek() != Some(&'\n') => breaks += 1,
            _ => {}
        }
    }
    let kind = if breaks >= 2 {
        TokenKind::EmptyLine
    } else {
        TokenKind::Space
    };
    (kind, len)
}

/// Returns the length in bytes of the number at the start of the string.
///
/// A decimal point is part of the number if digits follow it, or if it is
///     not immediately followed by a letter:
///     `42.` is a number but in `43.x` the number is just `43`.
fn number(s: &str) -> usize {
    let digits = |s: &str| {
        s.find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len())
    };
    let mut len = digits(s);
    if let Some(after) = s[len..].strip_prefix('.') {
        let fraction = digits(after);
        if fraction > 0 {
            len += 1 + fraction;
        } else if !after.chars().next().is_some_and(char::is_alphabetic) {
            len += 1;
        }
    }
    len
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    /// Returns every token of the source, ending with a single EOF token.
    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let token = self.advance();
        if token.kind == TokenKind::EOF {
            self.done = true;
        }
        Some(token)
    }
}

/// Lexes the whole source; the last token is always EOF.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::TokenKind::*;
    use super::*;

    fn run_lexer_test(input: &str, want: Vec<(TokenKind, &str)>) {
        let got: Vec<(TokenKind, &str)> = tokenize(input)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect();
        assert_eq!(got, want);
    }

    macro_rules! lexer_tests {
        ( $( ($name: ident, $input: expr, $want: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let input = $input;
                    let want = $want;
                    run_lexer_test(input, want);
                }
            )+
        };
    }

    lexer_tests!(
        (
            math,
            r"$\sigma_1 = 22x$ ? ok",
            vec![
                (Dollar, "$"),
                (Macro, r"\sigma"),
                (Underscore, "_"),
                (Number, "1"),
                (Space, " "),
                (Equal, "="),
                (Space, " "),
                (Number, "22"),
                (Word, "x"),
                (Dollar, "$"),
                (Space, " "),
                (Other, "?"),
                (Space, " "),
                (Word, "ok"),
                (EOF, ""),
            ],
        ),
        (
            comments,
            "% boo is 42\r\n%% bar\tis not boo",
            vec![
                (Comment, "% boo is 42"),
                (Space, "\r\n"),
                (Comment, "%% bar\tis not boo"),
                (EOF, ""),
            ],
        ),
        (
            numbers,
            "x=23.4\ny=42.\nz=43.x",
            vec![
                (Word, "x"),
                (Equal, "="),
                (Number, "23.4"),
                (Space, "\n"),
                (Word, "y"),
                (Equal, "="),
                (Number, "42."),
                (Space, "\n"),
                (Word, "z"),
                (Equal, "="),
                (Number, "43"),
                (Other, "."),
                (Word, "x"),
                (EOF, ""),
            ],
        ),
        (
            hex_like_number,
            "w=0x32",
            vec![
                (Word, "w"),
                (Equal, "="),
                (Number, "0"),
                (Word, "x"),
                (Number, "32"),
                (EOF, ""),
            ],
        ),
        (
            quoted,
            "u='c'\nv=\"hello\" x='cos'",
            vec![
                (Word, "u"),
                (Equal, "="),
                (Verbatim, "'c'"),
                (Space, "\n"),
                (Word, "v"),
                (Equal, "="),
                (Verbatim, "\"hello\""),
                (Space, " "),
                (Word, "x"),
                (Equal, "="),
                (Verbatim, "'cos'"),
                (EOF, ""),
            ],
        ),
        (
            unterminated_quote_is_a_prime,
            "$f'(x)$\n'",
            vec![
                (Dollar, "$"),
                (Word, "f"),
                (Other, "'"),
                (Lparen, "("),
                (Word, "x"),
                (Rparen, ")"),
                (Dollar, "$"),
                (Space, "\n"),
                (Other, "'"),
                (EOF, ""),
            ],
        ),
        (
            backslashes,
            "hello\n\\\\world!\\ boo",
            vec![
                (Word, "hello"),
                (Space, "\n"),
                (Macro, r"\\"),
                (Word, "world"),
                (Not, "!"),
                (Backslash, r"\"),
                (Space, " "),
                (Word, "boo"),
                (EOF, ""),
            ],
        ),
        (
            trailing_backslash,
            r"a\",
            vec![(Word, "a"), (Backslash, r"\"), (EOF, "")],
        ),
        (
            symbol_macros,
            r"\sqrt{s}=13\,TeV",
            vec![
                (Macro, r"\sqrt"),
                (Lbrace, "{"),
                (Word, "s"),
                (Rbrace, "}"),
                (Equal, "="),
                (Number, "13"),
                (Macro, r"\,"),
                (Word, "TeV"),
                (EOF, ""),
            ],
        ),
        (
            macro_followed_by_digit,
            r"\sigma1",
            vec![(Macro, r"\sigma"), (Number, "1"), (EOF, "")],
        ),
        (
            operators,
            "[]<>^/*-+:",
            vec![
                (Lbrack, "["),
                (Rbrack, "]"),
                (Lt, "<"),
                (Gt, ">"),
                (Hat, "^"),
                (Div, "/"),
                (Mul, "*"),
                (Sub, "-"),
                (Add, "+"),
                (Colon, ":"),
                (EOF, ""),
            ],
        ),
        (
            empty_line,
            "a \n\r\n b\r\rc",
            vec![
                (Word, "a"),
                (EmptyLine, " \n\r\n "),
                (Word, "b"),
                (EmptyLine, "\r\r"),
                (Word, "c"),
                (EOF, ""),
            ],
        ),
        (
            unicode_word,
            "µm élan",
            vec![
                (Word, "µm"),
                (Space, " "),
                (Word, "élan"),
                (EOF, ""),
            ],
        ),
        (
            invalid_and_other,
            "a\u{0}b|",
            vec![
                (Word, "a"),
                (Invalid, "\u{0}"),
                (Word, "b"),
                (Other, "|"),
                (EOF, ""),
            ],
        ),
        (
            empty_input,
            "",
            vec![(EOF, "")],
        ),
    );

    #[test]
    fn advance_after_eof() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.advance().kind, Word);
        assert_eq!(lexer.advance().kind, EOF);
        let eof = lexer.advance();
        assert_eq!(eof.kind, EOF);
        assert_eq!(eof.pos, Pos(1));
    }

    #[test]
    fn rewind_into_verbatim() {
        let mut lexer = Lexer::new("f'(x) + g'");
        assert_eq!(lexer.advance().kind, Word);
        let verbatim = lexer.advance();
        assert_eq!((verbatim.kind, verbatim.text), (Verbatim, "'(x) + g'"));
        lexer.rewind(verbatim.pos + 1);
        let kinds: Vec<TokenKind> = lexer.map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![Lparen, Word, Rparen, Space, Add, Space, Word, Other, EOF]
        );
    }

    #[test]
    fn positions() {
        let tokens = tokenize(r"$\alpha^2$");
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos.0).collect();
        assert_eq!(positions, vec![0, 1, 7, 8, 9, 10]);
    }
}
