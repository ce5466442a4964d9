//! Abstract syntax tree of the LaTeX subset.
//!
//! Every node knows where it starts and ends in the source.
//! End positions are exclusive byte offsets.
//! Nodes own their children; the tree has no sharing.

use crate::token::Pos;

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    List(List<'a>),
    Macro(Macro<'a>),
    Arg(Arg<'a>),
    OptArg(OptArg<'a>),
    Ident(Ident<'a>),
    MathExpr(MathExpr<'a>),
    Var(Var<'a>),
    Literal(Literal<'a>),
    Op(Op<'a>),
    Super(Super<'a>),
    Sub(Sub<'a>),
}

/// Capability of knowing a location in the source.
pub trait Spanned {
    /// Position of the first byte of the node.
    fn pos(&self) -> Pos;
    /// Position just past the last byte of the node.
    fn end(&self) -> Pos;
}

/// Ordered sequence of nodes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct List<'a>(pub Vec<Node<'a>>);

impl<'a> List<'a> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<'a>> {
        self.0.iter()
    }
}

impl<'a> Spanned for List<'a> {
    fn pos(&self) -> Pos {
        self.0.first().map(Spanned::pos).unwrap_or(Pos::NONE)
    }
    fn end(&self) -> Pos {
        self.0.last().map(Spanned::end).unwrap_or(Pos::NONE)
    }
}

impl<'a> From<Vec<Node<'a>>> for List<'a> {
    fn from(value: Vec<Node<'a>>) -> Self {
        List(value)
    }
}

impl<'a, 'b> IntoIterator for &'b List<'a> {
    type Item = &'b Node<'a>;
    type IntoIter = std::slice::Iter<'b, Node<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A control sequence with its arguments, like `\frac{1}{2}`.
///
/// Each argument is an [Arg], an [OptArg], or a bare single-token node
///     like the `2` in `\sqrt2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro<'a> {
    pub name: Ident<'a>,
    pub args: Vec<Node<'a>>,
}

impl<'a> Spanned for Macro<'a> {
    fn pos(&self) -> Pos {
        self.name.pos()
    }
    fn end(&self) -> Pos {
        match self.args.last() {
            Some(arg) => arg.end(),
            None => self.name.end(),
        }
    }
}

/// A braced group `{...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg<'a> {
    /// Position of `{`.
    pub lbrace: Pos,
    pub list: List<'a>,
    /// Position of `}`.
    pub rbrace: Pos,
}

impl<'a> Spanned for Arg<'a> {
    fn pos(&self) -> Pos {
        self.lbrace
    }
    fn end(&self) -> Pos {
        self.rbrace + 1
    }
}

/// An optional argument `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptArg<'a> {
    /// Position of `[`.
    pub lbrack: Pos,
    pub list: List<'a>,
    /// Position of `]`.
    pub rbrack: Pos,
}

impl<'a> Spanned for OptArg<'a> {
    fn pos(&self) -> Pos {
        self.lbrack
    }
    fn end(&self) -> Pos {
        self.rbrack + 1
    }
}

/// Math mode `$...$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathExpr<'a> {
    /// Position of the opening `$`.
    pub left: Pos,
    pub list: List<'a>,
    /// Position of the closing `$`.
    pub right: Pos,
}

impl<'a> Spanned for MathExpr<'a> {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right + 1
    }
}

macro_rules! leaves {
    ( $(
        $(#[$meta: meta])*
        struct $name: ident { $field: ident }
    )+ ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name<'a> {
                pub pos: Pos,
                pub $field: &'a str,
            }

            impl<'a> Spanned for $name<'a> {
                fn pos(&self) -> Pos {
                    self.pos
                }
                fn end(&self) -> Pos {
                    self.pos + self.$field.len()
                }
            }
        )+
    };
}

leaves!(
    /// A bare name; the name of a macro includes its backslash.
    struct Ident { name }
    /// A math variable, one letter like `x`.
    struct Var { name }
    /// Literal text: a number, a word in text mode, spacing, a quoted string.
    struct Literal { text }
    /// A math operator or punctuation symbol like `=` or `(`.
    struct Op { text }
);

/// A superscript `^x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Super<'a> {
    /// Position of `^`.
    pub hat: Pos,
    pub node: Box<Node<'a>>,
}

impl<'a> Spanned for Super<'a> {
    fn pos(&self) -> Pos {
        self.hat
    }
    fn end(&self) -> Pos {
        self.node.end()
    }
}

/// A subscript `_x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sub<'a> {
    /// Position of `_`.
    pub underscore: Pos,
    pub node: Box<Node<'a>>,
}

impl<'a> Spanned for Sub<'a> {
    fn pos(&self) -> Pos {
        self.underscore
    }
    fn end(&self) -> Pos {
        self.node.end()
    }
}

macro_rules! dispatch {
    ($node: expr, $n: ident => $e: expr) => {
        match $node {
            Node::List($n) => $e,
            Node::Macro($n) => $e,
            Node::Arg($n) => $e,
            Node::OptArg($n) => $e,
            Node::Ident($n) => $e,
            Node::MathExpr($n) => $e,
            Node::Var($n) => $e,
            Node::Literal($n) => $e,
            Node::Op($n) => $e,
            Node::Super($n) => $e,
            Node::Sub($n) => $e,
        }
    };
}

impl<'a> Spanned for Node<'a> {
    fn pos(&self) -> Pos {
        dispatch!(self, n => n.pos())
    }
    fn end(&self) -> Pos {
        dispatch!(self, n => n.end())
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, nodes: &[Node]) -> std::fmt::Result {
    for (i, n) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{n}")?;
    }
    Ok(())
}

impl<'a> std::fmt::Display for List<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "List{{")?;
        write_list(f, &self.0)?;
        write!(f, "}}")
    }
}

impl<'a> std::fmt::Display for Node<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::List(list) => write!(f, "{list}"),
            Node::Macro(m) => {
                write!(f, "Macro{{{:?}", m.name.name)?;
                if !m.args.is_empty() {
                    write!(f, ", Args: ")?;
                    write_list(f, &m.args)?;
                }
                write!(f, "}}")
            }
            Node::Arg(arg) => {
                write!(f, "{{")?;
                write_list(f, &arg.list.0)?;
                write!(f, "}}")
            }
            Node::OptArg(arg) => {
                write!(f, "[")?;
                write_list(f, &arg.list.0)?;
                write!(f, "]")
            }
            Node::Ident(ident) => write!(f, "Ident{{{:?}}}", ident.name),
            Node::MathExpr(expr) => {
                write!(f, "MathExpr{{")?;
                if !expr.list.is_empty() {
                    write!(f, "List: ")?;
                    write_list(f, &expr.list.0)?;
                }
                write!(f, "}}")
            }
            Node::Var(var) => write!(f, "Var{{{:?}}}", var.name),
            Node::Literal(lit) => write!(f, "Lit{{{:?}}}", lit.text),
            Node::Op(op) => write!(f, "Op{{{:?}}}", op.text),
            Node::Super(s) => write!(f, "Super{{{}}}", s.node),
            Node::Sub(s) => write!(f, "Sub{{{}}}", s.node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(pos: usize, name: &str) -> Node<'_> {
        Node::Var(Var {
            pos: Pos(pos),
            name,
        })
    }

    #[test]
    fn empty_list_has_no_position() {
        let list = List::default();
        assert!(list.pos().is_none());
        assert!(list.end().is_none());
        assert!(list.end() >= list.pos());
    }

    #[test]
    fn list_span() {
        let list = List(vec![var(3, "x"), var(5, "y")]);
        assert_eq!(list.pos(), Pos(3));
        assert_eq!(list.end(), Pos(6));
    }

    #[test]
    fn macro_span() {
        let m = Macro {
            name: Ident {
                pos: Pos(0),
                name: r"\hat",
            },
            args: vec![],
        };
        assert_eq!(m.end(), Pos(4));
        let m = Macro {
            args: vec![Node::Arg(Arg {
                lbrace: Pos(4),
                list: List(vec![var(5, "x")]),
                rbrace: Pos(6),
            })],
            ..m
        };
        assert_eq!(m.pos(), Pos(0));
        assert_eq!(m.end(), Pos(7));
    }

    #[test]
    fn script_span() {
        let s = Node::Super(Super {
            hat: Pos(1),
            node: Box::new(var(2, "n")),
        });
        assert_eq!((s.pos(), s.end()), (Pos(1), Pos(3)));
    }

    #[test]
    fn display() {
        let node = Node::MathExpr(MathExpr {
            left: Pos(0),
            list: List(vec![
                Node::Macro(Macro {
                    name: Ident {
                        pos: Pos(1),
                        name: r"\sqrt",
                    },
                    args: vec![
                        Node::OptArg(OptArg {
                            lbrack: Pos(6),
                            list: List(vec![Node::Literal(Literal {
                                pos: Pos(7),
                                text: "3",
                            })]),
                            rbrack: Pos(8),
                        }),
                        Node::Arg(Arg {
                            lbrace: Pos(9),
                            list: List(vec![var(10, "x")]),
                            rbrace: Pos(11),
                        }),
                    ],
                }),
                Node::Super(Super {
                    hat: Pos(12),
                    node: Box::new(Node::Op(Op {
                        pos: Pos(13),
                        text: "-",
                    })),
                }),
            ]),
            right: Pos(14),
        });
        assert_eq!(
            format!["{node}"],
            r#"MathExpr{List: Macro{"\\sqrt", Args: [Lit{"3"}], {Var{"x"}}}, Super{Op{"-"}}}"#
        );
        assert_eq!((node.pos(), node.end()), (Pos(0), Pos(15)));
    }
}
