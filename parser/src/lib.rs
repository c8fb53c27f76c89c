use ast::{NodeId, NodeKind, Tree};
use bit_set::BitSet;
use errors::Highlight;
use lazy_static::lazy_static;
#[cfg(test)]
use lexer::Lexer;
use lexer::{Token, TokenData, TokenType};
use span::{Offset, Span};
use std::fmt::{Debug, Display};
use std::slice::Iter;

#[derive(Debug, PartialEq, Eq)]
pub enum Error<'src, 'tokens> {
    Unexpected {
        actual: &'tokens Token<'src>,
        expected: ExpectedSet,
    },
}

impl<'src, 'tokens> Error<'src, 'tokens> {
    pub fn reportable(&self) -> errors::Error {
        match self {
            Error::Unexpected { actual, expected } => errors::Error {
                highlight: match actual.token_type() {
                    TokenType::Eof => Highlight::Point(actual.span.start),
                    _ => Highlight::Span(actual.span),
                },
                message: format!(
                    "Unexpected {}, expecting one of: {}",
                    actual.token_type(),
                    expected
                ),
            },
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ExpectedSet {
    bits: BitSet,
}

impl ExpectedSet {
    pub fn new() -> Self {
        ExpectedSet {
            bits: BitSet::with_capacity(64),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    #[inline]
    pub fn insert(&mut self, tt: &TokenType) {
        self.bits.insert(tt.to_usize());
    }

    #[inline]
    pub fn union(&mut self, other: &ExpectedSet) {
        self.bits.union_with(&other.bits);
    }

    #[inline]
    pub fn contains(&self, tt: &TokenType) -> bool {
        self.bits.contains(tt.to_usize())
    }

    pub fn as_vec(&self) -> Vec<TokenType> {
        self.bits
            .iter()
            .map(|i| TokenType::unsafe_from_usize(i))
            .collect()
    }
}

impl Default for ExpectedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ExpectedSet {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let vec = self.as_vec();
        let mut items = vec.iter();
        if let Option::Some(item) = items.next() {
            Display::fmt(item, formatter)?;
        }
        for item in items {
            formatter.write_str(", ")?;
            Display::fmt(item, formatter)?;
        }
        Result::Ok(())
    }
}

impl Debug for ExpectedSet {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        self.as_vec().fmt(formatter)
    }
}

#[macro_export]
macro_rules! expected {
    [ $( $tt:expr ),* ] => {
        {
            let mut expected = ExpectedSet::new();
            $(
                expected.insert($tt);
            )*
            expected
        }
    }
}

pub type ParseResult<'src, 'tokens, T> = Result<T, Error<'src, 'tokens>>;

lazy_static! {
    /// Tokens that can start an operand of an application (`Rn`)
    static ref RN_START_SET: ExpectedSet = expected![
        &TokenType::Ident,
        &TokenType::Integer,
        &TokenType::String,
        &TokenType::True,
        &TokenType::False,
        &TokenType::Nil,
        &TokenType::Dummy,
        &TokenType::LParen
    ];
    /// Tokens that can start a bound variable (`Vb`)
    static ref VB_START_SET: ExpectedSet = expected![&TokenType::Ident, &TokenType::LParen];
    static ref EOF_TOKEN: Token<'static> = Token {
        data: TokenData::Symbol(TokenType::Eof),
        span: Span {
            start: Offset(0),
            length: Offset(0),
        },
        line: 0,
    };
}

/// Binary operators of one precedence level: the token that introduces them and the node they
/// build.
type OperatorTable = [(TokenType, NodeKind)];

const COMPARISONS: &OperatorTable = &[
    (TokenType::Gr, NodeKind::Gr),
    (TokenType::Greater, NodeKind::Gr),
    (TokenType::Ge, NodeKind::Ge),
    (TokenType::GreaterEq, NodeKind::Ge),
    (TokenType::Ls, NodeKind::Ls),
    (TokenType::Less, NodeKind::Ls),
    (TokenType::Le, NodeKind::Le),
    (TokenType::LessEq, NodeKind::Le),
    (TokenType::Eq, NodeKind::Eq),
    (TokenType::Ne, NodeKind::Ne),
];

const ADDITIVE: &OperatorTable = &[
    (TokenType::Plus, NodeKind::Plus),
    (TokenType::Minus, NodeKind::Minus),
];

const MULTIPLICATIVE: &OperatorTable = &[
    (TokenType::Star, NodeKind::Mult),
    (TokenType::Slash, NodeKind::Div),
];

pub struct Parser<'src, 'tokens, 'tree> {
    tree: &'tree mut Tree,
    current: Option<&'tokens Token<'src>>,
    position: Iter<'tokens, Token<'src>>,
    expected: ExpectedSet,
}

impl<'src, 'tokens, 'tree> Parser<'src, 'tokens, 'tree> {
    /// `input` must be terminated by a `TokenType::Eof`
    pub fn new(tree: &'tree mut Tree, input: &'tokens [Token<'src>]) -> Self {
        let mut position = input.iter();
        let current = position.next();

        Parser {
            tree,
            current,
            position,
            expected: ExpectedSet::new(),
        }
    }

    #[inline]
    fn current_token(&self) -> &'tokens Token<'src> {
        match self.current {
            Option::Some(token) => token,
            Option::None => &*EOF_TOKEN,
        }
    }

    #[inline]
    fn consume(&mut self) -> Option<&'tokens Token<'src>> {
        let res = self.position.next();
        self.current = res;
        res
    }

    fn expect(&mut self, tt: TokenType) -> Option<&'tokens Token<'src>> {
        self.expected.insert(&tt);
        let token = self.current_token();
        if token.token_type() == tt {
            let _ = self.consume();
            self.expected.clear();
            Option::Some(token)
        } else {
            Option::None
        }
    }

    /// Like `expect`, but tries each of `table`'s tokens and returns the matching node kind.
    fn expect_operator(&mut self, table: &OperatorTable) -> Option<NodeKind> {
        table
            .iter()
            .find_map(|(tt, kind)| self.expect(*tt).map(|_| *kind))
    }

    #[inline]
    fn at_start_of(&mut self, set: &ExpectedSet) -> bool {
        let tt = self.current_token().token_type();
        if set.contains(&tt) {
            true
        } else {
            self.expected.union(set);
            false
        }
    }

    fn unexpected<T>(&self) -> ParseResult<'src, 'tokens, T> {
        let actual = self.current_token();
        let expected = self.expected.clone();
        Result::Err(Error::Unexpected { actual, expected })
    }

    fn require(&mut self, tt: TokenType) -> ParseResult<'src, 'tokens, &'tokens Token<'src>> {
        match self.expect(tt) {
            Option::Some(token) => Result::Ok(token),
            Option::None => self.unexpected(),
        }
    }

    fn expect_ident(&mut self) -> Option<NodeId> {
        self.expect(TokenType::Ident)
            .and_then(|token| match token.data {
                TokenData::Ident(ident) => Option::Some(self.tree.mk_ident(ident, token.line)),
                _ => Option::None,
            })
    }

    fn require_ident(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        match self.expect_ident() {
            Option::Some(ident) => Result::Ok(ident),
            Option::None => self.unexpected(),
        }
    }

    /// ```ignore
    /// E ::=
    ///   'let' D 'in' E
    ///   'fn' Vb+ '.' E
    ///   Ew
    /// ```
    fn parse_expr(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        if self.expect(TokenType::Let).is_some() {
            let definition = self.parse_definition()?;
            let _ = self.require(TokenType::In)?;
            let body = self.parse_expr()?;
            return Result::Ok(self.tree.mk_node(NodeKind::Let, &[definition, body]));
        }
        if self.expect(TokenType::Fn).is_some() {
            let mut children = vec![self.parse_bound_var()?];
            while self.at_start_of(&VB_START_SET) {
                children.push(self.parse_bound_var()?);
            }
            let _ = self.require(TokenType::Dot)?;
            children.push(self.parse_expr()?);
            return Result::Ok(self.tree.mk_node(NodeKind::Lambda, &children));
        }
        self.parse_where()
    }

    /// ```ignore
    /// Ew ::=
    ///   T 'where' Dr
    ///   T
    /// ```
    fn parse_where(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let body = self.parse_tuple()?;
        match self.expect(TokenType::Where) {
            Option::Some(_) => {
                let definition = self.parse_rec_definition()?;
                Result::Ok(self.tree.mk_node(NodeKind::Where, &[body, definition]))
            }
            Option::None => Result::Ok(body),
        }
    }

    /// ```ignore
    /// T ::=
    ///   Ta (',' Ta)+
    ///   Ta
    /// ```
    fn parse_tuple(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let first = self.parse_aug()?;
        let mut elements = vec![first];
        while self.expect(TokenType::Comma).is_some() {
            elements.push(self.parse_aug()?);
        }
        if elements.len() == 1 {
            Result::Ok(first)
        } else {
            Result::Ok(self.tree.mk_node(NodeKind::Tau, &elements))
        }
    }

    /// ```ignore
    /// Ta ::=
    ///   Ta 'aug' Tc
    ///   Tc
    /// ```
    fn parse_aug(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = self.parse_conditional()?;
        while self.expect(TokenType::Aug).is_some() {
            let right = self.parse_conditional()?;
            result = self.tree.mk_node(NodeKind::Aug, &[result, right]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// Tc ::=
    ///   B '->' Tc '|' Tc
    ///   B
    /// ```
    fn parse_conditional(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let condition = self.parse_or()?;
        match self.expect(TokenType::Arrow) {
            Option::Some(_) => {
                let then_branch = self.parse_conditional()?;
                let _ = self.require(TokenType::Bar)?;
                let else_branch = self.parse_conditional()?;
                Result::Ok(self.tree.mk_node(
                    NodeKind::Conditional,
                    &[condition, then_branch, else_branch],
                ))
            }
            Option::None => Result::Ok(condition),
        }
    }

    /// ```ignore
    /// B ::=
    ///   B 'or' Bt
    ///   Bt
    /// ```
    fn parse_or(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = self.parse_and()?;
        while self.expect(TokenType::Or).is_some() {
            let right = self.parse_and()?;
            result = self.tree.mk_node(NodeKind::Or, &[result, right]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// Bt ::=
    ///   Bt '&' Bs
    ///   Bs
    /// ```
    fn parse_and(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = self.parse_not()?;
        while self.expect(TokenType::Amp).is_some() {
            let right = self.parse_not()?;
            result = self.tree.mk_node(NodeKind::And, &[result, right]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// Bs ::=
    ///   'not' Bp
    ///   Bp
    /// ```
    fn parse_not(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        match self.expect(TokenType::Not) {
            Option::Some(_) => {
                let operand = self.parse_comparison()?;
                Result::Ok(self.tree.mk_node(NodeKind::Not, &[operand]))
            }
            Option::None => self.parse_comparison(),
        }
    }

    /// ```ignore
    /// Bp ::=
    ///   A ('gr' | '>' | 'ge' | '>=' | 'ls' | '<' | 'le' | '<=' | 'eq' | 'ne') A
    ///   A
    /// ```
    fn parse_comparison(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let left = self.parse_additive()?;
        match self.expect_operator(COMPARISONS) {
            Option::Some(kind) => {
                let right = self.parse_additive()?;
                Result::Ok(self.tree.mk_node(kind, &[left, right]))
            }
            Option::None => Result::Ok(left),
        }
    }

    /// ```ignore
    /// A ::=
    ///   A '+' At
    ///   A '-' At
    ///   '+' At
    ///   '-' At
    ///   At
    /// ```
    fn parse_additive(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = if self.expect(TokenType::Plus).is_some() {
            self.parse_multiplicative()?
        } else if self.expect(TokenType::Minus).is_some() {
            let operand = self.parse_multiplicative()?;
            self.tree.mk_node(NodeKind::Neg, &[operand])
        } else {
            self.parse_multiplicative()?
        };
        while let Option::Some(kind) = self.expect_operator(ADDITIVE) {
            let right = self.parse_multiplicative()?;
            result = self.tree.mk_node(kind, &[result, right]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// At ::=
    ///   At '*' Af
    ///   At '/' Af
    ///   Af
    /// ```
    fn parse_multiplicative(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = self.parse_power()?;
        while let Option::Some(kind) = self.expect_operator(MULTIPLICATIVE) {
            let right = self.parse_power()?;
            result = self.tree.mk_node(kind, &[result, right]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// Af ::=
    ///   Ap '**' Af
    ///   Ap
    /// ```
    fn parse_power(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let base = self.parse_infix()?;
        match self.expect(TokenType::Power) {
            Option::Some(_) => {
                let exponent = self.parse_power()?;
                Result::Ok(self.tree.mk_node(NodeKind::Exp, &[base, exponent]))
            }
            Option::None => Result::Ok(base),
        }
    }

    /// ```ignore
    /// Ap ::=
    ///   Ap '@' ident R
    ///   R
    /// ```
    fn parse_infix(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = self.parse_app()?;
        while self.expect(TokenType::At).is_some() {
            let name = self.require_ident()?;
            let right = self.parse_app()?;
            result = self.tree.mk_node(NodeKind::At, &[result, name, right]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// R ::=
    ///   R Rn
    ///   Rn
    /// ```
    fn parse_app(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let mut result = self.parse_atom()?;
        while self.at_start_of(&RN_START_SET) {
            let operand = self.parse_atom()?;
            result = self.tree.mk_node(NodeKind::Gamma, &[result, operand]);
        }
        Result::Ok(result)
    }

    /// ```ignore
    /// Rn ::=
    ///   ident | integer | string
    ///   'true' | 'false' | 'nil' | 'dummy'
    ///   '(' E ')'
    /// ```
    fn parse_atom(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let token = self.current_token();
        let leaf = match token.data {
            TokenData::Ident(text) => Option::Some((NodeKind::Identifier, Option::Some(text))),
            TokenData::Integer(text) => Option::Some((NodeKind::Integer, Option::Some(text))),
            TokenData::String(text) => Option::Some((NodeKind::String, Option::Some(text))),
            TokenData::Symbol(TokenType::True) => Option::Some((NodeKind::True, Option::None)),
            TokenData::Symbol(TokenType::False) => Option::Some((NodeKind::False, Option::None)),
            TokenData::Symbol(TokenType::Nil) => Option::Some((NodeKind::Nil, Option::None)),
            TokenData::Symbol(TokenType::Dummy) => Option::Some((NodeKind::Dummy, Option::None)),
            TokenData::Symbol(_) => Option::None,
        };
        match leaf {
            Option::Some((kind, text)) => {
                let _ = self.consume();
                self.expected.clear();
                Result::Ok(self.tree.alloc(kind, text.map(String::from), token.line))
            }
            Option::None => {
                if self.expect(TokenType::LParen).is_some() {
                    let inner = self.parse_expr()?;
                    let _ = self.require(TokenType::RParen)?;
                    Result::Ok(inner)
                } else {
                    self.expected.union(&RN_START_SET);
                    self.unexpected()
                }
            }
        }
    }

    /// ```ignore
    /// D ::=
    ///   Da 'within' D
    ///   Da
    /// ```
    fn parse_definition(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let first = self.parse_simultaneous()?;
        match self.expect(TokenType::Within) {
            Option::Some(_) => {
                let second = self.parse_definition()?;
                Result::Ok(self.tree.mk_node(NodeKind::Within, &[first, second]))
            }
            Option::None => Result::Ok(first),
        }
    }

    /// ```ignore
    /// Da ::=
    ///   Dr ('and' Dr)+
    ///   Dr
    /// ```
    fn parse_simultaneous(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let first = self.parse_rec_definition()?;
        let mut definitions = vec![first];
        while self.expect(TokenType::And).is_some() {
            definitions.push(self.parse_rec_definition()?);
        }
        if definitions.len() == 1 {
            Result::Ok(first)
        } else {
            Result::Ok(self.tree.mk_node(NodeKind::SimultDef, &definitions))
        }
    }

    /// ```ignore
    /// Dr ::=
    ///   'rec' Db
    ///   Db
    /// ```
    fn parse_rec_definition(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        match self.expect(TokenType::Rec) {
            Option::Some(_) => {
                let definition = self.parse_basic_definition()?;
                Result::Ok(self.tree.mk_node(NodeKind::Rec, &[definition]))
            }
            Option::None => self.parse_basic_definition(),
        }
    }

    /// ```ignore
    /// Db ::=
    ///   Vl '=' E
    ///   ident Vb+ '=' E
    ///   '(' D ')'
    /// ```
    fn parse_basic_definition(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        if self.expect(TokenType::LParen).is_some() {
            let inner = self.parse_definition()?;
            let _ = self.require(TokenType::RParen)?;
            return Result::Ok(inner);
        }

        let name = self.require_ident()?;
        if self.at_start_of(&VB_START_SET) {
            let mut children = vec![name];
            while self.at_start_of(&VB_START_SET) {
                children.push(self.parse_bound_var()?);
            }
            let _ = self.require(TokenType::Equals)?;
            children.push(self.parse_expr()?);
            return Result::Ok(self.tree.mk_node(NodeKind::FcnForm, &children));
        }

        let names = self.parse_var_list_rest(name)?;
        let _ = self.require(TokenType::Equals)?;
        let value = self.parse_expr()?;
        Result::Ok(self.tree.mk_node(NodeKind::Equal, &[names, value]))
    }

    /// ```ignore
    /// Vb ::=
    ///   ident
    ///   '(' Vl ')'
    ///   '(' ')'
    /// ```
    fn parse_bound_var(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        if let Option::Some(ident) = self.expect_ident() {
            return Result::Ok(ident);
        }
        let lparen = self.require(TokenType::LParen)?;
        if self.expect(TokenType::RParen).is_some() {
            return Result::Ok(self.tree.alloc(NodeKind::Paren, Option::None, lparen.line));
        }
        let first = self.require_ident()?;
        let names = self.parse_var_list_rest(first)?;
        let _ = self.require(TokenType::RParen)?;
        Result::Ok(names)
    }

    /// ```ignore
    /// Vl ::=
    ///   ident (',' ident)*
    /// ```
    ///
    /// The first identifier has already been consumed.
    fn parse_var_list_rest(&mut self, first: NodeId) -> ParseResult<'src, 'tokens, NodeId> {
        let mut names = vec![first];
        while self.expect(TokenType::Comma).is_some() {
            names.push(self.require_ident()?);
        }
        if names.len() == 1 {
            Result::Ok(first)
        } else {
            Result::Ok(self.tree.mk_node(NodeKind::Comma, &names))
        }
    }

    pub fn parse_expr_eof(&mut self) -> ParseResult<'src, 'tokens, NodeId> {
        let expr = self.parse_expr()?;
        let _ = self.require(TokenType::Eof)?;
        Result::Ok(expr)
    }
}

/// Parse a whole program into a fresh, unstandardized tree.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse<'src, 'tokens>(tokens: &'tokens [Token<'src>]) -> ParseResult<'src, 'tokens, Tree> {
    let mut tree = Tree::new();
    let root = Parser::new(&mut tree, tokens).parse_expr_eof()?;
    tree.set_root(root);
    tracing::debug!(nodes = tree.len(), "parsed");
    Result::Ok(tree)
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn test_parser(input: &str, expected: &str) {
    let lexer_res = Lexer::from_str(input, Offset(0)).tokenize();
    match lexer_res {
        Result::Ok(ref tokens) => {
            let tree = parse(tokens).unwrap();
            let root = tree.root().unwrap();
            assert_eq!(tree.sexp(root), expected)
        }
        Result::Err(err) => panic!("{:?}", err),
    }
}

#[cfg(test)]
fn test_parser_fail(input: &str, actual: TokenType, expected: &[TokenType]) {
    let lexer_res = Lexer::from_str(input, Offset(0)).tokenize();
    match lexer_res {
        Result::Ok(ref tokens) => match parse(tokens) {
            Result::Err(Error::Unexpected {
                actual: token,
                expected: expected_set,
            }) => {
                assert_eq!(token.token_type(), actual);
                for tt in expected {
                    assert!(expected_set.contains(tt), "{} not in {}", tt, expected_set);
                }
            }
            Result::Ok(tree) => panic!("parsed {}", tree.sexp(tree.root().unwrap())),
        },
        Result::Err(err) => panic!("{:?}", err),
    }
}

#[test]
fn test_parser_ident() {
    test_parser("hello", "<ID:hello>")
}

#[test]
fn test_parser_let() {
    test_parser(
        "let x = 5 in Print x",
        "let(=(<ID:x>, <INT:5>), gamma(<ID:Print>, <ID:x>))",
    )
}

#[test]
fn test_parser_lambda() {
    test_parser(
        "fn x (y, z) () . x",
        "lambda(<ID:x>, ,(<ID:y>, <ID:z>), <()>, <ID:x>)",
    )
}

#[test]
fn test_parser_app_left_assoc() {
    test_parser(
        "f x 'y' true",
        "gamma(gamma(gamma(<ID:f>, <ID:x>), <STR:'y'>), <true>)",
    )
}

#[test]
fn test_parser_arithmetic_precedence() {
    test_parser(
        "-a + b * c ** d ** e - f / g",
        "-(+(neg(<ID:a>), *(<ID:b>, **(<ID:c>, **(<ID:d>, <ID:e>)))), /(<ID:f>, <ID:g>))",
    )
}

#[test]
fn test_parser_boolean_precedence() {
    test_parser(
        "not a > 1 & b eq c or d",
        "or(&(not(gr(<ID:a>, <INT:1>)), eq(<ID:b>, <ID:c>)), <ID:d>)",
    )
}

#[test]
fn test_parser_conditional_and_tuple() {
    test_parser(
        "n ls 0 -> nil | (1, 2) aug 3",
        "aug(->(ls(<ID:n>, <INT:0>), <nil>, tau(<INT:1>, <INT:2>)), <INT:3>)",
    )
}

#[test]
fn test_parser_aug_inside_branch() {
    test_parser(
        "n ls 0 -> nil | ((1, 2) aug 3)",
        "->(ls(<ID:n>, <INT:0>), <nil>, aug(tau(<INT:1>, <INT:2>), <INT:3>))",
    )
}

#[test]
fn test_parser_infix_at() {
    test_parser(
        "1 @add 2 @add 3",
        "@(@(<INT:1>, <ID:add>, <INT:2>), <ID:add>, <INT:3>)",
    )
}

#[test]
fn test_parser_where_rec() {
    test_parser(
        "f 3 where rec f n = n eq 0 -> 1 | n * f (n - 1)",
        "where(gamma(<ID:f>, <INT:3>), rec(function_form(<ID:f>, <ID:n>, \
         ->(eq(<ID:n>, <INT:0>), <INT:1>, *(<ID:n>, gamma(<ID:f>, -(<ID:n>, <INT:1>)))))))",
    )
}

#[test]
fn test_parser_definitions() {
    test_parser(
        "let a, b = 1, 2 and c = 3 within d = (a) in d",
        "let(within(and(=(,(<ID:a>, <ID:b>), tau(<INT:1>, <INT:2>)), =(<ID:c>, <INT:3>)), \
         =(<ID:d>, <ID:a>)), <ID:d>)",
    )
}

#[test]
fn test_parser_parenthesised_definition() {
    test_parser(
        "let (x = 1) in x",
        "let(=(<ID:x>, <INT:1>), <ID:x>)",
    )
}

#[test]
fn test_parser_fail_missing_in() {
    test_parser_fail(
        "let x = 1 ;",
        TokenType::Semicolon,
        &[TokenType::In, TokenType::Ident, TokenType::Plus, TokenType::Arrow],
    )
}

#[test]
fn test_parser_fail_missing_bar() {
    test_parser_fail(
        "a -> b",
        TokenType::Eof,
        &[TokenType::Bar, TokenType::LParen, TokenType::At, TokenType::Or],
    )
}

#[test]
fn test_parser_fail_empty_lambda() {
    test_parser_fail("fn . x", TokenType::Dot, &[TokenType::Ident, TokenType::LParen])
}

#[test]
fn test_parser_error_message() {
    let tokens = Lexer::from_str("fn . x", Offset(0)).tokenize().unwrap();
    let err = parse(&tokens).unwrap_err().reportable();
    assert_eq!(err.highlight, Highlight::Span(tokens[1].span));
    assert!(err.message.starts_with("Unexpected"));
}
