use errors::Highlight;
use span::{Offset, SourceFile, Span};
use std::fmt::Display;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Ident,
    Integer,
    String,

    Let,
    In,
    Fn,
    Where,
    Aug,
    Or,
    Not,
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
    True,
    False,
    Nil,
    Dummy,
    Within,
    And,
    Rec,

    Plus,
    Minus,
    Star,
    Slash,
    Power,
    Arrow,
    Bar,
    Amp,
    At,
    Dot,
    Equals,
    Greater,
    GreaterEq,
    Less,
    LessEq,

    LParen,
    RParen,
    Semicolon,
    Comma,
    Eof,
}

impl TokenType {
    const ALL: [TokenType; 43] = [
        TokenType::Ident,
        TokenType::Integer,
        TokenType::String,
        TokenType::Let,
        TokenType::In,
        TokenType::Fn,
        TokenType::Where,
        TokenType::Aug,
        TokenType::Or,
        TokenType::Not,
        TokenType::Gr,
        TokenType::Ge,
        TokenType::Ls,
        TokenType::Le,
        TokenType::Eq,
        TokenType::Ne,
        TokenType::True,
        TokenType::False,
        TokenType::Nil,
        TokenType::Dummy,
        TokenType::Within,
        TokenType::And,
        TokenType::Rec,
        TokenType::Plus,
        TokenType::Minus,
        TokenType::Star,
        TokenType::Slash,
        TokenType::Power,
        TokenType::Arrow,
        TokenType::Bar,
        TokenType::Amp,
        TokenType::At,
        TokenType::Dot,
        TokenType::Equals,
        TokenType::Greater,
        TokenType::GreaterEq,
        TokenType::Less,
        TokenType::LessEq,
        TokenType::LParen,
        TokenType::RParen,
        TokenType::Semicolon,
        TokenType::Comma,
        TokenType::Eof,
    ];

    pub fn to_usize(&self) -> usize {
        *self as usize
    }

    pub fn unsafe_from_usize(i: usize) -> Self {
        match TokenType::ALL.get(i) {
            Option::Some(tt) => *tt,
            Option::None => panic!("unsafe_from_usize failed"),
        }
    }

    fn keyword(word: &str) -> Option<TokenType> {
        let tt = match word {
            "let" => TokenType::Let,
            "in" => TokenType::In,
            "fn" => TokenType::Fn,
            "where" => TokenType::Where,
            "aug" => TokenType::Aug,
            "or" => TokenType::Or,
            "not" => TokenType::Not,
            "gr" => TokenType::Gr,
            "ge" => TokenType::Ge,
            "ls" => TokenType::Ls,
            "le" => TokenType::Le,
            "eq" => TokenType::Eq,
            "ne" => TokenType::Ne,
            "true" => TokenType::True,
            "false" => TokenType::False,
            "nil" => TokenType::Nil,
            "dummy" => TokenType::Dummy,
            "within" => TokenType::Within,
            "and" => TokenType::And,
            "rec" => TokenType::Rec,
            _ => return Option::None,
        };
        Option::Some(tt)
    }

    fn operator(symbol: &str) -> Option<TokenType> {
        let tt = match symbol {
            "+" => TokenType::Plus,
            "-" => TokenType::Minus,
            "*" => TokenType::Star,
            "/" => TokenType::Slash,
            "**" => TokenType::Power,
            "->" => TokenType::Arrow,
            "|" => TokenType::Bar,
            "&" => TokenType::Amp,
            "@" => TokenType::At,
            "." => TokenType::Dot,
            "=" => TokenType::Equals,
            ">" => TokenType::Greater,
            ">=" => TokenType::GreaterEq,
            "<" => TokenType::Less,
            "<=" => TokenType::LessEq,
            _ => return Option::None,
        };
        Option::Some(tt)
    }
}

impl Display for TokenType {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        let text = match self {
            TokenType::Ident => "identifier",
            TokenType::Integer => "integer",
            TokenType::String => "string",
            TokenType::Let => "'let'",
            TokenType::In => "'in'",
            TokenType::Fn => "'fn'",
            TokenType::Where => "'where'",
            TokenType::Aug => "'aug'",
            TokenType::Or => "'or'",
            TokenType::Not => "'not'",
            TokenType::Gr => "'gr'",
            TokenType::Ge => "'ge'",
            TokenType::Ls => "'ls'",
            TokenType::Le => "'le'",
            TokenType::Eq => "'eq'",
            TokenType::Ne => "'ne'",
            TokenType::True => "'true'",
            TokenType::False => "'false'",
            TokenType::Nil => "'nil'",
            TokenType::Dummy => "'dummy'",
            TokenType::Within => "'within'",
            TokenType::And => "'and'",
            TokenType::Rec => "'rec'",
            TokenType::Plus => "'+'",
            TokenType::Minus => "'-'",
            TokenType::Star => "'*'",
            TokenType::Slash => "'/'",
            TokenType::Power => "'**'",
            TokenType::Arrow => "'->'",
            TokenType::Bar => "'|'",
            TokenType::Amp => "'&'",
            TokenType::At => "'@'",
            TokenType::Dot => "'.'",
            TokenType::Equals => "'='",
            TokenType::Greater => "'>'",
            TokenType::GreaterEq => "'>='",
            TokenType::Less => "'<'",
            TokenType::LessEq => "'<='",
            TokenType::LParen => "'('",
            TokenType::RParen => "')'",
            TokenType::Semicolon => "';'",
            TokenType::Comma => "','",
            TokenType::Eof => "end of input",
        };
        formatter.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenData<'src> {
    Ident(&'src str),
    Integer(&'src str),
    /// The text between the quotes, escape sequences left as written
    String(&'src str),
    Symbol(TokenType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub data: TokenData<'src>,
    pub span: Span,
    pub line: u32,
}

impl<'src> Token<'src> {
    pub fn token_type(&self) -> TokenType {
        match self.data {
            TokenData::Ident(_) => TokenType::Ident,
            TokenData::Integer(_) => TokenType::Integer,
            TokenData::String(_) => TokenType::String,
            TokenData::Symbol(tt) => tt,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Unexpected(char, Offset),
    UnterminatedString(Span),
    UnknownOperator(String, Span),
}

impl Error {
    pub fn reportable(&self) -> errors::Error {
        match self {
            Error::Unexpected(c, offset) => errors::Error {
                highlight: Highlight::Point(*offset),
                message: format!("Unexpected character {:?}", c),
            },
            Error::UnterminatedString(span) => errors::Error {
                highlight: Highlight::Span(*span),
                message: String::from("Unterminated string"),
            },
            Error::UnknownOperator(symbol, span) => errors::Error {
                highlight: Highlight::Span(*span),
                message: format!("Unknown operator \"{}\"", symbol),
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum NextToken<'src> {
    Done,
    Skip,
    Token(Token<'src>),
    Error(Error),
}

fn is_ident_start(c: &char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_body(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_'
}

fn is_operator_symbol(c: &char) -> bool {
    "+-*<>&.@/:=~|$!#%^_[]{}\"?".contains(*c)
}

pub struct Lexer<'src> {
    input: &'src str,
    base: Offset,
    position: Peekable<CharIndices<'src>>,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn from_source_file(src_file: &'src SourceFile) -> Self {
        Lexer::from_str(&src_file.content, src_file.start)
    }

    pub fn from_str(input: &'src str, base: Offset) -> Self {
        Lexer {
            input,
            base,
            position: input.char_indices().peekable(),
            line: 1,
        }
    }

    #[inline]
    fn offset(&self, ix: usize) -> Offset {
        self.base.add(ix as u32)
    }

    #[inline]
    fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.offset(start),
            length: Offset((end - start) as u32),
        }
    }

    fn end_of(&mut self) -> usize {
        match self.position.peek() {
            Option::Some((ix, _)) => *ix,
            Option::None => self.input.len(),
        }
    }

    fn consume_while<F: Fn(&char) -> bool>(&mut self, pred: F) -> usize {
        while let Option::Some((_, c)) = self.position.peek() {
            if pred(c) {
                self.position.next();
            } else {
                break;
            }
        }
        self.end_of()
    }

    fn mk_token(&self, data: TokenData<'src>, start: usize, end: usize) -> Token<'src> {
        Token {
            data,
            span: self.span(start, end),
            line: self.line,
        }
    }

    fn consume_string(&mut self, start: usize) -> NextToken<'src> {
        let line = self.line;
        loop {
            match self.position.next() {
                Option::None => {
                    let end = self.input.len();
                    return NextToken::Error(Error::UnterminatedString(self.span(start, end)));
                }
                Option::Some((ix, '\'')) => {
                    return NextToken::Token(Token {
                        data: TokenData::String(&self.input[start + 1..ix]),
                        span: self.span(start, ix + 1),
                        line,
                    });
                }
                Option::Some((_, '\\')) => {
                    if let Option::Some((_, '\n')) = self.position.next() {
                        self.line += 1;
                    }
                }
                Option::Some((_, '\n')) => {
                    self.line += 1;
                }
                Option::Some(_) => {}
            }
        }
    }

    fn consume_operator(&mut self, start: usize) -> NextToken<'src> {
        if self.input[start..].starts_with("//") {
            let _ = self.consume_while(|c| *c != '\n');
            return NextToken::Skip;
        }
        let end = self.consume_while(is_operator_symbol);
        let symbol = &self.input[start..end];
        match TokenType::operator(symbol) {
            Option::Some(tt) => NextToken::Token(self.mk_token(TokenData::Symbol(tt), start, end)),
            Option::None => NextToken::Error(Error::UnknownOperator(
                String::from(symbol),
                self.span(start, end),
            )),
        }
    }

    fn next_token(&mut self) -> NextToken<'src> {
        match self.position.next() {
            Option::None => NextToken::Done,
            Option::Some((ix, c)) => match c {
                '\n' => {
                    self.line += 1;
                    NextToken::Skip
                }
                _ if c.is_whitespace() => NextToken::Skip,
                '(' => NextToken::Token(self.mk_token(
                    TokenData::Symbol(TokenType::LParen),
                    ix,
                    ix + 1,
                )),
                ')' => NextToken::Token(self.mk_token(
                    TokenData::Symbol(TokenType::RParen),
                    ix,
                    ix + 1,
                )),
                ';' => NextToken::Token(self.mk_token(
                    TokenData::Symbol(TokenType::Semicolon),
                    ix,
                    ix + 1,
                )),
                ',' => NextToken::Token(self.mk_token(
                    TokenData::Symbol(TokenType::Comma),
                    ix,
                    ix + 1,
                )),
                '\'' => self.consume_string(ix),
                _ if is_ident_start(&c) => {
                    let end = self.consume_while(is_ident_body);
                    let word = &self.input[ix..end];
                    let data = match TokenType::keyword(word) {
                        Option::Some(tt) => TokenData::Symbol(tt),
                        Option::None => TokenData::Ident(word),
                    };
                    NextToken::Token(self.mk_token(data, ix, end))
                }
                _ if c.is_ascii_digit() => {
                    let end = self.consume_while(|c| c.is_ascii_digit());
                    NextToken::Token(self.mk_token(
                        TokenData::Integer(&self.input[ix..end]),
                        ix,
                        end,
                    ))
                }
                _ if is_operator_symbol(&c) => self.consume_operator(ix),
                _ => NextToken::Error(Error::Unexpected(c, self.offset(ix))),
            },
        }
    }

    /// The result is always terminated by a `TokenType::Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token<'src>>, Error> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token() {
                NextToken::Done => {
                    let end = self.input.len();
                    tokens.push(self.mk_token(TokenData::Symbol(TokenType::Eof), end, end));
                    break;
                }
                NextToken::Skip => {}
                NextToken::Token(token) => {
                    tokens.push(token);
                }
                NextToken::Error(err) => {
                    return Result::Err(err);
                }
            }
        }
        Result::Ok(tokens)
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn token_types(input: &str) -> Vec<TokenType> {
    Lexer::from_str(input, Offset(0))
        .tokenize()
        .unwrap()
        .iter()
        .map(|token| token.token_type())
        .collect()
}

#[test]
fn test_token_type_roundtrip() {
    for tt in TokenType::ALL.iter() {
        assert_eq!(TokenType::unsafe_from_usize(tt.to_usize()), *tt);
    }
}

#[test]
fn test_lexer_example1() {
    assert_eq!(
        Lexer::from_str("->", Offset(0)).next_token(),
        NextToken::Token(Token {
            data: TokenData::Symbol(TokenType::Arrow),
            span: Span {
                start: Offset(0),
                length: Offset(2)
            },
            line: 1
        })
    );
}

#[test]
fn test_lexer_example2() {
    assert_eq!(
        Lexer::from_str("hello_1", Offset(0)).next_token(),
        NextToken::Token(Token {
            data: TokenData::Ident("hello_1"),
            span: Span {
                start: Offset(0),
                length: Offset(7)
            },
            line: 1
        })
    );
}

#[test]
fn test_lexer_example3() {
    assert_eq!(
        token_types("let f x = x ** 2 in f 3"),
        vec![
            TokenType::Let,
            TokenType::Ident,
            TokenType::Ident,
            TokenType::Equals,
            TokenType::Ident,
            TokenType::Power,
            TokenType::Integer,
            TokenType::In,
            TokenType::Ident,
            TokenType::Integer,
            TokenType::Eof
        ]
    );
}

#[test]
fn test_lexer_comment_and_lines() {
    let tokens = Lexer::from_str("// a comment\nx // another\n  'a\\nb'", Offset(0))
        .tokenize()
        .unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].data, TokenData::Ident("x"));
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[1].data, TokenData::String("a\\nb"));
    assert_eq!(tokens[1].line, 3);
}

#[test]
fn test_lexer_punctuation() {
    assert_eq!(
        token_types("(a, b); c >= 1 & d <= 2 | e"),
        vec![
            TokenType::LParen,
            TokenType::Ident,
            TokenType::Comma,
            TokenType::Ident,
            TokenType::RParen,
            TokenType::Semicolon,
            TokenType::Ident,
            TokenType::GreaterEq,
            TokenType::Integer,
            TokenType::Amp,
            TokenType::Ident,
            TokenType::LessEq,
            TokenType::Integer,
            TokenType::Bar,
            TokenType::Ident,
            TokenType::Eof
        ]
    );
}

#[test]
fn test_lexer_unterminated_string() {
    assert_eq!(
        Lexer::from_str("x 'abc", Offset(0)).tokenize(),
        Result::Err(Error::UnterminatedString(Span {
            start: Offset(2),
            length: Offset(4)
        }))
    );
}

#[test]
fn test_lexer_unknown_operator() {
    assert_eq!(
        Lexer::from_str("a +* b", Offset(0)).tokenize(),
        Result::Err(Error::UnknownOperator(
            String::from("+*"),
            Span {
                start: Offset(2),
                length: Offset(2)
            }
        ))
    );
}
