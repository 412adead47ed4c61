//! Tokenizer and recursive-descent parser for formula text.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := atom (('^' | '**') unary)?
//! atom    := number | 't' | constant | call | '(' expr ')'
//! call    := ident '(' expr (',' expr)* ')'
//! ```
//!
//! `-t^2` parses as `-(t^2)` and `2^3^2` as `2^(3^2)`.  Identifiers may be
//! written with a `math.`, `np.` or `numpy.` prefix; the prefix is dropped.

use std::f64::consts::{E, PI, TAU};

use crate::FormulaParseError;
use crate::formula::{BinOp, Expr, Func1, Func2};

/// Tree depth beyond which a formula is rejected instead of risking a stack
/// overflow in the recursive evaluator.  Counts parentheses, unary and power
/// nesting, and every operator of a flat `+ - * /` chain.
const MAX_DEPTH: usize = 256;

const NAMESPACES: [&str; 3] = ["math.", "np.", "numpy."];

// ── Tokens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(v) => format!("number {v}"),
            Token::Ident(s) => format!("identifier {s:?}"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Comma => "','".into(),
            Token::End => "end of input".into(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, FormulaParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Token::Caret
            }
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let lexeme = &text[start..i];
                let value = lexeme.parse::<f64>().map_err(|_| {
                    error(text, start, format!("malformed number {lexeme:?}"))
                })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.')
                {
                    i += 1;
                }
                tokens.push((Token::Ident(text[start..i].to_owned()), start));
                continue;
            }
            _ => {
                let ch = text[start..].chars().next().unwrap_or('?');
                return Err(error(text, start, format!("unexpected character {ch:?}")));
            }
        };
        i += 1;
        tokens.push((token, start));
    }

    tokens.push((Token::End, text.len()));
    Ok(tokens)
}

/// Advance past `digits [. digits] [(e|E) [+-] digits]`.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

fn error(text: &str, position: usize, message: String) -> FormulaParseError {
    FormulaParseError { source_text: text.to_owned(), position, message }
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser<'a> {
    text:   &'a str,
    tokens: Vec<(Token, usize)>,
    pos:    usize,
    depth:  usize,
}

/// Parse `text` into an expression tree.
pub(crate) fn parse(text: &str) -> Result<Expr, FormulaParseError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { text, tokens, pos: 0, depth: 0 };
    if parser.peek() == &Token::End {
        return Err(error(text, 0, "empty formula".into()));
    }
    let expr = parser.expr()?;
    match parser.peek() {
        Token::End => Ok(expr),
        other => {
            let msg = if other == &Token::RParen {
                "unbalanced ')'".to_owned()
            } else {
                format!("unexpected {} after complete expression", other.describe())
            };
            Err(parser.fail(msg))
        }
    }
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].1
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if tok != Token::End {
            self.pos += 1;
        }
        tok
    }

    fn fail(&self, message: String) -> FormulaParseError {
        error(self.text, self.offset(), message)
    }

    fn expect(&mut self, want: Token, what: &str) -> Result<(), FormulaParseError> {
        if self.peek() == &want {
            self.bump();
            Ok(())
        } else {
            let found = self.peek().describe();
            Err(self.fail(format!("expected {what}, found {found}")))
        }
    }

    fn descend(&mut self) -> Result<(), FormulaParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.fail(format!("formula nests deeper than {MAX_DEPTH} levels")));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, FormulaParseError> {
        let mut lhs = self.term()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            // Each chained operator deepens the left spine of the tree.
            self.descend()?;
            chained += 1;
            self.bump();
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaParseError> {
        let mut lhs = self.unary()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.descend()?;
            chained += 1;
            self.bump();
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaParseError> {
        self.descend()?;
        let expr = match self.peek() {
            Token::Minus => {
                self.bump();
                Expr::Neg(Box::new(self.unary()?))
            }
            Token::Plus => {
                self.bump();
                self.unary()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, FormulaParseError> {
        let base = self.atom()?;
        if self.peek() == &Token::Caret {
            self.bump();
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, FormulaParseError> {
        let start = self.offset();
        match self.bump() {
            Token::Number(v) => Ok(Expr::Const(v)),
            Token::LParen => {
                let inner = self.expr()?;
                if self.peek() != &Token::RParen {
                    let found = self.peek().describe();
                    return Err(self.fail(format!("unbalanced '(': expected ')', found {found}")));
                }
                self.bump();
                Ok(inner)
            }
            Token::Ident(raw) => self.ident(&raw, start),
            other => Err(error(
                self.text,
                start,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    fn ident(&mut self, raw: &str, start: usize) -> Result<Expr, FormulaParseError> {
        let name = NAMESPACES
            .iter()
            .find_map(|ns| raw.strip_prefix(ns))
            .unwrap_or(raw);

        if self.peek() == &Token::LParen {
            return self.call(name, start);
        }

        match name {
            "t" => Ok(Expr::Param),
            "pi" => Ok(Expr::Const(PI)),
            "e" => Ok(Expr::Const(E)),
            "tau" => Ok(Expr::Const(TAU)),
            _ => Err(error(self.text, start, format!("unknown symbol {raw:?}"))),
        }
    }

    fn call(&mut self, name: &str, start: usize) -> Result<Expr, FormulaParseError> {
        let arity1 = Func1::lookup(name);
        let arity2 = Func2::lookup(name);
        if arity1.is_none() && arity2.is_none() {
            return Err(error(self.text, start, format!("function {name:?} is not allowed")));
        }

        self.expect(Token::LParen, "'('")?;
        let mut args = vec![self.expr()?];
        while self.peek() == &Token::Comma {
            self.bump();
            args.push(self.expr()?);
        }
        if self.peek() != &Token::RParen {
            let found = self.peek().describe();
            return Err(self.fail(format!("unbalanced '(' in call to {name}: found {found}")));
        }
        self.bump();

        match (arity1, arity2) {
            (Some(f), _) if args.len() == 1 => Ok(Expr::Call1(f, Box::new(args.remove(0)))),
            (_, Some(f)) if args.len() == 2 => {
                let b = args.remove(1);
                let a = args.remove(0);
                Ok(Expr::Call2(f, Box::new(a), Box::new(b)))
            }
            _ => {
                let want = if arity1.is_some() { 1 } else { 2 };
                Err(error(
                    self.text,
                    start,
                    format!("{name} takes {want} argument(s), got {}", args.len()),
                ))
            }
        }
    }
}
