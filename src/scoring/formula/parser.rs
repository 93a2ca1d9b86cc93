use super::lexer::{Token, TokenKind};
use super::{FormulaError, Function, Variable, MAX_DEPTH, MAX_NODES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Variable),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

/// Recursive-descent parser. Identifiers are resolved against the fixed
/// variable and function tables while parsing, so an [`Expr`] can only ever
/// reference whitelisted names.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    nodes: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            nodes: 0,
        }
    }

    /// Parse the whole token stream as one expression.
    pub fn parse(mut self) -> Result<Expr, FormulaError> {
        if self.tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let expr = self.conditional()?;
        match self.tokens.get(self.pos) {
            None => Ok(expr),
            Some(tok) => Err(unexpected(tok, "end of formula")),
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tokens = self.tokens;
        let tok = tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), FormulaError> {
        match self.advance() {
            Some(tok) if tok.kind == kind => Ok(()),
            Some(tok) => Err(unexpected(tok, expected)),
            None => Err(FormulaError::UnexpectedEnd(expected)),
        }
    }

    fn node(&mut self, expr: Expr) -> Result<Expr, FormulaError> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(FormulaError::TooComplex(MAX_NODES));
        }
        Ok(expr)
    }

    fn enter(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // cond ? a : b, right associative
    fn conditional(&mut self) -> Result<Expr, FormulaError> {
        self.enter()?;
        let cond = self.logical_or()?;
        let expr = if self.eat(&TokenKind::Question) {
            let then = self.conditional()?;
            self.expect(TokenKind::Colon, "':'")?;
            let otherwise = self.conditional()?;
            self.node(Expr::Conditional(
                Box::new(cond),
                Box::new(then),
                Box::new(otherwise),
            ))?
        } else {
            cond
        };
        self.leave();
        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.logical_and()?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.logical_and()?;
            lhs = self.node(Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs)))?;
        }
        Ok(lhs)
    }

    fn logical_and(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.equality()?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.equality()?;
            lhs = self.node(Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs)))?;
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.comparison()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Equal) => BinaryOp::Equal,
                Some(TokenKind::NotEqual) => BinaryOp::NotEqual,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.comparison()?;
            lhs = self.node(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))?;
        }
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Less) => BinaryOp::Less,
                Some(TokenKind::LessEqual) => BinaryOp::LessEqual,
                Some(TokenKind::Greater) => BinaryOp::Greater,
                Some(TokenKind::GreaterEqual) => BinaryOp::GreaterEqual,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = self.node(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))?;
        }
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = self.node(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))?;
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = self.node(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))?;
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        let op = match self.peek() {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            Some(TokenKind::Bang) => UnaryOp::Not,
            _ => return self.power(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.unary()?;
        self.leave();
        self.node(Expr::Unary(op, Box::new(operand)))
    }

    // a ** b ** c == a ** (b ** c); -a ** b parses as -(a ** b)
    fn power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.primary()?;
        if self.eat(&TokenKind::StarStar) {
            self.enter()?;
            let exponent = self.unary()?;
            self.leave();
            return self.node(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let tok = match self.advance() {
            Some(tok) => tok,
            None => return Err(FormulaError::UnexpectedEnd("a value")),
        };

        match &tok.kind {
            TokenKind::Number(n) => self.node(Expr::Number(*n)),
            TokenKind::LParen => {
                let inner = self.conditional()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                let name = if name == "Math" {
                    self.expect(TokenKind::Dot, "'.' after Math")?;
                    match self.advance() {
                        Some(Token {
                            kind: TokenKind::Ident(member),
                            ..
                        }) => member.as_str(),
                        Some(tok) => return Err(unexpected(tok, "a Math member")),
                        None => return Err(FormulaError::UnexpectedEnd("a Math member")),
                    }
                } else {
                    name.as_str()
                };
                self.identifier(name)
            }
            _ => Err(unexpected(tok, "a value")),
        }
    }

    fn identifier(&mut self, name: &str) -> Result<Expr, FormulaError> {
        if self.peek() == Some(&TokenKind::LParen) {
            let function = Function::lookup(name)
                .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;
            self.pos += 1;
            let args = self.arguments()?;
            function.check_arity(args.len())?;
            return self.node(Expr::Call(function, args));
        }

        match name {
            "true" => self.node(Expr::Number(1.0)),
            "false" => self.node(Expr::Number(0.0)),
            "PI" => self.node(Expr::Number(std::f64::consts::PI)),
            "E" => self.node(Expr::Number(std::f64::consts::E)),
            _ => {
                let var = Variable::lookup(name)
                    .ok_or_else(|| FormulaError::UnknownVariable(name.to_string()))?;
                self.node(Expr::Var(var))
            }
        }
    }

    // Called after the opening paren
    fn arguments(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        self.enter()?;
        loop {
            args.push(self.conditional()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
            break;
        }
        self.leave();
        Ok(args)
    }
}

fn unexpected(tok: &Token, expected: &'static str) -> FormulaError {
    FormulaError::UnexpectedToken {
        found: tok.kind.describe(),
        pos: tok.pos,
        expected,
    }
}
