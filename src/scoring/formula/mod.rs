//! Sandboxed evaluator for organiser-supplied scoring formulas.
//!
//! A formula is a single arithmetic expression over a fixed set of variables
//! and whitelisted math functions. It is tokenized, parsed into an AST with
//! every identifier resolved up front, and evaluated without any access to
//! the host environment.
//!
//! ```text
//! isUpset ? currentPoints + rankingDifference / 10 : max(basePoints, currentPoints)
//! ```

mod eval;
mod lexer;
mod parser;

use thiserror::Error;

/// Longest formula text accepted, in bytes.
pub const MAX_LENGTH: usize = 1024;
/// Maximum number of AST nodes in one formula.
pub const MAX_NODES: usize = 256;
/// Maximum nesting depth of parentheses, calls and unary operators.
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("formula is too long ({len} bytes, limit {limit})")]
    TooLong { len: usize, limit: usize },
    #[error("formula is too complex (more than {0} terms)")]
    TooComplex(usize),
    #[error("formula nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        pos: usize,
        expected: &'static str,
    },
    #[error("unexpected end of formula, expected {0}")]
    UnexpectedEnd(&'static str),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("{name}() takes {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("formula did not produce a finite number (got {0})")]
    NotFinite(f64),
}

/// Names a formula may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    BasePoints,
    WinnerRanking,
    LoserRanking,
    RankingDifference,
    IsUpset,
    CurrentPoints,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::BasePoints,
        Variable::WinnerRanking,
        Variable::LoserRanking,
        Variable::RankingDifference,
        Variable::IsUpset,
        Variable::CurrentPoints,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variable::BasePoints => "basePoints",
            Variable::WinnerRanking => "winnerRanking",
            Variable::LoserRanking => "loserRanking",
            Variable::RankingDifference => "rankingDifference",
            Variable::IsUpset => "isUpset",
            Variable::CurrentPoints => "currentPoints",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

/// Whitelisted math functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Min,
    Max,
    Round,
    Pow,
    Abs,
    Floor,
    Ceil,
    Trunc,
    Sign,
    Sqrt,
    Cbrt,
    Exp,
    Log,
    Log2,
    Log10,
    Sin,
    Cos,
    Tan,
    Hypot,
}

impl Function {
    const ALL: [Function; 19] = [
        Function::Min,
        Function::Max,
        Function::Round,
        Function::Pow,
        Function::Abs,
        Function::Floor,
        Function::Ceil,
        Function::Trunc,
        Function::Sign,
        Function::Sqrt,
        Function::Cbrt,
        Function::Exp,
        Function::Log,
        Function::Log2,
        Function::Log10,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Hypot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Min => "min",
            Function::Max => "max",
            Function::Round => "round",
            Function::Pow => "pow",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Trunc => "trunc",
            Function::Sign => "sign",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log2 => "log2",
            Function::Log10 => "log10",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Hypot => "hypot",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    fn check_arity(&self, got: usize) -> Result<(), FormulaError> {
        let (ok, expected) = match self {
            Function::Min | Function::Max => (got >= 1, "at least 1"),
            Function::Hypot => (true, "any number of"),
            Function::Pow => (got == 2, "2"),
            _ => (got == 1, "1"),
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::Arity {
                name: self.name(),
                expected,
                got,
            })
        }
    }
}

/// Values bound to the formula variables for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaVariables {
    pub base_points: f64,
    pub winner_ranking: f64,
    pub loser_ranking: f64,
    pub ranking_difference: f64,
    pub is_upset: bool,
    pub current_points: f64,
}

impl FormulaVariables {
    fn get(&self, var: Variable) -> f64 {
        match var {
            Variable::BasePoints => self.base_points,
            Variable::WinnerRanking => self.winner_ranking,
            Variable::LoserRanking => self.loser_ranking,
            Variable::RankingDifference => self.ranking_difference,
            Variable::IsUpset => {
                if self.is_upset {
                    1.0
                } else {
                    0.0
                }
            }
            Variable::CurrentPoints => self.current_points,
        }
    }
}

/// A parsed formula, ready to evaluate any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: parser::Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(FormulaError::Empty);
        }
        if trimmed.len() > MAX_LENGTH {
            return Err(FormulaError::TooLong {
                len: trimmed.len(),
                limit: MAX_LENGTH,
            });
        }

        let tokens = lexer::tokenize(trimmed)?;
        let expr = parser::Parser::new(&tokens).parse()?;
        Ok(Self {
            source: trimmed.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate and floor the result at zero. Non-finite results are errors.
    pub fn eval(&self, vars: &FormulaVariables) -> Result<f64, FormulaError> {
        let value = self.expr.eval(vars);
        if !value.is_finite() {
            return Err(FormulaError::NotFinite(value));
        }
        Ok(value.max(0.0))
    }
}

/// Parse and evaluate in one step.
pub fn evaluate(source: &str, vars: &FormulaVariables) -> Result<f64, FormulaError> {
    Formula::parse(source)?.eval(vars)
}
