use super::parser::{BinaryOp, Expr, UnaryOp};
use super::{FormulaVariables, Function};

fn truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Half-up rounding: 2.5 -> 3, -2.5 -> -2.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

impl Expr {
    /// Evaluate against a variable set. Never fails: non-finite intermediate
    /// values propagate and are rejected by the caller.
    pub fn eval(&self, vars: &FormulaVariables) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Var(var) => vars.get(*var),
            Expr::Unary(op, operand) => {
                let v = operand.eval(vars);
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                    UnaryOp::Not => flag(!truthy(v)),
                }
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                let l = lhs.eval(vars);
                if truthy(l) {
                    rhs.eval(vars)
                } else {
                    l
                }
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                let l = lhs.eval(vars);
                if truthy(l) {
                    l
                } else {
                    rhs.eval(vars)
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval(vars);
                let r = rhs.eval(vars);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Rem => l % r,
                    BinaryOp::Pow => l.powf(r),
                    BinaryOp::Less => flag(l < r),
                    BinaryOp::LessEqual => flag(l <= r),
                    BinaryOp::Greater => flag(l > r),
                    BinaryOp::GreaterEqual => flag(l >= r),
                    BinaryOp::Equal => flag(l == r),
                    BinaryOp::NotEqual => flag(l != r),
                    BinaryOp::And | BinaryOp::Or => unreachable!("short-circuit ops handled above"),
                }
            }
            Expr::Conditional(cond, then, otherwise) => {
                if truthy(cond.eval(vars)) {
                    then.eval(vars)
                } else {
                    otherwise.eval(vars)
                }
            }
            Expr::Call(function, args) => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(vars)).collect();
                function.apply(&values)
            }
        }
    }
}

impl Function {
    /// Arity has already been checked by the parser.
    pub(super) fn apply(&self, args: &[f64]) -> f64 {
        let arg = |i: usize| args.get(i).copied().unwrap_or(f64::NAN);
        match self {
            Function::Min => args.iter().copied().fold(f64::INFINITY, |acc, v| {
                if v.is_nan() || acc.is_nan() {
                    f64::NAN
                } else {
                    acc.min(v)
                }
            }),
            Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, |acc, v| {
                if v.is_nan() || acc.is_nan() {
                    f64::NAN
                } else {
                    acc.max(v)
                }
            }),
            Function::Round => round_half_up(arg(0)),
            Function::Pow => arg(0).powf(arg(1)),
            Function::Abs => arg(0).abs(),
            Function::Floor => arg(0).floor(),
            Function::Ceil => arg(0).ceil(),
            Function::Trunc => arg(0).trunc(),
            Function::Sign => {
                let x = arg(0);
                if x.is_nan() || x == 0.0 {
                    x
                } else {
                    x.signum()
                }
            }
            Function::Sqrt => arg(0).sqrt(),
            Function::Cbrt => arg(0).cbrt(),
            Function::Exp => arg(0).exp(),
            Function::Log => arg(0).ln(),
            Function::Log2 => arg(0).log2(),
            Function::Log10 => arg(0).log10(),
            Function::Sin => arg(0).sin(),
            Function::Cos => arg(0).cos(),
            Function::Tan => arg(0).tan(),
            Function::Hypot => args.iter().map(|v| v * v).sum::<f64>().sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
    }

    #[test]
    fn test_min_max_propagate_nan() {
        assert!(Function::Min.apply(&[1.0, f64::NAN]).is_nan());
        assert!(Function::Max.apply(&[f64::NAN, 1.0]).is_nan());
        assert_eq!(Function::Max.apply(&[3.0, 9.0, 4.0]), 9.0);
        assert_eq!(Function::Min.apply(&[3.0, 9.0, -4.0]), -4.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(Function::Sign.apply(&[-7.0]), -1.0);
        assert_eq!(Function::Sign.apply(&[0.0]), 0.0);
        assert_eq!(Function::Sign.apply(&[3.0]), 1.0);
    }
}
