//! Compiled scalar formulas.
//!
//! A [`Formula`] is an immutable AST over the single parameter `t`.  It holds
//! no interior mutability and is `Send + Sync`, so one compiled segment can be
//! evaluated from every worker thread at once.

use std::fmt;

use crate::EvaluationError;
use crate::FormulaParseError;

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// One-argument library functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Func1 {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Exp,
    Ln,
    Log10,
    Log2,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
}

/// Two-argument library functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Func2 {
    Min,
    Max,
    Pow,
    Atan2,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Const(f64),
    Param,
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call1(Func1, Box<Expr>),
    Call2(Func2, Box<Expr>, Box<Expr>),
}

impl Func1 {
    pub(crate) fn lookup(name: &str) -> Option<Func1> {
        Some(match name {
            "sin" => Func1::Sin,
            "cos" => Func1::Cos,
            "tan" => Func1::Tan,
            "asin" | "arcsin" => Func1::Asin,
            "acos" | "arccos" => Func1::Acos,
            "atan" | "arctan" => Func1::Atan,
            "sinh" => Func1::Sinh,
            "cosh" => Func1::Cosh,
            "tanh" => Func1::Tanh,
            "sqrt" => Func1::Sqrt,
            "exp" => Func1::Exp,
            "ln" | "log" => Func1::Ln,
            "log10" => Func1::Log10,
            "log2" => Func1::Log2,
            "abs" | "fabs" => Func1::Abs,
            "floor" => Func1::Floor,
            "ceil" => Func1::Ceil,
            "round" => Func1::Round,
            "sign" => Func1::Sign,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Func1::Sin => "sin",
            Func1::Cos => "cos",
            Func1::Tan => "tan",
            Func1::Asin => "asin",
            Func1::Acos => "acos",
            Func1::Atan => "atan",
            Func1::Sinh => "sinh",
            Func1::Cosh => "cosh",
            Func1::Tanh => "tanh",
            Func1::Sqrt => "sqrt",
            Func1::Exp => "exp",
            Func1::Ln => "ln",
            Func1::Log10 => "log10",
            Func1::Log2 => "log2",
            Func1::Abs => "abs",
            Func1::Floor => "floor",
            Func1::Ceil => "ceil",
            Func1::Round => "round",
            Func1::Sign => "sign",
        }
    }

    fn apply(self, x: f64, t: f64) -> Result<f64, EvaluationError> {
        let domain = |ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(EvaluationError { operation: self.name(), argument: x, t })
            }
        };
        let y = match self {
            Func1::Sin => x.sin(),
            Func1::Cos => x.cos(),
            Func1::Tan => x.tan(),
            Func1::Asin => {
                domain((-1.0..=1.0).contains(&x))?;
                x.asin()
            }
            Func1::Acos => {
                domain((-1.0..=1.0).contains(&x))?;
                x.acos()
            }
            Func1::Atan => x.atan(),
            Func1::Sinh => x.sinh(),
            Func1::Cosh => x.cosh(),
            Func1::Tanh => x.tanh(),
            Func1::Sqrt => {
                domain(x >= 0.0)?;
                x.sqrt()
            }
            Func1::Exp => x.exp(),
            Func1::Ln => {
                domain(x > 0.0)?;
                x.ln()
            }
            Func1::Log10 => {
                domain(x > 0.0)?;
                x.log10()
            }
            Func1::Log2 => {
                domain(x > 0.0)?;
                x.log2()
            }
            Func1::Abs => x.abs(),
            Func1::Floor => x.floor(),
            Func1::Ceil => x.ceil(),
            Func1::Round => x.round(),
            Func1::Sign => {
                if x == 0.0 {
                    0.0
                } else {
                    x.signum()
                }
            }
        };
        domain(y.is_finite())?;
        Ok(y)
    }
}

impl Func2 {
    pub(crate) fn lookup(name: &str) -> Option<Func2> {
        Some(match name {
            "min" | "minimum" => Func2::Min,
            "max" | "maximum" => Func2::Max,
            "pow" | "power" => Func2::Pow,
            "atan2" | "arctan2" => Func2::Atan2,
            _ => return None,
        })
    }

    fn apply(self, a: f64, b: f64, t: f64) -> Result<f64, EvaluationError> {
        match self {
            Func2::Min => Ok(a.min(b)),
            Func2::Max => Ok(a.max(b)),
            Func2::Pow => power(a, b, t),
            Func2::Atan2 => Ok(a.atan2(b)),
        }
    }
}

fn power(base: f64, exponent: f64, t: f64) -> Result<f64, EvaluationError> {
    let y = base.powf(exponent);
    if y.is_finite() {
        Ok(y)
    } else {
        Err(EvaluationError { operation: "^", argument: base, t })
    }
}

impl Expr {
    fn eval(&self, t: f64) -> Result<f64, EvaluationError> {
        match self {
            Expr::Const(v) => Ok(*v),
            Expr::Param => Ok(t),
            Expr::Neg(a) => Ok(-a.eval(t)?),
            Expr::Binary(op, a, b) => {
                let (a, b) = (a.eval(t)?, b.eval(t)?);
                match op {
                    BinOp::Add => Ok(a + b),
                    BinOp::Sub => Ok(a - b),
                    BinOp::Mul => Ok(a * b),
                    BinOp::Div => {
                        if b == 0.0 {
                            Err(EvaluationError { operation: "/", argument: b, t })
                        } else {
                            Ok(a / b)
                        }
                    }
                    BinOp::Pow => power(a, b, t),
                }
            }
            Expr::Call1(f, a) => f.apply(a.eval(t)?, t),
            Expr::Call2(f, a, b) => f.apply(a.eval(t)?, b.eval(t)?, t),
        }
    }

    fn mentions_param(&self) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Param => true,
            Expr::Neg(a) | Expr::Call1(_, a) => a.mentions_param(),
            Expr::Binary(_, a, b) | Expr::Call2(_, a, b) => {
                a.mentions_param() || b.mentions_param()
            }
        }
    }
}

// ── Formula ───────────────────────────────────────────────────────────────────

/// A compiled closed-form function of `t`.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    source: String,
    root:   Expr,
}

impl Formula {
    /// Compile `text` against the formula grammar.
    pub fn compile(text: &str) -> Result<Formula, FormulaParseError> {
        let root = crate::parser::parse(text)?;
        Ok(Formula { source: text.trim().to_owned(), root })
    }

    /// A formula that ignores `t` and always yields `value`.
    pub fn constant(value: f64) -> Formula {
        Formula { source: value.to_string(), root: Expr::Const(value) }
    }

    /// Evaluate at `t`.
    ///
    /// # Errors
    ///
    /// [`EvaluationError`] if any sub-expression leaves the real domain
    /// (square root of a negative, logarithm of a non-positive, division by
    /// zero, overflow to ±inf).
    #[inline]
    pub fn eval(&self, t: f64) -> Result<f64, EvaluationError> {
        self.root.eval(t)
    }

    /// The text this formula was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `true` if the formula does not depend on `t`.
    pub fn is_constant(&self) -> bool {
        !self.root.mentions_param()
    }
}

impl std::str::FromStr for Formula {
    type Err = FormulaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::compile(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
