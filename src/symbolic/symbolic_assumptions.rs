//! Sign and reality queries on expressions.
//!
//! The answers are three-valued (`Option<bool>`): `None` means "not known". Structural rules
//! are tried first (symbol assumptions, `exp` of a real value, products and sums of known
//! signs); closed numeric expressions such as `log(2)` or `pi - 3` fall back to floating
//! point evaluation.

use crate::symbolic::symbolic_engine::{Expr, Func};
use num::Signed;

/// values closer to zero than this are not trusted for sign decisions
pub const SIGN_TOLERANCE: f64 = 1e-12;
/// the same bound for expressions evaluated through the `erf` approximation
pub const ERF_SIGN_TOLERANCE: f64 = 1e-6;

impl Expr {
    /// `Some(true)` if the expression is known to be real
    pub fn is_real(&self) -> Option<bool> {
        match self {
            Expr::Const(_) | Expr::Pi | Expr::Infinity | Expr::NegInfinity => Some(true),
            Expr::ImagUnit => Some(false),
            Expr::NaN => None,
            Expr::Var(s) => {
                if s.assumptions.real || s.assumptions.positive {
                    Some(true)
                } else {
                    None
                }
            }
            Expr::Add(args) | Expr::Mul(args) => {
                if args.iter().all(|a| a.is_real() == Some(true)) {
                    Some(true)
                } else {
                    None
                }
            }
            Expr::Exp(a) => a.is_real(),
            Expr::Ln(a) => {
                if a.is_positive() == Some(true) {
                    Some(true)
                } else {
                    None
                }
            }
            Expr::Pow(base, exp) => {
                let real_exp = exp.is_real() == Some(true);
                let integer_exp = matches!(exp.as_ref(), Expr::Const(c) if c.is_integer());
                if (base.is_positive() == Some(true) && real_exp)
                    || (base.is_real() == Some(true) && integer_exp)
                {
                    Some(true)
                } else {
                    None
                }
            }
            Expr::Func(func, args) => match func {
                Func::Sin | Func::Cos | Func::Atan | Func::Sinh | Func::Cosh | Func::Tanh
                | Func::Erf | Func::Tan | Func::Cot => {
                    if args.iter().all(|a| a.is_real() == Some(true)) {
                        Some(true)
                    } else {
                        None
                    }
                }
                _ => None,
            },
            Expr::Derivative(..) => None,
        }
    }

    /// `Some(1)`, `Some(0)` or `Some(-1)` when the sign is known
    pub fn known_sign(&self) -> Option<i8> {
        let structural = match self {
            Expr::Const(c) => Some(if c.is_positive() {
                1
            } else if c.is_negative() {
                -1
            } else {
                0
            }),
            Expr::Pi | Expr::Infinity => Some(1),
            Expr::NegInfinity => Some(-1),
            Expr::ImagUnit | Expr::NaN => return None,
            Expr::Var(s) => {
                if s.assumptions.positive {
                    Some(1)
                } else {
                    None
                }
            }
            Expr::Exp(a) => {
                if a.is_real() == Some(true) {
                    Some(1)
                } else {
                    None
                }
            }
            Expr::Mul(factors) => factors
                .iter()
                .map(|f| f.known_sign())
                .try_fold(1i8, |acc, s| s.map(|s| acc * s)),
            Expr::Add(terms) => {
                let signs: Option<Vec<i8>> = terms.iter().map(|t| t.known_sign()).collect();
                match signs {
                    Some(signs) if signs.iter().all(|s| *s >= 0) && signs.iter().any(|s| *s > 0) => {
                        Some(1)
                    }
                    Some(signs) if signs.iter().all(|s| *s <= 0) && signs.iter().any(|s| *s < 0) => {
                        Some(-1)
                    }
                    _ => None,
                }
            }
            Expr::Pow(base, exp) => {
                if base.known_sign() == Some(1) && exp.is_real() == Some(true) {
                    Some(1)
                } else {
                    None
                }
            }
            _ => None,
        };
        structural.or_else(|| self.numeric_sign())
    }

    /// sign from floating point evaluation of a closed expression
    fn numeric_sign(&self) -> Option<i8> {
        if !self.is_number() || self.contains_subexpr(&Expr::ImagUnit) {
            return None;
        }
        let value = self.eval_f64()?;
        let tolerance = if self.has_func(&Func::Erf) {
            ERF_SIGN_TOLERANCE
        } else {
            SIGN_TOLERANCE
        };
        if value.is_nan() || value.abs() <= tolerance {
            None
        } else if value > 0.0 {
            Some(1)
        } else {
            Some(-1)
        }
    }

    fn has_func(&self, func: &Func) -> bool {
        match self {
            Expr::Func(f, _) if f == func => true,
            _ => self.args().into_iter().any(|a| a.has_func(func)),
        }
    }

    pub fn is_positive(&self) -> Option<bool> {
        self.known_sign().map(|s| s > 0)
    }

    pub fn is_negative(&self) -> Option<bool> {
        self.known_sign().map(|s| s < 0)
    }
}
