use crate::limits::context::LimitContext;
use crate::limits::gruntz::limitinf;
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use num::Signed;
use std::fmt;

/// Sign of an expression for `x -> oo`.
///
/// `Unresolved` carries an expression whose sign is not known (for example a free
/// parameter); it still multiplies with the other variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Sign {
    Positive,
    Zero,
    Negative,
    Unresolved(Expr),
}

impl Sign {
    pub fn from_i8(s: i8) -> Sign {
        match s {
            s if s > 0 => Sign::Positive,
            0 => Sign::Zero,
            _ => Sign::Negative,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Sign::Zero)
    }

    /// `1`, `0`, `-1` or the unresolved expression
    pub fn to_expr(&self) -> Expr {
        match self {
            Sign::Positive => Expr::one(),
            Sign::Zero => Expr::zero(),
            Sign::Negative => Expr::int(-1),
            Sign::Unresolved(e) => e.clone(),
        }
    }

    pub fn times(self, other: Sign) -> Sign {
        match (self, other) {
            (Sign::Zero, _) | (_, Sign::Zero) => Sign::Zero,
            (Sign::Positive, s) | (s, Sign::Positive) => s,
            (Sign::Negative, Sign::Negative) => Sign::Positive,
            (Sign::Negative, Sign::Unresolved(e)) | (Sign::Unresolved(e), Sign::Negative) => {
                Sign::Unresolved(-e)
            }
            (Sign::Unresolved(a), Sign::Unresolved(b)) => Sign::Unresolved(a * b),
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}

/// Sign of `e(x)` for `x -> oo`.
pub fn sign(e: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<Sign> {
    ctx.traced(
        "sign",
        || format!("{}, {}", e, x),
        |s: &Sign| s.to_string(),
        |ctx| sign_of(e, x, ctx),
    )
}

fn sign_of(e: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<Sign> {
    match e {
        Expr::Const(c) => Ok(if c.is_positive() {
            Sign::Positive
        } else if c.is_negative() {
            Sign::Negative
        } else {
            Sign::Zero
        }),
        Expr::Infinity => Ok(Sign::Positive),
        Expr::NegInfinity => Ok(Sign::Negative),
        _ if !e.has(x) => Ok(match e.known_sign() {
            Some(s) => Sign::from_i8(s),
            None => Sign::Unresolved(e.clone()),
        }),
        Expr::Var(s) if s == x => Ok(Sign::Positive),
        Expr::Mul(_) => {
            let (a, b) = e
                .as_two_terms()
                .ok_or_else(|| LimitError::UnsupportedExpression(e.to_string()))?;
            let sa = sign(&a, x, ctx)?;
            if sa.is_zero() {
                return Ok(Sign::Zero);
            }
            Ok(sa.times(sign(&b, x, ctx)?))
        }
        Expr::Exp(_) => Ok(Sign::Positive),
        Expr::Pow(base, _) => {
            if sign(base, x, ctx)? == Sign::Positive {
                Ok(Sign::Positive)
            } else {
                Ok(Sign::Unresolved(e.clone()))
            }
        }
        Expr::Ln(a) => sign(&(a.as_ref().clone() - Expr::one()), x, ctx),
        Expr::Add(_) => {
            let limit = limitinf(e, x, ctx)?;
            sign(&limit, x, ctx)
        }
        Expr::Func(func, args) if func.is_known() => {
            let limits = args
                .iter()
                .map(|a| limitinf(a, x, ctx))
                .collect::<LimitResult<Vec<Expr>>>()?;
            sign(&Expr::func(func.clone(), limits), x, ctx)
        }
        _ => Err(LimitError::UnsupportedExpression(format!(
            "cannot determine the sign of {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Func;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn sign_x(e: &Expr) -> LimitResult<Sign> {
        let mut ctx = LimitContext::default();
        sign(e, &Symbol::new("x"), &mut ctx)
    }

    #[test]
    fn test_sign_of_numbers() {
        assert_eq!(sign_x(&Expr::rational(-3, 4)).unwrap(), Sign::Negative);
        assert_eq!(sign_x(&Expr::zero()).unwrap(), Sign::Zero);
        assert_eq!(sign_x(&Expr::Infinity).unwrap(), Sign::Positive);
        assert_eq!(sign_x(&(Expr::Pi - Expr::int(4))).unwrap(), Sign::Negative);
        assert_eq!(sign_x(&Expr::int(2).ln()).unwrap(), Sign::Positive);
    }

    #[test]
    fn test_unresolved_constant() {
        let y = Expr::symbol("y");
        assert_eq!(sign_x(&y).unwrap(), Sign::Unresolved(y.clone()));
        // unresolved signs still multiply
        let expr = Expr::int(-2) * y.clone() * x();
        assert_eq!(sign_x(&expr).unwrap(), Sign::Unresolved(-y));
    }

    #[test]
    fn test_structural_cases() {
        assert_eq!(sign_x(&x()).unwrap(), Sign::Positive);
        assert_eq!(sign_x(&(-x())).unwrap(), Sign::Negative);
        assert_eq!(sign_x(&(-x()).exp()).unwrap(), Sign::Positive);
        assert_eq!(sign_x(&x().pow(Expr::rational(1, 2))).unwrap(), Sign::Positive);
        assert_eq!(sign_x(&Expr::zero().ln()).unwrap(), Sign::Negative);
    }

    #[test]
    fn test_sign_through_limits() {
        // log(x) -> sign(x - 1) -> limit of a sum
        assert_eq!(sign_x(&x().ln()).unwrap(), Sign::Positive);
        assert_eq!(sign_x(&(Expr::one() - x())).unwrap(), Sign::Negative);
        let atan = Expr::func(Func::Atan, vec![x()]);
        assert_eq!(sign_x(&atan).unwrap(), Sign::Positive);
    }

    #[test]
    fn test_unsupported_shapes() {
        let f = Expr::func(Func::Undefined("f".to_string()), vec![x()]);
        assert!(matches!(
            sign_x(&f),
            Err(LimitError::UnsupportedExpression(_))
        ));
    }

    #[test]
    fn test_sign_algebra() {
        assert_eq!(Sign::Negative.times(Sign::Negative), Sign::Positive);
        assert_eq!(Sign::Zero.times(Sign::Unresolved(x())), Sign::Zero);
        assert_eq!(
            Sign::Unresolved(x()).times(Sign::Unresolved(x())),
            Sign::Unresolved(x().pow(Expr::int(2)))
        );
        assert_eq!(Sign::from_i8(-5), Sign::Negative);
        assert_eq!(Sign::Negative.to_string(), "-1");
    }
}
