//! # Symbolic Engine Derivatives Module
//!
//! This module extends the symbolic engine with differentiation, substitution and numerical
//! evaluation.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &Symbol)` - analytical derivative
//! - `n_th_derivative(var, n)` - higher-order derivatives, used to build Taylor coefficients
//!
//! ### Substitution
//! - `subs(old, new)` - replaces a subexpression everywhere; exponentials are matched up to
//!   a rational multiple of their argument, so `exp(-x).subs(exp(x), y) = y^-1`
//! - `subs_var(var, new)` - replaces a free symbol
//!
//! ### Function evaluation
//! - `eval_f64()` - evaluates a closed expression to `f64`
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Differentiation Rules**: sum, product, general power and chain rules
//! 2. **Unknown functions**: `f(x).diff(x)` stays unevaluated as a `Derivative` node

use crate::symbolic::symbolic_engine::{Expr, Func, Symbol};
use num::ToPrimitive;

/// Abramowitz and Stegun 7.1.26, absolute error below 1.5e-7
fn erf_approx(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.3275911 * x.abs());
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let y = 1.0 - poly * (-x * x).exp();
    if x >= 0.0 { y } else { -y }
}

impl Expr {
    //___________________________________DIFFERENTIATION____________________________________

    /// Computes the analytical derivative of the expression with respect to `var`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Symbol::new("x");
    /// let expr = x.to_expr().pow(Expr::int(2));
    /// assert_eq!(expr.diff(&x), Expr::int(2) * x.to_expr());
    /// ```
    pub fn diff(&self, var: &Symbol) -> Expr {
        if !self.has(var) {
            return Expr::zero();
        }
        match self {
            Expr::Var(s) => {
                if s == var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.diff(var)).collect()),
            Expr::Mul(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for i in 0..factors.len() {
                    let d = factors[i].diff(var);
                    if d.is_zero() {
                        continue;
                    }
                    let mut product = factors.clone();
                    product[i] = d;
                    terms.push(Expr::product(product));
                }
                Expr::sum(terms)
            }
            Expr::Pow(base, exp) => {
                if !exp.has(var) {
                    // d(b^n) = n * b^(n-1) * b'
                    Expr::product(vec![
                        exp.as_ref().clone(),
                        base.as_ref()
                            .clone()
                            .pow(exp.as_ref().clone() - Expr::one()),
                        base.diff(var),
                    ])
                } else {
                    // d(b^p) = b^p * (p' * log(b) + p * b'/b)
                    self.clone()
                        * (exp.diff(var) * base.as_ref().clone().ln()
                            + exp.as_ref().clone() * base.diff(var) / base.as_ref().clone())
                }
            }
            Expr::Exp(arg) => self.clone() * arg.diff(var),
            Expr::Ln(arg) => arg.diff(var) / arg.as_ref().clone(),
            Expr::Func(func, args) if func.is_known() && args.len() == 1 => {
                let a = args[0].clone();
                let outer = match func {
                    Func::Sin => Expr::func(Func::Cos, vec![a]),
                    Func::Cos => -Expr::func(Func::Sin, vec![a]),
                    Func::Tan => Expr::one() + Expr::func(Func::Tan, vec![a]).pow(Expr::int(2)),
                    Func::Cot => {
                        -(Expr::one() + Expr::func(Func::Cot, vec![a]).pow(Expr::int(2)))
                    }
                    Func::Asin => (Expr::one() - a.pow(Expr::int(2))).pow(Expr::rational(-1, 2)),
                    Func::Acos => -(Expr::one() - a.pow(Expr::int(2))).pow(Expr::rational(-1, 2)),
                    Func::Atan => (Expr::one() + a.pow(Expr::int(2))).pow(Expr::int(-1)),
                    Func::Sinh => Expr::func(Func::Cosh, vec![a]),
                    Func::Cosh => Expr::func(Func::Sinh, vec![a]),
                    Func::Tanh => Expr::one() - Expr::func(Func::Tanh, vec![a]).pow(Expr::int(2)),
                    Func::Erf => Expr::product(vec![
                        Expr::int(2),
                        Expr::Pi.pow(Expr::rational(-1, 2)),
                        (-a.pow(Expr::int(2))).exp(),
                    ]),
                    Func::Undefined(_) => Expr::Derivative(Box::new(self.clone()), var.clone()),
                };
                outer * args[0].diff(var)
            }
            _ => Expr::Derivative(Box::new(self.clone()), var.clone()),
        }
    }

    /// n-th derivative with respect to `var`
    pub fn n_th_derivative(&self, var: &Symbol, n: usize) -> Expr {
        let mut derivative = self.clone();
        for _ in 0..n {
            derivative = derivative.diff(var);
        }
        derivative
    }

    //___________________________________SUBSTITUTION____________________________________

    /// Replaces every occurrence of `old` by `new`, rebuilding canonical nodes on the way up.
    ///
    /// When `old` is an exponential `exp(a)`, any `exp(b)` with `b = c*a` for a rational `c`
    /// becomes `new^c`. An exponential of a sum is only matched as a whole.
    pub fn subs(&self, old: &Expr, new: &Expr) -> Expr {
        if self == old {
            return new.clone();
        }
        if let Expr::Var(var) = old {
            if !self.has(var) {
                return self.clone();
            }
        }
        if let (Expr::Exp(b), Expr::Exp(a)) = (self, old) {
            if let Expr::Const(c) = b.as_ref().clone() / a.as_ref().clone() {
                return new.clone().pow(Expr::Const(c));
            }
        }
        self.map_args(|arg| arg.subs(old, new))
    }

    /// Replaces the free symbol `var` by `new`.
    pub fn subs_var(&self, var: &Symbol, new: &Expr) -> Expr {
        self.subs(&Expr::Var(var.clone()), new)
    }

    //___________________________________EVALUATION____________________________________

    /// Evaluates a closed expression to a floating point number.
    ///
    /// Returns `None` for expressions with free symbols, complex values or unevaluated
    /// derivatives.
    pub fn eval_f64(&self) -> Option<f64> {
        let value = match self {
            Expr::Const(c) => c.to_f64()?,
            Expr::Pi => std::f64::consts::PI,
            Expr::Infinity => f64::INFINITY,
            Expr::NegInfinity => f64::NEG_INFINITY,
            Expr::NaN | Expr::ImagUnit | Expr::Var(_) | Expr::Derivative(..) => return None,
            Expr::Add(terms) => {
                let mut acc = 0.0;
                for t in terms {
                    acc += t.eval_f64()?;
                }
                acc
            }
            Expr::Mul(factors) => {
                let mut acc = 1.0;
                for f in factors {
                    acc *= f.eval_f64()?;
                }
                acc
            }
            Expr::Pow(base, exp) => {
                let b = base.eval_f64()?;
                let e = exp.eval_f64()?;
                if b < 0.0 && e.fract() != 0.0 {
                    return None;
                }
                b.powf(e)
            }
            Expr::Exp(arg) => arg.eval_f64()?.exp(),
            Expr::Ln(arg) => {
                let a = arg.eval_f64()?;
                if a < 0.0 {
                    return None;
                }
                a.ln()
            }
            Expr::Func(func, args) => {
                if args.len() != 1 {
                    return None;
                }
                let a = args[0].eval_f64()?;
                match func {
                    Func::Sin => a.sin(),
                    Func::Cos => a.cos(),
                    Func::Tan => a.tan(),
                    Func::Cot => 1.0 / a.tan(),
                    Func::Asin => a.asin(),
                    Func::Acos => a.acos(),
                    Func::Atan => a.atan(),
                    Func::Sinh => a.sinh(),
                    Func::Cosh => a.cosh(),
                    Func::Tanh => a.tanh(),
                    Func::Erf => erf_approx(a),
                    Func::Undefined(_) => return None,
                }
            }
        };
        if value.is_nan() { None } else { Some(value) }
    }
}
