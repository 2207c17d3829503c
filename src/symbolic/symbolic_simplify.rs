//! # Canonical Construction Module
//!
//! All expression nodes are built through the constructors in this module, so every tree
//! that reaches the limit engine is in canonical form and structural equality can be used
//! as mathematical equality.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: exact rational arithmetic on numeric literals
//! 2. **Like Term Collection**: `3x + 2x = 5x`, `x^a * x^b = x^(a+b)`
//! 3. **Exponential Merging**: every product carries at most one `exp(..)` factor
//! 4. **Power Rules**: exact rational powers, nested powers, `exp(a)^p = exp(a*p)`
//! 5. **Infinities**: `oo + finite = oo`, `oo - oo = nan`, `-2*oo = -oo`
//!
//! ## Key Features
//!
//! - **Term Ordering Independence**: `(a + b)` and `(b + a)` build the same node
//! - **Distributive Property**: a numeric coefficient is distributed over a single sum,
//!   `-1 * (a + b) = -a - b`
//! - `expand()` distributes products over sums
//! - `powsimp_exp()` rewrites powers with variable exponents into exponential form

use crate::symbolic::symbolic_engine::{Expr, Func, Symbol};
use num::{BigInt, BigRational, Integer, One, Signed, ToPrimitive, Zero};
use std::collections::BTreeMap;

/// integer powers above this bound are kept unevaluated
const MAX_EXACT_POWER: i64 = 4096;
/// `(a + b)^n` is multiplied out by `expand()` only up to this exponent
const MAX_EXPAND_POWER: i64 = 12;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn rat_powi(base: &BigRational, n: i64) -> Option<BigRational> {
    if n.abs() > MAX_EXACT_POWER {
        return None;
    }
    if base.is_zero() && n < 0 {
        return None;
    }
    let mut acc = BigRational::one();
    for _ in 0..n.abs() {
        acc *= base;
    }
    if n < 0 { Some(acc.recip()) } else { Some(acc) }
}

fn exact_root(n: &BigInt, q: u32) -> Option<BigInt> {
    let root = n.nth_root(q);
    if num::pow(root.clone(), q as usize) == *n {
        Some(root)
    } else {
        None
    }
}

/// `I^n` for integer `n`
fn imag_unit_power(n: &BigInt) -> Expr {
    match n.mod_floor(&BigInt::from(4)).to_i64() {
        Some(0) => Expr::one(),
        Some(1) => Expr::ImagUnit,
        Some(2) => Expr::int(-1),
        _ => Expr::Mul(vec![Expr::int(-1), Expr::ImagUnit]),
    }
}

fn rational_pow(base: &BigRational, exp: &BigRational) -> Expr {
    let unevaluated = || {
        Expr::Pow(
            Box::new(Expr::Const(base.clone())),
            Box::new(Expr::Const(exp.clone())),
        )
    };
    if exp.is_integer() {
        let Some(n) = exp.to_integer().to_i64() else {
            return unevaluated();
        };
        if base.is_zero() && n < 0 {
            return Expr::Infinity;
        }
        return rat_powi(base, n).map(Expr::Const).unwrap_or_else(unevaluated);
    }
    if base.is_zero() {
        return if exp.is_positive() {
            Expr::zero()
        } else {
            Expr::Infinity
        };
    }
    if base.is_negative() {
        if *base == rat(-1) && *exp.denom() == BigInt::from(2) {
            return imag_unit_power(exp.numer());
        }
        return unevaluated();
    }
    // b^(k + p/q) = b^k * (b^(1/q))^p
    let k = exp.floor();
    let frac = exp - &k;
    let Some(q) = frac.denom().to_u32() else {
        return unevaluated();
    };
    let Some(k_int) = k.to_integer().to_i64() else {
        return unevaluated();
    };
    let Some(whole) = rat_powi(base, k_int) else {
        return unevaluated();
    };
    if let (Some(nr), Some(dr)) = (exact_root(base.numer(), q), exact_root(base.denom(), q)) {
        let root = BigRational::new(nr, dr);
        if let Some(p) = frac.numer().to_i64() {
            if let Some(r) = rat_powi(&root, p) {
                return Expr::Const(whole * r);
            }
        }
    }
    let rest = Expr::Pow(
        Box::new(Expr::Const(base.clone())),
        Box::new(Expr::Const(frac)),
    );
    if whole.is_one() {
        rest
    } else {
        Expr::Mul(vec![Expr::Const(whole), rest])
    }
}

impl Expr {
    //___________________________________CANONICAL CONSTRUCTORS____________________________________

    /// Canonical sum of `terms`.
    ///
    /// Nested sums are flattened, rational constants folded and like terms collected by their
    /// non-numeric part. The result is the single term itself when only one survives.
    pub fn sum(terms: Vec<Expr>) -> Expr {
        let mut flat: Vec<Expr> = Vec::with_capacity(terms.len());
        for t in terms {
            match t {
                Expr::Add(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        let mut constant = BigRational::zero();
        let mut pos_inf = false;
        let mut neg_inf = false;
        let mut collected: BTreeMap<Expr, BigRational> = BTreeMap::new();
        for t in flat {
            match t {
                Expr::Const(c) => constant += c,
                Expr::Infinity => pos_inf = true,
                Expr::NegInfinity => neg_inf = true,
                Expr::NaN => return Expr::NaN,
                other => {
                    let (c, rest) = other.as_coeff_mul();
                    *collected.entry(rest).or_insert_with(BigRational::zero) += c;
                }
            }
        }
        if pos_inf && neg_inf {
            return Expr::NaN;
        }
        let mut result: Vec<Expr> = Vec::with_capacity(collected.len() + 1);
        if pos_inf {
            result.push(Expr::Infinity);
        } else if neg_inf {
            result.push(Expr::NegInfinity);
        } else if !constant.is_zero() {
            result.push(Expr::Const(constant));
        }
        for (rest, c) in collected {
            if c.is_zero() {
                continue;
            }
            result.push(Self::with_coeff(c, rest));
        }
        result.sort();
        match result.len() {
            0 => Expr::zero(),
            1 => result.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Add(result),
        }
    }

    /// rebuilds `c * rest` for a `rest` that carries no numeric coefficient
    fn with_coeff(c: BigRational, rest: Expr) -> Expr {
        if c.is_one() {
            return rest;
        }
        match rest {
            Expr::Const(r) => Expr::Const(c * r),
            Expr::Mul(mut factors) => {
                factors.insert(0, Expr::Const(c));
                Expr::Mul(factors)
            }
            Expr::Add(_) => Expr::product(vec![Expr::Const(c), rest]),
            other => Expr::Mul(vec![Expr::Const(c), other]),
        }
    }

    /// Canonical product of `factors`.
    ///
    /// Equal bases are combined by summing exponents, all exponentials are merged into a
    /// single `exp(sum)`, and the rational coefficient is kept as the first factor.
    pub fn product(factors: Vec<Expr>) -> Expr {
        let mut flat: Vec<Expr> = Vec::with_capacity(factors.len());
        for f in factors {
            match f {
                Expr::Mul(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        let mut coeff = BigRational::one();
        let mut zero = false;
        let mut infinities = 0usize;
        let mut exp_args: Vec<Expr> = Vec::new();
        let mut bases: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        for f in flat {
            match f {
                Expr::Const(c) => {
                    if c.is_zero() {
                        zero = true;
                    } else {
                        coeff *= c;
                    }
                }
                Expr::Infinity => infinities += 1,
                Expr::NegInfinity => {
                    infinities += 1;
                    coeff = -coeff;
                }
                Expr::NaN => return Expr::NaN,
                Expr::Exp(a) => exp_args.push(*a),
                Expr::Pow(b, e) => bases.entry(*b).or_default().push(*e),
                other => bases.entry(other).or_default().push(Expr::one()),
            }
        }
        if zero {
            return if infinities > 0 { Expr::NaN } else { Expr::zero() };
        }

        let mut rest: Vec<Expr> = Vec::new();
        let mut needs_rerun = false;
        let absorb = |piece: Expr,
                          coeff: &mut BigRational,
                          rest: &mut Vec<Expr>,
                          exp_args: &mut Vec<Expr>,
                          needs_rerun: &mut bool| match piece {
            Expr::Const(c) => *coeff *= c,
            Expr::Exp(a) => exp_args.push(*a),
            Expr::Mul(inner) => {
                *needs_rerun = true;
                rest.extend(inner);
            }
            Expr::Infinity | Expr::NegInfinity | Expr::NaN => {
                *needs_rerun = true;
                rest.push(piece);
            }
            other => rest.push(other),
        };
        for (base, exps) in bases {
            let piece = if exps.len() == 1 && exps[0].is_one() {
                base
            } else {
                base.pow(Expr::sum(exps))
            };
            absorb(
                piece,
                &mut coeff,
                &mut rest,
                &mut exp_args,
                &mut needs_rerun,
            );
        }
        if !exp_args.is_empty() {
            let merged = Expr::sum(std::mem::take(&mut exp_args)).exp();
            match merged {
                Expr::Exp(_) => rest.push(merged),
                other => {
                    needs_rerun = true;
                    rest.push(other);
                }
            }
        }
        if needs_rerun {
            if coeff.is_zero() {
                return Expr::zero();
            }
            rest.push(Expr::Const(coeff));
            for _ in 0..infinities {
                rest.push(Expr::Infinity);
            }
            return Expr::product(rest);
        }
        if coeff.is_zero() {
            return if infinities > 0 { Expr::NaN } else { Expr::zero() };
        }

        if infinities > 0 {
            let negative = coeff.is_negative();
            if rest.is_empty() {
                return if negative {
                    Expr::NegInfinity
                } else {
                    Expr::Infinity
                };
            }
            rest.push(Expr::Infinity);
            rest.sort();
            if negative {
                rest.insert(0, Expr::int(-1));
            }
            return Expr::Mul(rest);
        }

        if !coeff.is_one() && rest.len() == 1 {
            if let Expr::Add(terms) = &rest[0] {
                return Expr::sum(
                    terms
                        .iter()
                        .map(|t| Expr::product(vec![Expr::Const(coeff.clone()), t.clone()]))
                        .collect(),
                );
            }
        }
        rest.sort();
        if rest.is_empty() {
            return Expr::Const(coeff);
        }
        if coeff.is_one() {
            if rest.len() == 1 {
                return rest.pop().unwrap_or_else(Expr::one);
            }
            return Expr::Mul(rest);
        }
        rest.insert(0, Expr::Const(coeff));
        Expr::Mul(rest)
    }

    /// Canonical power `self^exp`.
    pub fn pow(self, exp: Expr) -> Expr {
        if exp.is_zero() {
            return Expr::one();
        }
        if exp.is_one() {
            return self;
        }
        if matches!(self, Expr::NaN) || matches!(exp, Expr::NaN) {
            return Expr::NaN;
        }
        if self.is_one() {
            return if exp.is_infinite() {
                Expr::NaN
            } else {
                Expr::one()
            };
        }
        match (&self, &exp) {
            (Expr::Const(b), Expr::Const(r)) => rational_pow(b, r),
            (Expr::Const(b), Expr::Infinity) if !b.is_negative() => {
                if *b > BigRational::one() {
                    Expr::Infinity
                } else {
                    Expr::zero()
                }
            }
            (Expr::Const(b), Expr::NegInfinity) if !b.is_negative() => {
                if *b > BigRational::one() {
                    Expr::zero()
                } else {
                    Expr::Infinity
                }
            }
            (Expr::Const(b), _) if b.is_zero() => match exp.is_positive() {
                Some(true) => Expr::zero(),
                _ if exp.is_negative() == Some(true) => Expr::Infinity,
                _ => Expr::Pow(Box::new(self), Box::new(exp)),
            },
            (Expr::Infinity, _) => match exp.is_positive() {
                Some(true) => Expr::Infinity,
                _ if exp.is_negative() == Some(true) => Expr::zero(),
                _ => Expr::Pow(Box::new(self), Box::new(exp)),
            },
            (Expr::NegInfinity, Expr::Const(r)) if r.is_integer() => {
                let magnitude = Expr::Infinity.pow(exp.clone());
                if r.to_integer().is_odd() {
                    -magnitude
                } else {
                    magnitude
                }
            }
            (Expr::Exp(a), _) => Expr::product(vec![a.as_ref().clone(), exp]).exp(),
            (Expr::ImagUnit, Expr::Const(r)) if r.is_integer() => imag_unit_power(&r.to_integer()),
            (Expr::Pow(b0, e0), _) => {
                let integer_outer = matches!(&exp, Expr::Const(r) if r.is_integer());
                let real_inner = matches!(e0.as_ref(), Expr::Const(_));
                if integer_outer || (real_inner && b0.is_positive() == Some(true)) {
                    b0.as_ref()
                        .clone()
                        .pow(Expr::product(vec![e0.as_ref().clone(), exp]))
                } else {
                    Expr::Pow(Box::new(self), Box::new(exp))
                }
            }
            (Expr::Mul(factors), Expr::Const(r)) if r.is_integer() => Expr::product(
                factors.iter().map(|f| f.clone().pow(exp.clone())).collect(),
            ),
            _ => Expr::Pow(Box::new(self), Box::new(exp)),
        }
    }

    /// Canonical exponential `exp(self)`.
    pub fn exp(self) -> Expr {
        if let Expr::Mul(factors) = &self {
            if let [Expr::Const(c), Expr::Ln(a)] = factors.as_slice() {
                return a.as_ref().clone().pow(Expr::Const(c.clone()));
            }
        }
        match self {
            Expr::Const(ref c) if c.is_zero() => Expr::one(),
            Expr::Ln(a) => *a,
            Expr::Infinity => Expr::Infinity,
            Expr::NegInfinity => Expr::zero(),
            Expr::NaN => Expr::NaN,
            other => Expr::Exp(Box::new(other)),
        }
    }

    /// Canonical natural logarithm `log(self)`.
    pub fn ln(self) -> Expr {
        match self {
            Expr::Const(ref c) if c.is_one() => Expr::zero(),
            Expr::Const(ref c) if c.is_zero() => Expr::NegInfinity,
            Expr::Exp(a) => *a,
            Expr::Infinity => Expr::Infinity,
            Expr::NaN => Expr::NaN,
            other => Expr::Ln(Box::new(other)),
        }
    }

    /// Canonical application of a named function.
    ///
    /// Known functions are evaluated at `0` and at the signed infinities.
    pub fn func(func: Func, args: Vec<Expr>) -> Expr {
        if !func.is_known() || args.len() != 1 {
            return Expr::Func(func, args);
        }
        let arg = &args[0];
        if matches!(arg, Expr::NaN) {
            return Expr::NaN;
        }
        let half_pi = || Expr::product(vec![Expr::rational(1, 2), Expr::Pi]);
        if arg.is_zero() {
            match func {
                Func::Sin | Func::Tan | Func::Asin | Func::Atan | Func::Sinh | Func::Tanh
                | Func::Erf => return Expr::zero(),
                Func::Cos | Func::Cosh => return Expr::one(),
                Func::Acos => return half_pi(),
                _ => {}
            }
        }
        if matches!(arg, Expr::Infinity) {
            match func {
                Func::Atan => return half_pi(),
                Func::Tanh | Func::Erf => return Expr::one(),
                Func::Sinh | Func::Cosh => return Expr::Infinity,
                _ => {}
            }
        }
        if matches!(arg, Expr::NegInfinity) {
            match func {
                Func::Atan => return -half_pi(),
                Func::Tanh | Func::Erf => return Expr::int(-1),
                Func::Sinh => return Expr::NegInfinity,
                Func::Cosh => return Expr::Infinity,
                _ => {}
            }
        }
        Expr::Func(func, args)
    }

    /// Rebuilds the node from transformed operands through the canonical constructors.
    pub fn map_args<F>(&self, mut f: F) -> Expr
    where
        F: FnMut(&Expr) -> Expr,
    {
        match self {
            Expr::Add(terms) => Expr::sum(terms.iter().map(&mut f).collect()),
            Expr::Mul(factors) => Expr::product(factors.iter().map(&mut f).collect()),
            Expr::Pow(base, exp) => {
                let base = f(base.as_ref());
                base.pow(f(exp.as_ref()))
            }
            Expr::Exp(arg) => f(arg.as_ref()).exp(),
            Expr::Ln(arg) => f(arg.as_ref()).ln(),
            Expr::Func(func, args) => Expr::func(func.clone(), args.iter().map(&mut f).collect()),
            Expr::Derivative(inner, symbol) => Expr::Derivative(Box::new(f(inner.as_ref())), symbol.clone()),
            _ => self.clone(),
        }
    }

    //___________________________________EXPANSION____________________________________

    /// Distributes products over sums and multiplies out small integer powers of sums.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Mul(factors) => {
                let mut acc: Vec<Expr> = vec![Expr::one()];
                for factor in factors.iter().map(|f| f.expand()) {
                    let terms = match factor {
                        Expr::Add(terms) => terms,
                        other => vec![other],
                    };
                    acc = acc
                        .iter()
                        .flat_map(|a| {
                            terms
                                .iter()
                                .map(move |t| Expr::product(vec![a.clone(), t.clone()]))
                        })
                        .collect();
                }
                Expr::sum(acc)
            }
            Expr::Pow(base, exp) => {
                let base = base.expand();
                match (&base, exp.as_ref()) {
                    (Expr::Add(_), Expr::Const(r))
                        if r.is_integer()
                            && r.is_positive()
                            && r.to_integer() <= BigInt::from(MAX_EXPAND_POWER) =>
                    {
                        let n = r.to_integer().to_usize().unwrap_or(1);
                        let mut acc = base.clone();
                        for _ in 1..n {
                            acc = Expr::Mul(vec![acc, base.clone()]).expand();
                        }
                        acc
                    }
                    _ => base.pow(exp.expand()),
                }
            }
            _ => self.map_args(|a| a.expand()),
        }
    }

    /// Deep normalization for the growth analysis: every power whose exponent depends on
    /// `x` is rewritten as `exp(p*log(b))`; exponentials are merged by `product`.
    pub fn powsimp_exp(&self, x: &Symbol) -> Expr {
        if !self.has(x) {
            return self.clone();
        }
        let inner = self.map_args(|a| a.powsimp_exp(x));
        match inner {
            Expr::Pow(base, exp) if exp.has(x) => {
                Expr::product(vec![*exp, base.ln()]).exp()
            }
            other => other,
        }
    }
}
