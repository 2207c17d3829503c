//! # Truncated Series Module
//!
//! Expansion of an expression into a truncated generalized power series in a positive
//! infinitesimal symbol `w`:
//!
//! ```text
//! c_0 w^e_0 + c_1 w^e_1 + ... + O(w^order)
//! ```
//!
//! Exponents are exact real constants, usually rationals; powers such as `w^(log(2)/log(3))`
//! show up when exponentials of different bases are rewritten in one `w`. Coefficients are
//! expressions free of `w`, except that the literal `log(w)` is treated as a
//! coefficient-level constant: it is what the rewriting step of the limit engine later
//! replaces by an expression in the original variable.
//!
//! ## Expansion rules
//! - constants and `w` itself are exact
//! - sums add, products multiply with order bookkeeping so that every factor is expanded
//!   just far enough for the requested precision
//! - `b^p` uses the binomial series around the leading term of `b`
//! - `exp(a)` splits `a` into its constant part (pulling `k*log(w)` out as `w^k`) and an
//!   infinitesimal part
//! - `log(a) = log(c) + l*log(w) + log(1 + t)` for `a = c*w^l*(1 + t)`
//! - known functions use Taylor coefficients built from `diff`; `atan` of an unbounded
//!   argument uses `atan(a) = ±pi/2 - atan(1/a)`, `tanh` and `erf` of an unbounded argument
//!   are `±1` up to exponentially small terms

use crate::symbolic::symbolic_engine::{Assumptions, Expr, Func, Symbol};
use num::BigRational;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// truncation orders tried when looking for the first nonzero term
const LEAD_SEARCH_ORDERS: [i64; 5] = [1, 2, 4, 8, 16];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("cannot expand {0} in a power series")]
    Unsupported(String),
    #[error("essential singularity in {0}")]
    EssentialSingularity(String),
    #[error("no nonzero term found in the expansion of {0}")]
    NoLeadingTerm(String),
    #[error("exponent {0} of the expansion variable is not a real number")]
    SymbolicExponent(String),
}

pub type SeriesResult<T> = Result<T, SeriesError>;

/// Exponent of `w` in a series term: a closed real constant.
///
/// Two exponents are compared through the sign of their difference, so `log(2)/log(3)`
/// sorts between `0` and `1`. Differences too small to be resolved numerically count as
/// equal.
#[derive(Clone, Debug)]
pub struct Exponent(Expr);

impl Exponent {
    /// Fails with [`SeriesError::SymbolicExponent`] unless `e` evaluates to a finite real.
    pub fn new(e: Expr) -> SeriesResult<Exponent> {
        if let Expr::Const(_) = e {
            return Ok(Exponent(e));
        }
        match e.eval_f64() {
            Some(v) if v.is_finite() && e.is_number() => Ok(Exponent(e)),
            _ => Err(SeriesError::SymbolicExponent(e.to_string())),
        }
    }

    pub fn rational(r: BigRational) -> Exponent {
        Exponent(Expr::Const(r))
    }

    pub fn int(n: i64) -> Exponent {
        Exponent(Expr::int(n))
    }

    pub fn zero() -> Exponent {
        Exponent::int(0)
    }

    pub fn one() -> Exponent {
        Exponent::int(1)
    }

    pub fn to_expr(&self) -> Expr {
        self.0.clone()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.cmp(&Exponent::zero()) == Ordering::Greater
    }

    pub fn is_negative(&self) -> bool {
        self.cmp(&Exponent::zero()) == Ordering::Less
    }

    pub fn times(&self, k: i64) -> Exponent {
        Exponent(Expr::product(vec![Expr::int(k), self.0.clone()]))
    }
}

impl Ord for Exponent {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Expr::Const(a), Expr::Const(b)) => return a.cmp(b),
            (a, b) if a == b => return Ordering::Equal,
            _ => {}
        }
        match (self.0.clone() - other.0.clone()).known_sign() {
            Some(s) if s > 0 => Ordering::Greater,
            Some(s) if s < 0 => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Exponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Exponent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Exponent {}

impl Add<&Exponent> for &Exponent {
    type Output = Exponent;
    fn add(self, rhs: &Exponent) -> Exponent {
        Exponent(self.0.clone() + rhs.0.clone())
    }
}

impl Sub<&Exponent> for &Exponent {
    type Output = Exponent;
    fn sub(self, rhs: &Exponent) -> Exponent {
        Exponent(self.0.clone() - rhs.0.clone())
    }
}

impl Neg for &Exponent {
    type Output = Exponent;
    fn neg(self) -> Exponent {
        Exponent(-self.0.clone())
    }
}

impl From<BigRational> for Exponent {
    fn from(r: BigRational) -> Self {
        Exponent::rational(r)
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn min_order(a: &Option<Exponent>, b: &Option<Exponent>) -> Option<Exponent> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => Some(if x < y { x.clone() } else { y.clone() }),
    }
}

fn log_of(w: &Symbol) -> Expr {
    Expr::Ln(Box::new(Expr::Var(w.clone())))
}

/// A truncated series `Σ c_k w^{e_k} + O(w^order)`.
///
/// Terms are sorted by exponent, coefficients are nonzero and every exponent is below
/// `order`. `order == None` marks an exact (finite) expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub terms: Vec<(Exponent, Expr)>,
    pub order: Option<Exponent>,
}

impl Series {
    /// exact zero
    pub fn zero() -> Series {
        Series {
            terms: Vec::new(),
            order: None,
        }
    }

    pub fn constant(c: Expr) -> Series {
        if c.is_zero() {
            return Series::zero();
        }
        Series {
            terms: vec![(Exponent::zero(), c)],
            order: None,
        }
    }

    /// no known terms below `order`
    pub fn unknown_below(order: Exponent) -> Series {
        Series {
            terms: Vec::new(),
            order: Some(order),
        }
    }

    fn from_terms(terms: Vec<(Exponent, Expr)>, order: Option<Exponent>) -> Series {
        let mut grouped: BTreeMap<Exponent, Vec<Expr>> = BTreeMap::new();
        for (exp, coeff) in terms {
            if let Some(o) = &order {
                if &exp >= o {
                    continue;
                }
            }
            grouped.entry(exp).or_default().push(coeff);
        }
        let terms = grouped
            .into_iter()
            .filter_map(|(exp, coeffs)| {
                let c = Expr::sum(coeffs);
                if c.is_zero() { None } else { Some((exp, c)) }
            })
            .collect();
        Series { terms, order }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_exact_zero(&self) -> bool {
        self.terms.is_empty() && self.order.is_none()
    }

    pub fn lead_exponent(&self) -> Option<&Exponent> {
        self.terms.first().map(|(e, _)| e)
    }

    /// coefficient of `w^exp`, zero if absent
    pub fn coefficient(&self, exp: &Exponent) -> Expr {
        self.terms
            .iter()
            .find(|(e, _)| e == exp)
            .map(|(_, c)| c.clone())
            .unwrap_or_else(Expr::zero)
    }

    pub fn add(&self, other: &Series) -> Series {
        let order = min_order(&self.order, &other.order);
        let terms = self.terms.iter().chain(other.terms.iter()).cloned().collect();
        Series::from_terms(terms, order)
    }

    pub fn mul(&self, other: &Series) -> Series {
        if self.is_exact_zero() || other.is_exact_zero() {
            return Series::zero();
        }
        let low = |s: &Series| s.lead_exponent().cloned().or_else(|| s.order.clone());
        let from_self = match (&self.order, low(other)) {
            (Some(o), Some(l)) => Some(o + &l),
            _ => None,
        };
        let from_other = match (&other.order, low(self)) {
            (Some(o), Some(l)) => Some(o + &l),
            _ => None,
        };
        let order = min_order(&from_self, &from_other);
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for (e1, c1) in &self.terms {
            for (e2, c2) in &other.terms {
                if let Some(o) = &order {
                    if &(e1 + e2) >= o {
                        continue;
                    }
                }
                terms.push((e1 + e2, Expr::product(vec![c1.clone(), c2.clone()])));
            }
        }
        Series::from_terms(terms, order)
    }

    /// multiplies every coefficient by `c`
    pub fn scale(&self, c: &Expr) -> Series {
        if c.is_zero() {
            return Series::zero();
        }
        let terms = self
            .terms
            .iter()
            .map(|(e, coeff)| (e.clone(), Expr::product(vec![coeff.clone(), c.clone()])))
            .collect();
        Series::from_terms(terms, self.order.clone())
    }

    /// multiplies the series by `w^k`
    pub fn shift(&self, k: &Exponent) -> Series {
        Series {
            terms: self
                .terms
                .iter()
                .map(|(e, c)| (e + k, c.clone()))
                .collect(),
            order: self.order.as_ref().map(|o| o + k),
        }
    }

    pub fn truncate(&self, n: &Exponent) -> Series {
        let order = min_order(&self.order, &Some(n.clone()));
        Series::from_terms(self.terms.clone(), order)
    }

    /// drops the term of exponent zero
    fn without_constant(&self) -> Series {
        Series {
            terms: self
                .terms
                .iter()
                .filter(|(e, _)| !e.is_zero())
                .cloned()
                .collect(),
            order: self.order.clone(),
        }
    }

    /// applies a substitution to every coefficient, dropping coefficients that vanish
    pub fn subs_coefficients(&self, old: &Expr, new: &Expr) -> Series {
        let terms = self
            .terms
            .iter()
            .map(|(e, c)| (e.clone(), c.subs(old, new)))
            .collect();
        Series::from_terms(terms, self.order.clone())
    }

    /// the series as an expression in `w` without the order term
    pub fn remove_order(&self, w: &Symbol) -> Expr {
        Expr::sum(
            self.terms
                .iter()
                .map(|(e, c)| {
                    Expr::product(vec![c.clone(), Expr::Var(w.clone()).pow(e.to_expr())])
                })
                .collect(),
        )
    }

    /// `(c0, e0)` of the lowest order term
    pub fn leadterm(&self) -> Option<(Expr, Exponent)> {
        self.terms.first().map(|(e, c)| (c.clone(), e.clone()))
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let w = Symbol::new("w");
        write!(f, "{}", self.remove_order(&w))?;
        if let Some(o) = &self.order {
            write!(f, " + O({})", Expr::Var(w).pow(o.to_expr()))?;
        }
        Ok(())
    }
}

/// true if `e` depends on `w` other than through the literal `log(w)`
pub fn depends_on(e: &Expr, w: &Symbol) -> bool {
    match e {
        Expr::Ln(arg) if matches!(arg.as_ref(), Expr::Var(s) if s == w) => false,
        Expr::Var(s) => s == w,
        _ => e.args().into_iter().any(|a| depends_on(a, w)),
    }
}

/// Expands `e` in powers of `w` with every term below `w^n` present.
pub fn nseries(e: &Expr, w: &Symbol, n: u32) -> SeriesResult<Series> {
    let n = Exponent::int(i64::from(n));
    Ok(series(e, w, &n)?.truncate(&n))
}

/// `(e0, c0)` of the first nonzero term of the expansion of `e`.
pub fn leading_term(e: &Expr, w: &Symbol) -> SeriesResult<(Exponent, Expr)> {
    for n in LEAD_SEARCH_ORDERS {
        let s = series(e, w, &Exponent::int(n))?;
        if let Some((exp, coeff)) = s.terms.first() {
            return Ok((exp.clone(), coeff.clone()));
        }
        if s.is_exact_zero() {
            break;
        }
    }
    Err(SeriesError::NoLeadingTerm(e.to_string()))
}

fn series(e: &Expr, w: &Symbol, n: &Exponent) -> SeriesResult<Series> {
    if !depends_on(e, w) {
        return match e {
            Expr::NaN | Expr::Infinity | Expr::NegInfinity => {
                Err(SeriesError::Unsupported(e.to_string()))
            }
            _ => Ok(Series::constant(e.clone())),
        };
    }
    match e {
        Expr::Var(_) => Ok(Series {
            terms: vec![(Exponent::one(), Expr::one())],
            order: None,
        }),
        Expr::Add(terms) => {
            let mut acc = Series::zero();
            for t in terms {
                acc = acc.add(&series(t, w, n)?);
            }
            Ok(acc)
        }
        Expr::Mul(factors) => series_mul(factors, w, n),
        Expr::Pow(base, exp) => {
            if depends_on(exp, w) {
                let as_exp = Expr::product(vec![exp.as_ref().clone(), base.as_ref().clone().ln()]).exp();
                return series(&as_exp, w, n);
            }
            if let Expr::Var(_) = base.as_ref() {
                return Ok(Series {
                    terms: vec![(Exponent::new(exp.as_ref().clone())?, Expr::one())],
                    order: None,
                });
            }
            series_pow(base, exp, w, n)
        }
        Expr::Exp(arg) => series_exp(arg, w, n),
        Expr::Ln(arg) => series_ln(arg, w, n),
        Expr::Func(func, args) if func.is_known() && args.len() == 1 => {
            series_func(func, &args[0], w, n)
        }
        _ => Err(SeriesError::Unsupported(e.to_string())),
    }
}

fn series_mul(factors: &[Expr], w: &Symbol, n: &Exponent) -> SeriesResult<Series> {
    let (dependent, constant): (Vec<&Expr>, Vec<&Expr>) =
        factors.iter().partition(|f| depends_on(f, w));
    let c = Expr::product(constant.into_iter().cloned().collect());
    if dependent.len() == 1 {
        return Ok(series(dependent[0], w, n)?.scale(&c));
    }
    let mut leads = Vec::with_capacity(dependent.len());
    for f in &dependent {
        leads.push(leading_term(f, w)?.0);
    }
    let total = leads.iter().fold(Exponent::zero(), |acc, l| &acc + l);
    let mut acc = Series::constant(Expr::one());
    for (f, lead) in dependent.iter().zip(leads.iter()) {
        let needed = n - &(&total - lead);
        acc = acc.mul(&series(f, w, &needed)?);
    }
    Ok(acc.scale(&c))
}

/// `sum_k coeff(k) * t^k` for a series `t` with positive leading exponent, accurate below `m`
fn compose<F>(t: &Series, mut coeff: F, m: &Exponent) -> SeriesResult<Series>
where
    F: FnMut(usize) -> Expr,
{
    let mut result = Series::constant(coeff(0));
    let order = min_order(&t.order, &Some(m.clone())).unwrap_or_else(|| m.clone());
    let Some(d) = t.lead_exponent().cloned() else {
        return Ok(result.truncate(&order));
    };
    if !d.is_positive() {
        return Err(SeriesError::EssentialSingularity(t.to_string()));
    }
    let mut power = Series::constant(Expr::one());
    let mut k = 1usize;
    while d.times(k as i64) < order {
        power = power.mul(t).truncate(&order);
        let c = coeff(k);
        if !c.is_zero() {
            result = result.add(&power.scale(&c));
        }
        k += 1;
    }
    Ok(result.truncate(&order))
}

/// `t` in `a = c * w^l * (1 + t)`, accurate below `m`
fn relative_tail(
    arg: &Expr,
    w: &Symbol,
    m: &Exponent,
    l: &Exponent,
    c: &Expr,
) -> SeriesResult<Series> {
    let full = series(arg, w, &(m + l))?;
    Ok(full
        .shift(&-l)
        .scale(&c.clone().pow(Expr::int(-1)))
        .add(&Series::constant(Expr::int(-1))))
}

fn series_pow(base: &Expr, exp: &Expr, w: &Symbol, n: &Exponent) -> SeriesResult<Series> {
    let (l, c) = leading_term(base, w)?;
    let shift = if l.is_zero() {
        Exponent::zero()
    } else {
        Exponent::new(Expr::product(vec![exp.clone(), l.to_expr()]))?
    };
    let m = n - &shift;
    if !m.is_positive() {
        return Ok(Series::unknown_below(n.clone()));
    }
    let t = relative_tail(base, w, &m, &l, &c)?;
    // generalized binomial coefficients C(p, k)
    let mut binom = Expr::one();
    let coeff = |k: usize| {
        if k > 0 {
            let j = Expr::int(k as i64);
            binom = Expr::product(vec![
                binom.clone(),
                exp.clone() - j.clone() + Expr::one(),
                j.pow(Expr::int(-1)),
            ]);
        }
        binom.clone()
    };
    let composed = compose(&t, coeff, &m)?;
    Ok(composed.scale(&c.pow(exp.clone())).shift(&shift))
}

/// Splits a `w`-free constant into `k*log(w) + rest`.
///
/// Only real constant multiples of `log(w)` go into `k`; a term like `-log(w)/x` stays in
/// `rest` and becomes part of the coefficient.
fn split_log_w(a0: &Expr, w: &Symbol) -> SeriesResult<(Exponent, Expr)> {
    let logw = log_of(w);
    let terms = match a0 {
        Expr::Add(terms) => terms.clone(),
        other => vec![other.clone()],
    };
    let mut k = Exponent::zero();
    let mut rest = Vec::new();
    for term in terms {
        if !term.contains_subexpr(&logw) {
            rest.push(term);
            continue;
        }
        let multiple = term.clone() / logw.clone();
        if multiple.contains_subexpr(&logw) {
            return Err(SeriesError::Unsupported(format!("exp({})", a0)));
        }
        match Exponent::new(multiple) {
            Ok(c) => k = &k + &c,
            Err(_) => rest.push(term),
        }
    }
    Ok((k, Expr::sum(rest)))
}

fn series_exp(arg: &Expr, w: &Symbol, n: &Exponent) -> SeriesResult<Series> {
    let first = if n.is_positive() {
        n.clone()
    } else {
        Exponent::one()
    };
    let mut a = series(arg, w, &first)?;
    if a.lead_exponent().is_some_and(|e| e.is_negative()) {
        return Err(SeriesError::EssentialSingularity(format!("exp({})", arg)));
    }
    let (k, rest) = split_log_w(&a.coefficient(&Exponent::zero()), w)?;
    let m = n - &k;
    if !m.is_positive() {
        return Ok(Series::unknown_below(n.clone()));
    }
    if m > first {
        a = series(arg, w, &m)?;
    }
    let mut factorial = Expr::one();
    let coeff = |j: usize| {
        if j > 0 {
            factorial = Expr::product(vec![factorial.clone(), Expr::int(j as i64)]);
        }
        factorial.clone().pow(Expr::int(-1))
    };
    let composed = compose(&a.without_constant(), coeff, &m)?;
    Ok(composed.scale(&rest.exp()).shift(&k))
}

fn series_ln(arg: &Expr, w: &Symbol, n: &Exponent) -> SeriesResult<Series> {
    if !n.is_positive() {
        return Ok(Series::unknown_below(n.clone()));
    }
    let (l, c) = leading_term(arg, w)?;
    let t = relative_tail(arg, w, n, &l, &c)?;
    let coeff = |k: usize| {
        if k == 0 {
            Expr::zero()
        } else {
            let sign = if k % 2 == 1 { 1 } else { -1 };
            Expr::rational(sign, k as i64)
        }
    };
    let composed = compose(&t, coeff, n)?;
    let constant = c.ln() + l.to_expr() * log_of(w);
    Ok(composed.add(&Series::constant(constant)))
}

fn series_func(func: &Func, arg: &Expr, w: &Symbol, n: &Exponent) -> SeriesResult<Series> {
    let first = if n.is_positive() {
        n.clone()
    } else {
        Exponent::one()
    };
    let a = series(arg, w, &first)?;
    if let Some((l, c)) = a.terms.first() {
        if l.is_negative() {
            let side = match (c.is_positive(), c.is_negative()) {
                (Some(true), _) => Expr::one(),
                (_, Some(true)) => Expr::int(-1),
                _ => return Err(SeriesError::Unsupported(format!("{}({})", func, arg))),
            };
            return match func {
                Func::Atan => {
                    let branch = Expr::product(vec![side, Expr::rational(1, 2), Expr::Pi]);
                    let reflected =
                        branch - Expr::func(Func::Atan, vec![arg.clone().pow(Expr::int(-1))]);
                    series(&reflected, w, n)
                }
                // 1 - tanh(a) and 1 - erf(a) vanish faster than any power of w
                Func::Tanh | Func::Erf => Ok(Series::constant(side).truncate(n)),
                _ => Err(SeriesError::EssentialSingularity(format!("{}({})", func, arg))),
            };
        }
    }
    if !n.is_positive() {
        return Ok(Series::unknown_below(n.clone()));
    }
    let a0 = a.coefficient(&Exponent::zero());
    let u = Symbol::dummy("u", u64::MAX, Assumptions::none());
    let mut derivative = Expr::func(func.clone(), vec![u.to_expr()]);
    let mut factorial = Expr::one();
    let coeff = |k: usize| {
        if k > 0 {
            derivative = derivative.diff(&u);
            factorial = Expr::product(vec![factorial.clone(), Expr::int(k as i64)]);
        }
        derivative.subs_var(&u, &a0) / factorial.clone()
    };
    let composed = compose(&a.without_constant(), coeff, n)?;
    if composed
        .terms
        .iter()
        .any(|(_, c)| c.is_unbounded() || c.contains_subexpr(&Expr::NaN))
    {
        return Err(SeriesError::Unsupported(format!("{}({})", func, arg)));
    }
    Ok(composed)
}
