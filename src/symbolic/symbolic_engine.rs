//! # Symbolic Engine Module
//!
//! This module provides the expression tree used by the limit engine. Expressions are
//! immutable values: every transformation (substitution, normalization, expansion)
//! builds a new tree.
//!
//! ## Purpose
//!
//! The symbolic engine allows users to:
//! - Create symbolic variables, optionally tagged with sign assumptions
//! - Build canonical sums, products, powers, exponentials, logarithms and
//!   function applications with natural operator syntax
//! - Inspect, decompose and substitute expressions
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! The core symbolic expression type supporting:
//! - **Atoms**: `Const(BigRational)`, `Pi`, `ImagUnit`, `Infinity`, `NegInfinity`, `NaN`, `Var(Symbol)`
//! - **Operations**: n-ary `Add`, `Mul` and binary `Pow`
//! - **Functions**: `Exp`, `Ln`, `Func(Func, args)` and `Derivative`
//!
//! ### Key Methods
//! - `Symbols(symbols: &str)` - Create multiple variables from comma-separated string
//! - `sum()`, `product()`, `pow()`, `exp()`, `ln()`, `func()` - canonical constructors
//!   (implemented in `symbolic_simplify`)
//! - `has()` - free symbol test
//! - `subs()` / `subs_var()` - substitution (implemented in `symbolic_engine_derivatives`)
//! - `as_independent()`, `as_two_terms()` - decomposition helpers for the limit engine
//!
//! ## Interesting Code Features
//!
//! 1. **Canonical n-ary nodes**: sums and products are flattened and sorted, so derived
//!    structural equality is mathematical equality for everything the constructors can
//!    normalize
//!
//! 2. **Exact arithmetic**: numeric literals are `num::BigRational`, which keeps series
//!    exponents and coefficients exact
//!
//! 3. **Operator Overloading**: std::ops traits (Add, Sub, Mul, Div, Neg) route through the
//!    canonical constructors: `x.clone() * y + 1`
//!
//! 4. **Macro System**: `symbols!(x, y, z)` creates several variables at once

#![allow(non_camel_case_types)]

use num::{BigInt, BigRational, One, Signed, Zero};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumString;

/// Sign assumptions attached to a symbol.
///
/// Fresh symbols created by the limit engine are tagged `positive` so that logarithm
/// and power identities used for "x large and positive" reasoning stay valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assumptions {
    pub positive: bool,
    pub real: bool,
}

impl Assumptions {
    /// no assumptions at all
    pub fn none() -> Self {
        Assumptions::default()
    }
    /// real and positive
    pub fn positive() -> Self {
        Assumptions {
            positive: true,
            real: true,
        }
    }
}

/// A named symbol.
///
/// `id == 0` marks a user symbol. Fresh symbols get a nonzero id from the limit context
/// and therefore never compare equal to a user symbol with the same name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub name: String,
    pub id: u64,
    pub assumptions: Assumptions,
}

impl Symbol {
    /// plain user symbol without assumptions
    pub fn new(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            id: 0,
            assumptions: Assumptions::none(),
        }
    }
    /// user symbol assumed real and positive
    pub fn positive(name: &str) -> Self {
        Symbol {
            name: name.to_string(),
            id: 0,
            assumptions: Assumptions::positive(),
        }
    }
    /// symbol distinct from every user symbol
    pub fn dummy(name: &str, id: u64, assumptions: Assumptions) -> Self {
        Symbol {
            name: name.to_string(),
            id,
            assumptions,
        }
    }
    pub fn is_positive(&self) -> bool {
        self.assumptions.positive
    }
    pub fn is_dummy(&self) -> bool {
        self.id != 0
    }
    pub fn to_expr(&self) -> Expr {
        Expr::Var(self.clone())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "_{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Named functions the engine knows how to differentiate, evaluate and expand.
///
/// `Undefined` stands for an applied unknown function like `f(x)`; it is never produced
/// by parsing a known name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Erf,
    #[strum(disabled)]
    Undefined(String),
}

impl Func {
    /// looks up a known function by name, falling back to an undefined function
    pub fn from_name(name: &str) -> Func {
        Func::from_str(name).unwrap_or_else(|_| Func::Undefined(name.to_string()))
    }
    /// known functions have a fixed arity of one
    pub fn is_known(&self) -> bool {
        !matches!(self, Func::Undefined(_))
    }
    pub fn name(&self) -> &str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cot => "cot",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Erf => "erf",
            Func::Undefined(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Core symbolic expression enum.
///
/// Variant order matters: the derived `Ord` sorts numeric literals first, which the
/// canonical product relies on to keep its coefficient in front.
///
/// # Examples
/// ```rust, ignore
/// use RustedGruntz::symbolic::symbolic_engine::{Expr, Symbol};
/// let x = Expr::Var(Symbol::new("x"));
/// let expr = x.clone().exp() / x; // exp(x)/x
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    /// exact rational constant
    Const(BigRational),
    /// pi
    Pi,
    /// imaginary unit I
    ImagUnit,
    /// +oo
    Infinity,
    /// -oo
    NegInfinity,
    /// undefined numeric result such as oo - oo
    NaN,
    /// Symbolic variable
    Var(Symbol),
    /// canonical sum, at least two terms
    Add(Vec<Expr>),
    /// canonical product, at least two factors, rational coefficient first
    Mul(Vec<Expr>),
    /// base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// e^x; Euler's number is Exp(1)
    Exp(Box<Expr>),
    /// natural logarithm
    Ln(Box<Expr>),
    /// application of a named function
    Func(Func, Vec<Expr>),
    /// unevaluated derivative of an expression with respect to a symbol
    Derivative(Box<Expr>, Symbol),
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::sum(vec![self, rhs])
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::sum(vec![self, -rhs])
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::product(vec![self, rhs])
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::product(vec![self, rhs.pow(Expr::int(-1))])
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::product(vec![Expr::int(-1), self])
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.clone() + rhs;
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.clone() * rhs;
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::int(value)
    }
}

impl From<BigRational> for Expr {
    fn from(value: BigRational) -> Self {
        Expr::Const(value)
    }
}

impl From<Symbol> for Expr {
    fn from(value: Symbol) -> Self {
        Expr::Var(value)
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Arguments
    /// * `symbols` - Comma-separated string of variable names (e.g., "x, y, z")
    ///
    /// # Returns
    /// Vector of Expr::Var instances for each variable name
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(Symbol::new(s)))
            .collect()
    }

    pub fn int(value: i64) -> Expr {
        Expr::Const(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn rational(numer: i64, denom: i64) -> Expr {
        Expr::Const(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn zero() -> Expr {
        Expr::Const(BigRational::zero())
    }

    pub fn one() -> Expr {
        Expr::Const(BigRational::one())
    }

    pub fn symbol(name: &str) -> Expr {
        Expr::Var(Symbol::new(name))
    }

    /// Euler's number
    pub fn e() -> Expr {
        Expr::Exp(Box::new(Expr::one()))
    }

    pub fn sqrt(self) -> Expr {
        self.pow(Expr::rational(1, 2))
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if c.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if c.is_one())
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Expr::Const(c) => Some(c),
            _ => None,
        }
    }

    /// numeric literal or one of the signed infinities
    pub fn is_numeric_literal(&self) -> bool {
        matches!(self, Expr::Const(_) | Expr::Infinity | Expr::NegInfinity)
    }

    /// plain +oo or -oo
    pub fn is_infinite(&self) -> bool {
        matches!(self, Expr::Infinity | Expr::NegInfinity)
    }

    /// +oo, -oo or a product carrying an infinity such as I*oo
    pub fn is_unbounded(&self) -> bool {
        match self {
            Expr::Infinity | Expr::NegInfinity => true,
            Expr::Mul(factors) => factors.iter().any(|f| f.is_infinite()),
            _ => false,
        }
    }

    /// true for `I` or `I*a` with `a` free of `I`
    pub fn is_imaginary_multiple(&self) -> bool {
        match self {
            Expr::ImagUnit => true,
            Expr::Mul(factors) => {
                factors.iter().filter(|f| **f == Expr::ImagUnit).count() == 1
                    && factors
                        .iter()
                        .filter(|f| **f != Expr::ImagUnit)
                        .all(|f| !f.contains_subexpr(&Expr::ImagUnit))
            }
            _ => false,
        }
    }

    /// Immediate operands of the node.
    pub fn args(&self) -> Vec<&Expr> {
        match self {
            Expr::Add(terms) | Expr::Mul(terms) | Expr::Func(_, terms) => terms.iter().collect(),
            Expr::Pow(base, exp) => vec![base.as_ref(), exp.as_ref()],
            Expr::Exp(arg) | Expr::Ln(arg) | Expr::Derivative(arg, _) => vec![arg.as_ref()],
            _ => Vec::new(),
        }
    }

    /// true when both nodes have the same kind (sum, product, power, ...)
    pub fn same_kind(&self, other: &Expr) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// check if the expression contains a symbol as a free symbol
    pub fn has(&self, symbol: &Symbol) -> bool {
        match self {
            Expr::Var(s) => s == symbol,
            Expr::Derivative(inner, _) => inner.has(symbol),
            _ => self.args().into_iter().any(|a| a.has(symbol)),
        }
    }

    /// check if `sub` occurs anywhere in the tree
    pub fn contains_subexpr(&self, sub: &Expr) -> bool {
        self == sub || self.args().into_iter().any(|a| a.contains_subexpr(sub))
    }

    /// all free symbols, sorted
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut acc = BTreeSet::new();
        self.collect_symbols(&mut acc);
        acc
    }

    fn collect_symbols(&self, acc: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Var(s) => {
                acc.insert(s.clone());
            }
            _ => {
                for a in self.args() {
                    a.collect_symbols(acc);
                }
            }
        }
    }

    /// closed expression: no free symbols
    pub fn is_number(&self) -> bool {
        self.free_symbols().is_empty()
    }

    /// Splits a sum or product into the part independent of `x` and the dependent part.
    ///
    /// For a sum the result satisfies `indep + dep == self`, for a product
    /// `indep * dep == self`. Any other node is either fully independent or fully dependent.
    pub fn as_independent(&self, x: &Symbol) -> (Expr, Expr) {
        match self {
            Expr::Add(terms) => {
                let (dep, indep): (Vec<Expr>, Vec<Expr>) =
                    terms.iter().cloned().partition(|t| t.has(x));
                (Expr::sum(indep), Expr::sum(dep))
            }
            Expr::Mul(factors) => {
                let (dep, indep): (Vec<Expr>, Vec<Expr>) =
                    factors.iter().cloned().partition(|t| t.has(x));
                (Expr::product(indep), Expr::product(dep))
            }
            _ if self.has(x) => (Expr::one(), self.clone()),
            _ => (self.clone(), Expr::one()),
        }
    }

    /// Splits a sum or product into its first operand and the rest.
    pub fn as_two_terms(&self) -> Option<(Expr, Expr)> {
        match self {
            Expr::Add(terms) if terms.len() >= 2 => {
                Some((terms[0].clone(), Expr::sum(terms[1..].to_vec())))
            }
            Expr::Mul(factors) if factors.len() >= 2 => {
                Some((factors[0].clone(), Expr::product(factors[1..].to_vec())))
            }
            _ => None,
        }
    }

    /// rational coefficient and the remaining factor: `3*x*y -> (3, x*y)`
    pub fn as_coeff_mul(&self) -> (BigRational, Expr) {
        match self {
            Expr::Const(c) => (c.clone(), Expr::one()),
            Expr::Mul(factors) => match &factors[0] {
                Expr::Const(c) => {
                    let rest = factors[1..].to_vec();
                    let rest = if rest.len() == 1 {
                        rest[0].clone()
                    } else {
                        Expr::Mul(rest)
                    };
                    (c.clone(), rest)
                }
                _ => (BigRational::one(), self.clone()),
            },
            _ => (BigRational::one(), self.clone()),
        }
    }

    /// true if the rational coefficient of the term is negative
    pub(crate) fn has_negative_coeff(&self) -> bool {
        match self {
            Expr::Const(c) => c.is_negative(),
            Expr::NegInfinity => true,
            _ => self.as_coeff_mul().0.is_negative(),
        }
    }
}

//___________________________________DISPLAY____________________________________

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(_) => PREC_ADD,
        Expr::Mul(_) => PREC_MUL,
        Expr::Const(c) if !c.is_integer() || c.is_negative() => PREC_MUL,
        Expr::NegInfinity => PREC_MUL,
        Expr::Pow(_, exp) => match exp.as_ref() {
            Expr::Const(c) if *c == BigRational::new(1.into(), 2.into()) => PREC_ATOM,
            Expr::Const(c) if c.is_negative() => PREC_MUL,
            _ => PREC_POW,
        },
        _ => PREC_ATOM,
    }
}

fn write_with_parens(f: &mut fmt::Formatter, expr: &Expr, min_prec: u8) -> fmt::Result {
    if precedence(expr) < min_prec {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn write_product(f: &mut fmt::Formatter, factors: &[Expr]) -> fmt::Result {
    let mut numer: Vec<Expr> = Vec::new();
    let mut denom: Vec<Expr> = Vec::new();
    let mut negative = false;
    for factor in factors {
        match factor {
            Expr::Const(c) => {
                negative = c.is_negative();
                let c = c.abs();
                if !c.numer().is_one() || c.is_one() && factors.len() == 1 {
                    numer.push(Expr::Const(BigRational::from_integer(c.numer().clone())));
                }
                if !c.denom().is_one() {
                    denom.push(Expr::Const(BigRational::from_integer(c.denom().clone())));
                }
            }
            Expr::Pow(base, exp) if exp.has_negative_coeff() => {
                denom.push(base.as_ref().clone().pow(-exp.as_ref().clone()));
            }
            other => numer.push(other.clone()),
        }
    }
    if negative {
        write!(f, "-")?;
    }
    if numer.is_empty() {
        write!(f, "1")?;
    }
    for (i, factor) in numer.iter().enumerate() {
        if i > 0 {
            write!(f, "*")?;
        }
        write_with_parens(f, factor, PREC_POW)?;
    }
    if !denom.is_empty() {
        write!(f, "/")?;
        if denom.len() > 1 {
            write!(f, "(")?;
        }
        for (i, factor) in denom.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write_with_parens(f, factor, PREC_POW)?;
        }
        if denom.len() > 1 {
            write!(f, ")")?;
        }
    }
    Ok(())
}

/// Display implementation for printing symbolic expressions.
///
/// Produces one-line notation that `parse_expr` reads back: `x^2 + 3*exp(-x)/x`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(c) => {
                if c.is_integer() {
                    write!(f, "{}", c.numer())
                } else {
                    write!(f, "{}/{}", c.numer(), c.denom())
                }
            }
            Expr::Pi => write!(f, "pi"),
            Expr::ImagUnit => write!(f, "I"),
            Expr::Infinity => write!(f, "oo"),
            Expr::NegInfinity => write!(f, "-oo"),
            Expr::NaN => write!(f, "nan"),
            Expr::Var(symbol) => write!(f, "{}", symbol),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        write_with_parens(f, term, PREC_ADD)?;
                    } else if term.has_negative_coeff() {
                        write!(f, " - ")?;
                        write_with_parens(f, &-term.clone(), PREC_MUL)?;
                    } else {
                        write!(f, " + ")?;
                        write_with_parens(f, term, PREC_ADD)?;
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => write_product(f, factors),
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(c) if *c == BigRational::new(1.into(), 2.into()) => {
                    write!(f, "sqrt({})", base)
                }
                Expr::Const(c) if c.is_negative() => write_product(f, &[self.clone()]),
                _ => {
                    write_with_parens(f, base, PREC_ATOM)?;
                    write!(f, "^")?;
                    write_with_parens(f, exp, PREC_ATOM)
                }
            },
            Expr::Exp(arg) if arg.is_one() => write!(f, "E"),
            Expr::Exp(arg) => write!(f, "exp({})", arg),
            Expr::Ln(arg) => write!(f, "log({})", arg),
            Expr::Func(func, args) => {
                write!(f, "{}(", func)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ")")
            }
            Expr::Derivative(inner, symbol) => write!(f, "Derivative({}, {})", inner, symbol),
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y, z) -> creates variables x, y, z
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            let var_names = stringify!($($var),+);
            let vars = $crate::symbolic::symbolic_engine::Expr::Symbols(var_names);
            let mut iter = vars.into_iter();
            ($(
                {
                    let $var = iter.next().unwrap();
                    $var
                }
            ),+)
        }
    };
}
