//! # Limit driver
//!
//! Every limit is reduced to the canonical problem `x -> +oo`:
//! - `z -> +oo` is computed directly
//! - `z -> -oo` substitutes `z = -z`
//! - `z -> z0+` substitutes `z = z0 + 1/z`, `z -> z0-` substitutes `z = z0 - 1/z`
//!
//! `limitinf` then finds the leading term `c0 * w^e0` of the expression rewritten in the
//! infinitesimal `w` and reads the limit off the sign of `e0`:
//! `e0 > 0` gives `0`, `e0 < 0` gives `±oo` (sign of `c0`), `e0 = 0` recurses on `c0`.
//!
//! # Example
//! ```
//! use RustedGruntz::limits::gruntz::gruntz;
//! use RustedGruntz::symbolic::symbolic_engine::Expr;
//! let e = Expr::parse_expression("sin(x)/x").unwrap();
//! let limit = gruntz(&e, &Expr::symbol("x"), &Expr::zero(), "+").unwrap();
//! assert_eq!(limit, Expr::one());
//! ```
use crate::limits::config::GruntzConfig;
use crate::limits::context::LimitContext;
use crate::limits::leadterm::mrv_leadterm;
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::limits::mrv::MrvSet;
use crate::limits::sign::{Sign, sign};
use crate::symbolic::symbolic_engine::{Assumptions, Expr, Symbol};
use log::{debug, info};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Side from which a finite point is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Direction {
    #[strum(to_string = "+")]
    Right,
    #[strum(to_string = "-")]
    Left,
}

impl Direction {
    pub fn parse(dir: &str) -> LimitResult<Direction> {
        Direction::from_str(dir.trim()).map_err(|_| LimitError::InvalidDirection(dir.to_string()))
    }
}

/// Limit of `e(x)` for `x -> +oo`.
pub fn limitinf(e: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<Expr> {
    ctx.guarded(
        "limitinf",
        || format!("{}, {}", e, x),
        |r: &Expr| r.to_string(),
        |ctx| limitinf_with(e, x, ctx),
    )
}

fn limitinf_with(e: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<Expr> {
    if !e.has(x) {
        return Ok(e.clone());
    }
    let (e, x) = if x.is_positive() {
        (e.clone(), x.clone())
    } else {
        let p = ctx.fresh_symbol("p", Assumptions::positive());
        (e.subs_var(x, &p.to_expr()), p)
    };
    let (c0, e0) = mrv_leadterm(&e, &x, &MrvSet::new(), ctx)?;
    debug!("limitinf: leading term of {} is ({}) * w^({})", e, c0, e0);
    match sign(&e0, &x, ctx)? {
        Sign::Positive => Ok(Expr::zero()),
        Sign::Negative => {
            if c0.is_imaginary_multiple() {
                return Ok(c0 * Expr::Infinity);
            }
            match sign(&c0, &x, ctx)? {
                Sign::Positive => Ok(Expr::Infinity),
                Sign::Negative => Ok(Expr::NegInfinity),
                Sign::Zero => Err(LimitError::DegenerateLeadingTerm(format!(
                    "leading coefficient of {} is zero",
                    e
                ))),
                Sign::Unresolved(s) => Ok(s * Expr::Infinity),
            }
        }
        Sign::Zero => limitinf(&c0, &x, ctx),
        Sign::Unresolved(s) => Err(LimitError::UndeterminedSign(s.to_string())),
    }
}

/// Limit of `e(z)` for `z -> z0` from the side `dir` (`"+"` or `"-"`).
///
/// `z0` may be `oo` or `-oo`, then `dir` is not used beyond validation.
pub fn gruntz(e: &Expr, z: &Expr, z0: &Expr, dir: &str) -> LimitResult<Expr> {
    gruntz_with_config(e, z, z0, dir, &GruntzConfig::default())
}

pub fn gruntz_with_config(
    e: &Expr,
    z: &Expr,
    z0: &Expr,
    dir: &str,
    config: &GruntzConfig,
) -> LimitResult<Expr> {
    let mut ctx = LimitContext::new(config.clone());
    gruntz_with_context(e, z, z0, dir, &mut ctx)
}

/// Same as [`gruntz`] with a caller-provided context, e.g. one with a trace sink.
pub fn gruntz_with_context(
    e: &Expr,
    z: &Expr,
    z0: &Expr,
    dir: &str,
    ctx: &mut LimitContext,
) -> LimitResult<Expr> {
    let Expr::Var(var) = z else {
        return Err(LimitError::InvalidArgument(format!(
            "second argument must be a symbol, got {}",
            z
        )));
    };
    let direction = Direction::parse(dir)?;
    info!("computing lim_{{{}->{}{}}} {}", var, z0, direction, e);
    let result = match z0 {
        Expr::Infinity => limitinf(e, var, ctx),
        Expr::NegInfinity => limitinf(&e.subs_var(var, &-z.clone()), var, ctx),
        _ => {
            let shift = z.clone().pow(Expr::int(-1));
            let point = match direction {
                Direction::Right => z0.clone() + shift,
                Direction::Left => z0.clone() - shift,
            };
            limitinf(&e.subs_var(var, &point), var, ctx)
        }
    }?;
    info!("limit = {}", result);
    Ok(result)
}

/// Right-hand limit, the default direction.
pub fn limit(e: &Expr, z: &Expr, z0: &Expr) -> LimitResult<Expr> {
    gruntz(e, z, z0, "+")
}

/// Parses the expression and the point before computing the limit.
pub fn limit_str(expr: &str, var: &str, point: &str, dir: &str) -> LimitResult<Expr> {
    let e = Expr::parse_expression(expr).map_err(LimitError::Parse)?;
    let z0 = Expr::parse_expression(point).map_err(LimitError::Parse)?;
    gruntz(&e, &Expr::symbol(var.trim()), &z0, dir)
}

/// An unevaluated limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub expr: Expr,
    pub var: Symbol,
    pub point: Expr,
    pub dir: Direction,
}

impl Limit {
    pub fn new(expr: Expr, var: Symbol, point: Expr, dir: Direction) -> Self {
        Limit {
            expr,
            var,
            point,
            dir,
        }
    }

    pub fn doit(&self) -> LimitResult<Expr> {
        self.doit_with_config(&GruntzConfig::default())
    }

    pub fn doit_with_config(&self, config: &GruntzConfig) -> LimitResult<Expr> {
        gruntz_with_config(
            &self.expr,
            &self.var.to_expr(),
            &self.point,
            &self.dir.to_string(),
            config,
        )
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.point.is_infinite() {
            write!(f, "lim_{{{}->{}}} {}", self.var, self.point, self.expr)
        } else {
            write!(
                f,
                "lim_{{{}->{}{}}} {}",
                self.var, self.point, self.dir, self.expr
            )
        }
    }
}
