//! Most rapidly varying subexpressions.
//!
//! The MRV set of `e` is the set of its subexpressions that lie in the highest
//! comparability class found in `e`. The empty set stands for an `e` free of `x`, the set
//! `{x}` for purely polynomial or logarithmic growth.
use crate::limits::compare::compare;
use crate::limits::context::LimitContext;
use crate::limits::gruntz::limitinf;
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use itertools::Itertools;
use log::trace;
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub type MrvSet = BTreeSet<Expr>;

/// `{a, b, ...}`
pub fn format_set(set: &MrvSet) -> String {
    format!("{{{}}}", set.iter().join(", "))
}

/// MRV set of `e` for `x -> oo`.
pub fn mrv(e: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<MrvSet> {
    ctx.traced("mrv", || format!("{}, {}", e, x), format_set, |ctx| {
        let e = e.powsimp_exp(x);
        mrv_of(&e, x, ctx)
    })
}

fn mrv_of(e: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<MrvSet> {
    if !e.has(x) {
        return Ok(MrvSet::new());
    }
    match e {
        Expr::Var(s) if s == x => Ok(MrvSet::from([e.clone()])),
        Expr::Add(_) | Expr::Mul(_) => {
            // peel off x-free terms while that changes the node kind
            let mut current = e.clone();
            let dependent = loop {
                let (_, dependent) = current.as_independent(x);
                if !dependent.same_kind(&current)
                    && matches!(dependent, Expr::Add(_) | Expr::Mul(_))
                {
                    current = dependent;
                    continue;
                }
                break dependent;
            };
            if !dependent.same_kind(&current) {
                return mrv(&dependent, x, ctx);
            }
            match dependent.as_two_terms() {
                Some((a, b)) => {
                    let left = mrv(&a, x, ctx)?;
                    let right = mrv(&b, x, ctx)?;
                    mrv_max(left, right, x, ctx)
                }
                None => Err(LimitError::UnsupportedExpression(dependent.to_string())),
            }
        }
        Expr::Pow(base, exp) => {
            if exp.has(x) {
                let rewritten = Expr::product(vec![exp.as_ref().clone(), base.as_ref().clone().ln()]);
                mrv(&rewritten.exp(), x, ctx)
            } else {
                mrv(base, x, ctx)
            }
        }
        Expr::Ln(arg) => mrv(arg, x, ctx),
        Expr::Exp(arg) => {
            let limit = limitinf(arg, x, ctx)?;
            let inner = mrv(arg, x, ctx)?;
            if limit.is_unbounded() {
                mrv_max(MrvSet::from([e.clone()]), inner, x, ctx)
            } else {
                Ok(inner)
            }
        }
        Expr::Func(_, args) => {
            let mut acc = MrvSet::new();
            for arg in args {
                let set = mrv(arg, x, ctx)?;
                acc = mrv_max(acc, set, x, ctx)?;
            }
            Ok(acc)
        }
        Expr::Derivative(inner, _) => mrv(inner, x, ctx),
        _ => Err(LimitError::UnsupportedExpression(format!(
            "don't know how to calculate the mrv of {}",
            e
        ))),
    }
}

/// MRV set of a product or sum whose operands have MRV sets `f` and `g`.
pub fn mrv_max(f: MrvSet, g: MrvSet, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<MrvSet> {
    if f.is_empty() {
        return Ok(g);
    }
    if g.is_empty() {
        return Ok(f);
    }
    if !f.is_disjoint(&g) {
        return Ok(f.union(&g).cloned().collect());
    }
    let var = x.to_expr();
    if f.contains(&var) {
        return Ok(g);
    }
    if g.contains(&var) {
        return Ok(f);
    }
    let (Some(a), Some(b)) = (f.first(), g.first()) else {
        return Ok(f);
    };
    let ordering = compare(a, b, x, ctx)?;
    trace!("mrv_max: {} vs {} is {:?}", format_set(&f), format_set(&g), ordering);
    Ok(match ordering {
        Ordering::Greater => f,
        Ordering::Less => g,
        Ordering::Equal => f.union(&g).cloned().collect(),
    })
}
