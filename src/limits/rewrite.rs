use crate::limits::context::LimitContext;
use crate::limits::leadterm::mrv_leadterm;
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::limits::mrv::{MrvSet, format_set, mrv};
use crate::limits::sign::{Sign, sign};
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use log::debug;

fn exponent_of(t: &Expr) -> LimitResult<&Expr> {
    match t {
        Expr::Exp(arg) => Ok(arg.as_ref()),
        _ => Err(LimitError::DegenerateLeadingTerm(format!(
            "{} in the mrv set is not an exponential",
            t
        ))),
    }
}

/// Rewrites `e` in terms of the infinitesimal `w`.
///
/// Every member `exp(a_i)` of `omega` becomes `exp(a_i - c_i*a_g) * w^c_i`, where `exp(a_g)`
/// is the member with the smallest own MRV set and `c_i = lim a_i/a_g`. When `a_g -> +oo`
/// the substitute is `1/w` so that `w -> 0+` either way. Returns the rewritten expression
/// together with the value of `log(w)` in terms of `x`.
///
/// Members are ordered by the size of their own MRV set, largest first; ties keep the
/// canonical expression order.
pub fn rewrite(
    e: &Expr,
    omega: &MrvSet,
    x: &Symbol,
    w: &Symbol,
    ctx: &mut LimitContext,
) -> LimitResult<(Expr, Expr)> {
    ctx.traced(
        "rewrite",
        || format!("{}, {}, {}, {}", e, format_set(omega), x, w),
        |(f, logw): &(Expr, Expr)| format!("({}, {})", f, logw),
        |ctx| rewrite_with(e, omega, x, w, ctx),
    )
}

fn rewrite_with(
    e: &Expr,
    omega: &MrvSet,
    x: &Symbol,
    w: &Symbol,
    ctx: &mut LimitContext,
) -> LimitResult<(Expr, Expr)> {
    if omega.is_empty() {
        return Err(LimitError::InvalidArgument(format!(
            "cannot rewrite {} with an empty mrv set",
            e
        )));
    }
    for t in omega {
        exponent_of(t)?;
    }
    let mut members: Vec<Expr> = omega.iter().cloned().collect();
    if members.len() > 1 {
        let mut sized = Vec::with_capacity(members.len());
        for t in members {
            let size = mrv(&t, x, ctx)?.len();
            sized.push((size, t));
        }
        sized.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        members = sized.into_iter().map(|(_, t)| t).collect();
    }
    let Some(g) = members.last() else {
        return Err(LimitError::InvalidArgument("empty mrv set".to_string()));
    };
    let g_arg = exponent_of(g)?.clone();
    let inverted = sign(&g_arg, x, ctx)? == Sign::Positive;
    let wsym = if inverted {
        w.to_expr().pow(Expr::int(-1))
    } else {
        w.to_expr()
    };

    let mut substitutions = Vec::with_capacity(members.len());
    for f in &members {
        let f_arg = exponent_of(f)?;
        let ratio = f_arg.clone() / g_arg.clone();
        let (c, e0) = mrv_leadterm(&ratio, x, &MrvSet::new(), ctx)?;
        if !e0.is_zero() {
            return Err(LimitError::DegenerateLeadingTerm(format!(
                "{} and {} are not in the same comparability class",
                f, g
            )));
        }
        let rest = (f_arg.clone() - c.clone() * g_arg.clone()).expand();
        let rewritten = rest.exp() * wsym.clone().pow(c);
        debug!("rewrite {} -> {}", f, rewritten);
        substitutions.push((f.clone(), rewritten));
    }

    let mut f = e.powsimp_exp(x);
    for (old, new) in &substitutions {
        f = f.subs(old, new);
    }
    let logw = if inverted { -g_arg } else { g_arg };
    Ok((f, logw))
}
