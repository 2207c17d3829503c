use crate::limits::context::LimitContext;
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::limits::mrv::{MrvSet, format_set, mrv};
use crate::limits::rewrite::rewrite;
use crate::symbolic::symbolic_engine::{Assumptions, Expr, Symbol};
use crate::symbolic::symbolic_series::{Series, nseries};
use log::debug;

/// `(c0, e0)` of the dominant term `c0 * w^e0`, `e0` a real constant
pub type LeadTerm = (Expr, Expr);

/// Expands `e` in `w` with the configured truncation orders until a term shows up.
pub fn calculate_series(e: &Expr, w: &Symbol, ctx: &mut LimitContext) -> LimitResult<Series> {
    let orders = ctx.config.series_orders.clone();
    ctx.traced(
        "calculate_series",
        || format!("{}, {}", e, w),
        |s: &Series| s.to_string(),
        |_| {
            for n in orders.iter() {
                let series = nseries(e, w, *n)?;
                if !series.is_empty() {
                    return Ok(series);
                }
                debug!("series of {} to order {} has no terms", e, n);
            }
            Err(LimitError::DegenerateLeadingTerm(format!(
                "({}).series({}, n={}) gave no terms",
                e,
                w,
                orders.last().copied().unwrap_or(0)
            )))
        },
    )
}

/// true if `sub` occurs in `e`, exponentials matching up to rational multiples
fn subexp(e: &Expr, sub: &Expr, marker: &Expr) -> bool {
    e.subs(sub, marker) != *e
}

/// Leading coefficient and exponent of `e` for `x -> oo`.
///
/// `omega` is an MRV set carried over from a caller; members not occurring in `e` are
/// dropped and the set is recomputed when nothing is left.
pub fn mrv_leadterm(
    e: &Expr,
    x: &Symbol,
    omega: &MrvSet,
    ctx: &mut LimitContext,
) -> LimitResult<LeadTerm> {
    ctx.guarded(
        "mrv_leadterm",
        || format!("{}, {}, {}", e, x, format_set(omega)),
        |(c0, e0): &LeadTerm| format!("({}, {})", c0, e0),
        |ctx| leadterm_with(e, x, omega, ctx),
    )
}

fn leadterm_with(
    e: &Expr,
    x: &Symbol,
    omega: &MrvSet,
    ctx: &mut LimitContext,
) -> LimitResult<LeadTerm> {
    if !e.has(x) {
        return Ok((e.clone(), Expr::zero()));
    }
    let marker = ctx.fresh_symbol("u", Assumptions::none()).to_expr();
    let mut omega: MrvSet = omega
        .iter()
        .filter(|t| subexp(e, t, &marker))
        .cloned()
        .collect();
    if omega.is_empty() {
        omega = mrv(e, x, ctx)?;
    }

    let var = x.to_expr();
    if omega.contains(&var) {
        // polynomial growth: move one level up the exponential scale and back
        let up = var.clone().exp();
        let omega_up: MrvSet = omega.iter().map(|t| t.subs_var(x, &up)).collect();
        let e_up = e.subs_var(x, &up);
        let (c0, e0) = mrv_leadterm(&e_up, x, &omega_up, ctx)?;
        return Ok((c0.subs_var(x, &var.ln()), e0));
    }

    let w = ctx.fresh_symbol("w", Assumptions::positive());
    let (f, logw) = rewrite(e, &omega, x, &w, ctx)?;
    let series = calculate_series(&f, &w, ctx)?;
    let series = series.subs_coefficients(&w.to_expr().ln(), &logw);
    let lead = series.leadterm().map(|(c0, e0)| (c0, e0.to_expr()));
    lead.ok_or_else(|| {
        LimitError::DegenerateLeadingTerm(format!(
            "leading coefficient of {} vanishes after substituting log({}) = {}",
            f, w, logw
        ))
    })
}
