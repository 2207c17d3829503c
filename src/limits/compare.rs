use crate::limits::context::LimitContext;
use crate::limits::gruntz::limitinf;
use crate::limits::limit_error::LimitResult;
use crate::symbolic::symbolic_engine::{Expr, Symbol};
use log::trace;
use std::cmp::Ordering;

/// Growth rate of `a` against `b` for `x -> oo`.
///
/// With `L = lim log(a)/log(b)`: `L = 0` means `a` varies slower (`Less`), an infinite `L`
/// means faster (`Greater`), anything else puts both in the same comparability class.
pub fn compare(a: &Expr, b: &Expr, x: &Symbol, ctx: &mut LimitContext) -> LimitResult<Ordering> {
    let ratio = a.clone().ln() / b.clone().ln();
    let limit = limitinf(&ratio, x, ctx)?;
    let ordering = if limit.is_zero() {
        Ordering::Less
    } else if limit.is_infinite() {
        Ordering::Greater
    } else {
        Ordering::Equal
    };
    trace!("compare({}, {}) = {:?} from limit {}", a, b, ordering, limit);
    Ok(ordering)
}
