// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::logger::init_logger;
use crate::limits::config::GruntzConfig;
use crate::limits::context::LimitContext;
use crate::limits::gruntz::{Direction, Limit, gruntz, gruntz_with_config, gruntz_with_context};
use crate::limits::limit_error::{LimitError, LimitResult};
use crate::limits::trace::TreeTrace;
use crate::symbolic::symbolic_engine::{Expr, Symbol};

/// Runs one of the bundled examples and returns the computed limit.
pub fn limit_examples(example: usize) -> LimitResult<Expr> {
    let x = Expr::symbol("x");
    match example {
        0 => {
            // the classic: sin(x)/x at 0 from the right
            let e = Expr::parse_expression("sin(x)/x").map_err(LimitError::Parse)?;
            let result = gruntz(&e, &x, &Expr::zero(), "+")?;
            println!("lim_{{x->0+}} {} = {}", e, result);
            Ok(result)
        }
        1 => {
            // exponential-of-log rewriting: (1 + 1/x)^x -> E
            let e = (Expr::one() + x.clone().pow(Expr::int(-1))).pow(x.clone());
            let lim = Limit::new(e, Symbol::new("x"), Expr::Infinity, Direction::Right);
            let result = lim.doit()?;
            println!("{} = {}", lim, result);
            Ok(result)
        }
        2 => {
            // exp(x) beats any power of x
            let e = x.clone().exp() / x.clone().pow(Expr::int(10));
            let result = gruntz(&e, &x, &Expr::Infinity, "+")?;
            println!("lim_{{x->oo}} {} = {}", e, result);
            Ok(result)
        }
        3 => {
            // one-sided limits at a finite point
            let e = x.clone().pow(Expr::int(-1));
            let right = gruntz(&e, &x, &Expr::zero(), "+")?;
            let left = gruntz(&e, &x, &Expr::zero(), "-")?;
            println!("lim_{{x->0+}} {} = {}, lim_{{x->0-}} {} = {}", e, right, e, left);
            Ok(left)
        }
        4 => {
            // execution tree of every recursive call
            let trace = TreeTrace::with_callback(Box::new(|tree: &str| println!("{}", tree)));
            let mut ctx = LimitContext::default().with_trace_sink(Box::new(trace));
            let e = x.clone().exp() / x.clone();
            gruntz_with_context(&e, &x, &Expr::Infinity, "+", &mut ctx)
        }
        _ => {
            // settings from toml, logging switched on
            let config = GruntzConfig::from_toml_str(
                "[gruntz]\nmax_depth = 100\nseries_orders = [2, 4, 6, 8]\nloglevel = \"info\"\n",
            )?;
            init_logger(config.loglevel.as_deref())?;
            let e = x.clone().ln() / x.clone();
            let result = gruntz_with_config(&e, &x, &Expr::Infinity, "+", &config)?;
            println!("lim_{{x->oo}} {} = {}", e, result);
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_run() {
        assert_eq!(limit_examples(0).unwrap(), Expr::one());
        assert_eq!(limit_examples(1).unwrap(), Expr::e());
        assert_eq!(limit_examples(2).unwrap(), Expr::Infinity);
        assert_eq!(limit_examples(3).unwrap(), Expr::NegInfinity);
        assert_eq!(limit_examples(4).unwrap(), Expr::Infinity);
    }
}
