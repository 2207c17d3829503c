//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::limits::config::GruntzConfig;
    use crate::limits::context::LimitContext;
    use crate::limits::gruntz::{
        Direction, Limit, gruntz, gruntz_with_config, gruntz_with_context, limit, limit_str,
        limitinf,
    };
    use crate::limits::limit_error::LimitError;
    use crate::limits::trace::TreeTrace;
    use crate::symbolic::symbolic_engine::{Expr, Func, Symbol};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    fn at_infinity(input: &str) -> Expr {
        gruntz(&parse(input), &x(), &Expr::Infinity, "+").unwrap()
    }

    #[test]
    fn test_constants_are_their_own_limit() {
        let mut ctx = LimitContext::default();
        let s = Symbol::new("x");
        assert_eq!(limitinf(&Expr::one(), &s, &mut ctx).unwrap(), Expr::one());
        let c = Expr::Pi + Expr::int(2);
        assert_eq!(limitinf(&c, &s, &mut ctx).unwrap(), c);
        let y = Expr::symbol("y");
        assert_eq!(gruntz(&y, &x(), &Expr::Infinity, "+").unwrap(), y);
        // running again on the result changes nothing
        let once = gruntz(&c, &x(), &Expr::zero(), "-").unwrap();
        assert_eq!(gruntz(&once, &x(), &Expr::zero(), "-").unwrap(), c);
    }

    #[test]
    fn test_variable_at_infinity() {
        assert_eq!(at_infinity("x"), Expr::Infinity);
        assert_eq!(at_infinity("1/x"), Expr::zero());
    }

    #[test]
    fn test_sin_x_over_x() {
        let e = parse("sin(x)/x");
        assert_eq!(gruntz(&e, &x(), &Expr::zero(), "+").unwrap(), Expr::one());
    }

    #[test]
    fn test_compound_interest() {
        assert_eq!(at_infinity("(1 + 1/x)^x"), Expr::e());
    }

    #[test]
    fn test_exponential_dominates_power() {
        assert_eq!(at_infinity("exp(x)/x"), Expr::Infinity);
        assert_eq!(at_infinity("x^2*exp(-x)"), Expr::zero());
        assert_eq!(at_infinity("log(x)/x"), Expr::zero());
        assert_eq!(at_infinity("exp(exp(x))/exp(x)"), Expr::Infinity);
    }

    #[test]
    fn test_same_class_exponentials() {
        assert_eq!(at_infinity("(exp(x) + x)/exp(x)"), Expr::one());
        assert_eq!(at_infinity("(x + 1)/x"), Expr::one());
    }

    #[test]
    fn test_function_at_infinity() {
        let expected = Expr::Mul(vec![Expr::rational(1, 2), Expr::Pi]);
        assert_eq!(at_infinity("atan(x)"), expected);
    }

    #[test]
    fn test_different_exponential_bases() {
        assert_eq!(at_infinity("3^x/(2^x + 3^x)"), Expr::one());
        assert_eq!(at_infinity("2^x/(2^x + 3^x)"), Expr::zero());
        assert_eq!(at_infinity("(3^x + 5^x)^(1/x)"), Expr::int(5));
    }

    #[test]
    fn test_nested_exponentials() {
        assert_eq!(at_infinity("exp(x)*(exp(1/x + exp(-x)) - exp(1/x))"), Expr::one());
        assert_eq!(
            at_infinity("exp(exp(x))/exp(exp(x - exp(-exp(x))))"),
            Expr::one()
        );
        assert_eq!(
            at_infinity("exp(exp(x))/exp(exp(x - exp(-exp(exp(x)))))"),
            Expr::one()
        );
    }

    #[test]
    fn test_saturating_functions() {
        assert_eq!(at_infinity("tanh(x)"), Expr::one());
        assert_eq!(at_infinity("erf(x)"), Expr::one());
    }

    #[test]
    fn test_non_real_and_symbolic_coefficients() {
        let y = Expr::symbol("y");
        assert_eq!(
            gruntz(&(Expr::ImagUnit * x()), &x(), &Expr::Infinity, "+").unwrap(),
            Expr::ImagUnit * Expr::Infinity
        );
        assert_eq!(
            gruntz(&(y.clone() * x()), &x(), &Expr::Infinity, "+").unwrap(),
            y.clone() * Expr::Infinity
        );
        // exp(y*x) against exp(x) depends on the sign of y
        let e = x().exp() + (y * x()).exp();
        assert!(matches!(
            gruntz(&e, &x(), &Expr::Infinity, "+"),
            Err(LimitError::UndeterminedSign(_))
        ));
    }

    #[test]
    fn test_one_sided_limits_at_zero() {
        let e = x().pow(Expr::int(-1));
        assert_eq!(gruntz(&e, &x(), &Expr::zero(), "+").unwrap(), Expr::Infinity);
        assert_eq!(gruntz(&e, &x(), &Expr::zero(), "-").unwrap(), Expr::NegInfinity);
        let e = parse("x*log(x)");
        assert_eq!(limit(&e, &x(), &Expr::zero()).unwrap(), Expr::zero());
        let e = parse("x^x");
        assert_eq!(limit(&e, &x(), &Expr::zero()).unwrap(), Expr::one());
    }

    #[test]
    fn test_finite_point() {
        let e = parse("(x^2 - 1)/(x - 1)");
        assert_eq!(gruntz(&e, &x(), &Expr::one(), "+").unwrap(), Expr::int(2));
    }

    #[test]
    fn test_minus_infinity() {
        let e = x().exp();
        assert_eq!(gruntz(&e, &x(), &Expr::NegInfinity, "+").unwrap(), Expr::zero());
    }

    #[test]
    fn test_limit_from_strings() {
        assert_eq!(limit_str("sin(x)/x", "x", "0", "+").unwrap(), Expr::one());
        assert_eq!(limit_str("exp(x)/x", "x", "oo", "-").unwrap(), Expr::Infinity);
        assert!(matches!(
            limit_str("sin(x", "x", "0", "+"),
            Err(LimitError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_arguments() {
        let e = x().exp();
        assert!(matches!(
            gruntz(&e, &Expr::int(2), &Expr::Infinity, "+"),
            Err(LimitError::InvalidArgument(_))
        ));
        assert!(matches!(
            gruntz(&e, &x(), &Expr::zero(), "up"),
            Err(LimitError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_unsupported_expression() {
        let f = Expr::func(Func::Undefined("f".to_string()), vec![x()]);
        assert!(matches!(
            gruntz(&f, &x(), &Expr::Infinity, "+"),
            Err(LimitError::UnsupportedExpression(_))
        ));
    }

    #[test]
    fn test_depth_guard() {
        let config = GruntzConfig::new().with_max_depth(1);
        let e = parse("exp(x)/x");
        assert_eq!(
            gruntz_with_config(&e, &x(), &Expr::Infinity, "+", &config),
            Err(LimitError::LimitComputationTooComplex(1))
        );
    }

    #[test]
    fn test_custom_series_orders() {
        let config = GruntzConfig::new().with_series_orders(vec![1, 3]);
        let e = parse("sin(x)/x");
        assert_eq!(
            gruntz_with_config(&e, &x(), &Expr::zero(), "+", &config).unwrap(),
            Expr::one()
        );
    }

    #[test]
    fn test_trace_tree() {
        let trees = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&trees);
        let trace =
            TreeTrace::with_callback(Box::new(move |t: &str| sink.borrow_mut().push(t.to_string())));
        let mut ctx = LimitContext::default().with_trace_sink(Box::new(trace));
        let e = x().pow(Expr::int(-1));
        let traced = gruntz_with_context(&e, &x(), &Expr::Infinity, "+", &mut ctx).unwrap();
        assert_eq!(traced, gruntz(&e, &x(), &Expr::Infinity, "+").unwrap());
        assert_eq!(ctx.depth(), 0);
        let trees = trees.borrow();
        assert_eq!(trees.len(), 1);
        assert!(trees[0].starts_with("limitinf(1/x, x) = 0\n"));
        assert!(trees[0].contains("+-mrv_leadterm("));
        assert!(trees[0].contains("rewrite("));
    }

    #[test]
    fn test_unevaluated_limit() {
        let at_oo = Limit::new(
            x().pow(Expr::int(-1)),
            Symbol::new("x"),
            Expr::Infinity,
            Direction::Right,
        );
        assert_eq!(at_oo.to_string(), "lim_{x->oo} 1/x");
        assert_eq!(at_oo.doit().unwrap(), Expr::zero());
        let at_zero = Limit::new(x().ln(), Symbol::new("x"), Expr::zero(), Direction::Right);
        assert_eq!(at_zero.to_string(), "lim_{x->0+} log(x)");
        assert_eq!(at_zero.doit().unwrap(), Expr::NegInfinity);
        assert_eq!(Direction::parse("-").unwrap(), Direction::Left);
    }
}
