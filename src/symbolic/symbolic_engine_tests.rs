//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::{Assumptions, Expr, Func, Symbol};
    use crate::symbols;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn test_add_assign() {
        let mut expr = x();
        expr += Expr::int(2);
        assert_eq!(expr, Expr::Add(vec![Expr::int(2), x()]));
    }

    #[test]
    fn test_mul_assign() {
        let mut expr = x();
        expr *= Expr::int(2);
        assert_eq!(expr, Expr::Mul(vec![Expr::int(2), x()]));
    }

    #[test]
    fn test_like_terms_are_collected() {
        assert_eq!(x() + x(), Expr::Mul(vec![Expr::int(2), x()]));
        assert_eq!(x() - x(), Expr::zero());
        assert_eq!(x() * x(), Expr::Pow(Box::new(x()), Box::new(Expr::int(2))));
        assert_eq!(x() / x(), Expr::one());
    }

    #[test]
    fn test_term_order_independence() {
        assert_eq!(x() + y(), y() + x());
        assert_eq!(x() * y() * Expr::int(3), Expr::int(3) * y() * x());
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let expr = -(x() + Expr::one());
        assert_eq!(expr, Expr::sum(vec![Expr::int(-1), -x()]));
    }

    #[test]
    fn test_exponentials_merge() {
        assert_eq!(x().exp() * (-x()).exp(), Expr::one());
        let merged = x().exp() * Expr::int(2).exp();
        assert_eq!(merged, Expr::Exp(Box::new(Expr::Add(vec![Expr::int(2), x()]))));
        assert_eq!(x().exp().pow(Expr::int(2)), (Expr::int(2) * x()).exp());
    }

    #[test]
    fn test_exp_log_identities() {
        assert_eq!(x().ln().exp(), x());
        assert_eq!(x().exp().ln(), x());
        assert_eq!(Expr::one().ln(), Expr::zero());
        assert_eq!(Expr::zero().exp(), Expr::one());
        assert_eq!(Expr::zero().ln(), Expr::NegInfinity);
        // exp(2*log(x)) = x^2
        assert_eq!((Expr::int(2) * x().ln()).exp(), x().pow(Expr::int(2)));
    }

    #[test]
    fn test_rational_powers() {
        assert_eq!(Expr::int(8).pow(Expr::rational(1, 3)), Expr::int(2));
        assert_eq!(Expr::int(2).pow(Expr::int(-2)), Expr::rational(1, 4));
        assert_eq!(Expr::int(4).pow(Expr::rational(3, 2)), Expr::int(8));
        assert_eq!(
            Expr::int(2).pow(Expr::rational(3, 2)),
            Expr::Mul(vec![
                Expr::int(2),
                Expr::Pow(Box::new(Expr::int(2)), Box::new(Expr::rational(1, 2)))
            ])
        );
        assert_eq!(Expr::int(-1).sqrt(), Expr::ImagUnit);
    }

    #[test]
    fn test_nested_powers() {
        let expr = x().pow(Expr::int(2)).pow(Expr::int(3));
        assert_eq!(expr, x().pow(Expr::int(6)));
        let p = Expr::Var(Symbol::positive("p"));
        assert_eq!(p.clone().pow(Expr::int(2)).sqrt(), p);
    }

    #[test]
    fn test_imaginary_unit() {
        assert_eq!(Expr::ImagUnit * Expr::ImagUnit, Expr::int(-1));
        assert!((Expr::int(3) * Expr::ImagUnit).is_imaginary_multiple());
        assert!(!(x() * Expr::ImagUnit * Expr::ImagUnit).is_imaginary_multiple());
    }

    #[test]
    fn test_infinities() {
        assert_eq!(Expr::Infinity + Expr::one(), Expr::Infinity);
        assert_eq!(Expr::Infinity - Expr::Infinity, Expr::NaN);
        assert_eq!(Expr::int(-2) * Expr::Infinity, Expr::NegInfinity);
        assert_eq!(Expr::zero() * x(), Expr::zero());
        assert_eq!(Expr::Infinity.pow(Expr::int(-1)), Expr::zero());
        assert!((Expr::ImagUnit * Expr::Infinity).is_unbounded());
    }

    #[test]
    fn test_function_values() {
        assert_eq!(Expr::func(Func::Sin, vec![Expr::zero()]), Expr::zero());
        assert_eq!(Expr::func(Func::Cos, vec![Expr::zero()]), Expr::one());
        assert_eq!(
            Expr::func(Func::Atan, vec![Expr::Infinity]),
            Expr::Mul(vec![Expr::rational(1, 2), Expr::Pi])
        );
        assert_eq!(Expr::func(Func::Tanh, vec![Expr::NegInfinity]), Expr::int(-1));
        assert_eq!(Func::from_name("erf"), Func::Erf);
        assert_eq!(Func::from_name("g"), Func::Undefined("g".to_string()));
    }

    #[test]
    fn test_as_independent() {
        let s = Symbol::new("x");
        let expr = Expr::int(2) + x() * y();
        assert_eq!(expr.as_independent(&s), (Expr::int(2), x() * y()));
        let expr = Expr::int(3) * x() * x().exp();
        assert_eq!(expr.as_independent(&s), (Expr::int(3), x() * x().exp()));
        assert_eq!(y().as_independent(&s), (y(), Expr::one()));
    }

    #[test]
    fn test_as_two_terms_and_coeff() {
        let expr = Expr::int(2) * x() * y();
        assert_eq!(expr.as_two_terms(), Some((Expr::int(2), x() * y())));
        let (c, rest) = expr.as_coeff_mul();
        assert_eq!(Expr::Const(c), Expr::int(2));
        assert_eq!(rest, x() * y());
        assert_eq!(x().as_two_terms(), None);
    }

    #[test]
    fn test_free_symbols_and_has() {
        let expr = x().exp() + y().ln();
        let symbols = expr.free_symbols();
        assert_eq!(symbols.len(), 2);
        assert!(expr.has(&Symbol::new("x")));
        assert!(!expr.has(&Symbol::new("z")));
        assert!(!expr.has(&Symbol::dummy("x", 7, Assumptions::positive())));
        assert!((Expr::Pi + Expr::one()).is_number());
    }

    #[test]
    fn test_diff_rules() {
        let s = Symbol::new("x");
        assert_eq!(
            x().pow(Expr::int(3)).diff(&s),
            Expr::int(3) * x().pow(Expr::int(2))
        );
        assert_eq!(
            Expr::func(Func::Sin, vec![x()]).diff(&s),
            Expr::func(Func::Cos, vec![x()])
        );
        let exp2x = (Expr::int(2) * x()).exp();
        assert_eq!(exp2x.diff(&s), Expr::int(2) * exp2x.clone());
        assert_eq!(x().ln().diff(&s), x().pow(Expr::int(-1)));
        assert_eq!(y().diff(&s), Expr::zero());
        let undefined = Expr::func(Func::Undefined("f".to_string()), vec![x()]);
        assert_eq!(
            undefined.diff(&s),
            Expr::Derivative(Box::new(undefined.clone()), s.clone())
        );
    }

    #[test]
    fn test_subs() {
        let s = Symbol::new("x");
        let expr = x().pow(Expr::int(2)) + x();
        assert_eq!(
            expr.subs_var(&s, &Expr::int(3)),
            Expr::int(12)
        );
        // exponentials match up to a rational multiple of the argument
        assert_eq!((-x()).exp().subs(&x().exp(), &y()), y().pow(Expr::int(-1)));
        assert_eq!(
            (Expr::int(2) * x()).exp().subs(&x().exp(), &y()),
            y().pow(Expr::int(2))
        );
        // an exponential of a sum is not split to find a match
        let shifted = (x() + y().ln()).exp();
        assert_eq!(shifted.subs(&x().exp(), &Expr::int(5)), shifted);
        let nested = (x().exp() + (-x()).exp()).exp();
        assert_eq!(
            nested.subs(&(-x()).exp(), &y()),
            (y().pow(Expr::int(-1)) + y()).exp()
        );
    }

    #[test]
    fn test_expand() {
        let expr = (x() + Expr::one()).pow(Expr::int(2)).expand();
        let expected = Expr::sum(vec![
            x().pow(Expr::int(2)),
            Expr::int(2) * x(),
            Expr::one(),
        ]);
        assert_eq!(expr, expected);
        let expr = (x() * (y() + Expr::int(2))).expand();
        assert_eq!(expr, x() * y() + Expr::int(2) * x());
    }

    #[test]
    fn test_powsimp_exp() {
        let s = Symbol::new("x");
        let expr = x().pow(x());
        assert_eq!(expr.powsimp_exp(&s), (x() * x().ln()).exp());
        // constant exponents are left alone
        let expr = x().pow(Expr::int(2));
        assert_eq!(expr.powsimp_exp(&s), expr);
    }

    #[test]
    fn test_eval_f64() {
        let value = (Expr::Pi - Expr::int(3)).eval_f64().unwrap();
        assert_relative_eq!(value, std::f64::consts::PI - 3.0, epsilon = 1e-12);
        let value = Expr::func(Func::Erf, vec![Expr::one()]).eval_f64().unwrap();
        assert_relative_eq!(value, 0.8427007929, epsilon = 1e-6);
        assert_relative_eq!(Expr::e().eval_f64().unwrap(), std::f64::consts::E, epsilon = 1e-12);
        assert_eq!(x().eval_f64(), None);
    }

    #[test]
    fn test_assumptions() {
        assert_eq!(Expr::int(2).ln().is_positive(), Some(true));
        assert_eq!((Expr::Pi - Expr::int(4)).is_negative(), Some(true));
        assert_eq!(Expr::Var(Symbol::positive("p")).is_positive(), Some(true));
        assert_eq!(x().is_positive(), None);
        let p = Expr::Var(Symbol::positive("p"));
        assert_eq!(p.clone().exp().is_positive(), Some(true));
        assert_eq!((-p).is_negative(), Some(true));
    }

    #[test]
    fn test_erf_sign_needs_a_clear_margin() {
        let erf_one = Expr::func(Func::Erf, vec![Expr::one()]);
        assert_eq!((erf_one.clone() - Expr::rational(1, 2)).known_sign(), Some(1));
        // erf(1) = 0.84270079294...
        let close = erf_one - Expr::rational(84270079, 100000000);
        assert_eq!(close.known_sign(), None);
        let close = Expr::Pi - Expr::rational(314159265, 100000000);
        assert_eq!(close.known_sign(), Some(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(x().pow(Expr::int(-1)).to_string(), "1/x");
        assert_eq!((-x()).exp().to_string(), "exp(-x)");
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!(Expr::e().to_string(), "E");
        assert_eq!((x() / Expr::int(2)).to_string(), "x/2");
        assert_eq!(Expr::rational(1, 2).to_string(), "1/2");
        assert_eq!((x() - Expr::one()).to_string(), "-1 + x");
        let dummy = Symbol::dummy("w", 3, Assumptions::positive());
        assert_eq!(dummy.to_string(), "_w");
    }

    #[test]
    fn test_symbols_macro() {
        let (x, y) = symbols!(x, y);
        assert_eq!(x, Expr::symbol("x"));
        assert_eq!(y, Expr::symbol("y"));
        let vars = Expr::Symbols("a, b, c");
        assert_eq!(vars.len(), 3);
    }
}
