#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedGruntz::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2*exp(-x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the canonical expression tree, symbols with assumptions and named functions
/// 2) builds expressions with natural operator syntax
/// 3) prints expressions in a form the parser reads back
///# Example#
/// ```
/// use RustedGruntz::symbolic::symbolic_engine::{Expr, Symbol};
/// let x = Expr::Var(Symbol::new("x"));
/// let expr = x.clone().exp() / x.clone();
/// println!("{}", expr);
/// let df_dx = expr.diff(&Symbol::new("x"));
/// println!("df_dx = {}", df_dx);
/// ```
pub mod symbolic_engine;
/// canonical sums, products, powers, exponentials, logarithms and function applications
pub mod symbolic_simplify;
/// sign and reality queries driven by symbol assumptions and numeric evaluation
pub mod symbolic_assumptions;
/// differentiation, substitution and numerical evaluation
pub mod symbolic_engine_derivatives;
/// truncated series in a positive infinitesimal
///# Example#
/// ```
/// use RustedGruntz::symbolic::symbolic_engine::{Expr, Func, Symbol};
/// use RustedGruntz::symbolic::symbolic_series::nseries;
/// let w = Symbol::positive("w");
/// let expr = Expr::func(Func::Sin, vec![w.to_expr()]) / w.to_expr();
/// let series = nseries(&expr, &w, 4).unwrap();
/// println!("{}", series);
/// ```
pub mod symbolic_series;
mod symbolic_engine_tests;
