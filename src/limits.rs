//! # Limits
//!
//! Limits of symbolic expressions at any point, including `±oo`, computed with the Gruntz
//! algorithm. The pieces, from the bottom up:
//! 1) `sign` decides the sign of an expression for `x -> oo`
//! 2) `compare` orders two expressions by growth rate
//! 3) `mrv` finds the most rapidly varying subexpressions and merges sets of them
//! 4) `rewrite` expresses the expression in an infinitesimal `w`
//! 5) `leadterm` extracts the leading term of the expansion in `w`
//! 6) `gruntz` drives the whole computation and maps every point onto `x -> oo`
//!
//!# Example
//! ```
//! use RustedGruntz::limits::gruntz::gruntz;
//! use RustedGruntz::symbolic::symbolic_engine::Expr;
//! let e = Expr::parse_expression("(1 + 1/x)^x").unwrap();
//! let result = gruntz(&e, &Expr::symbol("x"), &Expr::Infinity, "+").unwrap();
//! assert_eq!(result, Expr::e());
//! ```
pub mod compare;
/// settings read from toml
pub mod config;
/// recursion depth, fresh symbols and tracing of one computation
pub mod context;
pub mod gruntz;
pub mod leadterm;
pub mod limit_error;
pub mod mrv;
pub mod rewrite;
pub mod sign;
/// execution tree of the recursive calls
pub mod trace;
mod gruntz_tests;
