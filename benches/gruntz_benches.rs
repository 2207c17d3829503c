use RustedGruntz::limits::gruntz::gruntz;
use RustedGruntz::symbolic::symbolic_engine::Expr;
use RustedGruntz::symbolic::symbolic_series::nseries;
use RustedGruntz::symbolic::symbolic_engine::Symbol;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_limits_at_infinity(c: &mut Criterion) {
    let x = Expr::symbol("x");
    let cases = [
        ("exp(x)/x", "exp(x)/x"),
        ("compound interest", "(1 + 1/x)^x"),
        ("same class exponentials", "(exp(x) + x)/exp(x)"),
    ];
    let mut group = c.benchmark_group("limits at infinity");
    for (name, input) in cases {
        let e = Expr::parse_expression(input).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| gruntz(black_box(&e), &x, &Expr::Infinity, "+").unwrap())
        });
    }
    group.finish();
}

fn bench_limit_at_zero(c: &mut Criterion) {
    let x = Expr::symbol("x");
    let e = Expr::parse_expression("sin(x)/x").unwrap();
    c.bench_function("sin(x)/x at 0+", |b| {
        b.iter(|| gruntz(black_box(&e), &x, &Expr::zero(), "+").unwrap())
    });
}

fn bench_series(c: &mut Criterion) {
    let w = Symbol::positive("w");
    let e = Expr::parse_expression("exp(w)/w").unwrap().subs_var(&Symbol::new("w"), &w.to_expr());
    c.bench_function("series of exp(w)/w to order 8", |b| {
        b.iter(|| nseries(black_box(&e), &w, 8).unwrap())
    });
}

criterion_group!(benches, bench_limits_at_infinity, bench_limit_at_zero, bench_series);
criterion_main!(benches);
