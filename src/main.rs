#![allow(non_snake_case)]
use RustedGruntz::Examples::limit_examples::limit_examples;
use RustedGruntz::Utils::logger::init_logger;
use RustedGruntz::limits::gruntz::limit_str;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: RustedGruntz \"<expr>\" <var> <point> [+|-]\n       RustedGruntz --example <n>";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let loglevel = env::var("GRUNTZ_LOG").ok();
    if let Err(e) = init_logger(loglevel.as_deref().or(Some("warn"))) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let result = match args.as_slice() {
        [flag, n] if flag == "--example" => match n.parse::<usize>() {
            Ok(example) => limit_examples(example).map(|r| r.to_string()),
            Err(_) => {
                eprintln!("{}", USAGE);
                return ExitCode::FAILURE;
            }
        },
        [expr, var, point] => limit_str(expr, var, point, "+").map(|r| r.to_string()),
        [expr, var, point, dir] => limit_str(expr, var, point, dir).map(|r| r.to_string()),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    match result {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
