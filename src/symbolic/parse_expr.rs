use crate::symbolic::symbolic_engine::{Expr, Func, Symbol};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of},
    combinator::{map, not, opt, recognize},
    error::{Error, ErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};
use num::{BigInt, BigRational};
use std::str::FromStr;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedGruntz::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2*exp(-x) + log(x)/x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
//   grammar, lowest precedence first
//
//   sum     := product (('+' | '-') product)*
//   product := unary (('*' | '/') unary)*
//   unary   := ('-' | '+') unary | power
//   power   := atom (('^' | '**') unary)?
//   atom    := number | call | name | '(' sum ')'

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parses an identifier (letters, digits and underscores, not starting with a digit)
fn parse_name(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// integers and decimals, kept exact: "2.5" -> 5/2
fn parse_number(input: &str) -> IResult<&str, Expr> {
    let (input, text) = recognize(pair(digit1, opt(pair(char('.'), digit1)))).parse(input)?;
    let value = match text.split_once('.') {
        Some((whole, frac)) => {
            let digits = format!("{}{}", whole, frac);
            let numer = BigInt::from_str(&digits)
                .map_err(|_| nom::Err::Failure(Error::new(input, ErrorKind::Digit)))?;
            let denom = num::pow(BigInt::from(10), frac.len());
            BigRational::new(numer, denom)
        }
        None => {
            let numer = BigInt::from_str(text)
                .map_err(|_| nom::Err::Failure(Error::new(input, ErrorKind::Digit)))?;
            BigRational::from_integer(numer)
        }
    };
    Ok((input, Expr::Const(value)))
}

fn named_constant(name: &str) -> Expr {
    match name {
        "pi" => Expr::Pi,
        "E" => Expr::e(),
        "I" => Expr::ImagUnit,
        "oo" => Expr::Infinity,
        _ => Expr::Var(Symbol::new(name)),
    }
}

fn apply_function(name: &str, mut args: Vec<Expr>) -> Option<Expr> {
    let unary = args.len() == 1;
    match name {
        "exp" if unary => args.pop().map(|a| a.exp()),
        "log" | "ln" if unary => args.pop().map(|a| a.ln()),
        "sqrt" if unary => args.pop().map(|a| a.sqrt()),
        "exp" | "log" | "ln" | "sqrt" => None,
        _ => {
            let func = Func::from_name(name);
            if func.is_known() && !unary {
                None
            } else {
                Some(Expr::func(func, args))
            }
        }
    }
}

fn parse_call_or_name(input: &str) -> IResult<&str, Expr> {
    let (input, name) = parse_name(input)?;
    let (rest, args) = opt(delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), parse_sum),
        char(')'),
    ))
    .parse(input)?;
    match args {
        None => Ok((rest, named_constant(&name))),
        Some(args) => match apply_function(&name, args) {
            Some(expr) => Ok((rest, expr)),
            None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
        },
    }
}

fn parse_atom(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        parse_number,
        parse_call_or_name,
        delimited(char('('), parse_sum, char(')')),
    )))
    .parse(input)
}

fn parse_power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = parse_atom(input)?;
    let (input, exponent) = opt(preceded(alt((tag("**"), tag("^"))), parse_unary)).parse(input)?;
    Ok((
        input,
        match exponent {
            Some(exp) => base.pow(exp),
            None => base,
        },
    ))
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), parse_unary), |e| -e),
        preceded(ws(char('+')), parse_unary),
        parse_power,
    ))
    .parse(input)
}

fn parse_product(input: &str) -> IResult<&str, Expr> {
    let (input, first) = parse_unary(input)?;
    let operator = alt((terminated(char('*'), not(char('*'))), char('/')));
    let (input, rest) = many0(pair(ws(operator), parse_unary)).parse(input)?;
    let mut factors = vec![first];
    for (op, factor) in rest {
        if op == '*' {
            factors.push(factor);
        } else {
            factors.push(factor.pow(Expr::int(-1)));
        }
    }
    Ok((input, Expr::product(factors)))
}

fn parse_sum(input: &str) -> IResult<&str, Expr> {
    let (input, first) = parse_product(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), parse_product)).parse(input)?;
    let mut terms = vec![first];
    for (op, term) in rest {
        if op == '+' {
            terms.push(term);
        } else {
            terms.push(-term);
        }
    }
    Ok((input, Expr::sum(terms)))
}

/// Parses the whole input into a canonical expression.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    match parse_sum(input) {
        Ok((rest, expr)) => {
            if rest.trim().is_empty() {
                Ok(expr)
            } else {
                Err(format!("unexpected input at '{}' in '{}'", rest.trim(), input))
            }
        }
        Err(e) => Err(format!("failed to parse '{}': {}", input, e)),
    }
}

impl Expr {
    /// String to symbolic expression
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(Expr::parse_expression("42").unwrap(), Expr::int(42));
        assert_eq!(Expr::parse_expression("2.5").unwrap(), Expr::rational(5, 2));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(Expr::parse_expression("x").unwrap(), x());
        assert_eq!(Expr::parse_expression(" x_1 ").unwrap(), Expr::symbol("x_1"));
    }

    #[test]
    fn test_parse_named_constants() {
        assert_eq!(Expr::parse_expression("pi").unwrap(), Expr::Pi);
        assert_eq!(Expr::parse_expression("E").unwrap(), Expr::e());
        assert_eq!(Expr::parse_expression("oo").unwrap(), Expr::Infinity);
        assert_eq!(Expr::parse_expression("-oo").unwrap(), Expr::NegInfinity);
    }

    #[test]
    fn test_parse_addition_and_subtraction() {
        let parsed = Expr::parse_expression("x + 1 - x").unwrap();
        assert_eq!(parsed, Expr::one());
    }

    #[test]
    fn test_parse_division() {
        let parsed = Expr::parse_expression("1/x").unwrap();
        assert_eq!(parsed, x().pow(Expr::int(-1)));
    }

    #[test]
    fn test_parse_power_forms() {
        let caret = Expr::parse_expression("x^2").unwrap();
        let stars = Expr::parse_expression("x**2").unwrap();
        assert_eq!(caret, stars);
        assert_eq!(caret, x().pow(Expr::int(2)));
        // right associative
        let tower = Expr::parse_expression("2^3^2").unwrap();
        assert_eq!(tower, Expr::int(512));
    }

    #[test]
    fn test_parse_negative_exponent() {
        let parsed = Expr::parse_expression("x^-1").unwrap();
        assert_eq!(parsed, x().pow(Expr::int(-1)));
    }

    #[test]
    fn test_parse_functions() {
        let parsed = Expr::parse_expression("sin(x)/x").unwrap();
        assert_eq!(
            parsed,
            Expr::func(Func::Sin, vec![x()]) * x().pow(Expr::int(-1))
        );
        let parsed = Expr::parse_expression("log(exp(x))").unwrap();
        assert_eq!(parsed, x());
        let parsed = Expr::parse_expression("sqrt(4)").unwrap();
        assert_eq!(parsed, Expr::int(2));
    }

    #[test]
    fn test_parse_undefined_function() {
        let parsed = Expr::parse_expression("f(x, 2)").unwrap();
        assert_eq!(
            parsed,
            Expr::Func(Func::Undefined("f".to_string()), vec![x(), Expr::int(2)])
        );
    }

    #[test]
    fn test_parse_nested_brackets() {
        let parsed = Expr::parse_expression("(1 + 1/x)^x").unwrap();
        let expected = (Expr::one() + x().pow(Expr::int(-1))).pow(x());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_invalid_expression() {
        assert!(Expr::parse_expression("x +").is_err());
        assert!(Expr::parse_expression("(x").is_err());
        assert!(Expr::parse_expression("sin(x, y)").is_err());
    }

    #[test]
    fn test_display_reparses() {
        let expr = Expr::parse_expression("x^2*exp(-x) + log(x)/x - 3").unwrap();
        let reparsed = Expr::parse_expression(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed);
    }
}
