use crate::cli::condition::{Condition, Select};
use crate::cli::err::CliErr;
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, space1};
use nom::combinator::{eof, map, map_opt, opt, rest, success, value, verify};
use nom::error::context;
use nom::sequence::{preceded, terminated};
use nom::{Err, IResult, Parser};
use nom_language::error::{VerboseError, convert_error};
use rseq::Integer;

pub(in crate::cli::parse) type ParserError<'a> = VerboseError<&'a str>;
pub(in crate::cli::parse) type ParserResult<'a, O> = IResult<&'a str, O, ParserError<'a>>;

/// 完整解析一个参数值，解析失败或有剩余内容时返回错误。
pub(in crate::cli::parse) fn parse_whole<'a, O>(
    cmd: &'static str, arg: &'static str, input: &'a str,
    parser: impl Parser<&'a str, Output = O, Error = ParserError<'a>>,
) -> Result<O, CliErr> {
    match terminated(parser, eof).parse(input) {
        Ok((_, res)) => Ok(res),
        Err(Err::Error(err) | Err::Failure(err)) => Err(CliErr::ArgParseErr {
            cmd,
            arg,
            arg_value: input.to_string(),
            error: convert_error(input, err).trim_end().to_string(),
        }),
        Err(Err::Incomplete(_)) => {
            Err(CliErr::ArgParseErr { cmd, arg, arg_value: input.to_string(), error: "incomplete".to_string() })
        }
    }
}

pub(in crate::cli::parse) fn integer(input: &str) -> ParserResult<'_, Integer> {
    nom::character::complete::i64(input)
}

pub(in crate::cli::parse) fn count(input: &str) -> ParserResult<'_, usize> {
    nom::character::complete::usize(input)
}

/// `<start>,<end>[,<step>]`，步长默认为1。
pub(in crate::cli::parse) fn range_arg(input: &str) -> ParserResult<'_, (Integer, Integer, Integer)> {
    context(
        "range",
        map((integer, char(','), integer, opt(preceded(char(','), integer))), |(start, _, end, step)| {
            (start, end, step.unwrap_or(1))
        }),
    )
    .parse(input)
}

/// `<start>[,<end>]`
pub(in crate::cli::parse) fn slice_arg(input: &str) -> ParserResult<'_, (isize, Option<isize>)> {
    context(
        "slice",
        map((integer, opt(preceded(char(','), integer))), |(start, end)| {
            (start as isize, end.map(|end| end as isize))
        }),
    )
    .parse(input)
}

/// 条件表达式。正则表达式在解析后才编译，编译失败时作为结果中的错误返回。
pub(in crate::cli::parse) fn cond(input: &str) -> ParserResult<'_, Result<Condition, CliErr>> {
    alt((
        map(
            alt((
                len_range,
                len_spec,
                num,
                text_all_case,
                text_empty_or_blank,
                text_match("prefix", |text| Select::Prefix { text }),
                text_match("suffix", |text| Select::Suffix { text }),
                text_match("contains", |text| Select::Contains { text }),
            )),
            Ok,
        ),
        context(
            "Cond::RegMatch",
            map(preceded((tag_no_case("reg"), space1), rest), |reg: &str| Select::new_reg_match(reg).map(Select::yes)),
        ),
    ))
    .parse(input)
}

fn len_range(input: &str) -> ParserResult<'_, Condition> {
    context(
        "Cond::TextLenRange",
        preceded(
            (tag_no_case("len"), space1),
            map_opt((opt(char('!')), opt(count), char(','), opt(count)), |(not, min, _, max)| {
                (min.is_some() || max.is_some())
                    .then(|| Condition::new(Select::TextLenRange { min, max }, not.is_some()))
            }),
        ),
    )
    .parse(input)
}

fn len_spec(input: &str) -> ParserResult<'_, Condition> {
    context(
        "Cond::TextLenSpec",
        preceded(
            (tag_no_case("len"), space1),
            map((opt(char('!')), char('='), count), |(not, _, spec)| {
                Condition::new(Select::TextLenSpec { spec }, not.is_some())
            }),
        ),
    )
    .parse(input)
}

fn num(input: &str) -> ParserResult<'_, Condition> {
    let num_type = || alt((value(true, tag_no_case("integer")), value(false, tag_no_case("float"))));
    context(
        "Cond::Num",
        preceded(
            tag_no_case("num"),
            alt((
                // 必定有!
                map(preceded((space1, char('!')), opt(num_type())), |integer| {
                    Condition::new(Select::Num { integer }, true)
                }),
                map(preceded(space1, num_type()), |integer| Condition::new(Select::Num { integer: Some(integer) }, false)),
                success(Condition::new(Select::Num { integer: None }, false)),
            )),
        ),
    )
    .parse(input)
}

fn text_all_case(input: &str) -> ParserResult<'_, Condition> {
    context(
        "Cond::TextAllCase",
        alt((
            value(Select::TextAllCase { upper: true }.yes(), tag_no_case("upper")),
            value(Select::TextAllCase { upper: false }.yes(), tag_no_case("lower")),
        )),
    )
    .parse(input)
}

fn text_empty_or_blank(input: &str) -> ParserResult<'_, Condition> {
    context(
        "Cond::TextEmptyOrBlank",
        alt((
            value(Select::TextEmptyOrBlank { empty: true }.yes(), tag_no_case("empty")),
            value(Select::TextEmptyOrBlank { empty: false }.yes(), tag_no_case("blank")),
        )),
    )
    .parse(input)
}

/// `<name> [!]<text>`，文本为剩余的全部内容。
fn text_match<'a>(
    name: &'static str, build: fn(String) -> Select,
) -> impl Parser<&'a str, Output = Condition, Error = ParserError<'a>> {
    context(
        name,
        map(
            preceded((tag_no_case(name), space1), (opt(char('!')), verify(rest, |text: &str| !text.is_empty()))),
            move |(not, text): (Option<char>, &str)| Condition::new(build(text.to_string()), not.is_some()),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cond(input: &str) -> Result<Condition, CliErr> {
        parse_whole("filter", "cond", input, cond)?
    }

    fn yes(select: Select) -> Result<Condition, CliErr> {
        Ok(select.yes())
    }

    fn no(select: Select) -> Result<Condition, CliErr> {
        Ok(Condition::new(select, true))
    }

    #[test]
    fn test_range_arg() {
        assert_eq!(parse_whole("range", "range", "0,10", range_arg), Ok((0, 10, 1)));
        assert_eq!(parse_whole("range", "range", "10,-5,-3", range_arg), Ok((10, -5, -3)));
        assert!(parse_whole("range", "range", "0", range_arg).is_err());
        assert!(parse_whole("range", "range", "0,10,", range_arg).is_err());
        assert!(matches!(
            parse_whole("range", "range", "a,b", range_arg),
            Err(CliErr::ArgParseErr { cmd: "range", arg: "range", .. })
        ));
    }

    #[test]
    fn test_slice_arg() {
        assert_eq!(parse_whole("slice", "range", "0,-6", slice_arg), Ok((0, Some(-6))));
        assert_eq!(parse_whole("slice", "range", "-5", slice_arg), Ok((-5, None)));
        assert!(parse_whole("slice", "range", "1,2,3", slice_arg).is_err());
    }

    #[test]
    fn test_cond_text_len() {
        assert_eq!(parse_cond("len 1,3"), yes(Select::TextLenRange { min: Some(1), max: Some(3) }));
        assert_eq!(parse_cond("len ,3"), yes(Select::TextLenRange { min: None, max: Some(3) }));
        assert_eq!(parse_cond("LEN 1,"), yes(Select::TextLenRange { min: Some(1), max: None }));
        assert_eq!(parse_cond("len !1,3"), no(Select::TextLenRange { min: Some(1), max: Some(3) }));
        assert_eq!(parse_cond("len =3"), yes(Select::TextLenSpec { spec: 3 }));
        assert_eq!(parse_cond("len !=3"), no(Select::TextLenSpec { spec: 3 }));
        assert!(parse_cond("len ,").is_err());
        assert!(parse_cond("len !,").is_err());
        assert!(parse_cond("len 1.2,3").is_err());
    }

    #[test]
    fn test_cond_num() {
        assert_eq!(parse_cond("num"), yes(Select::Num { integer: None }));
        assert_eq!(parse_cond("num integer"), yes(Select::Num { integer: Some(true) }));
        assert_eq!(parse_cond("num float"), yes(Select::Num { integer: Some(false) }));
        assert_eq!(parse_cond("num !"), no(Select::Num { integer: None }));
        assert_eq!(parse_cond("num !integer"), no(Select::Num { integer: Some(true) }));
        assert!(parse_cond("num double").is_err());
        assert!(parse_cond("numeric").is_err());
    }

    #[test]
    fn test_cond_text() {
        assert_eq!(parse_cond("upper"), yes(Select::TextAllCase { upper: true }));
        assert_eq!(parse_cond("lower"), yes(Select::TextAllCase { upper: false }));
        assert_eq!(parse_cond("empty"), yes(Select::TextEmptyOrBlank { empty: true }));
        assert_eq!(parse_cond("blank"), yes(Select::TextEmptyOrBlank { empty: false }));
        assert_eq!(parse_cond("prefix http"), yes(Select::Prefix { text: "http".to_string() }));
        assert_eq!(parse_cond("suffix !.txt"), no(Select::Suffix { text: ".txt".to_string() }));
        assert_eq!(parse_cond("contains a b"), yes(Select::Contains { text: "a b".to_string() }));
        assert!(parse_cond("prefix ").is_err());
        assert!(parse_cond("").is_err());
    }

    #[test]
    fn test_cond_reg() {
        assert_eq!(parse_cond(r"reg \d+"), Ok(Select::new_reg_match(r"\d+").unwrap().yes()));
        assert!(matches!(parse_cond("reg (a"), Err(CliErr::ParseRegexErr { .. })));
        assert!(matches!(parse_cond("reg"), Err(CliErr::ArgParseErr { .. })));
    }
}
