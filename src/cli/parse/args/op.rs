use crate::cli::err::CliErr;
use crate::cli::op::Op;
use crate::cli::parse::args::next_arg;
use crate::cli::parse::token::{cond, count, integer, parse_whole, slice_arg};
use std::iter::Peekable;

pub(in crate::cli::parse::args) fn parse_ops(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Vec<Op>, CliErr> {
    let mut ops = vec![];
    while let Some(op) = parse_op(args)? {
        ops.push(op);
    }
    Ok(ops)
}

fn parse_op(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    let Some(cmd) = args.peek().map(|cmd| cmd.to_ascii_lowercase()) else {
        return Ok(None);
    };
    match cmd.as_str() {
        "filter" => parse_filter(args),
        "uniq" => parse_uniq(args),
        "strip" => parse_unit(args, Op::Strip),
        "upper" => parse_unit(args, Op::Upper),
        "lower" => parse_unit(args, Op::Lower),
        "slice" => parse_slice(args),
        "replace" => parse_replace(args),
        "field" => parse_field(args),
        "fmt" => parse_fmt(args),
        "sort" => parse_sort(args),
        "head" => parse_head(args),
        _ => Ok(None),
    }
}

/// 没有参数的操作。
fn parse_unit(args: &mut Peekable<impl Iterator<Item = String>>, op: Op) -> Result<Option<Op>, CliErr> {
    args.next();
    Ok(Some(op))
}

fn parse_filter(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    let value = next_arg(args, "filter", "cond")?;
    let condition = parse_whole("filter", "cond", &value, cond)??;
    Ok(Some(Op::new_filter(condition)))
}

fn parse_uniq(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    let nocase = args.next_if(|nocase| nocase.eq_ignore_ascii_case("nocase")).is_some();
    Ok(Some(Op::new_uniq(nocase)))
}

fn parse_slice(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    let value = next_arg(args, "slice", "range")?;
    let (start, end) = parse_whole("slice", "range", &value, slice_arg)?;
    Ok(Some(Op::new_slice(start, end)))
}

fn parse_replace(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    // 被替换字符串和替换目标字符串都必选，直接消耗
    let from = next_arg(args, "replace", "from")?;
    let to = next_arg(args, "replace", "to")?;
    Ok(Some(Op::new_replace(from, to)))
}

fn parse_field(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    let sep = next_arg(args, "field", "sep")?;
    let index = next_arg(args, "field", "index")?;
    Ok(Some(Op::new_field(sep, parse_whole("field", "index", &index, count)?)))
}

fn parse_fmt(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    Ok(Some(Op::new_fmt(next_arg(args, "fmt", "template")?)))
}

fn parse_sort(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    let numeric = args.next_if(|num| num.eq_ignore_ascii_case("num")).is_some();
    Ok(Some(Op::new_sort(numeric)))
}

fn parse_head(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, CliErr> {
    args.next();
    let n = next_arg(args, "head", "n")?;
    Ok(Some(Op::new_head(parse_whole("head", "n", &n, integer)? as isize)))
}
