use crate::cli::err::CliErr;
use crate::cli::input::Input;
use crate::cli::op::Op;
use crate::cli::output::Output;
use crate::cli::parse::args::input::parse_input;
use crate::cli::parse::args::op::parse_ops;
use crate::cli::parse::args::output::parse_output;
use std::iter::Peekable;

mod config;
mod input;
mod op;
mod output;

pub(crate) use config::parse_configs;

/// 依次解析输入、操作和输出，存在无法识别的剩余参数时报错。
pub(crate) fn parse(mut args: Peekable<impl Iterator<Item = String>>) -> Result<(Input, Vec<Op>, Output), CliErr> {
    let input = parse_input(&mut args)?;
    let ops = parse_ops(&mut args)?;
    let output = parse_output(&mut args)?;
    let remaining = args.collect::<Vec<_>>();
    if !remaining.is_empty() { Err(CliErr::UnknownArgs { args: remaining }) } else { Ok((input, ops, output)) }
}

/// 解析单个值或中括号包围的多个值：`<value>`或`[ <value> ...]`。
fn parse_arg_or_arg1(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
) -> Result<Vec<String>, CliErr> {
    match args.next() {
        // 至少有一个值，直接消耗
        Some(value) => {
            if value == "[" {
                // 多值开始
                let mut values = Vec::new();
                for value in args.by_ref() {
                    if value == "]" {
                        // 多值结束
                        return if values.is_empty() { Err(CliErr::ArgNotEnough { cmd, arg }) } else { Ok(values) };
                    } else {
                        values.push(escaped(value))
                    }
                }
                Err(CliErr::UnclosingMultiArg { cmd, arg })
            } else if value == "]" {
                // 未开启的多值结束
                Err(CliErr::UnexpectedClosingBracket { cmd, arg })
            } else {
                Ok(vec![escaped(value)])
            }
        }
        None => Err(CliErr::MissingArg { cmd, arg }),
    }
}

/// 必选的单个参数。
fn next_arg(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
) -> Result<String, CliErr> {
    args.next().map(escaped).ok_or(CliErr::MissingArg { cmd, arg })
}

fn escaped(arg: String) -> String {
    if arg == "\\[" || arg == "\\]" { arg[1..].to_string() } else { arg }
}

#[cfg(test)]
fn build_args(args_line: &'static str) -> Peekable<impl Iterator<Item = String>> {
    args_line.split(' ').map(String::from).peekable()
}
