use crate::cli::err::CliErr;
use crate::cli::input::Input;
use crate::cli::parse::args::{next_arg, parse_arg_or_arg1};
use crate::cli::parse::token::{parse_whole, range_arg};
use std::iter::Peekable;

pub(in crate::cli::parse::args) fn parse_input(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Input, CliErr> {
    match args.peek() {
        Some(cmd) if cmd.eq_ignore_ascii_case("in") => {
            args.next(); // 消耗`in`
            Ok(Input::new_std_in())
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("file") => {
            args.next(); // 消耗`file`
            Ok(Input::new_file(parse_arg_or_arg1(args, "file", "file")?))
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("of") => {
            args.next(); // 消耗`of`
            Ok(Input::new_of(parse_arg_or_arg1(args, "of", "text")?))
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("range") => {
            args.next(); // 消耗`range`
            let value = next_arg(args, "range", "range")?;
            let (start, end, step) = parse_whole("range", "range", &value, range_arg)?;
            Ok(Input::new_range(start, end, step))
        }
        _ => Ok(Input::new_std_in()),
    }
}
