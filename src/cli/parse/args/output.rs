use crate::cli::err::CliErr;
use crate::cli::output::Output;
use rseq::DEFAULT_SEP;
use std::iter::Peekable;

pub(in crate::cli::parse::args) fn parse_output(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Output, CliErr> {
    match args.peek() {
        Some(cmd) if cmd.eq_ignore_ascii_case("to") => {
            args.next(); // 消耗`to`
            match args.next_if(|out| out.eq_ignore_ascii_case("out")) {
                Some(_) => Ok(Output::new_std_out()),
                None => Err(CliErr::MissingArg { cmd: "to", arg: "out" }),
            }
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("join") => {
            args.next(); // 消耗`join`
            Ok(Output::new_join(args.next().unwrap_or_else(|| DEFAULT_SEP.to_string())))
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("count") => {
            args.next(); // 消耗`count`
            Ok(Output::new_count())
        }
        _ => Ok(Output::new_std_out()),
    }
}
