use crate::cli::config::Config;
use crate::cli::err::CliErr;
use crate::cli::help::{print_help, print_version};
use crate::cli::parse::args::{parse, parse_configs};
use itertools::Itertools;

mod cli;

fn main() {
    if let Err(e) = run() {
        e.termination();
    }
}

fn run() -> Result<(), CliErr> {
    let mut args = std::env::args().skip(1).peekable();
    let configs = parse_configs(&mut args);
    if configs.contains(&Config::Version) {
        print_version();
        return Ok(());
    }
    if configs.contains(&Config::Help) {
        return print_help(args.next().as_deref());
    }
    let (input, ops, output) = parse(args)?;
    if configs.contains(&Config::Verbose) {
        println_info!("Input:");
        println!("    {:?}", input);
        println_info!("Op:");
        println!("{}", ops.iter().map(|op| format!("    {:?}", op)).join("\n"));
        println_info!("Output:");
        println!("    {:?}", output);
    }
    let (mut pipe, lines) = input.open()?;
    for op in ops {
        pipe = op.wrap(pipe, &configs)?;
    }
    if configs.contains(&Config::Verbose) {
        println_info!("Pipe:");
        println!("    {:?}", pipe);
    }
    if configs.contains(&Config::DryRun) {
        return Ok(());
    }
    output.handle(&pipe);
    // 读取中途失败时已输出的数据保持有效，最后再报告错误
    match lines.and_then(|lines| lines.take_error()) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
