use crate::cli::condition::Select;
use crate::cli::err::CliErr;
use crate::cli::input::Input;
use crate::cli::op::Op;
use crate::cli::output::Output;
use crate::{println_info, println_notice};

const USAGE: &str = "\
用法：rsq [<option> ...] [<input>] [<op> ...] [<output>]
    依次从输入读取数据，经过各个操作处理后输出，操作按需惰性执行。

选项：
    -h [<topic>]    打印帮助，<topic>可以是input、op、output、cond或具体命令名。
    -V              打印版本。
    -v              执行前打印输入、操作、阶段链和输出。
    -d              只解析并构建流水线，不读取数据。
    --nocase        条件匹配和去重忽略大小写。";

pub(crate) fn print_help(topic: Option<&str>) -> Result<(), CliErr> {
    let Some(topic) = topic else {
        println!("{USAGE}");
        for (title, entries) in sections() {
            println!();
            print_section(title, entries);
        }
        return Ok(());
    };
    if let Some((title, entries)) = sections().into_iter().find(|(title, _)| title.eq_ignore_ascii_case(topic)) {
        print_section(title, entries);
        return Ok(());
    }
    match lookup(topic) {
        Some(help) => {
            println!("{help}");
            Ok(())
        }
        None => Err(CliErr::UnknownHelpTopic(topic.to_string())),
    }
}

pub(crate) fn print_version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

fn sections() -> [(&'static str, &'static [(&'static str, &'static str)]); 4] {
    [("input", Input::all_help()), ("op", Op::all_help()), ("output", Output::all_help()), ("cond", Select::all_help())]
}

/// 按命令名查找，同名时操作优先于条件。
fn lookup(cmd: &str) -> Option<&'static str> {
    Input::help_of(cmd).or_else(|| Op::help_of(cmd)).or_else(|| Output::help_of(cmd)).or_else(|| Select::help_of(cmd))
}

fn print_section(title: &str, entries: &[(&str, &str)]) {
    println_info!("{title}:");
    for (_, help) in entries {
        let mut lines = help.lines();
        if let Some(first) = lines.next() {
            println_notice!("    {first}");
        }
        for line in lines {
            println!("    {line}");
        }
    }
}
