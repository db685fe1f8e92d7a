use cmd_help::CmdHelp;
use rseq::{Pipe, Text};
use std::io::{BufWriter, Write};

#[derive(Debug, Eq, PartialEq, CmdHelp)]
pub(crate) enum Output {
    /// to out
    ///     每个数据输出一行到标准输出，未指定输出时的默认输出。
    StdOut,
    /// join[ <sep>]
    ///     使用分隔符连接所有数据后输出一行，分隔符默认为`, `。
    ///     例如：
    ///         join
    ///         join " | "
    Join { sep: String },
    /// count
    ///     只输出数据的数量。
    Count,
}

impl Output {
    pub(crate) fn new_std_out() -> Output {
        Output::StdOut
    }
    pub(crate) fn new_join(sep: String) -> Output {
        Output::Join { sep }
    }
    pub(crate) fn new_count() -> Output {
        Output::Count
    }

    pub(crate) fn handle(self, pipe: &Pipe<Text>) {
        let _ = self.write_to(pipe, &mut BufWriter::new(std::io::stdout().lock())); // 下游关闭时停止输出
    }

    fn write_to(self, pipe: &Pipe<Text>, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            Output::StdOut => {
                for item in pipe {
                    writeln!(out, "{item}")?;
                }
            }
            Output::Join { sep } => writeln!(out, "{}", pipe.join(&sep))?,
            Output::Count => writeln!(out, "{}", pipe.count())?,
        }
        out.flush()
    }
}
