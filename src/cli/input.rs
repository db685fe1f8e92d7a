use crate::cli::err::CliErr;
use cmd_help::CmdHelp;
use rseq::{Integer, LineSource, Pipe, Text};

#[derive(Debug, Eq, PartialEq, CmdHelp)]
pub(crate) enum Input {
    /// in
    ///     从标准输入按行读取，未指定输入时的默认输入。
    ///     只能向前读取一次。
    StdIn,
    /// file <file>|[ <file> ...]
    ///     依次按行读取一个或多个文件，只能向前读取一次。
    ///     任一文件无法打开时报错，读取中途失败时在输出结束后报错。
    ///     例如：
    ///         file input.txt
    ///         file [ input1.txt input2.txt ]
    File { files: Vec<String> },
    /// of <text>|[ <text> ...]
    ///     使用字面值作为输入，可以重复遍历。
    ///     字面值为`[`或`]`时需要使用`\[`或`\]`转义。
    ///     例如：
    ///         of line
    ///         of [ line1 "line 2" ]
    Of { values: Vec<String> },
    /// range <start>,<end>[,<step>]
    ///     生成`[start, end)`范围内的整数，步长默认为1。
    ///     步长为负数时从<start>递减，步长为0时不生成任何数据。
    ///     例如：
    ///         range 0,5       生成：0 1 2 3 4
    ///         range 0,10,3    生成：0 3 6 9
    ///         range 5,0,-2    生成：5 3 1
    Range { start: Integer, end: Integer, step: Integer },
}

impl Input {
    pub(crate) fn new_std_in() -> Input {
        Input::StdIn
    }
    pub(crate) fn new_file(files: Vec<String>) -> Input {
        Input::File { files }
    }
    pub(crate) fn new_of(values: Vec<String>) -> Input {
        Input::Of { values }
    }
    pub(crate) fn new_range(start: Integer, end: Integer, step: Integer) -> Input {
        Input::Range { start, end, step }
    }

    /// 打开输入，同时返回按行读取的数据源，以便在输出结束后检查读取错误。
    pub(crate) fn open(self) -> Result<(Pipe<Text>, Option<LineSource>), CliErr> {
        match self {
            Input::StdIn => {
                let lines = LineSource::stdin();
                Ok((Pipe::from_source(lines.clone()), Some(lines)))
            }
            Input::File { files } => {
                let lines = LineSource::open_files(&files[..])?;
                Ok((Pipe::from_source(lines.clone()), Some(lines)))
            }
            Input::Of { values } => Ok((Pipe::from_vec(values.into_iter().map(Text::from).collect()), None)),
            Input::Range { start, end, step } => {
                Ok((Pipe::from_source(Pipe::range_step(start, end, step).map(Text::of)), None))
            }
        }
    }
}
