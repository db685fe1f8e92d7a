use crate::cli::condition::Condition;
use crate::cli::config::{Config, is_nocase};
use crate::cli::err::CliErr;
use cmd_help::CmdHelp;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rseq::{Cursor, ListSource, Pipe, Source, Text};
use rustc_hash::FxHashSet;
use unicase::UniCase;

#[derive(Debug, PartialEq, CmdHelp)]
pub(crate) enum Op {
    /* **************************************** 选择 **************************************** */
    /// filter <cond>
    ///     只保留满足条件的数据，条件整体作为一个参数，语法参考`-h cond`。
    ///     例如：
    ///         filter "len 2,"
    ///         filter "prefix !#"
    Filter(Condition),
    /// uniq[ nocase]
    ///     去重，保留第一次出现的数据。
    ///         nocase  去重时忽略大小写，可选，也可使用全局的`--nocase`。
    Uniq { nocase: bool },
    /* **************************************** 转换 **************************************** */
    /// strip
    ///     去除首尾的空格、制表符和换行符。
    Strip,
    /// upper
    ///     转为大写。
    Upper,
    /// lower
    ///     转为小写。
    Lower,
    /// slice <start>[,<end>]
    ///     按字符截取子串，负数位置从末尾倒数，负数结束位置包含该字符。
    ///     例如：
    ///         slice 0,-6      "Hello, world" => "Hello, "
    ///         slice -5,-1     "Hello, world" => "world"
    ///         slice 7         "Hello, world" => "world"
    Slice { start: isize, end: Option<isize> },
    /// replace <from> <to>
    ///     替换所有出现的<from>，<from>为空时不做替换。
    Replace { from: String, to: String },
    /// field <sep> <index>
    ///     按<sep>拆分后取第<index>个片段（从0开始），不存在时为空字符串。
    ///     例如：
    ///         field , 1       "a,b,c" => "b"
    Field { sep: String, index: usize },
    /// fmt <template>
    ///     以当前数据替换模板中唯一的`{}`占位符。
    ///     例如：
    ///         fmt "item: {}"
    Fmt { template: String },
    /* **************************************** 调整 **************************************** */
    /// sort[ num]
    ///     排序。需要读取全部上游数据后才能产出第一个数据。
    ///         num     按数值排序，无法解析为数值的数据保持原顺序排在最后。
    Sort { numeric: bool },
    /// head <n>
    ///     只取前<n>个数据，取够后不再读取上游数据。
    ///     <n>为负数时取除最后|<n>|个以外的全部数据。
    Head { n: isize },
}

impl Op {
    pub(crate) fn new_filter(cond: Condition) -> Op {
        Op::Filter(cond)
    }
    pub(crate) fn new_uniq(nocase: bool) -> Op {
        Op::Uniq { nocase }
    }
    pub(crate) fn new_slice(start: isize, end: Option<isize>) -> Op {
        Op::Slice { start, end }
    }
    pub(crate) fn new_replace(from: String, to: String) -> Op {
        Op::Replace { from, to }
    }
    pub(crate) fn new_field(sep: String, index: usize) -> Op {
        Op::Field { sep, index }
    }
    pub(crate) fn new_fmt(template: String) -> Op {
        Op::Fmt { template }
    }
    pub(crate) fn new_sort(numeric: bool) -> Op {
        Op::Sort { numeric }
    }
    pub(crate) fn new_head(n: isize) -> Op {
        Op::Head { n }
    }

    /// 在流水线末尾追加当前操作。
    pub(crate) fn wrap(self, pipe: Pipe<Text>, configs: &[Config]) -> Result<Pipe<Text>, CliErr> {
        match self {
            Op::Filter(cond) => {
                let nocase = is_nocase(false, configs);
                Ok(pipe.filter(move |v| cond.test(v, nocase)))
            }
            Op::Uniq { nocase } => {
                if is_nocase(nocase, configs) {
                    Ok(pipe.filter_with(FxHashSet::default, |seen: &mut FxHashSet<UniCase<String>>, v: &Text| {
                        seen.insert(UniCase::new(v.to_string()))
                    }))
                } else {
                    Ok(pipe.filter_with(FxHashSet::default, |seen: &mut FxHashSet<Text>, v: &Text| seen.insert(v.clone())))
                }
            }
            Op::Strip => Ok(pipe.map(|v| v.strip())),
            Op::Upper => Ok(pipe.map(|v| v.upper())),
            Op::Lower => Ok(pipe.map(|v| v.lower())),
            Op::Slice { start, end } => Ok(pipe.map(move |v| match end {
                Some(end) => v.slice(start, end),
                None => v.slice_from(start),
            })),
            Op::Replace { from, to } => Ok(pipe.map(move |v| v.replace(&from, &to))),
            Op::Field { sep, index } => {
                Ok(pipe.map(move |v| v.split(sep.as_str(), true).get(index).cloned().unwrap_or_default()))
            }
            Op::Fmt { template } => {
                let template = Text::from(template);
                template.format(["{}"])?; // 占位符数量不为1时立即报错
                Ok(pipe.map(move |v| template.format([&v]).unwrap_or(v)))
            }
            Op::Sort { numeric } => Ok(Pipe::from_source(Boundary { upstream: pipe, step: Step::Sort { numeric } })),
            Op::Head { n } => Ok(Pipe::from_source(Boundary { upstream: pipe, step: Step::Head(n) })),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Sort { numeric: bool },
    Head(isize),
}

/// 需要先物化上游数据的操作。每次打开游标时才读取上游，结果缓存为列表后继续惰性处理。
struct Boundary {
    upstream: Pipe<Text>,
    step: Step,
}

impl Source<Text> for Boundary {
    fn open(&self) -> Box<dyn Cursor<Text>> {
        let items = match self.step {
            Step::Sort { numeric: false } => self.upstream.sort().into_vec(),
            Step::Sort { numeric: true } => self.upstream.iter().sorted_by_key(numeric_key).collect(),
            Step::Head(n) => self.upstream.head(n).into_vec(),
        };
        ListSource::new(items).open()
    }

    fn kind(&self) -> &'static str {
        match self.step {
            Step::Sort { .. } => "sort",
            Step::Head(_) => "head",
        }
    }

    fn restartable(&self) -> bool {
        self.upstream.restartable()
    }
}

/// 数值排序键：数值在前按大小排列，非数值在后。
fn numeric_key(v: &Text) -> (bool, OrderedFloat<f64>) {
    match v.to_double() {
        Ok(num) => (false, OrderedFloat(num)),
        Err(_) => (true, OrderedFloat(0.0)),
    }
}
