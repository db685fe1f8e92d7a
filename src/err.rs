use std::fmt::{Display, Formatter};
use thiserror::Error;

/// 格式化参数数量不匹配的类型
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FormatArgKind {
    /// 占位符多于参数
    TooFew,
    /// 参数多于占位符
    TooMany,
}

impl Display for FormatArgKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatArgKind::TooFew => write!(f, "requires more arguments"),
            FormatArgKind::TooMany => write!(f, "has too many arguments"),
        }
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum SqErr {
    /// 数据源耗尽。仅作为控制信号在内部使用，不会从迭代中泄露给调用者。
    #[error("[Exhausted] No more elements available")]
    Exhausted,

    #[error("[Number Format] Unable to parse `{text}` as {kind}")]
    NumberFormat { text: String, kind: &'static str },

    #[error("[Format] Template `{template}` {kind}: {placeholders} placeholder(s), {args} argument(s)")]
    FormatArgument { kind: FormatArgKind, template: String, placeholders: usize, args: usize },

    #[error("[Pipeline Misuse] Stage #{stage} is a map with nothing downstream to receive its values")]
    PipelineMisuse { stage: usize },

    #[error("[Input] Open input file `{file}` error: {err}")]
    OpenInputFileErr { file: String, err: String },

    #[error("[Input] Read line `{line_no}` of input `{file}` error: {err}")]
    ReadFromInputFileErr { file: String, line_no: usize, err: String },
}

impl SqErr {
    pub(crate) fn number_format(text: &str, kind: &'static str) -> SqErr {
        SqErr::NumberFormat { text: text.to_owned(), kind }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, SqErr::Exhausted)
    }
}
