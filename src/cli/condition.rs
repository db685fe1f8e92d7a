use crate::cli::err::CliErr;
use cmd_help::CmdHelp;
use regex::Regex;
use rseq::Text;

/// 条件
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Yes(Select),
    No(Select),
}

impl Condition {
    pub(crate) fn new(select: Select, not: bool) -> Condition {
        if not { Condition::No(select) } else { Condition::Yes(select) }
    }

    pub(crate) fn test(&self, input: &Text, nocase: bool) -> bool {
        match self {
            Condition::Yes(select) => select.select(input, nocase),
            Condition::No(select) => !select.select(input, nocase),
        }
    }
}

/// 选择
#[derive(Debug, Clone, CmdHelp)]
pub(crate) enum Select {
    /// len [!][<min>],[<max>]
    ///     按照字符数量范围选择，包含边界，最小值和最大值至少指定其一。
    ///     例如：
    ///         filter "len 2,"
    ///         filter "len 2,5"
    ///         filter "len !,5"
    TextLenRange { min: Option<usize>, max: Option<usize> },
    /// len [!]=<len>
    ///     按照特定字符数量选择。
    ///     例如：
    ///         filter "len =3"
    ///         filter "len !=3"
    TextLenSpec { spec: usize },
    /// num[ [!]integer|float]
    ///     选择可以完整解析为数值的数据，可以进一步限定为整数或非整数的浮点数。
    ///     例如：
    ///         filter num
    ///         filter "num integer"
    ///         filter "num !float"
    /// num !
    ///     选择不能解析为数值的数据。
    Num { integer: Option<bool> },
    /// upper
    ///     选择不包含小写字符的数据，包括空字符串。
    /// lower
    ///     选择不包含大写字符的数据，包括空字符串。
    TextAllCase { upper: bool },
    /// empty
    ///     选择空字符串。
    /// blank
    ///     选择全部为空白字符的非空字符串。
    TextEmptyOrBlank { empty: bool },
    /// prefix [!]<text>
    ///     选择以给定文本开头的数据，`--nocase`时忽略大小写。
    ///     例如：
    ///         filter "prefix http"
    ///         filter "prefix !#"
    Prefix { text: String },
    /// suffix [!]<text>
    ///     选择以给定文本结尾的数据，`--nocase`时忽略大小写。
    Suffix { text: String },
    /// contains [!]<text>
    ///     选择包含给定文本的数据，`--nocase`时忽略大小写。
    Contains { text: String },
    /// reg <exp>
    ///     选择完整匹配给定正则表达式的数据，忽略大小写需在表达式中使用`(?i)`。
    ///     例如：
    ///         filter 'reg \d{1,3}(\.\d{1,3}){3}'
    RegMatch { regex: Regex },
}

impl PartialEq for Select {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Select::TextLenRange { min: l_min, max: l_max }, Select::TextLenRange { min: r_min, max: r_max }) => {
                l_min == r_min && l_max == r_max
            }
            (Select::TextLenSpec { spec: l }, Select::TextLenSpec { spec: r }) => l == r,
            (Select::Num { integer: l }, Select::Num { integer: r }) => l == r,
            (Select::TextAllCase { upper: l }, Select::TextAllCase { upper: r }) => l == r,
            (Select::TextEmptyOrBlank { empty: l }, Select::TextEmptyOrBlank { empty: r }) => l == r,
            (Select::Prefix { text: l }, Select::Prefix { text: r }) => l == r,
            (Select::Suffix { text: l }, Select::Suffix { text: r }) => l == r,
            (Select::Contains { text: l }, Select::Contains { text: r }) => l == r,
            // Regex 比较模式字符串
            (Select::RegMatch { regex: l }, Select::RegMatch { regex: r }) => l.as_str() == r.as_str(),
            _ => false,
        }
    }
}

impl Select {
    pub(crate) fn new_reg_match(regex: &str) -> Result<Select, CliErr> {
        let reg = format!(r"\A(?:{})\z", regex);
        Regex::new(&reg)
            .map(|regex| Select::RegMatch { regex })
            .map_err(|err| CliErr::ParseRegexErr { reg: regex.to_string(), err: err.to_string() })
    }

    pub(crate) fn yes(self) -> Condition {
        Condition::Yes(self)
    }

    fn select(&self, input: &Text, nocase: bool) -> bool {
        match self {
            Select::TextLenRange { min, max } => {
                let len = input.len();
                min.is_none_or(|min| len >= min) && max.is_none_or(|max| len <= max)
            }
            Select::TextLenSpec { spec } => input.len() == *spec,
            Select::Num { integer } => match integer {
                Some(true) => input.to_long().is_ok(),
                Some(false) => input.to_long().is_err() && input.to_double().is_ok_and(f64::is_finite),
                None => input.to_double().is_ok_and(f64::is_finite),
            },
            Select::TextAllCase { upper } => {
                if *upper {
                    !input.as_str().chars().any(char::is_lowercase)
                } else {
                    !input.as_str().chars().any(char::is_uppercase)
                }
            }
            Select::TextEmptyOrBlank { empty } => {
                if *empty {
                    input.is_empty()
                } else {
                    !input.is_empty() && input.as_str().chars().all(char::is_whitespace)
                }
            }
            Select::Prefix { text } => Self::compare(input, text, nocase, Text::startswith),
            Select::Suffix { text } => Self::compare(input, text, nocase, Text::endswith),
            Select::Contains { text } => Self::compare(input, text, nocase, Text::contains),
            Select::RegMatch { regex } => regex.is_match(input.as_str()),
        }
    }

    fn compare(input: &Text, text: &str, nocase: bool, f: fn(&Text, &str) -> bool) -> bool {
        if nocase { f(&input.lower(), &text.to_lowercase()) } else { f(input, text) }
    }
}
