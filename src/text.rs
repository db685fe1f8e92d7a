use crate::err::{FormatArgKind, SqErr};
use crate::seq::Seq;
use itertools::Itertools;
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::ops::Add;
use unicase::UniCase;

/// 分隔符：单个字符或字符串。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Sep<'a> {
    Char(char),
    Str(&'a str),
}

impl From<char> for Sep<'_> {
    fn from(c: char) -> Self {
        Sep::Char(c)
    }
}

impl<'a> From<&'a str> for Sep<'a> {
    fn from(s: &'a str) -> Self {
        Sep::Str(s)
    }
}

/// 不可变文本值，在流水线中作为元素流转。
///
/// 所有位置均以字符（而非字节）计数，支持负数位置：负数从末尾倒数，`-1`表示最后一个字符。
/// 越界的位置会被收敛到合法范围内，不会产生错误。
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Text(String);

impl Text {
    pub fn new(text: impl Into<String>) -> Text {
        Text(text.into())
    }

    /// 使用任意可显示的值构造文本，例如数字。
    pub fn of(value: impl Display) -> Text {
        Text(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// 字符数量。
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 起始位置换算：负数加上长度，结果收敛到`[0, len]`。
    fn wrap_start(pos: isize, len: usize) -> usize {
        if pos < 0 { len.saturating_sub(pos.unsigned_abs()) } else { (pos as usize).min(len) }
    }

    /// 结束位置换算：负数表示包含该位置的字符，即`len + pos + 1`，结果收敛到`[0, len]`。
    fn wrap_end(pos: isize, len: usize) -> usize {
        if pos < 0 { (len + 1).saturating_sub(pos.unsigned_abs()).min(len) } else { (pos as usize).min(len) }
    }

    /// 字符位置到字节偏移。
    fn byte_at(&self, char_pos: usize) -> usize {
        self.0.char_indices().nth(char_pos).map_or(self.0.len(), |(idx, _)| idx)
    }

    /// 字节偏移到字符位置。
    fn char_at(&self, byte_pos: usize) -> usize {
        self.0[..byte_pos].chars().count()
    }

    /// 换算后的字符窗口，空窗口返回`None`。
    fn window(&self, start: isize, end: isize) -> Option<(usize, usize)> {
        let len = self.len();
        let (start, end) = (Self::wrap_start(start, len), Self::wrap_end(end, len));
        if end <= start { None } else { Some((start, end)) }
    }

    /// 截取子串。
    ///
    /// ```text
    /// "Hello, world".slice(0, -6)  == "Hello, "
    /// "Hello, world".slice(-7, -6) == ", "
    /// "Hello, world".slice(-5, -1) == "world"
    /// ```
    pub fn slice(&self, start: isize, end: isize) -> Text {
        match self.window(start, end) {
            Some((0, end)) if end == self.len() => self.clone(),
            Some((start, end)) => Text(self.0[self.byte_at(start)..self.byte_at(end)].to_string()),
            None => Text::default(),
        }
    }

    /// 从`start`截取到末尾。
    pub fn slice_from(&self, start: isize) -> Text {
        self.slice(start, isize::MAX)
    }

    /// 拆分字符串，分隔符本身不会出现在结果中。`keep_empty`为`false`时丢弃空片段。
    ///
    /// 空字符串分隔符不做拆分，整个字符串作为唯一的片段。
    pub fn split<'a>(&self, sep: impl Into<Sep<'a>>, keep_empty: bool) -> Seq<Text> {
        match sep.into() {
            Sep::Char(c) => Self::collect_parts(self.0.split(c), keep_empty),
            Sep::Str("") => Self::collect_parts(std::iter::once(self.as_str()), keep_empty),
            Sep::Str(s) => Self::collect_parts(self.0.split(s), keep_empty),
        }
    }

    fn collect_parts<'s>(parts: impl Iterator<Item = &'s str>, keep_empty: bool) -> Seq<Text> {
        parts.filter(|part| keep_empty || !part.is_empty()).map(Text::from).collect()
    }

    pub fn lower(&self) -> Text {
        Text(self.0.to_lowercase())
    }

    pub fn upper(&self) -> Text {
        Text(self.0.to_uppercase())
    }

    pub fn startswith(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    pub fn endswith(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// 忽略大小写比较。
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        UniCase::new(self.as_str()) == UniCase::new(other)
    }

    /// 替换全部出现的`from`，`from`为空时原样返回。
    pub fn replace(&self, from: &str, to: &str) -> Text {
        if from.is_empty() || !self.0.contains(from) { self.clone() } else { Text(self.0.replace(from, to)) }
    }

    /// 去除首尾的空格、制表符和换行符。
    pub fn strip(&self) -> Text {
        let stripped = self.0.trim_matches(&[' ', '\t', '\n'][..]);
        if stripped.len() == self.0.len() { self.clone() } else { Text::from(stripped) }
    }

    /// 第一次出现的字符位置，不存在时返回`-1`。`needle`可以是字符或字符串。
    pub fn index<'a>(&self, needle: impl Into<Sep<'a>>) -> isize {
        let found = match needle.into() {
            Sep::Char(c) => self.0.find(c),
            Sep::Str(s) => self.0.find(s),
        };
        found.map_or(-1, |pos| self.char_at(pos) as isize)
    }

    /// 最后一次出现的字符位置，不存在时返回`-1`。
    pub fn rindex<'a>(&self, needle: impl Into<Sep<'a>>) -> isize {
        let found = match needle.into() {
            Sep::Char(c) => self.0.rfind(c),
            Sep::Str(s) => self.0.rfind(s),
        };
        found.map_or(-1, |pos| self.char_at(pos) as isize)
    }

    /// 在`[start, end)`窗口内查找第一次出现的位置，结果相对整个字符串。
    pub fn index_in<'a>(&self, needle: impl Into<Sep<'a>>, start: isize, end: isize) -> isize {
        let needle = needle.into();
        self.search_window(start, end, |window| window.index(needle))
    }

    /// 在`[start, end)`窗口内查找最后一次出现的位置，结果相对整个字符串。
    pub fn rindex_in<'a>(&self, needle: impl Into<Sep<'a>>, start: isize, end: isize) -> isize {
        let needle = needle.into();
        self.search_window(start, end, |window| window.rindex(needle))
    }

    fn search_window(&self, start: isize, end: isize, search: impl Fn(&Text) -> isize) -> isize {
        match self.window(start, end) {
            Some((start, end)) => match search(&self.slice(start as isize, end as isize)) {
                -1 => -1,
                found => found + start as isize,
            },
            None => -1,
        }
    }

    /// 严格解析为整数。开头的空白字符会被跳过，其余部分必须完整地是一个数字。
    pub fn to_long(&self) -> Result<i64, SqErr> {
        self.numeric_part().parse::<i64>().map_err(|_| SqErr::number_format(&self.0, "integer"))
    }

    pub fn to_double(&self) -> Result<f64, SqErr> {
        self.numeric_part().parse::<f64>().map_err(|_| SqErr::number_format(&self.0, "double"))
    }

    pub fn to_float(&self) -> Result<f32, SqErr> {
        self.numeric_part().parse::<f32>().map_err(|_| SqErr::number_format(&self.0, "float"))
    }

    /// 去掉开头空白（空格、制表符、换行、回车、垂直制表符和换页符）后的部分，末尾的空白仍视为非法字符。
    fn numeric_part(&self) -> &str {
        self.0.trim_start_matches(&[' ', '\t', '\n', '\r', '\x0b', '\x0c'][..])
    }

    /// 从左到右依次使用参数替换`{}`占位符，占位符和参数数量必须完全一致。
    pub fn format<I>(&self, args: I) -> Result<Text, SqErr>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let parts = self.0.split("{}").collect::<Vec<_>>();
        let args = args.into_iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
        let placeholders = parts.len() - 1;
        if placeholders != args.len() {
            let kind = if placeholders > args.len() { FormatArgKind::TooFew } else { FormatArgKind::TooMany };
            return Err(SqErr::FormatArgument { kind, template: self.0.clone(), placeholders, args: args.len() });
        }
        Ok(Text(parts.into_iter().interleave(args.iter().map(String::as_str)).collect()))
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text(text.to_string())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text(text)
    }
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        text.0
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Text {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Text> for &str {
    fn eq(&self, other: &Text) -> bool {
        *self == other.0
    }
}

impl Add<&Text> for Text {
    type Output = Text;

    fn add(mut self, rhs: &Text) -> Self::Output {
        self.0.push_str(&rhs.0);
        self
    }
}

impl Add<&str> for Text {
    type Output = Text;

    fn add(mut self, rhs: &str) -> Self::Output {
        self.0.push_str(rhs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice() {
        let text = Text::from("Hello, world");
        assert_eq!(text.slice(0, -6), "Hello, ");
        assert_eq!(text.slice(-7, -6), ", ");
        assert_eq!(text.slice(-5, -1), "world");
        assert_eq!(text.slice(0, -1), "Hello, world");
        assert_eq!(text.slice(0, 5), "Hello");
        assert_eq!(text.slice(-1, -1), "d");
        assert_eq!(text.slice(7, 100), "world");
        assert_eq!(text.slice(-100, 2), "He");
        assert_eq!(text.slice(5, 2), "");
        assert_eq!(text.slice(20, 30), "");
        assert_eq!(text.slice(0, -100), "");
        assert_eq!(text.slice_from(-5), "world");
        assert_eq!(Text::default().slice(-1, 3), "");
    }

    #[test]
    fn test_slice_multibyte() {
        let text = Text::from("¡Hola!");
        assert_eq!(text.len(), 6);
        assert_eq!(text.slice(0, 1), "¡");
        assert_eq!(text.slice(1, -2), "Hola");
        assert_eq!(text.slice_from(-1), "!");
    }

    #[test]
    fn test_split() {
        let text = Text::from("Hello  world");
        assert_eq!(text.split(' ', true).into_vec(), vec!["Hello", "", "world"]);
        assert_eq!(text.split(' ', false).into_vec(), vec!["Hello", "world"]);
        assert_eq!(Text::from("a, b, c").split(", ", false).into_vec(), vec!["a", "b", "c"]);
        assert_eq!(Text::from("a,").split(',', true).into_vec(), vec!["a", ""]);
        assert_eq!(Text::from("").split(',', true).into_vec(), vec![""]);
        assert!(Text::from("").split(',', false).is_empty());
        assert_eq!(Text::from("abc").split("", false).into_vec(), vec!["abc"]);
    }

    #[test]
    fn test_strip() {
        assert_eq!(Text::from(" \t abc \n").strip(), "abc");
        assert_eq!(Text::from("abc").strip(), "abc");
        assert_eq!(Text::from(" \n\t ").strip(), "");
        assert_eq!(Text::from("\rabc\r").strip(), "\rabc\r");
    }

    #[test]
    fn test_search() {
        let text = Text::from("Hello, world");
        assert!(text.startswith("Hello"));
        assert!(text.startswith(""));
        assert!(!text.startswith("world"));
        assert!(text.endswith("world"));
        assert!(text.endswith(""));
        assert!(text.contains(", "));
        assert!(text.contains(""));
        assert!(!text.contains("xyz"));
        assert_eq!(text.index("o"), 4);
        assert_eq!(text.rindex("o"), 8);
        assert_eq!(text.index("xyz"), -1);
        assert_eq!(text.rindex("xyz"), -1);
        assert_eq!(text.index_in("o", 5, -1), 8);
        assert_eq!(text.rindex_in("o", 0, 6), 4);
        assert_eq!(text.index_in("H", 1, -1), -1);
        assert_eq!(Text::from("¡Hola!").index("Hola"), 1);
        assert_eq!(text.index('o'), 4);
        assert_eq!(text.rindex('o'), 8);
        assert_eq!(text.index('z'), -1);
        assert_eq!(Text::from("¡Hola!").rindex('!'), 5);
        assert_eq!(text.index_in('o', 5, -1), 8);
        assert_eq!(text.rindex_in(',', 0, 6), 5);
    }

    #[test]
    fn test_case() {
        assert_eq!(Text::from("Hola Mundo").upper(), "HOLA MUNDO");
        assert_eq!(Text::from("Hola Mundo").lower(), "hola mundo");
        assert!(Text::from("Hola").eq_ignore_case("hOLA"));
        assert!(!Text::from("Hola").eq_ignore_case("Hol"));
    }

    #[test]
    fn test_replace() {
        assert_eq!(Text::from("a-b-c").replace("-", "+"), "a+b+c");
        assert_eq!(Text::from("aaa").replace("a", "aa"), "aaaaaa");
        assert_eq!(Text::from("abc").replace("", "x"), "abc");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Text::from("123").to_long(), Ok(123));
        assert_eq!(Text::from("-42").to_long(), Ok(-42));
        assert_eq!(
            Text::from("123 er").to_long(),
            Err(SqErr::NumberFormat { text: "123 er".to_string(), kind: "integer" })
        );
        assert!(Text::from("").to_long().is_err());
        assert!(Text::from("1.5").to_long().is_err());
        assert_eq!(Text::from("1.5").to_double(), Ok(1.5));
        assert!(Text::from("1.5x").to_double().is_err());
        assert!(Text::from("").to_double().is_err());
        assert_eq!(Text::from("2.25").to_float(), Ok(2.25f32));
        assert_eq!(Text::from(" 42").to_long(), Ok(42));
        assert_eq!(Text::from("\t1.5").to_double(), Ok(1.5));
        assert_eq!(Text::from("\n 2").to_float(), Ok(2.0f32));
        assert_eq!(Text::from("2 ").to_float(), Err(SqErr::NumberFormat { text: "2 ".to_string(), kind: "float" }));
        assert!(Text::from(" 42\n").to_long().is_err());
        assert!(Text::from("   ").to_long().is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(Text::from("{} + {} = {}").format([1, 2, 3]), Ok(Text::from("1 + 2 = 3")));
        assert_eq!(Text::from("no placeholder").format(Vec::<String>::new()), Ok(Text::from("no placeholder")));
        assert_eq!(Text::from("{}{}").format(["a", "b"]), Ok(Text::from("ab")));
        assert_eq!(
            Text::from("{} {}").format(["a"]),
            Err(SqErr::FormatArgument {
                kind: FormatArgKind::TooFew,
                template: "{} {}".to_string(),
                placeholders: 2,
                args: 1
            })
        );
        assert_eq!(
            Text::from("{}").format(["a", "b"]),
            Err(SqErr::FormatArgument {
                kind: FormatArgKind::TooMany,
                template: "{}".to_string(),
                placeholders: 1,
                args: 2
            })
        );
    }

    #[test]
    fn test_concat() {
        assert_eq!(Text::from("Test ") + &Text::from("Hola"), "Test Hola");
        assert_eq!(Text::from("a") + "b", "ab");
        assert_eq!(Text::of(42), "42");
        assert!(Text::from("a") < Text::from("b"));
    }
}
