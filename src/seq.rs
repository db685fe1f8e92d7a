use crate::err::SqErr;
use crate::pipe::Pipe;
use crate::source::LineSource;
use crate::text::Text;
use crate::Integer;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;
use std::io::BufRead;
use std::ops::Index;

/// 连接元素时的默认分隔符。
pub const DEFAULT_SEP: &str = ", ";

/// 立即求值的有序序列。
///
/// 每个操作都会立即执行并返回一个新的序列，不会修改原序列。
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Seq<T>(Vec<T>);

impl<T> Seq<T> {
    pub fn new(data: Vec<T>) -> Seq<T> {
        Seq(data)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.0.get(idx)
    }

    /// 位置换算：负数加上长度，结果收敛到`[0, len]`。
    fn wrap(&self, pos: isize) -> usize {
        let len = self.0.len();
        if pos < 0 { len.saturating_sub(pos.unsigned_abs()) } else { (pos as usize).min(len) }
    }

    /// 使用分隔符连接所有元素，空序列返回空字符串。
    pub fn join(&self, sep: &str) -> String
    where
        T: Display,
    {
        self.0.iter().join(sep)
    }

    /// 使用默认分隔符[`DEFAULT_SEP`]连接所有元素。
    pub fn join_default(&self) -> String
    where
        T: Display,
    {
        self.join(DEFAULT_SEP)
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Seq<U> {
        Seq(self.0.iter().map(f).collect())
    }

    /// 对每个元素执行一次`f`，返回自身以便继续链式调用。
    pub fn each(&self, f: impl FnMut(&T)) -> &Seq<T> {
        self.0.iter().for_each(f);
        self
    }

    /// 映射为多个元素后展开。
    pub fn flat_map<I: IntoIterator>(&self, f: impl Fn(&T) -> I) -> Seq<I::Item> {
        Seq(self.0.iter().flat_map(f).collect())
    }

    pub fn flatten(self) -> Seq<T::Item>
    where
        T: IntoIterator,
    {
        Seq(self.0.into_iter().flatten().collect())
    }

    /// 归约，`f`的参数依次为当前元素和累积值。
    pub fn reduce<S>(&self, f: impl Fn(&T, S) -> S, initial: S) -> S {
        self.0.iter().fold(initial, |acc, v| f(v, acc))
    }

    pub fn any(&self, f: impl Fn(&T) -> bool) -> bool {
        self.0.iter().any(f)
    }

    pub fn all(&self, f: impl Fn(&T) -> bool) -> bool {
        self.0.iter().all(f)
    }

    /// 所有元素转为文本。
    pub fn to_texts(&self) -> Seq<Text>
    where
        T: Display,
    {
        self.map(|v| Text::of(v))
    }
}

impl<T: Clone> Seq<T> {
    pub fn filter(&self, f: impl Fn(&T) -> bool) -> Seq<T> {
        Seq(self.0.iter().filter(|v| f(v)).cloned().collect())
    }

    /// 移除所有等于`v`的元素。
    pub fn remove(&self, v: &T) -> Seq<T>
    where
        T: PartialEq,
    {
        self.filter(|m| m != v)
    }

    pub fn sort(&self) -> Seq<T>
    where
        T: Ord,
    {
        Seq(self.0.iter().cloned().sorted().collect())
    }

    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Seq<T> {
        Seq(self.0.iter().cloned().sorted_by(compare).collect())
    }

    /// 保持首次出现顺序去重。
    ///
    /// `is_sorted`为`false`时逐个与已输出元素比较，复杂度O(n²)；为`true`时只比较相邻元素，复杂度O(n)，
    /// 此时调用者需保证输入已排序，否则结果未定义。
    pub fn unique(&self, is_sorted: bool) -> Seq<T>
    where
        T: PartialEq,
    {
        if is_sorted {
            Seq(self.0.iter().cloned().dedup().collect())
        } else {
            let mut ret: Vec<T> = Vec::with_capacity(self.0.len());
            for v in &self.0 {
                if !ret.contains(v) {
                    ret.push(v.clone());
                }
            }
            Seq(ret)
        }
    }

    /// 截取`[start, end)`，负数位置从末尾倒数。
    ///
    /// ```text
    /// [1, 2, 3, 4, 5].slice(1, 2) == [2]
    /// [1, 2, 3, 4, 5].slice(-2, 5) == [4, 5]
    /// ```
    pub fn slice(&self, start: isize, end: isize) -> Seq<T> {
        let (start, end) = (self.wrap(start), self.wrap(end));
        if end <= start { Seq(Vec::new()) } else { Seq(self.0[start..end].to_vec()) }
    }

    /// 截取到`end`：`head(2)`为前2个元素，`head(-1)`为除最后一个外的所有元素。
    pub fn head(&self, end: isize) -> Seq<T> {
        self.slice(0, end)
    }

    /// 从`start`截取到末尾：`tail(2)`跳过前2个元素，`tail(-2)`为最后2个元素。
    pub fn tail(&self, start: isize) -> Seq<T> {
        self.slice(start, isize::MAX)
    }

    pub fn reverse(&self) -> Seq<T> {
        Seq(self.0.iter().rev().cloned().collect())
    }

    pub fn max(&self) -> Option<T>
    where
        T: Ord,
    {
        self.0.iter().max().cloned()
    }

    pub fn min(&self) -> Option<T>
    where
        T: Ord,
    {
        self.0.iter().min().cloned()
    }

    /// 从`first`开始查找`v`的位置，不存在时返回`-1`。
    pub fn find(&self, v: &T, first: usize) -> isize
    where
        T: PartialEq,
    {
        self.0.iter().skip(first).position(|m| m == v).map_or(-1, |pos| (pos + first) as isize)
    }

    pub fn contains(&self, v: &T) -> bool
    where
        T: PartialEq,
    {
        self.0.contains(v)
    }

    /// 所有元素都等于`v`，空序列返回`true`。
    pub fn all_eq(&self, v: &T) -> bool
    where
        T: PartialEq,
    {
        self.0.iter().all(|m| m == v)
    }

    /// 与另一个序列逐个配对，参见[`zip`]。
    pub fn zip<U: Clone + Default>(&self, other: &Seq<U>) -> Seq<(T, U)>
    where
        T: Default,
    {
        zip(self.0.iter().cloned(), other.0.iter().cloned())
    }
}

impl<T: Clone + 'static> Seq<T> {
    /// 转为以当前元素为数据源的惰性流水线。
    pub fn lazy(&self) -> Pipe<T> {
        Pipe::from_vec(self.0.clone())
    }
}

impl<A: Clone, B: Clone> Seq<(A, B)> {
    /// 拆分二元组序列。
    pub fn unzip(&self) -> (Seq<A>, Seq<B>) {
        let (a, b): (Vec<A>, Vec<B>) = self.0.iter().cloned().unzip();
        (Seq(a), Seq(b))
    }

    /// 转为映射，重复的键保留最后一个值。
    pub fn to_map(&self) -> FxHashMap<A, B>
    where
        A: Hash + Eq,
    {
        self.0.iter().cloned().collect()
    }
}

impl Seq<Integer> {
    /// 生成`[start, end)`范围内的整数。
    pub fn range(start: Integer, end: Integer) -> Seq<Integer> {
        Seq((start..end).collect())
    }
}

impl Seq<Text> {
    /// 按分隔符拆分文本，中间的空片段保留，末尾的空片段丢弃。
    ///
    /// ```text
    /// split_text("Hello, world", ',') == ["Hello", " world"]
    /// split_text("a,,b,", ',')        == ["a", "", "b"]
    /// ```
    pub fn split_text(text: &str, sep: char) -> Seq<Text> {
        let mut parts = Text::from(text).split(sep, true).into_vec();
        if parts.last().is_some_and(Text::is_empty) {
            parts.pop();
        }
        Seq(parts)
    }

    /// 立即读取全部行。
    pub fn from_lines(reader: impl BufRead + 'static) -> Result<Seq<Text>, SqErr> {
        let source = LineSource::from_reader("<reader>", reader);
        let lines = Pipe::from_source(source.clone()).to_seq();
        match source.take_error() {
            Some(err) => Err(err),
            None => Ok(lines),
        }
    }
}

/// 逐个配对两个序列。长度不一致时，较短一方使用默认值补齐，直到较长一方耗尽。
///
/// ```text
/// zip([1, 2, 3], ['a', 'b', 'c', 'd']) == [(1, 'a'), (2, 'b'), (3, 'c'), (0, 'd')]
/// ```
pub fn zip<A, B>(a: impl IntoIterator<Item = A>, b: impl IntoIterator<Item = B>) -> Seq<(A, B)>
where
    A: Default,
    B: Default,
{
    Seq(a.into_iter().zip_longest(b).map(|pair| pair.or_default()).collect())
}

impl<T> From<Vec<T>> for Seq<T> {
    fn from(data: Vec<T>) -> Self {
        Seq(data)
    }
}

impl<T> From<Seq<T>> for Vec<T> {
    fn from(seq: Seq<T>) -> Self {
        seq.0
    }
}

impl<T> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Seq(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Seq<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Seq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T> Index<usize> for Seq<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.0[idx]
    }
}
