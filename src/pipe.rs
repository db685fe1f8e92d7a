use crate::err::SqErr;
use crate::seq::{DEFAULT_SEP, Seq};
use crate::source::{Cursor, IterSource, LineSource, ListSource, RangeSource, Source};
use crate::stage::{Chain, Sink, StageKind};
use crate::text::Text;
use crate::Integer;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
use std::io::BufRead;
use std::path::Path;
use std::rc::Rc;

/// 惰性流水线：一个数据源加上一串`Map`/`Filter`阶段。
///
/// 追加阶段不会修改原流水线，而是返回一条新的流水线，原流水线仍可继续使用。
/// 只有在迭代、`to_list`、`join`、`reduce`等终端操作拉取数据时才会真正执行各阶段，
/// 终端操作可以随时停止拉取（例如`head`），剩余的数据不会被处理。
///
/// 内部以推送方式执行：每个数据源元素从第一个阶段开始逐级推送，到达末端时记录为就绪值；
/// 外部以拉取方式消费：每次`next`只推进到产生一个就绪值为止。
pub struct Pipe<S, T = S> {
    source: Rc<dyn Source<S>>,
    chain: Chain<S, T>,
}

impl<S, T> Clone for Pipe<S, T> {
    fn clone(&self) -> Self {
        Pipe { source: Rc::clone(&self.source), chain: self.chain.clone() }
    }
}

impl<S, T> Debug for Pipe<S, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe").field("source", &self.source.kind()).field("stages", &self.chain).finish()
    }
}

impl<S: 'static> Pipe<S> {
    pub fn from_source(source: impl Source<S> + 'static) -> Pipe<S> {
        Pipe { source: Rc::new(source), chain: Chain::identity() }
    }

    /// 以可克隆迭代器为数据源，每次迭代使用迭代器的一个副本。
    pub fn from_iter_cloned<I>(iter: I) -> Pipe<S>
    where
        I: Iterator<Item = S> + Clone + 'static,
    {
        Self::from_source(IterSource::new(iter))
    }
}

impl<S: Clone + 'static> Pipe<S> {
    pub fn from_vec(data: Vec<S>) -> Pipe<S> {
        Self::from_source(ListSource::new(data))
    }
}

impl Pipe<Text> {
    /// 按行读取，只能向前遍历一次，参见[`LineSource`]。
    pub fn lines(reader: impl BufRead + 'static) -> Pipe<Text> {
        Self::from_source(LineSource::from_reader("<reader>", reader))
    }

    pub fn open_file(file: impl AsRef<Path>) -> Result<Pipe<Text>, SqErr> {
        LineSource::open_files(&[file]).map(Self::from_source)
    }
}

impl Pipe<Integer> {
    /// `[start, end)`范围内的整数。
    pub fn range(start: Integer, end: Integer) -> Pipe<Integer> {
        Self::range_step(start, end, 1)
    }

    pub fn range_step(start: Integer, end: Integer, step: Integer) -> Pipe<Integer> {
        Self::from_source(RangeSource::new(start, end, step))
    }
}

impl<S: 'static, T: 'static> Pipe<S, T> {
    /// 追加一个映射阶段，元素类型可以随之改变。
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Pipe<S, U> {
        Pipe { source: Rc::clone(&self.source), chain: self.chain.then_map(Rc::new(f)) }
    }

    /// 追加一个过滤阶段，不满足条件的元素不会到达后续阶段。
    pub fn filter(&self, p: impl Fn(&T) -> bool + 'static) -> Pipe<S, T> {
        Pipe { source: Rc::clone(&self.source), chain: self.chain.then_filter(Rc::new(p)) }
    }

    /// 追加一个携带状态的过滤阶段，每次迭代都会通过`init`创建独立的状态。
    pub fn filter_with<St: 'static>(
        &self, init: impl Fn() -> St + 'static, p: impl Fn(&mut St, &T) -> bool + 'static,
    ) -> Pipe<S, T> {
        Pipe { source: Rc::clone(&self.source), chain: self.chain.then_filter_with(Rc::new(init), Rc::new(p)) }
    }

    pub fn stages(&self) -> &[StageKind] {
        self.chain.kinds()
    }

    /// 数据源是否支持重复遍历。基于行读取的数据源只能遍历一次。
    pub fn restartable(&self) -> bool {
        self.source.restartable()
    }

    pub fn source_kind(&self) -> &'static str {
        self.source.kind()
    }

    /// 开始一次新的迭代。
    ///
    /// 每次迭代都拥有独立的数据源游标和独立实例化的阶段链，同时进行的多个迭代互不干扰。
    pub fn iter(&self) -> PipeIter<S, T> {
        let ready = Rc::new(Cell::new(None));
        let slot = Rc::clone(&ready);
        let push = self.chain.instantiate(Box::new(move |v| slot.set(Some(v))));
        PipeIter { cursor: self.source.open(), push, ready, exhausted: false, upper: self.source.len_hint() }
    }

    pub fn to_list(&self) -> Vec<T> {
        self.iter().collect()
    }

    pub fn to_seq(&self) -> Seq<T> {
        self.iter().collect()
    }

    pub fn join(&self, sep: &str) -> String
    where
        T: Display,
    {
        self.iter().join(sep)
    }

    /// 使用默认分隔符[`DEFAULT_SEP`]连接。
    pub fn join_default(&self) -> String
    where
        T: Display,
    {
        self.join(DEFAULT_SEP)
    }

    /// 归约，`f`的参数依次为当前元素和累积值。
    pub fn reduce<A>(&self, f: impl Fn(T, A) -> A, initial: A) -> A {
        self.iter().fold(initial, |acc, v| f(v, acc))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    pub fn for_each(&self, f: impl FnMut(T)) {
        self.iter().for_each(f)
    }

    /// 取前`n`个元素，取够后立即停止拉取。
    ///
    /// `n`为负数时需要知道总数，会先取出全部元素再按[`Seq::head`]截取。
    pub fn head(&self, n: isize) -> Seq<T>
    where
        T: Clone,
    {
        if n >= 0 { self.iter().take(n as usize).collect() } else { self.to_seq().head(n) }
    }

    pub fn sort(&self) -> Seq<T>
    where
        T: Ord,
    {
        self.iter().sorted().collect()
    }

    /// 只为副作用驱动整个流水线，不收集任何结果。
    ///
    /// 最后一个阶段为`Map`时，其结果无处可去，返回[`SqErr::PipelineMisuse`]且不会读取数据源。
    pub fn run(&self) -> Result<(), SqErr> {
        let mut push = self.chain.instantiate_detached()?;
        let mut cursor = self.source.open();
        while let Some(raw) = cursor.pull() {
            push(raw);
        }
        Ok(())
    }
}

impl<S: 'static, K: Hash + Eq + 'static, V: 'static> Pipe<S, (K, V)> {
    /// 转为映射，重复的键保留最后一个值。
    pub fn to_map(&self) -> FxHashMap<K, V> {
        self.iter().collect()
    }
}

impl<S: 'static, U: 'static, E: 'static> Pipe<S, Result<U, E>> {
    /// 收集全部结果，遇到第一个错误时立即停止拉取并返回该错误。
    pub fn try_to_list(&self) -> Result<Vec<U>, E> {
        self.iter().collect()
    }
}

/// 流水线本身也可以作为数据源，用来隐藏源元素类型，或在其后继续拼接其他数据源。
impl<S: 'static, T: 'static> Source<T> for Pipe<S, T> {
    fn open(&self) -> Box<dyn Cursor<T>> {
        Box::new(self.iter())
    }

    fn kind(&self) -> &'static str {
        "pipe"
    }

    fn len_hint(&self) -> Option<usize> {
        self.source.len_hint()
    }

    fn restartable(&self) -> bool {
        self.source.restartable()
    }
}

impl<'a, S: 'static, T: 'static> IntoIterator for &'a Pipe<S, T> {
    type Item = T;
    type IntoIter = PipeIter<S, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 流水线上的一次迭代。
pub struct PipeIter<S, T> {
    cursor: Box<dyn Cursor<S>>,
    push: Sink<S>,
    ready: Rc<Cell<Option<T>>>,
    exhausted: bool,
    /// 每个源元素最多产出一个元素，数据源的元素总数即为上限
    upper: Option<usize>,
}

impl<S, T> PipeIter<S, T> {
    /// 是否还能产出元素。需要时会提前计算出下一个元素并暂存。
    pub fn has_more(&mut self) -> bool {
        match self.next() {
            Some(v) => {
                self.ready.set(Some(v));
                true
            }
            None => false,
        }
    }

    /// 取出下一个元素，耗尽时返回[`SqErr::Exhausted`]。
    pub fn next_or_exhausted(&mut self) -> Result<T, SqErr> {
        self.next().ok_or(SqErr::Exhausted)
    }
}

impl<S, T> Cursor<T> for PipeIter<S, T> {
    fn has_more(&mut self) -> bool {
        PipeIter::has_more(self)
    }

    fn pull(&mut self) -> Option<T> {
        self.next()
    }
}

impl<S, T> Iterator for PipeIter<S, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(v) = self.ready.take() {
                return Some(v);
            }
            if self.exhausted {
                return None;
            }
            // 一个源元素最多产生一个就绪值，被过滤掉时继续拉取下一个
            match self.cursor.pull() {
                Some(raw) => (self.push)(raw),
                None => self.exhausted = true, // 耗尽后不再访问数据源
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted { (0, Some(1)) } else { (0, self.upper) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;
    use std::cell::RefCell;
    use std::io::Cursor as IoCursor;

    fn words() -> Pipe<Text> {
        Pipe::from_vec(vec![Text::from("¡"), Text::from("Hola"), Text::from("Mundo"), Text::from("!")])
    }

    #[test]
    fn test_filter_then_map() {
        let pipe = words().filter(|s| s.len() > 2).map(|s| Text::from("Test ") + &s);
        assert_eq!(pipe.to_list(), vec!["Test Hola", "Test Mundo"]);
        assert_eq!(pipe.stages(), &[StageKind::Filter, StageKind::Map]);
    }

    #[test]
    fn test_independent_iterators() {
        let pipe = words().filter(|s| s.len() > 2).map(|s| Text::from("Test ") + &s);
        let mut a = pipe.iter();
        let mut b = pipe.iter();
        assert_eq!(a.next(), Some(Text::from("Test Hola")));
        assert_eq!(b.next(), Some(Text::from("Test Hola")));
        assert_eq!(b.next(), Some(Text::from("Test Mundo")));
        assert_eq!(a.next(), Some(Text::from("Test Mundo")));
        assert_eq!(a.next(), None);
        assert_eq!(b.next(), None);
        assert_eq!(pipe.to_list(), vec!["Test Hola", "Test Mundo"]);
    }

    #[test]
    fn test_appending_keeps_original() {
        let base = Pipe::from_vec(vec![1, 2, 3, 4, 5]);
        let even = base.filter(|v| v % 2 == 0);
        let doubled = even.map(|v| v * 2);
        assert_eq!(base.to_list(), vec![1, 2, 3, 4, 5]);
        assert_eq!(even.to_list(), vec![2, 4]);
        assert_eq!(doubled.to_list(), vec![4, 8]);
        assert_eq!(base.stages().len(), 0);
        assert_eq!(even.stages().len(), 1);
    }

    #[test]
    fn test_filter_count_and_order() {
        let data = vec![5, 8, 1, 9, 4, 7, 2, 6, 3];
        let pipe = Pipe::from_vec(data.clone()).filter(|v| *v > 4);
        assert_eq!(pipe.count(), data.iter().filter(|v| **v > 4).count());
        assert_eq!(pipe.to_list(), vec![5, 8, 9, 7, 6]);
    }

    #[test]
    fn test_map_composition() {
        let data = vec![1, 2, 3, 4];
        let f = |v: i32| v + 3;
        let g = |v: i32| v * 10;
        let chained = Pipe::from_vec(data.clone()).map(f).map(g);
        let composed = Pipe::from_vec(data).map(move |v| g(f(v)));
        assert_eq!(chained.to_list(), composed.to_list());
    }

    #[test]
    fn test_type_changing_map() {
        let pipe = Pipe::from_vec(vec!["1", "22", "333"]).map(|s| s.len()).map(|n| n as f64 / 2.0);
        assert_eq!(pipe.to_list(), vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_lazy_evaluation_stops_early() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let pipe = Pipe::range(0, 1_000_000).map(move |v| {
            *counter.borrow_mut() += 1;
            v
        });
        assert_eq!(pipe.head(3).into_vec(), vec![0, 1, 2]);
        assert_eq!(*calls.borrow(), 3);
        assert_eq!(pipe.first(), Some(0));
        assert_eq!(*calls.borrow(), 4);
    }

    #[test]
    fn test_head() {
        let pipe = Pipe::range(1, 6);
        assert_eq!(pipe.head(2).join(", "), "1, 2");
        assert_eq!(pipe.head(-2).join(", "), "1, 2, 3");
        assert_eq!(pipe.head(10).join(", "), "1, 2, 3, 4, 5");
    }

    #[test]
    fn test_terminals() {
        let pipe = Pipe::range(1, 6);
        assert_eq!(pipe.join(", "), "1, 2, 3, 4, 5");
        assert_eq!(pipe.join_default(), "1, 2, 3, 4, 5");
        assert_eq!(pipe.filter(|v| *v > 10).join_default(), "");
        assert_eq!(pipe.filter(|v| *v > 10).join(", "), "");
        assert_eq!(pipe.reduce(|v, acc| v + acc, 0), 15);
        assert_eq!(Pipe::from_vec(vec![3, 1, 2]).sort().into_vec(), vec![1, 2, 3]);
        let mut seen = Vec::new();
        pipe.for_each(|v| seen.push(v));
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        let mut total = 0;
        for v in &pipe {
            total += v;
        }
        assert_eq!(total, 15);
    }

    #[test]
    fn test_size_hint() {
        let pipe = Pipe::range(0, 10).filter(|v| v % 3 == 0).map(Text::of);
        let mut it = pipe.iter();
        assert_eq!(it.size_hint(), (0, Some(10)));
        assert_eq!(it.by_ref().count(), 4);
        assert_eq!(it.size_hint(), (0, Some(1)));
        assert_eq!(Pipe::from_source(pipe).iter().size_hint(), (0, Some(10)));
        assert_eq!(Pipe::lines(IoCursor::new("a\nb")).iter().size_hint(), (0, None));
    }

    #[test]
    fn test_has_more_and_exhaustion() {
        let pipe = Pipe::from_vec(vec![1, 2, 3]).filter(|v| *v != 2);
        let mut it = pipe.iter();
        assert!(it.has_more());
        assert!(it.has_more());
        assert_eq!(it.next_or_exhausted(), Ok(1));
        assert_eq!(it.next_or_exhausted(), Ok(3));
        assert!(!it.has_more());
        assert_eq!(it.next_or_exhausted(), Err(SqErr::Exhausted));
        assert_eq!(it.next(), None);
    }

    #[test]
    #[should_panic(expected = "bad element 2")]
    fn test_stage_panic_reaches_caller() {
        let pipe = Pipe::from_vec(vec![1, 2, 3]).map(|v| {
            if v == 2 {
                panic!("bad element {v}");
            }
            v * 10
        });
        assert_eq!(pipe.first(), Some(10));
        let mut it = pipe.iter();
        assert_eq!(it.next(), Some(10));
        it.next();
    }

    struct CountingSource {
        pulls: Rc<Cell<usize>>,
    }

    struct CountingCursor {
        pulls: Rc<Cell<usize>>,
        left: usize,
    }

    impl Source<i32> for CountingSource {
        fn open(&self) -> Box<dyn Cursor<i32>> {
            Box::new(CountingCursor { pulls: Rc::clone(&self.pulls), left: 2 })
        }

        fn kind(&self) -> &'static str {
            "counting"
        }
    }

    impl Cursor<i32> for CountingCursor {
        fn has_more(&mut self) -> bool {
            self.left > 0
        }

        fn pull(&mut self) -> Option<i32> {
            self.pulls.set(self.pulls.get() + 1);
            if self.left == 0 {
                None
            } else {
                self.left -= 1;
                Some(self.left as i32)
            }
        }
    }

    #[test]
    fn test_source_not_pulled_after_exhaustion() {
        let pulls = Rc::new(Cell::new(0));
        let pipe = Pipe::from_source(CountingSource { pulls: Rc::clone(&pulls) });
        let mut it = pipe.iter();
        assert_eq!(it.by_ref().count(), 2);
        assert_eq!(pulls.get(), 3);
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert_eq!(pulls.get(), 3);
    }

    #[test]
    fn test_line_source_is_forward_only() {
        let pipe = Pipe::lines(IoCursor::new("a\nbb\nccc\n")).filter(|s| s.len() > 1);
        assert!(!pipe.restartable());
        assert_eq!(pipe.to_list(), vec!["bb", "ccc"]);
        assert!(pipe.to_list().is_empty());
    }

    #[test]
    fn test_stateful_filter_per_iteration() {
        let pipe = Pipe::from_vec(vec![3, 1, 3, 2, 1]).filter_with(FxHashSet::default, |seen: &mut FxHashSet<i32>, v| {
            seen.insert(*v)
        });
        assert_eq!(pipe.to_list(), vec![3, 1, 2]);
        assert_eq!(pipe.to_list(), vec![3, 1, 2]);
    }

    #[test]
    fn test_run() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let pipe = Pipe::from_vec(vec![1, 2, 3]).filter(move |v| {
            sink.borrow_mut().push(*v);
            false
        });
        assert_eq!(pipe.run(), Ok(()));
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(pipe.map(|v| v + 1).run(), Err(SqErr::PipelineMisuse { stage: 1 }));
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
        assert_eq!(Pipe::from_vec(vec![1]).run(), Ok(()));
    }

    #[test]
    fn test_to_map_and_try_to_list() {
        let services = Pipe::from_vec(vec!["http 80/tcp", "ssh 22/tcp", "http 8080/tcp"]).map(|line| {
            let parts = Text::from(line).split(' ', false);
            (parts[0].clone(), parts[1].slice(0, -5).to_long().unwrap_or(0))
        });
        let map = services.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["http"], 8080);
        assert_eq!(map["ssh"], 22);

        let numbers = Pipe::from_vec(vec!["1", "2", "x", "4"]).map(|s| Text::from(s).to_long());
        assert_eq!(numbers.filter(|r| r.is_ok()).try_to_list(), Ok(vec![1, 2, 4]));
        assert!(matches!(numbers.try_to_list(), Err(SqErr::NumberFormat { .. })));
    }

    #[test]
    fn test_pipe_as_source() {
        let inner = Pipe::range_step(10, 0, -3).map(Text::of);
        let outer = Pipe::from_source(inner.clone()).filter(|t| t.len() == 1);
        assert_eq!(outer.to_list(), vec!["7", "4", "1"]);
        assert_eq!(outer.source_kind(), "pipe");
        assert!(outer.restartable());
        let mut cursor = inner.open();
        assert!(cursor.has_more());
        assert_eq!(cursor.pull(), Some(Text::from("10")));
        assert!(!Pipe::from_source(Pipe::lines(IoCursor::new("x"))).restartable());
    }

    #[test]
    fn test_cloned_iter_source() {
        let pipe = Pipe::from_iter_cloned((1..4).map(|v| v * v));
        assert_eq!(pipe.to_list(), vec![1, 4, 9]);
        assert_eq!(pipe.to_list(), vec![1, 4, 9]);
        assert_eq!(format!("{:?}", pipe.filter(|v| *v > 1)), "Pipe { source: \"iter\", stages: [Filter] }");
    }
}
