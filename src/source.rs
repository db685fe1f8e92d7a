use crate::err::SqErr;
use crate::text::Text;
use crate::Integer;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::Peekable;
use std::path::Path;
use std::rc::Rc;

/// 数据源上的游标，逐个产出元素。
///
/// 游标一旦报告耗尽，之后将一直保持耗尽状态。
pub trait Cursor<S> {
    /// 是否还有元素。
    fn has_more(&mut self) -> bool;

    /// 取出下一个元素，耗尽时返回`None`。
    fn pull(&mut self) -> Option<S>;

    /// 取出下一个元素，耗尽时返回[`SqErr::Exhausted`]。
    fn next_or_exhausted(&mut self) -> Result<S, SqErr> {
        if self.has_more() { self.pull().ok_or(SqErr::Exhausted) } else { Err(SqErr::Exhausted) }
    }
}

/// 元素数据源。每次迭代都会通过[`Source::open`]获取一个新的游标。
pub trait Source<S> {
    fn open(&self) -> Box<dyn Cursor<S>>;

    /// 数据源类型名称，用于调试输出。
    fn kind(&self) -> &'static str;

    /// 元素数量，未知时返回`None`。
    fn len_hint(&self) -> Option<usize> {
        None
    }

    /// 每次打开的游标是否都能从头开始遍历。
    fn restartable(&self) -> bool {
        true
    }
}

/// 基于内存列表的数据源，所有游标共享同一份只读数据。
#[derive(Debug)]
pub struct ListSource<S> {
    data: Rc<[S]>,
}

impl<S> ListSource<S> {
    pub fn new(data: Vec<S>) -> ListSource<S> {
        ListSource { data: Rc::from(data) }
    }
}

impl<S: Clone + 'static> Source<S> for ListSource<S> {
    fn open(&self) -> Box<dyn Cursor<S>> {
        Box::new(ListCursor { data: Rc::clone(&self.data), pos: 0 })
    }

    fn kind(&self) -> &'static str {
        "list"
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

struct ListCursor<S> {
    data: Rc<[S]>,
    pos: usize,
}

impl<S: Clone> Cursor<S> for ListCursor<S> {
    fn has_more(&mut self) -> bool {
        self.pos < self.data.len()
    }

    fn pull(&mut self) -> Option<S> {
        let item = self.data.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }
}

/// `[start, end)`范围内的整数，按`step`递增或递减。
///
/// `step`为负数时从`start`递减到大于`end`为止；`step`为0时不产生任何元素。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RangeSource {
    start: Integer,
    end: Integer,
    step: Integer,
}

impl RangeSource {
    pub fn new(start: Integer, end: Integer, step: Integer) -> RangeSource {
        RangeSource { start, end, step }
    }
}

impl Source<Integer> for RangeSource {
    fn open(&self) -> Box<dyn Cursor<Integer>> {
        Box::new(RangeCursor { next: Some(self.start), end: self.end, step: self.step })
    }

    fn kind(&self) -> &'static str {
        "range"
    }

    fn len_hint(&self) -> Option<usize> {
        let span = match self.step {
            0 => 0,
            step if step > 0 && self.end > self.start => self.end.abs_diff(self.start),
            step if step < 0 && self.start > self.end => self.start.abs_diff(self.end),
            _ => 0,
        };
        usize::try_from(span.div_ceil(self.step.unsigned_abs().max(1))).ok()
    }
}

#[derive(Debug, Eq, PartialEq)]
struct RangeCursor {
    next: Option<Integer>,
    end: Integer,
    step: Integer,
}

impl Cursor<Integer> for RangeCursor {
    fn has_more(&mut self) -> bool {
        match self.next {
            Some(next) if self.step > 0 => next < self.end,
            Some(next) if self.step < 0 => next > self.end,
            _ => false,
        }
    }

    fn pull(&mut self) -> Option<Integer> {
        if self.has_more() {
            let res = self.next?;
            self.next = res.checked_add(self.step); // 溢出即耗尽
            Some(res)
        } else {
            self.next = None;
            None
        }
    }
}

/// 基于可克隆迭代器的数据源，每个游标持有迭代器的独立副本。
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> IterSource<I> {
        IterSource { iter }
    }
}

impl<I> Source<I::Item> for IterSource<I>
where
    I: Iterator + Clone + 'static,
{
    fn open(&self) -> Box<dyn Cursor<I::Item>> {
        Box::new(IterCursor { iter: self.iter.clone().peekable(), done: false })
    }

    fn kind(&self) -> &'static str {
        "iter"
    }
}

struct IterCursor<I: Iterator> {
    iter: Peekable<I>,
    done: bool,
}

impl<I: Iterator> Cursor<I::Item> for IterCursor<I> {
    fn has_more(&mut self) -> bool {
        if !self.done && self.iter.peek().is_none() {
            self.done = true;
        }
        !self.done
    }

    fn pull(&mut self) -> Option<I::Item> {
        if self.has_more() { self.iter.next() } else { None }
    }
}

struct NamedReader {
    name: String,
    reader: Box<dyn BufRead>,
}

/// 按行读取的共享状态：预读的一行、当前行号以及读取错误。
struct LineReader {
    readers: VecDeque<NamedReader>,
    ahead: Option<Text>,
    line_no: usize,
    error: Option<SqErr>,
}

impl LineReader {
    /// 预读一行，当前读取器结束后切换到下一个。
    fn fill(&mut self) {
        let mut buf = String::new();
        while self.ahead.is_none() {
            let Some(current) = self.readers.front_mut() else {
                return;
            };
            buf.clear();
            match current.reader.read_line(&mut buf) {
                Ok(0) => {
                    self.readers.pop_front();
                    self.line_no = 0;
                }
                Ok(_) => {
                    self.line_no += 1;
                    let line = buf.strip_suffix('\n').map_or(buf.as_str(), |l| l.strip_suffix('\r').unwrap_or(l));
                    self.ahead = Some(Text::from(line));
                }
                Err(err) => {
                    self.error = Some(SqErr::ReadFromInputFileErr {
                        file: current.name.clone(),
                        line_no: self.line_no + 1,
                        err: err.to_string(),
                    });
                    self.readers.clear(); // 读取失败后不再继续读取
                }
            }
        }
    }
}

/// 按行读取的数据源，只能向前读取一次。
///
/// 所有游标共享同一个读取器：读到末尾后再次迭代只会得到空序列。需要重复遍历时，
/// 先通过`to_seq()`缓存全部行再转为列表数据源，代价是内存占用随数据量增长。
/// 读取错误会结束序列，错误本身可通过[`LineSource::take_error`]获取。
#[derive(Clone)]
pub struct LineSource {
    shared: Rc<RefCell<LineReader>>,
}

impl LineSource {
    pub fn from_reader(name: impl Into<String>, reader: impl BufRead + 'static) -> LineSource {
        Self::from_readers(vec![(name.into(), Box::new(reader) as Box<dyn BufRead>)])
    }

    /// 依次读取多个读取器的所有行。
    pub fn from_readers(readers: Vec<(String, Box<dyn BufRead>)>) -> LineSource {
        let readers = readers.into_iter().map(|(name, reader)| NamedReader { name, reader }).collect();
        LineSource { shared: Rc::new(RefCell::new(LineReader { readers, ahead: None, line_no: 0, error: None })) }
    }

    pub fn stdin() -> LineSource {
        Self::from_reader("<stdin>", io::stdin().lock())
    }

    /// 打开多个文件，任一文件打开失败时返回错误。
    pub fn open_files<P: AsRef<Path>>(files: &[P]) -> Result<LineSource, SqErr> {
        let mut readers = Vec::with_capacity(files.len());
        for file in files {
            let name = file.as_ref().display().to_string();
            match File::open(file) {
                Ok(fin) => readers.push((name, Box::new(BufReader::new(fin)) as Box<dyn BufRead>)),
                Err(err) => return Err(SqErr::OpenInputFileErr { file: name, err: err.to_string() }),
            }
        }
        Ok(Self::from_readers(readers))
    }

    /// 取出读取过程中发生的错误。
    pub fn take_error(&self) -> Option<SqErr> {
        self.shared.borrow_mut().error.take()
    }
}

impl Source<Text> for LineSource {
    fn open(&self) -> Box<dyn Cursor<Text>> {
        Box::new(LineCursor { shared: Rc::clone(&self.shared) })
    }

    fn kind(&self) -> &'static str {
        "lines"
    }

    fn restartable(&self) -> bool {
        false
    }
}

struct LineCursor {
    shared: Rc<RefCell<LineReader>>,
}

impl Cursor<Text> for LineCursor {
    fn has_more(&mut self) -> bool {
        let mut reader = self.shared.borrow_mut();
        reader.fill();
        reader.ahead.is_some()
    }

    fn pull(&mut self) -> Option<Text> {
        let mut reader = self.shared.borrow_mut();
        reader.fill();
        reader.ahead.take()
    }
}
