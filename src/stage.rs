use crate::err::SqErr;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// 推送链的接收端：每收到一个值调用一次。
pub(crate) type Sink<T> = Box<dyn FnMut(T)>;

/// 给定末端接收者，生成一条以数据源元素为入口的推送链。
type Wire<S, T> = Rc<dyn Fn(Sink<T>) -> Sink<S>>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StageKind {
    Map,
    Filter,
}

impl Display for StageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Map => write!(f, "Map"),
            StageKind::Filter => write!(f, "Filter"),
        }
    }
}

/// 阶段链：从数据源元素类型`S`到输出元素类型`T`的一串`Map`/`Filter`阶段。
///
/// 阶段链本身只是描述，不持有任何迭代状态。每次调用[`Chain::instantiate`]都会生成一条全新的推送链，
/// 携带状态的阶段（[`Chain::then_filter_with`]）也会重新初始化自己的状态，因此同一条阶段链上的多次迭代互不影响。
pub(crate) struct Chain<S, T> {
    wire: Wire<S, T>,
    kinds: Vec<StageKind>,
}

impl<S, T> Clone for Chain<S, T> {
    fn clone(&self) -> Self {
        Chain { wire: Rc::clone(&self.wire), kinds: self.kinds.clone() }
    }
}

impl<S, T> Debug for Chain<S, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.kinds).finish()
    }
}

impl<S: 'static> Chain<S, S> {
    pub(crate) fn identity() -> Chain<S, S> {
        Chain { wire: Rc::new(|sink: Sink<S>| sink), kinds: Vec::new() }
    }
}

impl<S: 'static, T: 'static> Chain<S, T> {
    fn then<U>(&self, kind: StageKind, wire: Wire<S, U>) -> Chain<S, U> {
        let mut kinds = self.kinds.clone();
        kinds.push(kind);
        Chain { wire, kinds }
    }

    pub(crate) fn then_map<U: 'static>(&self, f: Rc<dyn Fn(T) -> U>) -> Chain<S, U> {
        let prev = Rc::clone(&self.wire);
        self.then(
            StageKind::Map,
            Rc::new(move |mut sink: Sink<U>| {
                let f = Rc::clone(&f);
                prev(Box::new(move |v: T| sink(f(v))))
            }),
        )
    }

    pub(crate) fn then_filter(&self, p: Rc<dyn Fn(&T) -> bool>) -> Chain<S, T> {
        let prev = Rc::clone(&self.wire);
        self.then(
            StageKind::Filter,
            Rc::new(move |mut sink: Sink<T>| {
                let p = Rc::clone(&p);
                prev(Box::new(move |v: T| {
                    if p(&v) {
                        sink(v)
                    }
                }))
            }),
        )
    }

    /// 携带状态的过滤阶段，状态在每次实例化时由`init`重新创建。
    pub(crate) fn then_filter_with<St: 'static>(
        &self, init: Rc<dyn Fn() -> St>, p: Rc<dyn Fn(&mut St, &T) -> bool>,
    ) -> Chain<S, T> {
        let prev = Rc::clone(&self.wire);
        self.then(
            StageKind::Filter,
            Rc::new(move |mut sink: Sink<T>| {
                let p = Rc::clone(&p);
                let mut state = init();
                prev(Box::new(move |v: T| {
                    if p(&mut state, &v) {
                        sink(v)
                    }
                }))
            }),
        )
    }

    /// 以`sink`为末端，生成一条私有的推送链。
    pub(crate) fn instantiate(&self, sink: Sink<T>) -> Sink<S> {
        (self.wire)(sink)
    }

    /// 生成一条没有末端接收者的推送链。
    ///
    /// 末尾的`Filter`阶段可以直接丢弃结果，但末尾的`Map`阶段产生的值无处可去，返回[`SqErr::PipelineMisuse`]。
    pub(crate) fn instantiate_detached(&self) -> Result<Sink<S>, SqErr> {
        match self.kinds.last() {
            Some(StageKind::Map) => Err(SqErr::PipelineMisuse { stage: self.kinds.len() - 1 }),
            _ => Ok(self.instantiate(Box::new(|_| {}))),
        }
    }

    pub(crate) fn kinds(&self) -> &[StageKind] {
        &self.kinds
    }
}
