//! 可链式组合的惰性序列流水线，以及按字符计数的文本类型和立即求值的序列容器。
//!
//! ```text
//! let pipe = Pipe::from_vec(words).filter(|s| s.len() > 2).map(|s| Text::from("Test ") + &s);
//! for item in &pipe { ... }
//! ```

mod err;
mod pipe;
mod seq;
mod source;
mod stage;
mod text;

pub use err::{FormatArgKind, SqErr};
pub use pipe::{Pipe, PipeIter};
pub use seq::{DEFAULT_SEP, Seq, zip};
pub use source::{Cursor, IterSource, LineSource, ListSource, RangeSource, Source};
pub use stage::StageKind;
pub use text::{Sep, Text};

/// 整数元素类型。
pub type Integer = i64;
