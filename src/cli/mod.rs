pub(crate) mod condition;
pub(crate) mod config;
pub(crate) mod err;
pub(crate) mod help;
pub(crate) mod input;
pub(crate) mod op;
pub(crate) mod output;
pub(crate) mod parse;
pub(crate) mod print;
