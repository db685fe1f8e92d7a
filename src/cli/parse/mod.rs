pub(crate) mod args;
mod token;
