//! copyreg command-line tools

pub mod output;
