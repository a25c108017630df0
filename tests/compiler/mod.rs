//! Compiler tests.

mod output_test;
mod sass_test;
