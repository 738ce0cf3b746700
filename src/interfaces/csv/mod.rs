//! CSV surface of the command-line driver.

pub mod order_reader;
pub mod outcome_writer;
