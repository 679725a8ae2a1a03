pub mod help;
pub mod menutest;
pub mod ping;
pub mod usage;
