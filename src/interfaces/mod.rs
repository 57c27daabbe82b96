//! Outer interfaces driving the application layer.

pub mod csv;
