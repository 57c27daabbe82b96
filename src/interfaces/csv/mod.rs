pub mod batch;
pub mod command_reader;
pub mod payment_writer;
