//! Domain layer: the payment record, its status vocabulary, token issuance and
//! the ports the application layer drives.

pub mod payment;
pub mod ports;
pub mod provider;
pub mod status;
pub mod token;
