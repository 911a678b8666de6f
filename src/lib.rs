pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod operation;
pub mod order;
pub mod payload;
pub mod qr;
pub mod response;
pub mod telemetry;
pub mod tls;
pub mod transport;

mod validate;
