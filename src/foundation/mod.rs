pub mod core;
pub mod error;
pub mod ids;
pub mod observable;
