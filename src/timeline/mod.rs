pub mod model;
pub mod order;
pub mod store;
pub mod validate;
