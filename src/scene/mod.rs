pub mod builder;
pub mod composer;
pub mod nodes;
