pub mod devices;
pub mod favorites;
pub mod meta;
