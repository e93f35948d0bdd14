// Domain layer: value objects and ports. No behavior beyond the quote
// status machine and small helpers.

pub mod model;
pub mod ports;
