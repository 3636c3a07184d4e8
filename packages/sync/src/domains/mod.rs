pub mod products;
pub mod sheets;
pub mod sync;
pub mod vendor;
