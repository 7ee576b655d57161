pub mod carts;
pub mod products;
pub mod sessions;
pub mod system;
