pub mod buggy;
pub mod health;
pub mod products;
