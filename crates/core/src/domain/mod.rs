pub mod audit;
pub mod contract;
pub mod ecommerce;
pub mod lenient;
