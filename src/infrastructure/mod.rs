pub mod customer_store;
pub mod models;
pub mod order_store;
pub mod shiprocket;
pub mod stripe;
