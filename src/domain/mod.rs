pub mod cart;
pub mod checkout;
pub mod customer;
pub mod errors;
pub mod events;
pub mod money;
pub mod order;
pub mod ports;
pub mod shipping;
