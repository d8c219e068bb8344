pub mod checkout;
pub mod orders;
pub mod shipping;
pub mod webhook;
