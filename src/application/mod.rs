pub mod checkout;
pub mod shipping;
pub mod webhook;
