pub mod auth;
pub mod discounts;
pub mod gateways;
pub mod products;
pub mod profile;
pub mod upload;
pub mod workshops;
