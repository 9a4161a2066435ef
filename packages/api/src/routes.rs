pub mod admin;
pub mod auth;
pub mod checkout;
pub mod health;
pub mod webhook;
