pub mod accounts;
pub mod fallback;
pub mod health;
