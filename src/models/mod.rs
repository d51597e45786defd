pub mod account;
pub mod response;
