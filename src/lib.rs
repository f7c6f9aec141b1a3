pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod report;
pub mod scope;
pub mod services;

pub use error::AppError;
