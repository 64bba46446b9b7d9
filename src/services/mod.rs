pub mod error;
pub mod points_service;
pub mod tier_service;
pub mod transaction_service;
