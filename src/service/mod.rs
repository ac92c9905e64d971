pub mod acceptance;
pub mod background_jobs;
pub mod error;
pub mod payment;
pub mod settlement;
pub mod stripe;
