pub mod bids;
pub mod jobs;
pub mod payments;
pub mod payouts;
