pub mod biddb;
pub mod db;
pub mod jobdb;
pub mod payoutdb;
pub mod userdb;
