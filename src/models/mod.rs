pub mod bidmodel;
pub mod jobmodel;
pub mod payoutmodel;
pub mod usermodel;
