pub mod assessment;
pub mod category;
pub mod scores;
