pub mod news;
pub mod quote;
pub mod sample;
pub mod series;
pub mod ticker;
