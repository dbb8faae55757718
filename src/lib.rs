pub mod douglas_peucker;
pub mod error;
pub mod roads;
