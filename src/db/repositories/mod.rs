pub mod audit;
pub mod drawer;
pub mod user;
