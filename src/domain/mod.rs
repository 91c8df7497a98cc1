pub mod course;
pub mod ports;
pub mod progress;
pub mod purchase;
pub mod user;
