pub mod access;
pub mod employee;
pub mod export;
pub mod render;
