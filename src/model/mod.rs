pub mod access;
pub mod application;
pub mod employee;
