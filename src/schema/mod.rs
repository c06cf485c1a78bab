pub mod access;
pub mod employee;
