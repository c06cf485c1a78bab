pub mod access_assignment;
pub mod detail;
pub mod directory;
pub mod export;
pub mod notice;
