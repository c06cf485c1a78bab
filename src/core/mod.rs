pub mod error;
pub mod http;
#[cfg(test)]
pub mod test_utils;
pub mod utils;
