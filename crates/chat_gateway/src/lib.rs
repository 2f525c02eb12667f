pub mod handlers;
pub mod upstream;
pub mod utils;
