pub mod domain;
pub mod error;
pub mod patch;
pub mod protocol;
