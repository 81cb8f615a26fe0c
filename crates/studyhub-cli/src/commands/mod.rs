pub mod demo;
pub mod init;
pub mod notify;
pub mod validate;
