pub mod env;
pub mod init;
pub mod publish;
pub mod show;
pub mod validate;
