pub mod bootstrap;
pub mod check;
pub mod init;
pub mod palette;
pub mod serve;
