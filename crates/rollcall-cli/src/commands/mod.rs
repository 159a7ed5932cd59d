pub mod init;
pub mod menu;
pub mod summary;
pub mod view;
