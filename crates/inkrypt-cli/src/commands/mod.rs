pub mod entries;
pub mod init;
pub mod maintenance;
pub mod misc;
pub mod templates;
pub mod transfer;
