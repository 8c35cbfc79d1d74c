pub mod install;
pub mod list;
pub mod pull;
pub mod push;
pub mod version;
