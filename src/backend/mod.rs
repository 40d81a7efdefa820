pub mod file;
pub mod plugin;

pub use file::FileConfigBackend;
pub use plugin::ConfigBackend;
