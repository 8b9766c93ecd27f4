//! Persistence module split across logical submodules.

mod file;
mod location;

pub use file::ContactStore;
pub use location::{default_data_dir, default_record_file, RECORD_FILE_NAME};
