pub mod importer;

pub use importer::{import_user_data, ImportReport, MAX_SYNC_PAGES};
