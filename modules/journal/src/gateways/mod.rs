pub mod local;

pub use local::JournalLocalClient;
