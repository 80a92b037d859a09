// Adapters behind the application ports

pub mod csv_file_source;
pub mod in_memory_user_store;
pub mod password;
pub mod sqlite_user_store;

pub use csv_file_source::CsvFileSource;
pub use in_memory_user_store::InMemoryUserStore;
pub use sqlite_user_store::SqliteUserStore;
