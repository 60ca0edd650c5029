mod local_storage;
mod schema;

pub use local_storage::LocalStorage;
