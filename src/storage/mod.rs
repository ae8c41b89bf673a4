mod blob;

pub use blob::{load_model, FileStore, HttpBlobStore, ModelStore};
