pub mod blob_repo;

pub use blob_repo::BlobRepo;
