//! Movie store: a single collection of movie documents.
//!
//! [`MovieStore`] is the seam between the HTTP layer and persistence.
//! [`FjallStore`] keeps documents on disk; [`MemoryStore`] keeps them in
//! process and is mostly useful for tests.

mod error;
mod fjall_store;
mod memory;
mod movie;
mod object_id;

pub use error::{ErrorKind, MovieError};
pub use fjall_store::FjallStore;
pub use memory::MemoryStore;
pub use movie::{DeleteResult, InsertResult, Movie, MovieFields, MovieInput, UpdateResult};
pub use object_id::{OBJECT_ID_LEN, ObjectId, ParseObjectIdError};

/// Operations over the movie collection.
///
/// Implementations are shared across request tasks and must be safe to call
/// concurrently. Concurrent writes to the same id are last-write-wins.
pub trait MovieStore: Send + Sync {
    /// All movies in store order. Empty when the collection is empty.
    fn list_all(&self) -> Result<Vec<Movie>, MovieError>;

    /// The movie with `id`, or [`MovieError::NotFound`].
    fn get_by_id(&self, id: &ObjectId) -> Result<Movie, MovieError>;

    /// Insert a movie, generating an id when the input has none.
    fn create(&self, input: MovieInput) -> Result<InsertResult, MovieError>;

    /// Remove the movie with `id`. Unknown ids report a zero count.
    fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteResult, MovieError>;

    /// Overwrite all mutable fields of the movie with `id`.
    ///
    /// Unknown ids report zero matched and modified counts.
    fn update_fields(&self, id: &ObjectId, fields: MovieFields)
    -> Result<UpdateResult, MovieError>;

    /// All movies whose name equals `name` exactly.
    fn find_by_name(&self, name: &str) -> Result<Vec<Movie>, MovieError>;

    /// Durably persist outstanding writes.
    fn flush(&self) -> Result<(), MovieError> {
        Ok(())
    }
}
