//! In-process movie store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use super::MovieStore;
use super::error::MovieError;
use super::movie::{DeleteResult, InsertResult, Movie, MovieFields, MovieInput, UpdateResult};
use super::object_id::ObjectId;

/// A movie collection held in memory. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    movies: RwLock<BTreeMap<ObjectId, Movie>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored movies.
    pub fn len(&self) -> Result<usize, MovieError> {
        Ok(self.movies.read().map_err(|_| MovieError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MovieError> {
        Ok(self.len()? == 0)
    }
}

impl MovieStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<Movie>, MovieError> {
        let movies = self.movies.read().map_err(|_| MovieError::LockPoisoned)?;
        Ok(movies.values().cloned().collect())
    }

    fn get_by_id(&self, id: &ObjectId) -> Result<Movie, MovieError> {
        let movies = self.movies.read().map_err(|_| MovieError::LockPoisoned)?;
        movies.get(id).cloned().ok_or(MovieError::NotFound(*id))
    }

    fn create(&self, input: MovieInput) -> Result<InsertResult, MovieError> {
        let (id, fields) = input.into_parts()?;
        let mut movies = self.movies.write().map_err(|_| MovieError::LockPoisoned)?;

        let id = match id {
            Some(id) if movies.contains_key(&id) => return Err(MovieError::DuplicateId(id)),
            Some(id) => id,
            None => ObjectId::new(),
        };
        movies.insert(id, Movie::new(id, fields));

        debug!(%id, "inserted movie");
        Ok(InsertResult {
            inserted_id: id,
            acknowledged: true,
        })
    }

    fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteResult, MovieError> {
        let mut movies = self.movies.write().map_err(|_| MovieError::LockPoisoned)?;
        let deleted_count = u64::from(movies.remove(id).is_some());
        Ok(DeleteResult { deleted_count })
    }

    fn update_fields(
        &self,
        id: &ObjectId,
        fields: MovieFields,
    ) -> Result<UpdateResult, MovieError> {
        let mut movies = self.movies.write().map_err(|_| MovieError::LockPoisoned)?;
        Ok(match movies.get_mut(id) {
            Some(movie) => UpdateResult::matched(movie.overwrite(fields)),
            None => UpdateResult::unmatched(),
        })
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Movie>, MovieError> {
        let movies = self.movies.read().map_err(|_| MovieError::LockPoisoned)?;
        Ok(movies
            .values()
            .filter(|movie| movie.name == name)
            .cloned()
            .collect())
    }
}
