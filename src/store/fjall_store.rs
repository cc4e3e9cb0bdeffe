//! Movie store backed by fjall.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};
use tracing::{debug, error, info, trace, warn};

use super::MovieStore;
use super::error::MovieError;
use super::movie::{
    DeleteResult, InsertResult, Movie, MovieDocument, MovieFields, MovieInput, UpdateResult,
};
use super::object_id::ObjectId;

const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Current store version.
/// Increment this when changing the on-disk document layout.
const STORE_VERSION: u32 = 1;

/// A movie collection persisted in a fjall database.
///
/// Each movie is one JSON document keyed by its hex id, so iteration order
/// is id order. Every write is synced to disk before returning.
///
/// Writes are serialized, so an existence check and the write that depends
/// on it observe the same state.
pub struct FjallStore {
    db: fjall::Database,
    movies: Keyspace,
    collection: String,
    write_lock: Mutex<()>,
}

impl FjallStore {
    /// Open an existing store at `path`, using the keyspace `collection`.
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self, MovieError> {
        let path = path.as_ref();
        debug!(path = %path.display(), collection, "opening movie store");

        if !path.exists() {
            error!(path = %path.display(), "store path does not exist");
            return Err(MovieError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        let Some(config) = meta.get(META_CONFIG_KEY)? else {
            error!(path = %path.display(), "store not initialized - no config found");
            return Err(MovieError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            config
                .as_ref()
                .try_into()
                .map_err(|_| MovieError::InvalidFormat("Invalid config format".to_string()))?,
        );
        if version != STORE_VERSION {
            error!(
                stored_version = version,
                expected_version = STORE_VERSION,
                "store version mismatch"
            );
            return Err(MovieError::InvalidFormat(format!(
                "Store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }
        trace!(version, "store version verified");

        let movies = db.keyspace(collection, KeyspaceCreateOptions::default)?;

        info!(path = %path.display(), collection, "movie store opened");
        Ok(Self {
            db,
            movies,
            collection: collection.to_string(),
            write_lock: Mutex::new(()),
        })
    }

    /// Initialize a new store at `path`, using the keyspace `collection`.
    pub fn init(path: impl AsRef<Path>, collection: &str) -> Result<Self, MovieError> {
        let path = path.as_ref();
        debug!(path = %path.display(), collection, "initializing movie store");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;
        meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;

        let movies = db.keyspace(collection, KeyspaceCreateOptions::default)?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), version = STORE_VERSION, "movie store initialized");
        Ok(Self {
            db,
            movies,
            collection: collection.to_string(),
            write_lock: Mutex::new(()),
        })
    }

    /// Open the store at `path` if it exists, otherwise initialize it.
    pub fn open_or_init(path: impl AsRef<Path>, collection: &str) -> Result<Self, MovieError> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path, collection)
        } else {
            Self::init(path, collection)
        }
    }

    /// Name of the keyspace holding the movies.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, MovieError> {
        self.write_lock.lock().map_err(|_| MovieError::LockPoisoned)
    }

    fn load(&self, key: &str) -> Result<Option<Movie>, MovieError> {
        let Some(bytes) = self.movies.get(key)? else {
            return Ok(None);
        };
        let doc: MovieDocument = serde_json::from_slice(&bytes).map_err(|e| {
            error!(key, error = %e, "corrupt movie document");
            MovieError::Encoding(e.to_string())
        })?;
        Ok(Some(doc.into()))
    }

    fn save(&self, movie: Movie) -> Result<(), MovieError> {
        let key = movie.id.to_hex();
        let bytes = serde_json::to_vec(&MovieDocument::from(movie))
            .map_err(|e| MovieError::Encoding(e.to_string()))?;
        self.movies.insert(&key, bytes.as_slice())?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    /// Load every document. Keys removed between listing and loading are skipped.
    fn scan(&self) -> Result<Vec<Movie>, MovieError> {
        let mut keys = Vec::new();
        for kv in self.movies.iter() {
            let key = kv.key()?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }

        let mut movies = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(movie) = self.load(&key)? {
                movies.push(movie);
            }
        }
        Ok(movies)
    }
}

impl MovieStore for FjallStore {
    fn list_all(&self) -> Result<Vec<Movie>, MovieError> {
        let movies = self.scan()?;
        debug!(count = movies.len(), "listed movies");
        Ok(movies)
    }

    fn get_by_id(&self, id: &ObjectId) -> Result<Movie, MovieError> {
        trace!(%id, "loading movie");
        self.load(&id.to_hex())?
            .ok_or(MovieError::NotFound(*id))
    }

    fn create(&self, input: MovieInput) -> Result<InsertResult, MovieError> {
        let (id, fields) = input.into_parts()?;
        let _guard = self.lock_writes()?;
        let id = match id {
            Some(id) => {
                if self.movies.get(id.to_hex())?.is_some() {
                    warn!(%id, "movie id already exists");
                    return Err(MovieError::DuplicateId(id));
                }
                id
            }
            None => ObjectId::new(),
        };

        self.save(Movie::new(id, fields))?;

        debug!(%id, "inserted movie");
        Ok(InsertResult {
            inserted_id: id,
            acknowledged: true,
        })
    }

    fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteResult, MovieError> {
        let key = id.to_hex();
        let _guard = self.lock_writes()?;
        if self.movies.get(&key)?.is_none() {
            debug!(%id, "no movie to delete");
            return Ok(DeleteResult { deleted_count: 0 });
        }

        self.movies.remove(&key)?;
        self.db.persist(PersistMode::SyncAll)?;

        debug!(%id, "deleted movie");
        Ok(DeleteResult { deleted_count: 1 })
    }

    fn update_fields(
        &self,
        id: &ObjectId,
        fields: MovieFields,
    ) -> Result<UpdateResult, MovieError> {
        let _guard = self.lock_writes()?;
        let Some(mut movie) = self.load(&id.to_hex())? else {
            debug!(%id, "no movie to update");
            return Ok(UpdateResult::unmatched());
        };

        let modified = movie.overwrite(fields);
        if modified {
            self.save(movie)?;
        }

        debug!(%id, modified, "updated movie");
        Ok(UpdateResult::matched(modified))
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Movie>, MovieError> {
        let movies: Vec<Movie> = self
            .scan()?
            .into_iter()
            .filter(|movie| movie.name == name)
            .collect();
        debug!(name, count = movies.len(), "searched movies by name");
        Ok(movies)
    }

    fn flush(&self) -> Result<(), MovieError> {
        self.db.persist(PersistMode::SyncAll)?;
        info!(collection = %self.collection, "movie store flushed");
        Ok(())
    }
}
