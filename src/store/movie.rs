//! Movie records and the request/result shapes around them.

use serde::{Deserialize, Deserializer, Serialize};

use super::error::MovieError;
use super::object_id::ObjectId;

/// A stored movie as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub cover_image: String,
}

impl Movie {
    /// Build a movie from an id and its mutable fields.
    pub fn new(id: ObjectId, fields: MovieFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            cover_image: fields.cover_image,
        }
    }

    /// Overwrite every mutable field. Returns `true` if anything changed.
    pub fn overwrite(&mut self, fields: MovieFields) -> bool {
        let changed = self.name != fields.name
            || self.description != fields.description
            || self.cover_image != fields.cover_image;
        self.name = fields.name;
        self.description = fields.description;
        self.cover_image = fields.cover_image;
        changed
    }
}

/// The fields of a movie that callers may set.
///
/// Missing and `null` fields deserialize to empty strings; there is no
/// distinction between "absent" and "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieFields {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cover_image: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A create or update request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieInput {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    pub fields: MovieFields,
}

impl MovieInput {
    /// Input without a client-chosen id.
    pub fn new(fields: MovieFields) -> Self {
        Self { id: None, fields }
    }

    /// Input carrying a client-chosen id.
    pub fn with_id(id: ObjectId, fields: MovieFields) -> Self {
        Self {
            id: Some(id.to_hex()),
            fields,
        }
    }

    /// Parse a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, MovieError> {
        serde_json::from_slice(body).map_err(|e| MovieError::BadRequest(e.to_string()))
    }

    /// Split into the optional client id and the mutable fields.
    ///
    /// An empty id string counts as absent.
    pub fn into_parts(self) -> Result<(Option<ObjectId>, MovieFields), MovieError> {
        let id = match self.id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(ObjectId::parse_str(raw)?),
        };
        Ok((id, self.fields))
    }
}

/// Result of a create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertResult {
    pub inserted_id: ObjectId,
    pub acknowledged: bool,
}

/// Result of a delete. `deleted_count` is 0 when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Result of an update. Both counts are 0 when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub(crate) fn unmatched() -> Self {
        Self {
            matched_count: 0,
            modified_count: 0,
        }
    }

    pub(crate) fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: u64::from(modified),
        }
    }
}

/// On-disk document layout.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MovieDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
}

impl From<Movie> for MovieDocument {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            name: movie.name,
            description: movie.description,
            cover_image: movie.cover_image,
        }
    }
}

impl From<MovieDocument> for Movie {
    fn from(doc: MovieDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            cover_image: doc.cover_image,
        }
    }
}
