//! Record and tag store
//!
//! Provides CRUD for records and tags plus AND-based multi-tag lookup,
//! using sled as the embedded database backend.
//!
//! Uses several sled trees:
//! - `records`: record id -> title, payload kind, payload JSON, timestamps
//! - `tags`: tag id -> name, color, timestamp
//! - `tag_names`: tag name -> tag id (uniqueness index)
//! - `record_tags`: record id -> tag ids
//! - `tag_records`: tag id -> record ids (reverse index)
//!
//! The multi-tag lookup here is independent of the selection engine; it answers
//! "which stored records carry all of these tags" directly from the indexes.

use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::{Db, Tree};
use std::collections::HashSet;
use std::path::Path;

pub mod error;
pub mod types;

pub use error::DbError;
pub use types::{
    IdKey, NewRecord, NewTag, RecordFilter, RecordId, RecordUpdate, RecordWithTags, StoredRecord,
    Tag, TagId, TagUpdate,
};

use types::{RecordRow, TagRow};

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DbError> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DbError> {
    let (value, _): (T, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}

/// Database wrapper that encapsulates all store operations
pub struct Database {
    db: Db,
    records: Tree,
    tags: Tree,
    tag_names: Tree,
    record_tags: Tree,
    tag_records: Tree,
}

impl Database {
    /// Opens or creates a database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use tagnarrow::db::Database;
    /// let db = Database::open("my_store").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(path)?;
        let records = db.open_tree("records")?;
        let tags = db.open_tree("tags")?;
        let tag_names = db.open_tree("tag_names")?;
        let record_tags = db.open_tree("record_tags")?;
        let tag_records = db.open_tree("tag_records")?;
        Ok(Self {
            db,
            records,
            tags,
            tag_names,
            record_tags,
            tag_records,
        })
    }

    // ==================== Records ====================

    /// Create a record and link it to existing tags
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` for an empty title, `DbError::NotFound` if a
    /// tag id does not exist, or a storage error.
    pub fn create_record(&self, new: &NewRecord) -> Result<StoredRecord, DbError> {
        let title = validate_text("title", &new.title)?;
        for tag_id in &new.tag_ids {
            self.require_tag(*tag_id)?;
        }

        let id = self.next_id()?;
        let now = Utc::now();
        let row = RecordRow {
            title,
            kind: new.payload.kind(),
            content: serde_json::to_string(&new.payload)?,
            created_at: now,
            updated_at: now,
        };
        self.records.insert(IdKey::new(id).to_bytes(), encode(&row)?)?;
        self.add_tags_to_record(id, &new.tag_ids)?;

        tracing::debug!(record = id, tags = new.tag_ids.len(), "created record");
        self.require_record(id)
    }

    /// Get a record by id
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_record(&self, id: RecordId) -> Result<Option<StoredRecord>, DbError> {
        match self.records.get(IdKey::new(id).to_bytes())? {
            Some(value) => {
                let row: RecordRow = decode(&value)?;
                Ok(Some(row.into_record(id)?))
            }
            None => Ok(None),
        }
    }

    /// Get a record together with its tags
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_record_with_tags(&self, id: RecordId) -> Result<Option<RecordWithTags>, DbError> {
        match self.get_record(id)? {
            Some(record) => {
                let tags = self.tags_for_record(id)?;
                Ok(Some(RecordWithTags { record, tags }))
            }
            None => Ok(None),
        }
    }

    /// Apply a partial update to a record
    ///
    /// `updated_at` is bumped only when something changes.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` for an unknown id, `DbError::InvalidInput` for an
    /// empty title, or a storage error.
    pub fn update_record(&self, id: RecordId, update: &RecordUpdate) -> Result<StoredRecord, DbError> {
        let key = IdKey::new(id).to_bytes();
        let value = self
            .records
            .get(key)?
            .ok_or_else(|| DbError::NotFound(format!("record {id}")))?;
        let mut row: RecordRow = decode(&value)?;

        if update.title.is_none() && update.payload.is_none() {
            return row.into_record(id);
        }
        if let Some(title) = &update.title {
            row.title = validate_text("title", title)?;
        }
        if let Some(payload) = &update.payload {
            row.kind = payload.kind();
            row.content = serde_json::to_string(payload)?;
        }
        row.updated_at = Utc::now();

        self.records.insert(key, encode(&row)?)?;
        row.into_record(id)
    }

    /// Delete a record and its tag links
    ///
    /// # Returns
    /// `true` if the record existed
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn delete_record(&self, id: RecordId) -> Result<bool, DbError> {
        let key = IdKey::new(id).to_bytes();
        for tag_id in self.read_ids(&self.record_tags, id)? {
            self.unlink(&self.tag_records, tag_id, id)?;
        }
        self.record_tags.remove(key)?;

        let existed = self.records.remove(key)?.is_some();
        if existed {
            tracing::debug!(record = id, "deleted record");
        }
        Ok(existed)
    }

    /// List records, newest `updated_at` first
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_records(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, DbError> {
        let allowed: Option<HashSet<RecordId>> = if filter.tag_ids.is_empty() {
            None
        } else {
            let mut ids = HashSet::new();
            for tag_id in &filter.tag_ids {
                ids.extend(self.read_ids(&self.tag_records, *tag_id)?);
            }
            Some(ids)
        };

        let mut records = Vec::new();
        for result in &self.records {
            let (key, value) = result?;
            let id = IdKey::from_bytes(&key)?.into_inner();
            if let Some(allowed) = &allowed
                && !allowed.contains(&id)
            {
                continue;
            }
            let row: RecordRow = decode(&value)?;
            if let Some(needle) = &filter.title
                && !row.title.contains(needle.as_str())
            {
                continue;
            }
            records.push(row.into_record(id)?);
        }

        sort_newest_first(&mut records);
        Ok(records)
    }

    /// List records with their tags, newest `updated_at` first
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_records_with_tags(&self, filter: &RecordFilter) -> Result<Vec<RecordWithTags>, DbError> {
        self.list_records(filter)?
            .into_iter()
            .map(|record| self.attach_tags(record))
            .collect()
    }

    // ==================== Tags ====================

    /// Create a tag with a unique, non-empty name
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` for an empty name, `DbError::AlreadyExists` if
    /// the name is taken, or a storage error.
    pub fn create_tag(&self, new: &NewTag) -> Result<Tag, DbError> {
        let name = validate_text("tag name", &new.name)?;
        if self.tag_names.contains_key(name.as_bytes())? {
            return Err(DbError::AlreadyExists(format!("tag '{name}'")));
        }

        let id = self.next_id()?;
        let row = TagRow {
            name,
            color: new.color.clone(),
            created_at: Utc::now(),
        };
        self.tags.insert(IdKey::new(id).to_bytes(), encode(&row)?)?;
        self.tag_names
            .insert(row.name.as_bytes(), IdKey::new(id).to_bytes().to_vec())?;

        tracing::debug!(tag = id, name = %row.name, "created tag");
        Ok(row.into_tag(id))
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_tag(&self, id: TagId) -> Result<Option<Tag>, DbError> {
        match self.tags.get(IdKey::new(id).to_bytes())? {
            Some(value) => {
                let row: TagRow = decode(&value)?;
                Ok(Some(row.into_tag(id)))
            }
            None => Ok(None),
        }
    }

    /// Get a tag by its exact name
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, DbError> {
        match self.tag_names.get(name.as_bytes())? {
            Some(value) => self.get_tag(IdKey::from_bytes(&value)?.into_inner()),
            None => Ok(None),
        }
    }

    /// Look a tag up by name, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the name is empty or storage fails.
    pub fn get_or_create_tag(&self, name: &str) -> Result<Tag, DbError> {
        match self.get_tag_by_name(name)? {
            Some(tag) => Ok(tag),
            None => self.create_tag(&NewTag::named(name)),
        }
    }

    /// Rename and/or recolor a tag
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` for an unknown id, `DbError::AlreadyExists` if the
    /// new name belongs to another tag, `DbError::InvalidInput` for an empty name,
    /// or a storage error.
    pub fn update_tag(&self, id: TagId, update: &TagUpdate) -> Result<Tag, DbError> {
        let key = IdKey::new(id).to_bytes();
        let value = self
            .tags
            .get(key)?
            .ok_or_else(|| DbError::NotFound(format!("tag {id}")))?;
        let mut row: TagRow = decode(&value)?;

        if let Some(name) = &update.name {
            let name = validate_text("tag name", name)?;
            if name != row.name {
                if self.tag_names.contains_key(name.as_bytes())? {
                    return Err(DbError::AlreadyExists(format!("tag '{name}'")));
                }
                self.tag_names.remove(row.name.as_bytes())?;
                self.tag_names.insert(name.as_bytes(), key.to_vec())?;
                row.name = name;
            }
        }
        if let Some(color) = &update.color {
            row.color = Some(color.clone());
        }

        self.tags.insert(key, encode(&row)?)?;
        Ok(row.into_tag(id))
    }

    /// Delete a tag and unlink it from every record
    ///
    /// Records themselves are kept, even when left without tags.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn delete_tag(&self, id: TagId) -> Result<bool, DbError> {
        let key = IdKey::new(id).to_bytes();
        let Some(tag) = self.get_tag(id)? else {
            return Ok(false);
        };

        for record_id in self.read_ids(&self.tag_records, id)? {
            self.unlink(&self.record_tags, record_id, id)?;
        }
        self.tag_records.remove(key)?;
        self.tag_names.remove(tag.name.as_bytes())?;
        self.tags.remove(key)?;

        tracing::debug!(tag = id, name = %tag.name, "deleted tag");
        Ok(true)
    }

    /// List every tag sorted by name
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_tags(&self) -> Result<Vec<Tag>, DbError> {
        let mut tags = Vec::new();
        for result in &self.tags {
            let (key, value) = result?;
            let row: TagRow = decode(&value)?;
            tags.push(row.into_tag(IdKey::from_bytes(&key)?.into_inner()));
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    /// List tags whose name matches a regular expression
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the pattern is not a valid regex.
    pub fn find_tags_by_regex(&self, pattern: &str) -> Result<Vec<Tag>, DbError> {
        let regex = Regex::new(pattern)
            .map_err(|e| DbError::InvalidInput(format!("Invalid regex pattern '{pattern}': {e}")))?;
        Ok(self
            .list_tags()?
            .into_iter()
            .filter(|tag| regex.is_match(&tag.name))
            .collect())
    }

    // ==================== Links ====================

    /// Link tags to a record; already-linked tags are skipped
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the record or a tag does not exist.
    pub fn add_tags_to_record(&self, record_id: RecordId, tag_ids: &[TagId]) -> Result<(), DbError> {
        self.require_record(record_id)?;
        for tag_id in tag_ids {
            self.require_tag(*tag_id)?;
            self.link(&self.record_tags, record_id, *tag_id)?;
            self.link(&self.tag_records, *tag_id, record_id)?;
        }
        Ok(())
    }

    /// Unlink tags from a record; tags that are not linked are ignored
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn remove_tags_from_record(&self, record_id: RecordId, tag_ids: &[TagId]) -> Result<(), DbError> {
        for tag_id in tag_ids {
            self.unlink(&self.record_tags, record_id, *tag_id)?;
            self.unlink(&self.tag_records, *tag_id, record_id)?;
        }
        Ok(())
    }

    /// Tags linked to a record, sorted by name
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn tags_for_record(&self, record_id: RecordId) -> Result<Vec<Tag>, DbError> {
        let mut tags = Vec::new();
        for tag_id in self.read_ids(&self.record_tags, record_id)? {
            if let Some(tag) = self.get_tag(tag_id)? {
                tags.push(tag);
            }
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    /// Records linked to a tag, newest `updated_at` first
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn records_for_tag(&self, tag_id: TagId) -> Result<Vec<StoredRecord>, DbError> {
        let mut records = Vec::new();
        for record_id in self.read_ids(&self.tag_records, tag_id)? {
            if let Some(record) = self.get_record(record_id)? {
                records.push(record);
            }
        }
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Records carrying every one of the given tags (AND)
    ///
    /// An empty tag list returns every record.
    ///
    /// # Performance
    /// Intersects the reverse-index sets of each tag instead of scanning records
    ///
    /// # Errors
    ///
    /// Returns `DbError` if any lookup fails.
    pub fn find_records_by_all_tags(&self, tag_ids: &[TagId]) -> Result<Vec<RecordWithTags>, DbError> {
        if tag_ids.is_empty() {
            return self.list_records_with_tags(&RecordFilter::default());
        }

        let unique: HashSet<TagId> = tag_ids.iter().copied().collect();
        let mut sets: Vec<HashSet<RecordId>> = unique
            .iter()
            .map(|tag_id| {
                self.read_ids(&self.tag_records, *tag_id)
                    .map(|ids| ids.into_iter().collect())
            })
            .collect::<Result<_, _>>()?;

        let first = sets.remove(0);
        let mut records = Vec::new();
        for record_id in first {
            if sets.iter().all(|set| set.contains(&record_id))
                && let Some(record) = self.get_record(record_id)?
            {
                records.push(record);
            }
        }
        sort_newest_first(&mut records);

        records
            .into_iter()
            .map(|record| self.attach_tags(record))
            .collect()
    }

    // ==================== Maintenance ====================

    /// Number of stored records
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of stored tags
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all records, tags and links
    ///
    /// # Warning
    /// This operation is irreversible!
    ///
    /// # Errors
    ///
    /// Returns `DbError` if clearing any tree fails.
    pub fn clear(&self) -> Result<(), DbError> {
        self.records.clear()?;
        self.tags.clear()?;
        self.tag_names.clear()?;
        self.record_tags.clear()?;
        self.tag_records.clear()?;
        Ok(())
    }

    // Private helpers for ids and the link indexes

    fn next_id(&self) -> Result<u64, DbError> {
        Ok(self.db.generate_id()? + 1)
    }

    fn require_record(&self, id: RecordId) -> Result<StoredRecord, DbError> {
        self.get_record(id)?
            .ok_or_else(|| DbError::NotFound(format!("record {id}")))
    }

    fn require_tag(&self, id: TagId) -> Result<Tag, DbError> {
        self.get_tag(id)?
            .ok_or_else(|| DbError::NotFound(format!("tag {id}")))
    }

    fn attach_tags(&self, record: StoredRecord) -> Result<RecordWithTags, DbError> {
        let tags = self.tags_for_record(record.id)?;
        Ok(RecordWithTags { record, tags })
    }

    fn read_ids(&self, tree: &Tree, owner: u64) -> Result<Vec<u64>, DbError> {
        match tree.get(IdKey::new(owner).to_bytes())? {
            Some(value) => decode(&value),
            None => Ok(Vec::new()),
        }
    }

    /// Add `member` to the id list stored under `owner`
    fn link(&self, tree: &Tree, owner: u64, member: u64) -> Result<(), DbError> {
        let mut ids = self.read_ids(tree, owner)?;
        if !ids.contains(&member) {
            ids.push(member);
            tree.insert(IdKey::new(owner).to_bytes(), encode(&ids)?)?;
        }
        Ok(())
    }

    /// Remove `member` from the id list stored under `owner`, dropping empty lists
    fn unlink(&self, tree: &Tree, owner: u64, member: u64) -> Result<(), DbError> {
        let key = IdKey::new(owner).to_bytes();
        let mut ids = self.read_ids(tree, owner)?;
        let before = ids.len();
        ids.retain(|id| *id != member);

        if ids.is_empty() {
            tree.remove(key)?;
        } else if ids.len() != before {
            tree.insert(key, encode(&ids)?)?;
        }
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Errors cannot be propagated from Drop; callers needing durability
        // should call flush() themselves.
        let _ = self.db.flush();
    }
}

fn validate_text(field: &str, value: &str) -> Result<String, DbError> {
    if value.trim().is_empty() {
        return Err(DbError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn sort_newest_first(records: &mut [StoredRecord]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
}
