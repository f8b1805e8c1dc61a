use crate::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::warn;

type Entries = BTreeMap<String, String>;

/// Key/value store backed by a single JSON object on disk.
///
/// Every call goes to the file so that separate handles on the same path
/// observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/mobile-studio/storage.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("mobile-studio").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Entries to build a write on, and whether the file on disk was
    /// corrupt. A corrupt file is replaced rather than blocking every later
    /// write.
    fn load_for_update(&self) -> Result<(Entries, bool), StoreError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Json(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt store file");
                Ok((Entries::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write to a sibling temp file, then rename it over the store. A crash
    /// mid-write leaves the previous contents intact.
    fn write(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.temp_path();
        if let Err(e) = write_json(&temp_path, entries) {
            fs::remove_file(&temp_path).ok();
            return Err(e);
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn write_json(path: &Path, entries: &Entries) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let (mut entries, _) = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let (mut entries, corrupt) = self.load_for_update()?;
        if entries.remove(key).is_some() || corrupt {
            self.write(&entries)?;
        }
        Ok(())
    }
}
