use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// The shared JSON file every submission overwrites
///
/// Writers are serialized and each write goes to a temporary file in the
/// same directory that is then renamed over the target, so readers see
/// either the previous or the next document, never a partial one.
#[derive(Debug)]
pub struct RecordFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordFile {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with pretty-printed JSON
    pub fn save<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "record file lock poisoned"))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, value)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Raw file contents, or `None` if nothing has been saved yet
    pub fn read_bytes(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn load<T: DeserializeOwned>(&self) -> io::Result<Option<T>> {
        match self.read_bytes()? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(None),
        }
    }

    /// File name offered to browsers downloading the record
    pub fn download_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sales_data.json")
            .to_string()
    }
}
