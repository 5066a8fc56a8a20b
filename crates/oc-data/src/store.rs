//! Dataset storage API.
//!
//! One directory per analysis type, one CSV per dataset. The directory is
//! created on the first save and removed as a whole by [`DatasetStore::reset_all`].

use crate::table::MeasurementTable;
use crate::upload::validate_filename;
use crate::{DataError, DataResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DatasetStore {
    root_dir: PathBuf,
}

impl DatasetStore {
    /// Store scoped to `storage_root/analysis_type`. Nothing is created yet.
    pub fn new(storage_root: &Path, analysis_type: &str) -> DataResult<Self> {
        validate_filename(analysis_type)?;
        Ok(Self {
            root_dir: storage_root.join(analysis_type),
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn dataset_path(&self, filename: &str) -> PathBuf {
        self.root_dir.join(filename)
    }

    pub fn has_dataset(&self, filename: &str) -> bool {
        self.dataset_path(filename).is_file()
    }

    /// Write (or replace) a dataset.
    ///
    /// The CSV is written to `<filename>.tmp` and renamed into place, so a
    /// failed write never leaves a truncated dataset behind.
    pub fn save_dataset(&mut self, filename: &str, table: &MeasurementTable) -> DataResult<()> {
        validate_filename(filename)?;
        fs::create_dir_all(&self.root_dir)
            .map_err(|e| DataError::storage(&self.root_dir, e))?;

        let path = self.dataset_path(filename);
        let tmp_path = self.dataset_path(&format!("{filename}.tmp"));
        let written = write_table(&tmp_path, table).and_then(|()| {
            fs::rename(&tmp_path, &path).map_err(|e| DataError::storage(&path, e))
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    pub fn load_dataset(&self, filename: &str) -> DataResult<MeasurementTable> {
        let path = self.dataset_path(filename);
        let bytes = fs::read(&path).map_err(|e| DataError::storage(&path, e))?;
        MeasurementTable::from_csv_bytes(&bytes).map_err(|e| DataError::CorruptDataset {
            filename: filename.to_string(),
            message: e.to_string(),
        })
    }

    /// Persisted `.csv` datasets, sorted by filename.
    pub fn list_filenames(&self) -> DataResult<Vec<String>> {
        let mut names: Vec<String> = self
            .entries()?
            .into_iter()
            .filter(|(_, is_file)| *is_file)
            .map(|(name, _)| name)
            .filter(|name| name.ends_with(".csv"))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Every persisted dataset, loaded in full, sorted by filename.
    pub fn list_datasets(&self) -> DataResult<Vec<(String, MeasurementTable)>> {
        self.list_filenames()?
            .into_iter()
            .map(|name| {
                let table = self.load_dataset(&name)?;
                Ok((name, table))
            })
            .collect()
    }

    /// Delete the whole analysis-type directory. Returns the names of the
    /// entries that existed right before deletion (sorted, possibly empty).
    pub fn reset_all(&mut self) -> DataResult<Vec<String>> {
        let mut names: Vec<String> = self
            .entries()?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();

        match fs::remove_dir_all(&self.root_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DataError::storage(&self.root_dir, e)),
        }
        Ok(names)
    }

    fn entries(&self) -> DataResult<Vec<(String, bool)>> {
        let read_dir = match fs::read_dir(&self.root_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DataError::storage(&self.root_dir, e)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| DataError::storage(&self.root_dir, e))?;
            let is_file = entry.path().is_file();
            entries.push((entry.file_name().to_string_lossy().to_string(), is_file));
        }
        Ok(entries)
    }
}

fn write_table(path: &Path, table: &MeasurementTable) -> DataResult<()> {
    let file = fs::File::create(path).map_err(|e| DataError::storage(path, e))?;
    table
        .write_csv(io::BufWriter::new(file))
        .map_err(|e| DataError::storage(path, io::Error::other(e)))
}
