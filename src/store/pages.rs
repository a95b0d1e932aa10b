use crate::StoreError;
use std::path::{Path, PathBuf};

/// Identity of one cached page: (event, heat, page index)
///
/// The page index is kept as the raw string value of the `selCount` option
/// it was fetched with; index `"0"` is always the page that was fetched to
/// discover the options in the first place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub event: String,
    pub heat: String,
    pub page: String,
}

impl PageKey {
    pub fn new(
        event: impl Into<String>,
        heat: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            heat: heat.into(),
            page: page.into(),
        }
    }

    /// File name this page is cached under
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.html", self.event, self.heat, self.page)
    }
}

/// Flat-file store for raw page markup
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Opens a page store rooted at `root`, creating the directory if needed
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::CreateDir {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Absolute path a key is cached under
    pub fn path_for(&self, key: &PageKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Writes one page body, overwriting any previous crawl's copy
    pub async fn write(&self, key: &PageKey, body: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| StoreError::Write {
                path: path.display().to_string(),
                source,
            })
    }

    /// Reads one cached page body
    pub fn read(&self, path: &Path) -> Result<String, StoreError> {
        std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })
    }

    /// Lists every cached page, sorted by file name for a stable extract order
    pub fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| StoreError::List {
            path: self.root.display().to_string(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::List {
                path: self.root.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "html") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}
