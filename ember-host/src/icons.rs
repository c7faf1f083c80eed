//! File-backed icon library
//!
//! Icons live as `<name>.hex` files in one directory. A missing or
//! unreadable file is a "no icon" result the caller skips; a file that is
//! present but malformed still decodes, with the degradation logged.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ember_core::config::DisplayConfig;
use ember_core::icon::{self, Bitmap};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Icon file extension
pub const ICON_EXTENSION: &str = "hex";

/// Errors reading an icon source
#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read icon {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads and caches decoded icons by name
#[derive(Debug)]
pub struct IconLibrary {
    dir: PathBuf,
    default_width: u32,
    default_height: u32,
    cache: HashMap<String, Arc<Bitmap>>,
}

impl IconLibrary {
    /// Library over `dir` using the 16x16 default icon size
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_defaults(dir, icon::DEFAULT_ICON_WIDTH, icon::DEFAULT_ICON_HEIGHT)
    }

    /// Library over `dir` using the display's configured default icon size
    pub fn from_config(dir: impl Into<PathBuf>, config: &DisplayConfig) -> Self {
        Self::with_defaults(dir, config.icon_width, config.icon_height)
    }

    pub fn with_defaults(dir: impl Into<PathBuf>, default_width: u32, default_height: u32) -> Self {
        Self {
            dir: dir.into(),
            default_width,
            default_height,
            cache: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing icon `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{ICON_EXTENSION}"))
    }

    /// Read and decode icon `name`, bypassing the cache
    pub fn read(&self, name: &str) -> Result<Bitmap, IconError> {
        let text = self.read_source(name)?;
        Ok(self.decode(name, &text))
    }

    /// Read and decode every image of a `---IMAGE---` separated file
    pub fn read_sheet(&self, name: &str) -> Result<Vec<Bitmap>, IconError> {
        let text = self.read_source(name)?;
        Ok(icon::split_sheet(&text)
            .into_iter()
            .map(|part| self.decode(name, part))
            .collect())
    }

    /// Cached icon lookup; `None` when the file is missing or unreadable
    pub fn load(&mut self, name: &str) -> Option<Arc<Bitmap>> {
        if let Some(bitmap) = self.cache.get(name) {
            return Some(Arc::clone(bitmap));
        }

        match self.read(name) {
            Ok(bitmap) => {
                let bitmap = Arc::new(bitmap);
                self.cache.insert(name.to_owned(), Arc::clone(&bitmap));
                Some(bitmap)
            }
            Err(IconError::NotFound(path)) => {
                warn!(path = ?path, "Icon file not found");
                None
            }
            Err(e) => {
                error!(icon = name, error = %e, "Error loading icon");
                None
            }
        }
    }

    /// Load `<prefix><n>` for each `n` in `range`, skipping missing frames
    pub fn load_series<I>(&mut self, prefix: &str, range: I) -> Vec<Arc<Bitmap>>
    where
        I: IntoIterator<Item = u32>,
    {
        range
            .into_iter()
            .filter_map(|n| self.load(&format!("{prefix}{n}")))
            .collect()
    }

    /// Drop every cached icon
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn read_source(&self, name: &str) -> Result<String, IconError> {
        let path = self.path_for(name);
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                IconError::NotFound(path)
            } else {
                IconError::Io { path, source }
            }
        })
    }

    fn decode(&self, name: &str, text: &str) -> Bitmap {
        let (bitmap, report) =
            icon::decode_with_report(text, self.default_width, self.default_height);

        if !report.declared {
            debug!(
                icon = name,
                width = report.width,
                height = report.height,
                "No dimension comment, using defaults"
            );
        }
        if report.oversized {
            warn!(icon = name, "Icon dimension comment too large, using defaults");
        }
        if !report.is_exact() {
            warn!(
                icon = name,
                expected = report.expected_bytes,
                found = report.found_bytes,
                "Hex data size mismatch"
            );
        }
        bitmap
    }
}
