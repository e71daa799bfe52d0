//! Storage of uploaded product images on the local file system.
//!
//! Images are written below `<static_dir>/products` under a random name and
//! referenced as `<url_prefix>/products/<name>`, which is the same path the
//! static file service exposes them under.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{ImageUrl, TypeConstraintError};

/// Sub-directory of the static root holding product images.
pub const PRODUCTS_DIR: &str = "products";

/// An uploaded image as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name reported by the client; only its extension is used.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid image reference: {0}")]
    InvalidReference(#[from] TypeConstraintError),
}

pub type ImageStoreResult<T> = Result<T, ImageStoreError>;

/// Persistence of product image files.
pub trait ImageStore {
    /// Write `upload` under a fresh unique name and return its reference.
    fn store(&self, upload: &ImageUpload) -> ImageStoreResult<ImageUrl>;
    /// Delete the file behind `image_url` if this store owns it and it
    /// exists. Returns whether a file was removed.
    fn remove(&self, image_url: &ImageUrl) -> ImageStoreResult<bool>;
    /// References of every file currently held by the store.
    fn list(&self) -> ImageStoreResult<Vec<ImageUrl>>;
}

/// [`ImageStore`] writing into a directory served as static content.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    directory: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    /// `static_dir` is the served directory, `static_url` the URL path it is
    /// mounted under (e.g. `/static`).
    pub fn new(static_dir: impl AsRef<Path>, static_url: &str) -> Self {
        Self {
            directory: static_dir.as_ref().join(PRODUCTS_DIR),
            url_prefix: format!("{}/{PRODUCTS_DIR}", static_url.trim_end_matches('/')),
        }
    }

    /// Directory the image files are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the image directory if it does not exist yet.
    pub fn ensure_directory(&self) -> ImageStoreResult<()> {
        fs::create_dir_all(&self.directory)?;
        Ok(())
    }

    /// Maps a reference onto a file inside the image directory. References
    /// outside the prefix or with more than one path segment map to nothing.
    fn path_for(&self, image_url: &ImageUrl) -> Option<PathBuf> {
        let name = image_url
            .as_str()
            .strip_prefix(&self.url_prefix)?
            .strip_prefix('/')?;

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Some(self.directory.join(file)),
            _ => None,
        }
    }

    fn reference_for(&self, file_name: &str) -> ImageStoreResult<ImageUrl> {
        Ok(ImageUrl::new(format!("{}/{file_name}", self.url_prefix))?)
    }
}

/// Extension of the client supplied file name, if it has a usable one.
fn file_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

impl ImageStore for LocalImageStore {
    fn store(&self, upload: &ImageUpload) -> ImageStoreResult<ImageUrl> {
        let base = Uuid::new_v4().simple().to_string();
        let file_name = match file_extension(&upload.file_name) {
            Some(ext) => format!("{base}.{ext}"),
            None => base,
        };

        fs::write(self.directory.join(&file_name), &upload.bytes)?;
        log::debug!(
            "Stored {} bytes of '{}' as {file_name}",
            upload.bytes.len(),
            upload.file_name
        );

        self.reference_for(&file_name)
    }

    fn remove(&self, image_url: &ImageUrl) -> ImageStoreResult<bool> {
        let Some(path) = self.path_for(image_url) else {
            return Ok(false);
        };

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> ImageStoreResult<Vec<ImageUrl>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut urls = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Hidden entries such as `.gitkeep` are never product images.
            match entry.file_name().to_str() {
                Some(name) if !name.starts_with('.') => urls.push(self.reference_for(name)?),
                _ => {}
            }
        }
        Ok(urls)
    }
}
