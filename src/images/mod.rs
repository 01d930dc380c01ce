/// Managed image storage
///
/// Attached images are copied into an application-owned directory so the
/// recipe keeps working after the user moves or deletes the original
/// file. A 256px thumbnail is kept alongside for the list view.
use chrono::Utc;
use image::imageops::FilterType;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{Error, Result};

/// Size of generated thumbnails (longest edge)
const THUMBNAIL_SIZE: u32 = 256;

/// The ImageStore owns the managed image directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Open the store at the default location:
    /// `<data_dir>/recipe-book/images`, with a `thumbs/` subdirectory.
    pub fn new() -> Result<Self> {
        Self::at(Self::default_dir())
    }

    /// Open the store at an explicit directory (used by tests).
    pub fn at(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Image(format!("cannot create image directory: {}", e)))?;
        std::fs::create_dir_all(dir.join("thumbs"))
            .map_err(|e| Error::Image(format!("cannot create thumbnail directory: {}", e)))?;
        Ok(ImageStore { dir })
    }

    fn default_dir() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("recipe-book");
        path.push("images");
        path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a path lies inside the managed directory.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.dir)
    }

    /// Copy a user-chosen image into the managed directory.
    ///
    /// The source is decoded first, so unreadable files and files that
    /// are not actually images are rejected up front. The copy goes
    /// through a temp file and a rename: a failure leaves no partial
    /// file behind. Returns the stored path.
    pub fn attach(&self, source: &Path) -> Result<PathBuf> {
        let decoded = image::ImageReader::open(source)
            .map_err(|e| Error::Image(format!("cannot read {}: {}", source.display(), e)))?
            .with_guessed_format()
            .map_err(|e| Error::Image(format!("cannot read {}: {}", source.display(), e)))?
            .decode()
            .map_err(|e| Error::Image(format!("not a supported image: {}", e)))?;

        let dest = self.unique_dest(source);
        let tmp = dest.with_extension("tmp");

        if let Err(e) = std::fs::copy(source, &tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::Image(format!("copy failed: {}", e)));
        }
        if let Err(e) = std::fs::rename(&tmp, &dest) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::Image(format!("copy failed: {}", e)));
        }

        // Thumbnails are best-effort: the attach succeeds without one
        if let Err(e) = self.write_thumbnail(&decoded, &dest) {
            eprintln!("⚠️  Thumbnail generation failed for {}: {}", dest.display(), e);
        }

        println!("🖼️  Stored image: {}", dest.display());
        Ok(dest)
    }

    /// Remove a stored image and its thumbnail.
    ///
    /// Only paths inside the managed directory are touched; anything
    /// else is ignored, as are already-missing files.
    pub fn remove(&self, stored: &Path) {
        if !self.contains(stored) {
            return;
        }
        let _ = std::fs::remove_file(stored);
        let _ = std::fs::remove_file(self.thumbnail_path(stored));
    }

    /// The thumbnail for a stored image, if one exists on disk.
    pub fn thumbnail_for(&self, stored: &Path) -> Option<PathBuf> {
        let thumb = self.thumbnail_path(stored);
        thumb.exists().then_some(thumb)
    }

    /// Collision-free destination name, derived from the current time
    /// and the source extension.
    fn unique_dest(&self, source: &Path) -> PathBuf {
        let ext = source
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "png".to_string());

        let millis = Utc::now().timestamp_millis();
        let mut candidate = self.dir.join(format!("img_{}.{}", millis, ext));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.dir.join(format!("img_{}_{}.{}", millis, counter, ext));
            counter += 1;
        }
        candidate
    }

    fn write_thumbnail(&self, decoded: &image::DynamicImage, stored: &Path) -> Result<()> {
        let thumbnail = decoded.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
        thumbnail
            .save(self.thumbnail_path(stored))
            .map_err(|e| Error::Image(e.to_string()))?;
        Ok(())
    }

    fn thumbnail_path(&self, stored: &Path) -> PathBuf {
        let stem = stored
            .file_stem()
            .unwrap_or_else(|| OsStr::new("image"))
            .to_string_lossy();
        self.dir.join("thumbs").join(format!("{}.png", stem))
    }
}

/// Run the attach off the UI thread.
///
/// Decoding and copying are blocking filesystem work, so they are
/// wrapped in `spawn_blocking` and driven from the event loop via
/// `Task::perform`.
pub async fn attach_async(store: ImageStore, source: PathBuf) -> Result<PathBuf> {
    task::spawn_blocking(move || store.attach(&source))
        .await
        .map_err(|e| Error::Image(format!("task join error: {}", e)))?
}
