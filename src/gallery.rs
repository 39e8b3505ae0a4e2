//! Walks the gallery feed and downloads every album into its own folder.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::download::{Downloader, is_plain_component};
use crate::models::{GalleryItem, Image};
use crate::naming::{UntitledCounter, album_folder_name, derive_filename};
use crate::{GalleryError, ImgurClient, Settings};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Albums whose image listing succeeded.
    pub albums: usize,
    /// Images written to disk.
    pub downloaded: usize,
    /// Images that could not be fetched or written.
    pub failed: usize,
    /// Albums whose folder could not be created or whose image listing failed.
    pub skipped_albums: usize,
}

impl fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} albums, {} images downloaded, {} failed, {} albums skipped",
            self.albums, self.downloaded, self.failed, self.skipped_albums
        )
    }
}

/// Downloads the albums of a gallery listing.
///
/// Albums are processed strictly in feed order, one request at a time. Non-album posts are
/// skipped and do not count against [`Settings::album_limit`]; the walk stops once that many
/// albums have been attempted.
#[derive(Debug, Clone)]
pub struct GalleryDownloader {
    client: ImgurClient,
    downloader: Downloader,
    settings: Settings,
}

impl GalleryDownloader {
    pub fn new(client: ImgurClient, settings: Settings) -> Self {
        Self {
            downloader: Downloader::new(client.clone()),
            client,
            settings,
        }
    }

    /// Download into [`Settings::download_folder`].
    pub async fn run(&self) -> Result<DownloadSummary, GalleryError> {
        self.run_into(&self.settings.download_folder).await
    }

    /// Download into `root`, one subfolder per album.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::Destination`] if `root` cannot be created
    /// - [`GalleryError::Listing`] if the gallery feed cannot be listed
    ///
    /// Failures for a single album or image are logged and counted in the summary instead.
    pub async fn run_into(&self, root: &Path) -> Result<DownloadSummary, GalleryError> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| GalleryError::Destination {
                path: root.to_path_buf(),
                source,
            })?;

        let items = self.client.gallery(&self.settings.gallery).await?;
        info!(
            items = items.len(),
            album_limit = self.settings.album_limit,
            "listed gallery {}",
            self.settings.gallery.path()
        );

        let mut summary = DownloadSummary::default();
        let mut untitled = UntitledCounter::new();

        let albums = items
            .iter()
            .filter(|item| item.is_album)
            .take(self.settings.album_limit);

        for album in albums {
            let folder = root.join(album_folder(album));
            if let Err(err) = tokio::fs::create_dir_all(&folder).await {
                warn!(
                    album = %album.id,
                    "skipping album {:?}: cannot create {}: {err}",
                    album.title,
                    folder.display()
                );
                summary.skipped_albums += 1;
                continue;
            }

            let images = match self.client.album_images(&album.id).await {
                Ok(images) => images,
                Err(err) => {
                    warn!(album = %album.id, "skipping album {:?}: {err}", album.title);
                    summary.skipped_albums += 1;
                    continue;
                }
            };

            info!(album = %album.id, images = images.len(), "downloading album {:?}", album.title);
            summary.albums += 1;
            self.download_album(&images, &folder, &mut untitled, &mut summary)
                .await;
        }

        info!("finished: {summary}");
        Ok(summary)
    }

    async fn download_album(
        &self,
        images: &[Image],
        folder: &Path,
        untitled: &mut UntitledCounter,
        summary: &mut DownloadSummary,
    ) {
        for image in images {
            let filename = match image.display_title() {
                Some(title) => derive_filename(title, &image.link),
                None => derive_filename(&untitled.next_name(), &image.link),
            };

            match self.downloader.download(image, folder, &filename).await {
                Ok(_) => summary.downloaded += 1,
                Err(err) => {
                    warn!(
                        image = %image.id,
                        "failed to download {:?}: {err}",
                        image.title.as_deref().unwrap_or(&filename)
                    );
                    summary.failed += 1;
                }
            }
        }
    }
}

/// Folder for an album, falling back to its id when the title gives no usable name.
fn album_folder(album: &GalleryItem) -> PathBuf {
    let name = album_folder_name(&album.title);
    if is_plain_component(&name) {
        PathBuf::from(name)
    } else {
        PathBuf::from(&album.id)
    }
}
