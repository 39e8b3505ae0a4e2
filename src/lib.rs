//! Download the albums of the Imgur gallery feed to local disk.
//!
//! The crate is split into a thin async API client ([`ImgurClient`]), file-name helpers
//! ([`naming`]), a single-image [`Downloader`] and the [`GalleryDownloader`] that ties them
//! together:
//!
//! ```no_run
//! use imgur_gallery_dl::{GalleryDownloader, ImgurClient, Settings};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load("settings.ini")?;
//! let client = ImgurClient::authenticate(&settings.client_id, &settings.client_secret).await?;
//! let summary = GalleryDownloader::new(client, settings).run().await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod download;
mod error;
mod gallery;
mod models;
pub mod naming;
mod transport;
mod utils;

pub use client::{ImgurClient, ImgurClientBuilder};
pub use config::{
    DEFAULT_ALBUM_LIMIT, DEFAULT_CONFIG_FILE, DEFAULT_DOWNLOAD_FOLDER, Settings,
};
pub use download::{DownloadTarget, Downloader};
pub use error::{ConfigError, DownloadError, GalleryError, ImgurError};
pub use gallery::{DownloadSummary, GalleryDownloader};
pub use models::{
    Credits, GalleryItem, GalleryQuery, GallerySection, GallerySort, GalleryWindow, Image,
};
