use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::models::Image;
use crate::{DownloadError, ImgurClient};

/// Where one image ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub destination: PathBuf,
    pub url: String,
}

/// Fetches images and writes them to disk, one at a time.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: ImgurClient,
}

impl Downloader {
    pub fn new(client: ImgurClient) -> Self {
        Self { client }
    }

    /// Download `image` into `folder/filename`.
    ///
    /// The folder is created when missing and an existing file of the same name is overwritten.
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::UnsafeFileName`] if `filename` is not a single plain path component
    /// - [`DownloadError::Fetch`] if the media request fails
    /// - [`DownloadError::Io`] if the folder or file cannot be written
    pub async fn download(
        &self,
        image: &Image,
        folder: &Path,
        filename: &str,
    ) -> Result<PathBuf, DownloadError> {
        let target = target_for(image, folder, filename)?;

        tokio::fs::create_dir_all(folder)
            .await
            .map_err(|source| DownloadError::Io {
                path: folder.to_path_buf(),
                source,
            })?;

        let bytes = self.client.fetch_bytes(&target.url).await?;

        tokio::fs::write(&target.destination, &bytes)
            .await
            .map_err(|source| DownloadError::Io {
                path: target.destination.clone(),
                source,
            })?;

        info!(bytes = bytes.len(), "downloaded {}", progress_label(image, filename));
        Ok(target.destination)
    }
}

fn target_for(image: &Image, folder: &Path, filename: &str) -> Result<DownloadTarget, DownloadError> {
    if !is_plain_component(filename) {
        return Err(DownloadError::UnsafeFileName(filename.to_string()));
    }

    Ok(DownloadTarget {
        destination: folder.join(filename),
        url: image.link.clone(),
    })
}

// Untitled images are announced by their placeholder, without the extension.
fn progress_label<'a>(image: &'a Image, filename: &'a str) -> &'a str {
    image
        .display_title()
        .unwrap_or_else(|| filename.rsplit_once('.').map_or(filename, |(stem, _)| stem))
}

/// True when `name` is exactly one normal path component (no separators, `..` or roots).
pub(crate) fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(link: &str) -> Image {
        Image {
            id: "id".into(),
            title: Some("title".into()),
            link: link.into(),
        }
    }

    #[test]
    fn plain_components_are_accepted() {
        assert!(is_plain_component("Beach Day.jpg"));
        assert!(is_plain_component("unnamed1."));
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        assert!(!is_plain_component(""));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component("../escape.png"));
        assert!(!is_plain_component("a/b.png"));
        assert!(!is_plain_component("/etc/passwd"));
    }

    #[cfg(not(windows))]
    #[test]
    fn backslash_is_an_ordinary_character_on_unix() {
        assert!(is_plain_component("a\\b.png"));
    }

    #[cfg(windows)]
    #[test]
    fn backslash_is_a_separator_on_windows() {
        assert!(!is_plain_component("a\\b.png"));
    }

    #[test]
    fn progress_label_prefers_title() {
        assert_eq!(progress_label(&image("https://i.imgur.com/x.png"), "title.png"), "title");
        let untitled = Image {
            title: None,
            ..image("https://example.com/noext")
        };
        assert_eq!(progress_label(&untitled, "unnamed1."), "unnamed1");
        assert_eq!(progress_label(&untitled, "unnamed2.jpg"), "unnamed2");
    }

    #[test]
    fn target_joins_folder_and_name() {
        let target = target_for(
            &image("https://i.imgur.com/x.png"),
            Path::new("gallery/album"),
            "x.png",
        )
        .unwrap();
        assert_eq!(target.destination, PathBuf::from("gallery/album/x.png"));
        assert_eq!(target.url, "https://i.imgur.com/x.png");
    }

    #[tokio::test]
    async fn writes_body_and_creates_folder() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/x.png")
            .with_status(200)
            .with_body(b"\x89PNG")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("nested").join("album");
        let client = ImgurClient::builder().build("id", "secret").unwrap();
        let written = Downloader::new(client)
            .download(&image(&format!("{}/x.png", server.url())), &folder, "x.png")
            .await
            .unwrap();

        assert_eq!(written, folder.join("x.png"));
        assert_eq!(std::fs::read(written).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/x.png")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.png"), "old contents").unwrap();
        let client = ImgurClient::builder().build("id", "secret").unwrap();
        Downloader::new(client)
            .download(&image(&format!("{}/x.png", server.url())), dir.path(), "x.png")
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("x.png")).unwrap(), "new");
    }

    #[tokio::test]
    async fn http_error_is_a_fetch_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.png")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = ImgurClient::builder().build("id", "secret").unwrap();
        let err = Downloader::new(client)
            .download(&image(&format!("{}/gone.png", server.url())), dir.path(), "gone.png")
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Fetch(_)));
        assert!(!dir.path().join("gone.png").exists());
    }

    #[tokio::test]
    async fn unsafe_name_is_rejected_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let client = ImgurClient::builder().build("id", "secret").unwrap();
        let err = Downloader::new(client)
            .download(&image("https://i.imgur.com/x.png"), dir.path(), "../x.png")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::UnsafeFileName(_)));
    }
}
