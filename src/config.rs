//! Loading of `settings.ini`.
//!
//! The file is a sectioned key-value file:
//!
//! ```ini
//! [credentials]
//! client_id = abc
//! client_secret = def
//!
//! [number of albums]
//! no_of_albums = 5
//! ```
//!
//! `[download]` and `[gallery]` are optional and fall back to the defaults documented on
//! [`Settings`] and [`GalleryQuery`].

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

use crate::models::{GalleryQuery, GallerySection, GallerySort, GalleryWindow};
use crate::ConfigError;

/// File name looked up in the working directory by the binary.
pub const DEFAULT_CONFIG_FILE: &str = "settings.ini";
/// Albums processed when `[number of albums]` is absent.
pub const DEFAULT_ALBUM_LIMIT: usize = 5;
/// Destination root when `[download] folder` is absent.
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "gallery";

const CREDENTIALS: &str = "credentials";
const ALBUMS: &str = "number of albums";
const DOWNLOAD: &str = "download";
const GALLERY: &str = "gallery";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Application client id, sent as `Authorization: Client-ID <id>`.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
    /// Maximum number of albums to download (default: 5).
    pub album_limit: usize,
    /// Root folder that receives one subfolder per album (default: `gallery`).
    pub download_folder: PathBuf,
    /// Which gallery listing to walk.
    pub gallery: GalleryQuery,
}

impl Settings {
    /// Read and validate a settings file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Unreadable`] if the file is missing, unreadable or malformed
    /// - [`ConfigError::MissingKey`] if a credential is absent or empty
    /// - [`ConfigError::InvalidValue`] if an optional value cannot be parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|source| {
            ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_ini(&ini)
    }

    /// Parse settings from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(text, parse_option())?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let client_id = required(ini, CREDENTIALS, "client_id")?;
        let client_secret = required(ini, CREDENTIALS, "client_secret")?;

        let album_limit =
            parsed(ini, ALBUMS, "no_of_albums", "expected a non-negative integer")?
                .unwrap_or(DEFAULT_ALBUM_LIMIT);

        let download_folder = optional(ini, DOWNLOAD, "folder")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_FOLDER));

        let defaults = GalleryQuery::default();
        let gallery = GalleryQuery {
            section: parsed::<GallerySection>(ini, GALLERY, "section", "expected hot, top or user")?
                .unwrap_or(defaults.section),
            sort: parsed::<GallerySort>(
                ini,
                GALLERY,
                "sort",
                "expected viral, top, time or rising",
            )?
            .unwrap_or(defaults.sort),
            window: parsed::<GalleryWindow>(
                ini,
                GALLERY,
                "window",
                "expected day, week, month, year or all",
            )?
            .unwrap_or(defaults.window),
            page: parsed(ini, GALLERY, "page", "expected a non-negative integer")?
                .unwrap_or(defaults.page),
            show_viral: parsed(ini, GALLERY, "show_viral", "expected true or false")?
                .unwrap_or(defaults.show_viral),
        };

        Ok(Settings {
            client_id,
            client_secret,
            album_limit,
            download_folder,
            gallery,
        })
    }
}

// Values are taken verbatim: no quote stripping, no backslash escapes.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn optional<'a>(ini: &'a Ini, section: &'static str, key: &'static str) -> Option<&'a str> {
    ini.get_from(Some(section), key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn required(ini: &Ini, section: &'static str, key: &'static str) -> Result<String, ConfigError> {
    optional(ini, section, key)
        .map(str::to_string)
        .ok_or(ConfigError::MissingKey { section, key })
}

fn parsed<T: std::str::FromStr>(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
    reason: &str,
) -> Result<Option<T>, ConfigError> {
    match optional(ini, section, key) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                section,
                key,
                value: value.to_string(),
                reason: reason.to_string(),
            }),
    }
}
