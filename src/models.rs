use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::ImgurError;

/// Gallery feed to list, as accepted by the `gallery/{section}` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GallerySection {
    #[default]
    Hot,
    Top,
    User,
}

/// Ordering of a gallery listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GallerySort {
    #[default]
    Viral,
    Top,
    Time,
    /// Only meaningful for [`GallerySection::User`].
    Rising,
}

/// Time window for [`GallerySection::Top`] listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryWindow {
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Path segment used by the API.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

string_enum!(GallerySection { Hot => "hot", Top => "top", User => "user" });
string_enum!(GallerySort { Viral => "viral", Top => "top", Time => "time", Rising => "rising" });
string_enum!(GalleryWindow {
    Day => "day",
    Week => "week",
    Month => "month",
    Year => "year",
    All => "all",
});

/// Parameters of a gallery listing request.
///
/// The defaults (`hot`, `viral`, `day`, page `0`, viral posts shown) match the front page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryQuery {
    pub section: GallerySection,
    pub sort: GallerySort,
    pub window: GalleryWindow,
    /// Zero-based page number.
    pub page: u32,
    pub show_viral: bool,
}

impl Default for GalleryQuery {
    fn default() -> Self {
        Self {
            section: GallerySection::default(),
            sort: GallerySort::default(),
            window: GalleryWindow::default(),
            page: 0,
            show_viral: true,
        }
    }
}

impl GalleryQuery {
    /// Relative API path for this query.
    ///
    /// The time window is only part of the path for the `top` section.
    pub fn path(&self) -> String {
        match self.section {
            GallerySection::Top => format!(
                "gallery/{}/{}/{}/{}?showViral={}",
                self.section, self.sort, self.window, self.page, self.show_viral
            ),
            _ => format!(
                "gallery/{}/{}/{}?showViral={}",
                self.section, self.sort, self.page, self.show_viral
            ),
        }
    }
}

/// A post in the gallery feed. Only albums are downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    /// Post title; empty when the service sends `null`.
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub is_album: bool,
}

/// Image metadata as returned by the album images endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Direct media URL, for example `https://i.imgur.com/abc.jpg`.
    pub link: String,
}

impl Image {
    /// The title when present and non-empty.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }
}

/// Remaining request allowance for the application and client IP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credits {
    #[serde(default)]
    pub user_limit: i64,
    #[serde(default)]
    pub user_remaining: i64,
    #[serde(default)]
    pub client_limit: i64,
    #[serde(default)]
    pub client_remaining: i64,
}

fn de_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response wrapper used by every API endpoint: `{"data": .., "success": .., "status": ..}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub(crate) data: Option<serde_json::Value>,
    pub(crate) success: Option<bool>,
    pub(crate) status: Option<u16>,
}

impl Envelope {
    /// Unwrap `data` into `T`, turning `success: false` into [`ImgurError::Api`].
    pub(crate) fn into_data<T>(self, missing: &'static str) -> Result<T, ImgurError>
    where
        T: serde::de::DeserializeOwned,
    {
        if !self.success.unwrap_or(false) {
            let detail = self
                .data
                .as_ref()
                .and_then(|data| data.get("error"))
                .and_then(error_message)
                .unwrap_or_else(|| "request was not successful".to_string());
            let msg = match self.status {
                Some(status) => format!("{detail} (status {status})"),
                None => detail,
            };
            return Err(ImgurError::Api(msg));
        }

        let data = self.data.ok_or(ImgurError::MissingField(missing))?;
        serde_json::from_value(data).map_err(|err| ImgurError::Api(err.to_string()))
    }
}

// `data.error` is usually a string but some endpoints nest an object with a `message`.
fn error_message(error: &serde_json::Value) -> Option<String> {
    match error {
        serde_json::Value::String(msg) => Some(msg.clone()),
        other => other
            .get("message")
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_query_targets_front_page() {
        assert_eq!(
            GalleryQuery::default().path(),
            "gallery/hot/viral/0?showViral=true"
        );
    }

    #[test]
    fn top_query_includes_window() {
        let query = GalleryQuery {
            section: GallerySection::Top,
            sort: GallerySort::Top,
            window: GalleryWindow::Month,
            page: 2,
            show_viral: false,
        };
        assert_eq!(query.path(), "gallery/top/top/month/2?showViral=false");
    }

    #[test]
    fn section_parsing_is_case_insensitive() {
        assert_eq!("USER".parse::<GallerySection>(), Ok(GallerySection::User));
        assert!("frontpage".parse::<GallerySection>().is_err());
    }

    #[test]
    fn gallery_item_tolerates_null_title() {
        let item: GalleryItem =
            serde_json::from_value(json!({"id": "a1", "title": null, "is_album": true})).unwrap();
        assert_eq!(item.title, "");
        assert!(item.is_album);
    }

    #[test]
    fn gallery_item_defaults_to_not_album() {
        let item: GalleryItem =
            serde_json::from_value(json!({"id": "b2", "title": "cat"})).unwrap();
        assert!(!item.is_album);
    }

    #[test]
    fn empty_image_title_has_no_display_title() {
        let image = Image {
            id: "x".into(),
            title: Some(String::new()),
            link: "https://i.imgur.com/x.png".into(),
        };
        assert_eq!(image.display_title(), None);
    }

    #[test]
    fn envelope_unwraps_data() {
        let envelope: Envelope = serde_json::from_value(json!({
            "data": [{"id": "i1", "title": null, "link": "https://i.imgur.com/i1.gif"}],
            "success": true,
            "status": 200
        }))
        .unwrap();
        let images: Vec<Image> = envelope.into_data("missing images").unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].title, None);
    }

    #[test]
    fn envelope_failure_maps_api_error() {
        let envelope: Envelope = serde_json::from_value(json!({
            "data": {"error": "Unable to find an album with the id, nope", "method": "GET"},
            "success": false,
            "status": 404
        }))
        .unwrap();
        match envelope.into_data::<Vec<Image>>("missing images") {
            Err(ImgurError::Api(msg)) => {
                assert!(msg.contains("Unable to find an album"));
                assert!(msg.contains("404"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn envelope_without_data_reports_missing_field() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": true, "status": 200})).unwrap();
        assert!(matches!(
            envelope.into_data::<Credits>("credits response missing data"),
            Err(ImgurError::MissingField("credits response missing data"))
        ));
    }

    #[test]
    fn credits_use_pascal_case_keys() {
        let credits: Credits = serde_json::from_value(json!({
            "UserLimit": 2000,
            "UserRemaining": 1999,
            "ClientLimit": 12500,
            "ClientRemaining": 12480,
            "UserReset": 1700000000
        }))
        .unwrap();
        assert_eq!(credits.client_remaining, 12480);
    }
}
