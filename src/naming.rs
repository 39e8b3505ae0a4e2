//! File and folder names derived from titles and media URLs.

/// Characters of an image title kept in its file name.
pub const FILE_STEM_LEN: usize = 20;
/// Characters of an album title kept in its folder name.
pub const ALBUM_FOLDER_LEN: usize = 35;
/// A `.` must occur within this many trailing characters of a URL to count as an extension.
const EXTENSION_WINDOW: usize = 6;

/// Derive `"<stem>.<ext>"` for an image.
///
/// The stem is the first [`FILE_STEM_LEN`] characters of `title`. The extension comes from
/// [`url_extension`]; when it is empty the name ends in a bare dot.
///
/// ```
/// use imgur_gallery_dl::naming::derive_filename;
///
/// assert_eq!(derive_filename("Beach Day", "https://i.imgur.com/beach.jpg"), "Beach Day.jpg");
/// assert_eq!(derive_filename("unnamed1", "https://example.com/noext"), "unnamed1.");
/// ```
pub fn derive_filename(title: &str, url: &str) -> String {
    format!("{}.{}", truncate(title, FILE_STEM_LEN), url_extension(url))
}

/// Text after the last `.` of `url`, or empty when no `.` occurs in its last six characters.
pub fn url_extension(url: &str) -> &str {
    let tail_start = url
        .char_indices()
        .rev()
        .nth(EXTENSION_WINDOW - 1)
        .map_or(0, |(idx, _)| idx);

    match url[tail_start..].rfind('.') {
        Some(dot) => &url[tail_start + dot + 1..],
        None => "",
    }
}

/// Folder name for an album: the first [`ALBUM_FOLDER_LEN`] characters, trimmed.
pub fn album_folder_name(title: &str) -> String {
    truncate(title, ALBUM_FOLDER_LEN).trim().to_string()
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Placeholder names for untitled images: `unnamed1`, `unnamed2`, ...
///
/// One counter lives for a whole run, so numbering continues across albums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UntitledCounter {
    seen: usize,
}

impl UntitledCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance and return the next placeholder.
    pub fn next_name(&mut self) -> String {
        self.seen += 1;
        format!("unnamed{}", self.seen)
    }

    /// Number of placeholders handed out so far.
    pub fn seen(&self) -> usize {
        self.seen
    }
}
