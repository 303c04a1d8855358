//! File type filters for the dialog's type dropdown.

use std::ffi::{OsStr, OsString};
use std::sync::OnceLock;

const WILDCARD: &str = "*.*";

/// A single dialog filter: a display label and normalized patterns such as `*.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    label: String,
    extensions: Vec<String>,
}

impl FileFilter {
    /// Builds a filter, normalizing each extension (`png`, `.png`, `*.png` all become `*.png`)
    /// and decorating the label as `"<label> (png, jpg)"`.
    pub fn new<I, S>(label: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| normalize_pattern(e.as_ref()))
            .collect();
        let label = decorate_label(label, &extensions);
        Self { label, extensions }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Dialog-ready pattern, `*.*` when no extensions (or only wildcards) were given.
    pub fn pattern(&self) -> String {
        if self.extensions.iter().all(|e| e == WILDCARD) {
            WILDCARD.to_string()
        } else {
            self.extensions.join(";")
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|e| e == WILDCARD)
    }

    /// True when the lower-cased path ends with one of the filter's suffixes.
    pub fn matches(&self, path: impl AsRef<OsStr>) -> bool {
        if self.is_wildcard() {
            return true;
        }
        // Suffixes are plain text, so replacing unpaired surrogates cannot change the outcome.
        let lower = path.as_ref().to_string_lossy().to_lowercase();
        self.extensions
            .iter()
            .any(|e| lower.ends_with(e.trim_start_matches('*')))
    }

    /// Appends the first pattern's suffix when the path does not match the filter.
    /// The path's own code units are kept as they are.
    pub fn normalize_extension(&self, path: impl AsRef<OsStr>) -> OsString {
        let path = path.as_ref();
        let mut out = path.to_os_string();
        if !self.matches(path) {
            if let Some(first) = self.extensions.first() {
                out.push(first.trim_start_matches('*'));
            }
        }
        out
    }

    /// Rebuilds filters from raw `(label, "*.a;*.b")` pairs.
    pub fn validate<S: AsRef<str>>(filters: &[(S, S)]) -> Vec<FileFilter> {
        filters
            .iter()
            .map(|(label, pattern)| FileFilter::new(label.as_ref(), pattern.as_ref().split(';')))
            .collect()
    }

    /// `(label, pattern)` pairs in the order the dialog receives them.
    pub fn prepare(filters: &[FileFilter]) -> Vec<(String, String)> {
        filters.iter().map(|f| (f.label.clone(), f.pattern())).collect()
    }
}

/// Normalizes a single extension to a glob pattern.
pub fn normalize_pattern(ext: &str) -> String {
    if ext.is_empty() || ext == "*" || ext == "." || ext == WILDCARD {
        return WILDCARD.to_string();
    }
    let mut ext = ext.to_string();
    if ext.ends_with('.') {
        ext.push('*');
    }
    if ext.starts_with('.') {
        ext.insert(0, '*');
    }
    if !ext.starts_with('*') {
        ext.insert_str(0, "*.");
    }
    ext
}

fn decorate_label(label: &str, extensions: &[String]) -> String {
    if extensions.is_empty() || extensions.iter().any(|e| e == WILDCARD) {
        return label.to_string();
    }
    let cleaned: Vec<&str> = extensions
        .iter()
        .map(|e| e.trim_start_matches(['*', '.']))
        .collect();
    format!("{} ({})", label, cleaned.join(", "))
}

macro_rules! common_filters {
    ($($variant:ident => $label:literal, [$($ext:literal),* $(,)?];)*) => {
        /// Ready-made filters, built once on first use.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CommonFilter {
            $($variant,)*
        }

        impl CommonFilter {
            pub const ALL_FILTERS: &'static [CommonFilter] = &[$(CommonFilter::$variant,)*];

            /// Raw label and extensions before normalization.
            pub const fn definition(self) -> (&'static str, &'static [&'static str]) {
                match self {
                    $(CommonFilter::$variant => ($label, &[$($ext),*]),)*
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(CommonFilter::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

common_filters! {
    // Generic
    All => "All files", ["*.*"];
    NoExtension => "Files without extension", ["*"];

    // Audio
    AudioAll => "Audio files", ["mp3", "aac", "m4a", "flac", "wav", "w64", "ogg", "opus", "alac", "aiff", "pcm", "raw"];
    Mp3 => "MP3 audio", ["mp3"];
    Aac => "AAC audio", ["aac", "m4a"];
    Flac => "FLAC audio", ["flac"];
    Wav => "Wave audio", ["wav", "w64"];
    Ogg => "Ogg Vorbis audio", ["ogg"];
    Opus => "Opus audio", ["opus"];
    Dolby => "Dolby lossy audio", ["ac3", "eac3", "ec3"];
    Ac3 => "AC3 audio", ["ac3"];
    Eac3 => "EAC3 audio", ["eac3", "ec3"];
    Pcm => "PCM audio", ["pcm", "raw"];

    // Video
    VideoAll => "Video files", ["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "mpg", "mpeg", "m4v"];
    Mp4 => "MP4 video", ["mp4", "m4v"];
    Mkv => "Matroska video", ["mkv"];
    Avi => "AVI video", ["avi"];
    Mov => "QuickTime video", ["mov"];
    Webm => "WebM video", ["webm"];
    MediaContainers => "Media containers", ["mkv", "mka", "mp4", "m4a", "mpa", "avi", "mov"];

    // Images
    ImageAll => "Image files", ["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp", "heic"];
    Png => "PNG image", ["png"];
    Jpeg => "JPEG image", ["jpg", "jpeg"];
    Bmp => "Bitmap image", ["bmp"];
    Gif => "GIF image", ["gif"];
    Tiff => "TIFF image", ["tiff"];
    Webp => "WebP image", ["webp"];

    // Documents
    Documents => "Documents", ["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "txt", "rtf"];
    Pdf => "PDF documents", ["pdf"];
    Word => "Word documents", ["doc", "docx"];
    Excel => "Excel spreadsheets", ["xls", "xlsx"];
    PowerPoint => "PowerPoint presentations", ["ppt", "pptx"];
    Text => "Text files", ["txt", "rtf", "md"];

    // Archives
    Archives => "Archive files", ["zip", "rar", "7z", "tar", "gz", "bz2", "xz"];
    Zip => "ZIP archive", ["zip"];
    Rar => "RAR archive", ["rar"];
    SevenZ => "7-Zip archive", ["7z"];
    Tar => "TAR archive", ["tar", "gz", "bz2", "xz"];

    // Code / data
    SourceCode => "Source code", ["py", "c", "cpp", "h", "hpp", "cs", "java", "js", "ts", "rs", "go"];
    Python => "Python source", ["py"];
    Json => "JSON files", ["json"];
    Xml => "XML files", ["xml"];
    Yaml => "YAML files", ["yml", "yaml"];
    Csv => "CSV files", ["csv"];
}

static CATALOG: OnceLock<Vec<FileFilter>> = OnceLock::new();

impl CommonFilter {
    /// The whole catalog, in declaration order.
    pub fn catalog() -> &'static [FileFilter] {
        CATALOG.get_or_init(|| {
            Self::ALL_FILTERS
                .iter()
                .map(|f| {
                    let (label, exts) = f.definition();
                    FileFilter::new(label, exts.iter().copied())
                })
                .collect()
        })
    }

    pub fn filter(self) -> &'static FileFilter {
        &Self::catalog()[self as usize]
    }

    /// Looks a filter up by its variant name, case-insensitively (`"audio_all"`, `"AudioAll"`).
    pub fn from_name(name: &str) -> Option<CommonFilter> {
        let wanted: String = name.chars().filter(|c| *c != '_' && *c != '-').collect();
        Self::ALL_FILTERS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(&wanted))
    }
}

impl From<CommonFilter> for FileFilter {
    fn from(f: CommonFilter) -> Self {
        f.filter().clone()
    }
}

/// Default filters for open dialogs.
pub fn default_open_filters() -> Vec<FileFilter> {
    vec![
        CommonFilter::AudioAll.into(),
        CommonFilter::MediaContainers.into(),
        CommonFilter::All.into(),
    ]
}

/// Default filters for save dialogs.
pub fn default_save_filters() -> Vec<FileFilter> {
    vec![CommonFilter::AudioAll.into(), CommonFilter::All.into()]
}
