//! In-memory package file set.

/// One file destined for the package, path relative to the archive root.
#[derive(Debug, Clone)]
pub struct PackageFile {
    pub path: String,
    pub contents: Vec<u8>,
}

impl PackageFile {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Contents as UTF-8, if the file is text.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Find a file by exact path.
pub fn find_file<'a>(files: &'a [PackageFile], path: &str) -> Option<&'a PackageFile> {
    files.iter().find(|f| f.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_exact_path() {
        let files = vec![
            PackageFile::new("module.html", "<div></div>"),
            PackageFile::new("fields.json", "[]"),
        ];
        assert!(find_file(&files, "fields.json").is_some());
        assert!(find_file(&files, "meta.json").is_none());
    }

    #[test]
    fn text_view_of_binary_is_none() {
        let file = PackageFile::new("logo.png", vec![0x89, 0x50, 0xff, 0xfe]);
        assert!(file.as_text().is_none());
    }
}
