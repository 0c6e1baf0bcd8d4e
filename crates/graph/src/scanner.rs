use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Scanner for finding C/C++ source and header files in a project
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Recursively scan the project root for source units. Hidden files and
    /// directories are skipped; results are root-relative ids in sorted
    /// order so the run is deterministic.
    pub fn scan(&self) -> Vec<String> {
        let mut ids = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // skip dotfiles and dot-directories
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !Self::is_source_file(path) {
                        continue;
                    }

                    ids.push(self.relative_id(path));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        ids.sort();
        log::info!("Found {} source units", ids.len());
        ids
    }

    /// Check against the fixed suffix allow-list
    fn is_source_file(path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            let ext = ext.to_lowercase();
            return SOURCE_SUFFIXES.iter().any(|candidate| candidate == &ext);
        }
        false
    }

    fn relative_id(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

const SOURCE_SUFFIXES: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp"];
