use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::{seq::SliceRandom, Rng};
use walkdir::WalkDir;

use crate::{models::IntroResult, services::FileEnumerator};

/// Extensions treated as playable intro clips
pub fn default_video_extensions() -> Vec<String> {
    [
        "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpg", "mpeg", "3gp", "ogv",
        "ts", "mts", "m2ts",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

/// Recursive directory walk backed by `walkdir`
///
/// Unreadable entries below the root are logged and skipped. Only a root that
/// cannot be read fails the walk.
#[derive(Debug, Clone, Default)]
pub struct WalkDirEnumerator {
    follow_links: bool,
}

impl WalkDirEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl FileEnumerator for WalkDirEnumerator {
    fn enumerate(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut skipped = 0usize;
        for entry in WalkDir::new(root).follow_links(self.follow_links) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable entry in custom intro directory"
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::debug!(
                root = %root.display(),
                found = files.len(),
                skipped,
                "Custom intro walk finished with errors"
            );
        }
        Ok(files)
    }
}

/// Lists and shuffles user-supplied intro clips
#[derive(Clone)]
pub struct CustomIntroLoader {
    enumerator: Arc<dyn FileEnumerator>,
    video_extensions: Vec<String>,
}

impl CustomIntroLoader {
    pub fn new(enumerator: Arc<dyn FileEnumerator>) -> Self {
        Self {
            enumerator,
            video_extensions: default_video_extensions(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.video_extensions = extensions
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Video files under `path`, or nothing if the path is unset or unreadable
    pub fn list_files(&self, path: Option<&Path>) -> Vec<PathBuf> {
        let Some(path) = path else {
            return Vec::new();
        };

        match self.enumerator.enumerate(path) {
            Ok(files) => files.into_iter().filter(|f| self.is_video_file(f)).collect(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Custom intro scan failed, continuing without custom intros"
                );
                Vec::new()
            }
        }
    }

    /// `list_files` on the blocking thread pool
    pub async fn list_files_blocking(&self, path: Option<PathBuf>) -> Vec<PathBuf> {
        let Some(path) = path else {
            return Vec::new();
        };

        let loader = self.clone();
        match tokio::task::spawn_blocking(move || loader.list_files(Some(&path))).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "Custom intro scan task failed");
                Vec::new()
            }
        }
    }

    /// Custom intros under `path` in random order
    ///
    /// The scan runs on the blocking pool; the shuffle happens afterwards on
    /// the caller's task.
    pub async fn pick_intros<R: Rng + Send>(
        &self,
        path: Option<PathBuf>,
        rng: &mut R,
    ) -> Vec<IntroResult> {
        let files = self.list_files_blocking(path).await;
        Self::shuffle_into_results(files, rng)
    }

    fn shuffle_into_results<R: Rng>(mut files: Vec<PathBuf>, rng: &mut R) -> Vec<IntroResult> {
        files.shuffle(rng);
        files
            .into_iter()
            .map(|path| IntroResult::Path { path })
            .collect()
    }

    fn is_video_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.video_extensions.iter().any(|v| *v == ext)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockFileEnumerator;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_lists_video_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("nested/b.MKV"));
        touch(&dir.path().join("nested/deeper/c.m2ts"));
        touch(&dir.path().join("readme.txt"));
        touch(&dir.path().join("poster.jpg"));
        touch(&dir.path().join("no_extension"));

        let loader = CustomIntroLoader::new(Arc::new(WalkDirEnumerator::new()));
        let files: HashSet<String> = loader
            .list_files(Some(dir.path()))
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        let expected: HashSet<String> = ["a.mp4", "b.MKV", "c.m2ts"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_missing_directory_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let loader = CustomIntroLoader::new(Arc::new(WalkDirEnumerator::new()));
        assert!(loader.list_files(Some(&missing)).is_empty());
    }

    #[test]
    fn test_unset_path_skips_enumeration() {
        let mut enumerator = MockFileEnumerator::new();
        enumerator.expect_enumerate().never();

        let loader = CustomIntroLoader::new(Arc::new(enumerator));
        assert!(loader.list_files(None).is_empty());
    }

    #[test]
    fn test_io_error_is_swallowed() {
        let mut enumerator = MockFileEnumerator::new();
        enumerator
            .expect_enumerate()
            .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));

        let loader = CustomIntroLoader::new(Arc::new(enumerator));
        assert!(loader.list_files(Some(Path::new("/intros"))).is_empty());
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let mut enumerator = MockFileEnumerator::new();
        enumerator.expect_enumerate().returning(|_| {
            Ok(vec![PathBuf::from("/intros/a.mp4"), PathBuf::from("/intros/b.WEBM")])
        });

        let loader = CustomIntroLoader::new(Arc::new(enumerator))
            .with_extensions(vec![".webm".to_string(), " ".to_string()]);
        assert_eq!(
            loader.list_files(Some(Path::new("/intros"))),
            vec![PathBuf::from("/intros/b.WEBM")]
        );
    }

    #[tokio::test]
    async fn test_pick_intros_is_a_permutation() {
        let mut enumerator = MockFileEnumerator::new();
        let files: Vec<PathBuf> = (0..10)
            .map(|i| PathBuf::from(format!("/intros/{}.mp4", i)))
            .collect();
        let listed = files.clone();
        enumerator
            .expect_enumerate()
            .returning(move |_| Ok(listed.clone()));

        let loader = CustomIntroLoader::new(Arc::new(enumerator));
        let mut rng = StdRng::seed_from_u64(42);
        let picked = loader
            .pick_intros(Some(PathBuf::from("/intros")), &mut rng)
            .await;

        assert_eq!(picked.len(), files.len());
        assert!(picked.iter().all(IntroResult::is_custom));
        let picked_paths: HashSet<PathBuf> = picked
            .into_iter()
            .filter_map(|r| match r {
                IntroResult::Path { path } => Some(path),
                IntroResult::Item { .. } => None,
            })
            .collect();
        assert_eq!(picked_paths, files.into_iter().collect::<HashSet<_>>());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_does_not_hide_other_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("good.mp4"));
        std::os::unix::fs::symlink(dir.path().join("gone.mp4"), dir.path().join("stale.mp4"))
            .unwrap();

        let enumerator = WalkDirEnumerator::new().with_follow_links(true);
        assert_eq!(
            enumerator.enumerate(dir.path()).unwrap(),
            vec![dir.path().join("good.mp4")]
        );

        let loader = CustomIntroLoader::new(Arc::new(enumerator));
        assert_eq!(
            loader.list_files(Some(dir.path())),
            vec![dir.path().join("good.mp4")]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = WalkDirEnumerator::new().enumerate(&dir.path().join("does-not-exist"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_blocking_listing_matches_sync_listing() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("intro.mov"));

        let loader = CustomIntroLoader::new(Arc::new(WalkDirEnumerator::new()));
        let files = loader
            .list_files_blocking(Some(dir.path().to_path_buf()))
            .await;
        assert_eq!(files, vec![dir.path().join("intro.mov")]);
    }
}
