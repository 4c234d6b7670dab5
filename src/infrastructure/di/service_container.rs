//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::SceneService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn scene_service(&self) -> SceneService {
        SceneService::new(Arc::clone(&self.fs))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};

    use super::*;

    /// In-memory file system keyed by path.
    struct MemoryFileSystem {
        files: HashMap<PathBuf, String>,
    }

    impl FileSystem for MemoryFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }
    }

    #[test]
    fn given_injected_file_system_when_loading_scene_then_reads_through_it() {
        let fs = MemoryFileSystem {
            files: HashMap::from([(
                PathBuf::from("/virtual/scene.toml"),
                "name = \"Virtual\"\n\n[[entities]]\nname = \"Only\"\n".to_string(),
            )]),
        };
        let container = ServiceContainer::with_deps(Settings::default(), Arc::new(fs));

        let scene = container
            .scene_service()
            .load(Path::new("/virtual/scene.toml"))
            .unwrap();
        assert_eq!(scene.name, "Virtual");
        assert_eq!(scene.arena.len(), 1);
        assert_eq!(container.settings.dump.indent_width, 2);
    }
}
