//! Resolution of the bundled ExifTool executable.

use std::path::PathBuf;

/// Directory holding the bundled ExifTool distribution.
pub const BUNDLE_DIR_NAME: &str = "exiftool_dist";

/// Resources directory of a development checkout, relative to its root.
pub const DEV_RESOURCES_DIR_NAME: &str = "resources";

/// File name of the ExifTool executable on this platform.
#[cfg(windows)]
pub const EXECUTABLE_NAME: &str = "exiftool.exe";
/// File name of the ExifTool executable on this platform.
#[cfg(not(windows))]
pub const EXECUTABLE_NAME: &str = "exiftool";

/// Locates the ExifTool executable shipped alongside the application.
///
/// A packaged install keeps the tool in its resources directory; a
/// development checkout keeps it under `resources/` in the project tree.
/// The result depends only on the fields of this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableLocator {
    /// Whether this is a packaged (installed) build.
    pub packaged: bool,
    /// Resources directory of the packaged application.
    pub resources_dir: PathBuf,
    /// Root of the development checkout.
    pub project_root: PathBuf,
}

impl ExecutableLocator {
    /// Create a locator.
    pub fn new(
        packaged: bool,
        resources_dir: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            packaged,
            resources_dir: resources_dir.into(),
            project_root: project_root.into(),
        }
    }

    /// Path of the bundled executable for this deployment.
    pub fn locate(&self) -> PathBuf {
        let resources = if self.packaged {
            self.resources_dir.clone()
        } else {
            self.project_root.join(DEV_RESOURCES_DIR_NAME)
        };

        resources.join(BUNDLE_DIR_NAME).join(EXECUTABLE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packaged_uses_resources_dir() {
        let locator = ExecutableLocator::new(true, "/opt/inscribe/resources", "/src/inscribe");
        assert_eq!(
            locator.locate(),
            PathBuf::from("/opt/inscribe/resources")
                .join("exiftool_dist")
                .join(EXECUTABLE_NAME)
        );
    }

    #[test]
    fn test_development_uses_project_resources() {
        let locator = ExecutableLocator::new(false, "/opt/inscribe/resources", "/src/inscribe");
        assert_eq!(
            locator.locate(),
            PathBuf::from("/src/inscribe")
                .join("resources")
                .join("exiftool_dist")
                .join(EXECUTABLE_NAME)
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let locator = ExecutableLocator::new(false, "a", "b");
        assert_eq!(locator.locate(), locator.clone().locate());
    }
}
