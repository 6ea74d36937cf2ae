use std::path::{Path, PathBuf};

use tracing::debug;

pub const IMAGE_DIR_ENV: &str = "MS2RESCORE_GUI_IMAGE_DIR";
pub const PROGRAM_ICON: &str = "program_icon.png";

/// Presentation resources resolved once at startup and handed to the GUI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    pub image_dir: Option<PathBuf>,
}

impl Resources {
    pub fn new(image_dir: Option<PathBuf>) -> Self {
        Self { image_dir }
    }

    /// Resolve the image directory: an explicit path first, then the
    /// `MS2RESCORE_GUI_IMAGE_DIR` variable, then `img/` next to the executable.
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let image_dir = Self::resolve(explicit, std::env::var_os(IMAGE_DIR_ENV).map(PathBuf::from), exe_dir);
        debug!("Image resource directory: {:?}", image_dir);
        Self { image_dir }
    }

    fn resolve(
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
        exe_dir: Option<PathBuf>,
    ) -> Option<PathBuf> {
        explicit
            .into_iter()
            .chain(from_env)
            .chain(exe_dir.map(|dir| dir.join("img")))
            .find(|dir| dir.is_dir())
    }

    pub fn image(&self, name: &str) -> Option<PathBuf> {
        self.image_dir
            .as_ref()
            .map(|dir| dir.join(name))
            .filter(|path| path.is_file())
    }

    pub fn program_icon(&self) -> Option<PathBuf> {
        self.image(PROGRAM_ICON)
    }
}
