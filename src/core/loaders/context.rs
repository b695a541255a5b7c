use std::path::Path;

/// Everything one installer run needs.
pub struct InstallContext<'a> {
    pub installer_path: &'a Path,
    pub minecraft_version: &'a str,
    pub loader_version: &'a str,
    pub install_dir: &'a Path,
}
