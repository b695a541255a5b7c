mod modrinth;

pub use modrinth::{
    select_primary_file, AddonFile, ModrinthRegistry, ProjectVersion, FABRIC_LOADER_NAME,
    MODRINTH_API_BASE,
};

/// Modrinth project id of the Fabric API add-on.
pub const FABRIC_API_PROJECT_ID: &str = "fabric-api";
