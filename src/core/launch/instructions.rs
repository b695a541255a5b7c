// ─── Launch Instructions ───
// The helper cannot start the game itself; it tells the user how to point the
// official launcher at the installed profile.

use std::path::Path;

/// Profile name the Fabric installer registers for a loader/game pair.
pub fn profile_name(loader_version: &str, minecraft_version: &str) -> String {
    format!("fabric-loader-{loader_version}-{minecraft_version}")
}

pub fn launch_instructions(
    minecraft_version: &str,
    loader_version: Option<&str>,
    game_dir: &Path,
) -> String {
    let version_step = match loader_version {
        Some(loader) => format!(
            "In the \"Version\" dropdown, select: {}",
            profile_name(loader, minecraft_version)
        ),
        None => format!(
            "In the \"Version\" dropdown, select the fabric-loader profile for {minecraft_version} \
             (the loader version could not be resolved right now)"
        ),
    };

    let steps = [
        "Open the official Minecraft Launcher.".to_string(),
        "Go to the \"Installations\" tab.".to_string(),
        "Click \"New installation\".".to_string(),
        format!("{version_step}."),
        format!("Set \"Game directory\" to: {}", game_dir.display()),
        "Click \"Create\", then start the game.".to_string(),
    ];

    let mut text = String::from(
        "The helper cannot start the game directly. Follow these steps instead:\n\n",
    );
    for (i, step) in steps.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, step));
    }
    text
}
