use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::core::state::HelperSettings;

/// Local web helper that installs Fabric Loader and Fabric API.
#[derive(Debug, Parser)]
#[command(name = "fabric-setup", version, about)]
pub struct Args {
    /// Address to bind the web UI to
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to bind the web UI to
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Root state directory (default: ~/.minecraft-ai-launcher)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Pre-built add-on jar copied by install-mod
    #[arg(long)]
    pub addon_jar: Option<PathBuf>,

    /// Java executable used to run the Fabric installer
    #[arg(long)]
    pub java: Option<PathBuf>,
}

impl Args {
    /// Settings file first, then flags on top.
    pub fn into_settings(self) -> HelperSettings {
        let mut settings = HelperSettings::load(self.data_dir);
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(addon_jar) = self.addon_jar {
            settings.addon_jar = addon_jar;
        }
        if let Some(java) = self.java {
            settings.java_path = java;
        }
        settings
    }
}
