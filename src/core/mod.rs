// ─── fabric-setup core ───
// Backend for the local Fabric setup helper.
//
// Architecture:
//   core/
//     version/    — Fabric Meta: game and loader versions
//     registry/   — Modrinth: add-on version lookup
//     downloader/ — Streaming downloads with SHA-1 validation
//     artifacts   — Everything fetched over the network, behind one trait
//     loaders/    — Fabric installer invocation
//     instance/   — On-disk layout, disk inspection, add-on copy
//     jobs/       — Job store + background setup pipeline
//     launch/     — Launch instructions for the official launcher
//     state/      — Settings + shared application state

pub mod artifacts;
pub mod downloader;
pub mod error;
pub mod http;
pub mod instance;
pub mod jobs;
pub mod launch;
pub mod loaders;
pub mod registry;
pub mod state;
pub mod version;
