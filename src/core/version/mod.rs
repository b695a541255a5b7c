pub mod meta;

pub use meta::{FabricMeta, GameVersion, FABRIC_META_BASE};
