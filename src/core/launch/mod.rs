pub mod instructions;

pub use instructions::{launch_instructions, profile_name};
