// ABOUTME: Version and build metadata for the CLI driver

#[allow(dead_code)]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
