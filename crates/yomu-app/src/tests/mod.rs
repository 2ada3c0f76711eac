mod snapshot_tests;

use std::path::PathBuf;

pub fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("yomu-test-{}-{name}", std::process::id()))
}
