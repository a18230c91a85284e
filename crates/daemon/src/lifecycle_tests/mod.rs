// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use recur_core::{FakeClock, SequentialIdGen};
use std::path::Path;
use tempfile::tempdir;

mod manifest_sync;
mod startup_shutdown;

fn test_config(dir: &Path) -> Config {
    Config::in_dir(dir.join("state"))
}

fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("schedules.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn fake_store() -> MemoryStore<FakeClock, SequentialIdGen> {
    MemoryStore::with_state(
        StoreState::default(),
        FakeClock::new(),
        SequentialIdGen::new("uid"),
    )
}

const BACKUP: &str = r#"
[schedule.backup]
schedule = "0 * * * *"
concurrency_policy = "forbid"
"#;
