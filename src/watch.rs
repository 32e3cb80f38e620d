//! File watcher: weaves on startup, then re-weaves when sources or the
//! document change.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, Inputs};
use crate::diagnostics;
use crate::error;

/// Debounce delay between filesystem events and re-weave.
const DEBOUNCE_MS: u64 = 100;

/// Directories to watch: the document's parent, each source directory, and
/// each source file's parent. The flag marks directory sources, which are
/// watched recursively.
fn collect_watch_dirs(inputs: &Inputs) -> HashSet<(PathBuf, bool)> {
    let mut dirs = HashSet::new();
    let parent_of = |p: &Path| return PathBuf::from(".").join(p.parent().unwrap_or(Path::new("")));
    dirs.insert((parent_of(&inputs.document), false));
    for source in &inputs.sources {
        if source.is_dir() {
            dirs.insert((source.clone(), true));
        } else {
            dirs.insert((parent_of(source), false));
        }
    }
    return dirs;
}

/// Canonical parent joined with the file name, so that a path can be
/// compared with event paths even before the file itself exists.
fn normalized_location(path: &Path) -> Option<PathBuf> {
    let parent = path.parent().filter(|p| return !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    return Some(parent.canonicalize().ok()?.join(path.file_name()?));
}

/// Create a filesystem watcher that sends events on the given channel.
/// Events touching only `ignored` (the woven output) are dropped so that
/// writing the output does not trigger another weave.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    ignored: Option<PathBuf>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
            && !only_touches(&event.paths, ignored.as_ref())
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Whether every path of an event is the ignored one.
fn only_touches(paths: &[PathBuf], ignored: Option<&PathBuf>) -> bool {
    let Some(ignored) = ignored else { return false };
    return !paths.is_empty() && paths.iter().all(|p| return normalized_location(p).as_ref() == Some(ignored));
}

/// Entry point for the watch command.
///
/// Weaves once, then watches the document and sources and re-weaves on
/// changes. Weave failures are reported and watching continues.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be set up.
pub fn run(inputs: &Inputs, output: &Path, no_warn_unused: bool) -> Result<ExitCode, error::Error> {
    eprintln!("watch: initial weave");
    let mut last_code = run_weave(inputs, output, no_warn_unused);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, normalized_location(output))?;

    let watch_dirs = collect_watch_dirs(inputs);
    for (dir, recursive) in &watch_dirs {
        let mode = if *recursive { RecursiveMode::Recursive } else { RecursiveMode::NonRecursive };
        if dir.exists() {
            let _ = watcher.watch(dir, mode);
        }
    }

    let dir_count = watch_dirs.len();
    eprintln!("watch: monitoring {dir_count} directories, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-weaving...");
        last_code = run_weave(inputs, output, no_warn_unused);
    }

    return Ok(last_code);
}

/// Weave once and print any error. Returns the exit code of the weave.
fn run_weave(inputs: &Inputs, output: &Path, no_warn_unused: bool) -> ExitCode {
    return match commands::weave(inputs, output, no_warn_unused) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2_u8)
        },
    };
}
