use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

/// Join a root-relative entry onto `root`, refusing anything that would land outside it.
pub fn resolve_within(root: impl AsRef<Path>, entry: &str) -> Option<PathBuf> {
    let relative = Path::new(entry);
    if relative.is_absolute() || relative.has_root() {
        return None;
    }

    let inner = relative.clean();
    if inner == Path::new(".") || inner.components().any(|c| c == Component::ParentDir) {
        return None;
    }
    Some(root.as_ref().join(inner).clean())
}

/// Case-insensitive path ordering used for all reported lists.
pub fn sort_paths<T>(items: &mut [T], key: impl Fn(&T) -> &Path) {
    items.sort_by(|a, b| {
        key(a)
            .to_string_lossy()
            .to_lowercase()
            .cmp(&key(b).to_string_lossy().to_lowercase())
    });
}
