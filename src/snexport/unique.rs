//! Collision-free file naming.
//!
//! [`allocate`] probes `stem.ext`, `stem-1.ext`, `stem-2.ext`, ... and returns the
//! first candidate the predicate reports as free. The existence check is passed
//! in, so the search has no storage dependency of its own.
//!
//! Probing and creating are separate calls: another writer can take the name in
//! between. Vaults that can create-if-absent atomically (see
//! [`crate::store::fs::FsVault`]) turn that race into a `Store` error instead of
//! an overwrite.

/// Normalize a vault folder: trims surrounding slashes, `/` means the root.
pub fn normalize_folder(folder: &str) -> &str {
    folder.trim_matches('/')
}

/// `directory/stem.extension`, or `stem.extension` at the vault root.
pub fn build_file_path(directory: &str, stem: &str, extension: &str) -> String {
    let directory = normalize_folder(directory);
    if directory.is_empty() {
        format!("{}.{}", stem, extension)
    } else {
        format!("{}/{}.{}", directory, stem, extension)
    }
}

/// First free path in the `stem`, `stem-1`, `stem-2`, ... sequence.
pub fn allocate<F>(directory: &str, stem: &str, extension: &str, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut candidate = build_file_path(directory, stem, extension);
    let mut counter: u64 = 0;
    while exists(&candidate) {
        counter += 1;
        candidate = build_file_path(directory, &format!("{}-{}", stem, counter), extension);
    }
    candidate
}
