//! Path serializers for the JSON report. Names that are not valid UTF-8 are
//! written with replacement characters instead of failing the whole report.

use std::path::{Path, PathBuf};

use serde::Serializer;

pub fn serialize<P, S>(path: &P, serializer: S) -> Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

pub fn serialize_vec<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}
