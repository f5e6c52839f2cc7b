use std::path::{Path, PathBuf};

/// Five parts: a and b are the same family, c is close to a, e points at d.
pub const GOLDEN_CSV: &str = "\
a,b,0,c,1
b,a,0,1
c,0,a,1
d,0,1
e,d,0,1
";

pub const APPROVED_CSV: &str = "a\nb\nc\nd\ne\n";

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
