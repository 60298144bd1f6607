#![allow(dead_code)]

use std::{
    io::{Cursor, Write as _},
    os::unix::fs::PermissionsExt as _,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard},
};

use primitive_art::{Converter, ConverterKind, Toolchain};

/// Copies the input to `-o`, or three numbered frames when `-o` holds `%04d`.
pub const FAKE_PRIMITIVE: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/primitive.args"
in=""; out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) in="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
case "$out" in
  *%04d*) for i in 1 2 3; do cp "$in" "$(printf "$out" "$i")"; done ;;
  *) cp "$in" "$out" ;;
esac
echo "iteration 1, score 0.1"
"#;

/// Fails like primitive does on an unreadable input.
pub const FAILING_PRIMITIVE: &str = r#"#!/bin/sh
echo "reading input" >&2
echo "image: unknown format" >&2
exit 2
"#;

/// Exits successfully without writing anything.
pub const SILENT_PRIMITIVE: &str = "#!/bin/sh\nexit 0\n";

/// Expands the frame wildcard itself and writes a GIF header to the output.
pub const FAKE_MAGICK: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/magick.args"
pattern="$5"
count=0
for f in $pattern; do
  [ -f "$f" ] && count=$((count + 1))
done
if [ "$count" -eq 0 ]; then
  echo "convert: no images defined" >&2
  exit 1
fi
printf 'GIF89a' > "$6"
"#;

// Scripts are written under the write lock and processes spawned under the
// read lock, so no forked child can still hold a script open for writing when
// another test executes it (ETXTBSY).
static SPAWN_LOCK: RwLock<()> = RwLock::new(());

/// Hold while running anything that spawns processes.
pub fn spawning() -> RwLockReadGuard<'static, ()> {
    SPAWN_LOCK.read().unwrap_or_else(|e| e.into_inner())
}

pub fn install_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    let _guard = SPAWN_LOCK.write().unwrap_or_else(|e| e.into_inner());
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(script.as_bytes()).unwrap();
    f.sync_all().unwrap();
    drop(f);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A directory holding `primitive` and `magick` fakes.
pub struct FakeTools {
    pub dir: tempfile::TempDir,
    pub toolchain: Toolchain,
}

impl FakeTools {
    pub fn new(primitive_script: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let primitive = install_tool(dir.path(), "primitive", primitive_script);
        let magick = install_tool(dir.path(), "magick", FAKE_MAGICK);
        let toolchain = Toolchain::new(
            primitive,
            Converter {
                kind: ConverterKind::Magick,
                path: magick,
            },
        );
        Self { dir, toolchain }
    }

    pub fn working() -> Self {
        Self::new(FAKE_PRIMITIVE)
    }

    /// Arguments each invocation of `tool` received, one line per call.
    pub fn calls(&self, tool: &str) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join(format!("{tool}.args")))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([30, 144, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
