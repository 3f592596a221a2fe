//! A stand-in for ExifTool used by the integration tests.
//!
//! The fake is a POSIX shell script run as `/bin/sh <script> <args>`, so no
//! executable bit is needed. It stores the comment of `FILE` in
//! `FILE.comment` and answers reads with the JSON layout ExifTool uses,
//! including its unquoted numbers and lowercase booleans.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use inscribe::config::Config;
use inscribe::tool::ExifTool;
use tempfile::TempDir;

/// Script that reads and writes comments like ExifTool does.
pub const STORE_SCRIPT: &str = r#"
mode=read
file=
for arg in "$@"; do
  case "$arg" in
    -ver) echo "13.10"; exit 0 ;;
    '-UserComment<=-') mode=write ;;
    -*) ;;
    *) file="$arg" ;;
  esac
done

if [ ! -f "$file" ]; then
  echo "Error: File not found - $file" >&2
  exit 1
fi

if [ "$mode" = write ]; then
  cat > "$file.comment"
  echo "    1 image files updated"
  exit 0
fi

if [ -f "$file.comment" ]; then
  escaped=$(sed -e 's/\\/\\\\/g' -e 's/"/\\"/g' "$file.comment" \
    | awk '{ if (NR > 1) printf "%s", "\\n"; printf "%s", $0 }')
  # ExifTool leaves number-like values unquoted and prints booleans in lowercase.
  if printf '%s' "$escaped" \
    | grep -Eq '^-?([0-9]|[1-9][0-9]{1,14})(\.[0-9]{1,16})?(e[-+]?[0-9]{1,3})?$'; then
    value="$escaped"
  else
    case "$escaped" in
      [Tt][Rr][Uu][Ee]) value=true ;;
      [Ff][Aa][Ll][Ss][Ee]) value=false ;;
      *) value="\"$escaped\"" ;;
    esac
  fi
  printf '[{"SourceFile": "%s", "EXIF:UserComment": %s}]\n' "$file" "$value"
else
  printf '[{"SourceFile": "%s"}]\n' "$file"
fi
"#;

/// Script that always fails the way ExifTool does on a bad file.
pub const FAILING_SCRIPT: &str = r#"
echo "Error: File format error" >&2
exit 2
"#;

/// Script that prints something that is not JSON.
pub const GARBAGE_SCRIPT: &str = r#"
echo "this is not json"
"#;

/// A temporary directory holding a fake tool script and test images.
pub struct FakeExifTool {
    dir: TempDir,
    script: PathBuf,
}

impl FakeExifTool {
    /// A fake that stores comments next to the images.
    pub fn new() -> Self {
        Self::with_script(STORE_SCRIPT)
    }

    /// A fake running `body`.
    pub fn with_script(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let script = dir.path().join("fake-exiftool.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{body}")).expect("write fake tool");
        Self { dir, script }
    }

    /// Path of the script.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Directory the images live in.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// The tool handle that runs the script.
    pub fn tool(&self) -> ExifTool {
        ExifTool::new("/bin/sh").with_leading_args([self.script.display().to_string()])
    }

    /// Create an (empty) image file named `name`.
    pub fn image(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"").expect("create image");
        path
    }

    /// Configuration file selecting this fake, written on first use.
    pub fn config_file(&self) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        if path.exists() {
            return path;
        }

        let mut config = Config::default();
        config.exiftool.path = Some(PathBuf::from("/bin/sh"));
        config.exiftool.leading_args = vec![self.script.display().to_string()];
        config.display.color = false;

        config.save_to(&path).expect("write config");
        path
    }
}
