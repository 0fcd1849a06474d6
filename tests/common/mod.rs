// Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable stub script standing in for an external tool.
#[cfg(unix)]
pub fn write_fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake prober reporting 100 readable frames, except for inputs whose name
/// contains "noprobe" (frame count absent from the report) or "zeroframes"
/// (a count of 0).
#[cfg(unix)]
pub fn fake_ffprobe(dir: &Path) -> PathBuf {
    write_fake_tool(
        dir,
        "ffprobe",
        r#"#!/bin/sh
for arg do input=$arg; done
case "$input" in
*noprobe*) echo '{"streams":[{}]}' ;;
*zeroframes*) echo '{"streams":[{"nb_read_frames":"0"}]}' ;;
*) echo '{"streams":[{"nb_read_frames":"100"}]}' ;;
esac
"#,
    )
}

/// A fake encoder that narrates frame progress on stderr and writes a
/// 3-byte output file. Inputs named "*bad*" make it exit 1 without writing
/// output; "*overshoot*" makes it report one frame past the probed total.
/// Every invocation's input path is appended to `ffmpeg_calls.log` so tests
/// can assert whether the encoder ran at all.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    let log = dir.join("ffmpeg_calls.log");
    write_fake_tool(
        dir,
        "ffmpeg",
        &format!(
            r#"#!/bin/sh
input=$2
for arg do output=$arg; done
echo "$input" >> "{log}"
case "$input" in
*bad*)
  echo "Error opening input" 1>&2
  exit 1
  ;;
*overshoot*)
  echo "frame=   50 fps= 25 q=28.0 size=     256KiB time=00:00:02.00 bitrate= 100.0kbits/s speed=1x" 1>&2
  echo "frame=  105 fps= 25 q=28.0 size=     512KiB time=00:00:04.20 bitrate= 100.0kbits/s speed=1x" 1>&2
  printf 'out' > "$output"
  exit 0
  ;;
esac
echo "frame=   10 fps= 25 q=28.0 size=     256KiB time=00:00:00.40 bitrate= 100.0kbits/s speed=1x" 1>&2
echo "frame=   60 fps= 25 q=28.0 size=     512KiB time=00:00:02.40 bitrate= 100.0kbits/s speed=1x" 1>&2
echo "frame=  100 fps= 25 q=28.0 size=     768KiB time=00:00:04.00 bitrate= 100.0kbits/s speed=1x" 1>&2
printf 'out' > "$output"
exit 0
"#,
            log = log.display()
        ),
    )
}

/// Input paths the fake encoder has been invoked with, in order.
pub fn encoder_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("ffmpeg_calls.log"))
        .map(|contents| contents.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
