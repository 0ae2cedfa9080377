//! Host mount path translation.
//!
//! Docker's volume syntax wants `/c/Users/...` where Windows gives
//! `C:\Users\...`. This is a pure string function so it can be tested
//! without a running engine. POSIX paths pass through unchanged — only
//! drive-letter paths are ever rewritten.

/// Translate a host path into the engine's volume-path syntax.
pub fn translate_mount_path(host: &str) -> String {
    let normalized = host.replace('\\', "/");
    let bytes = normalized.as_bytes();
    let has_drive_prefix =
        bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/';
    if has_drive_prefix {
        let drive = normalized[..1].to_ascii_lowercase();
        format!("/{}{}", drive, &normalized[2..])
    } else {
        host.to_string()
    }
}
