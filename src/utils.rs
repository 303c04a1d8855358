use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Convert a Rust string to a null-terminated UTF-16 vector.
pub fn to_wstring(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a path to a null-terminated UTF-16 vector, normalizing separators for the shell parser.
///
/// Lossless: unpaired surrogates in the path survive.
pub fn path_to_wstring(path: &Path) -> Vec<u16> {
    os_to_wide(path.as_os_str())
        .into_iter()
        .map(|u| if u == u16::from(b'/') { u16::from(b'\\') } else { u })
        .chain(std::iter::once(0))
        .collect()
}

/// Helper trait for easy string passing to Win32 APIs
pub trait ToPcwstr {
    fn to_pcwstr(&self) -> Vec<u16>;
}

impl ToPcwstr for str {
    fn to_pcwstr(&self) -> Vec<u16> { to_wstring(self) }
}

impl ToPcwstr for String {
    fn to_pcwstr(&self) -> Vec<u16> { to_wstring(self) }
}

/// Length of a null-terminated UTF-16 buffer, excluding the terminator.
///
/// # Safety
/// `ptr` must point to a readable, null-terminated UTF-16 buffer.
unsafe fn wide_len(ptr: *const u16) -> usize { unsafe {
    (0..).take_while(|&i| *ptr.offset(i) != 0).count()
}}

/// Reads a null-terminated UTF-16 string, replacing unpaired surrogates.
///
/// # Safety
/// `ptr` must be null or point to a readable, null-terminated UTF-16 buffer.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> Option<String> { unsafe {
    if ptr.is_null() {
        return None;
    }
    let slice = std::slice::from_raw_parts(ptr, wide_len(ptr));
    Some(String::from_utf16_lossy(slice))
}}

/// Reads a null-terminated UTF-16 string without loss. Use this for file system paths.
///
/// # Safety
/// `ptr` must be null or point to a readable, null-terminated UTF-16 buffer.
pub unsafe fn os_from_wide_ptr(ptr: *const u16) -> Option<OsString> { unsafe {
    if ptr.is_null() {
        return None;
    }
    Some(wide_to_os(std::slice::from_raw_parts(ptr, wide_len(ptr))))
}}

/// UTF-16 (possibly ill-formed) to `OsString`.
#[cfg(windows)]
pub fn wide_to_os(wide: &[u16]) -> OsString {
    use std::os::windows::ffi::OsStringExt;
    OsString::from_wide(wide)
}

/// `OsString` to UTF-16 without a terminator.
#[cfg(windows)]
pub fn os_to_wide(s: &OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    s.encode_wide().collect()
}

// Off Windows the bytes are WTF-8, so unpaired surrogates still round-trip.
#[cfg(not(windows))]
pub fn wide_to_os(wide: &[u16]) -> OsString {
    use std::os::unix::ffi::OsStringExt;

    let mut bytes = Vec::with_capacity(wide.len());
    for unit in char::decode_utf16(wide.iter().copied()) {
        match unit {
            Ok(c) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Err(e) => {
                let s = e.unpaired_surrogate();
                bytes.extend_from_slice(&[
                    0xE0 | (s >> 12) as u8,
                    0x80 | ((s >> 6) & 0x3F) as u8,
                    0x80 | (s & 0x3F) as u8,
                ]);
            }
        }
    }
    OsString::from_vec(bytes)
}

#[cfg(not(windows))]
pub fn os_to_wide(s: &OsStr) -> Vec<u16> {
    use std::os::unix::ffi::OsStrExt;

    let bytes = s.as_bytes();
    let mut wide = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let (cp, len) = decode_wtf8(&bytes[i..]);
        i += len;
        if cp >= 0x10000 {
            let v = cp - 0x10000;
            wide.push(0xD800 | (v >> 10) as u16);
            wide.push(0xDC00 | (v & 0x3FF) as u16);
        } else {
            wide.push(cp as u16);
        }
    }
    wide
}

/// One code point from the head of `b`; invalid sequences yield U+FFFD and consume one byte.
#[cfg(not(windows))]
fn decode_wtf8(b: &[u8]) -> (u32, usize) {
    let (len, init) = match b[0] {
        lead @ 0x00..=0x7F => return (u32::from(lead), 1),
        lead @ 0xC2..=0xDF => (2, lead & 0x1F),
        lead @ 0xE0..=0xEF => (3, lead & 0x0F),
        lead @ 0xF0..=0xF4 => (4, lead & 0x07),
        _ => return (0xFFFD, 1),
    };
    if b.len() < len {
        return (0xFFFD, 1);
    }
    let mut cp = u32::from(init);
    for &c in &b[1..len] {
        if c & 0xC0 != 0x80 {
            return (0xFFFD, 1);
        }
        cp = (cp << 6) | u32::from(c & 0x3F);
    }
    (cp, len)
}

/// Formats an HRESULT the way the SDK documents it, e.g. `0x800704C7`.
pub fn hresult_hex(hr: i32) -> String {
    format!("{:#010X}", hr as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_to_wstring_terminates() {
        assert_eq!(to_wstring("ab"), vec![0x61, 0x62, 0]);
        assert_eq!(to_wstring(""), vec![0]);
    }

    #[test]
    fn test_from_wide_ptr() {
        let w = to_wstring("C:\\Users\\me\\Müsic.flac");
        let back = unsafe { from_wide_ptr(w.as_ptr()) };
        assert_eq!(back.as_deref(), Some("C:\\Users\\me\\Müsic.flac"));
        assert_eq!(unsafe { from_wide_ptr(std::ptr::null()) }, None);
    }

    #[test]
    fn test_path_to_wstring_separators() {
        let w = path_to_wstring(Path::new("C:/Music/Albums"));
        assert_eq!(String::from_utf16_lossy(&w[..w.len() - 1]), "C:\\Music\\Albums");
        assert_eq!(w.last(), Some(&0));
    }

    #[test]
    fn test_unpaired_surrogate_roundtrips() {
        let wide: Vec<u16> = vec![b'C' as u16, b':' as u16, b'\\' as u16, 0xD800, b'a' as u16];
        let mut terminated = wide.clone();
        terminated.push(0);

        let os = unsafe { os_from_wide_ptr(terminated.as_ptr()) }.unwrap();
        assert_eq!(os_to_wide(&os), wide);
        assert_eq!(path_to_wstring(&PathBuf::from(os)), terminated);
    }

    #[test]
    fn test_wide_os_roundtrip_mixed() {
        // BMP, astral pair, trailing lone low surrogate
        let wide: Vec<u16> = "é🎵x".encode_utf16().chain([0xDC01]).collect();
        assert_eq!(os_to_wide(&wide_to_os(&wide)), wide);
        assert_eq!(wide_to_os(&"plain.txt".encode_utf16().collect::<Vec<_>>()), OsString::from("plain.txt"));
    }

    #[test]
    fn test_hresult_hex() {
        assert_eq!(hresult_hex(0x800704C7u32 as i32), "0x800704C7");
        assert_eq!(hresult_hex(0), "0x00000000");
    }
}
