//! Fixed COM identifiers used by the dialogs.
//!
//! Every GUID is parsed from its canonical registry form in a `const` context,
//! so a typo in one of the literals below is a compile error rather than a
//! runtime surprise.

use crate::types::GUID;

pub const CLSID_FILE_OPEN_DIALOG: GUID = parse("{DC1C5A9C-E88A-4DDE-A5A1-60F82A20AEF7}");
pub const CLSID_FILE_SAVE_DIALOG: GUID = parse("{C0B4E2F3-BA21-4773-8DBA-335EC946EB8B}");

pub const IID_IFILE_OPEN_DIALOG: GUID = parse("{D57C7288-D4AD-4768-BE02-9D969532D960}");
pub const IID_IFILE_SAVE_DIALOG: GUID = parse("{84BCCD23-5FDE-4CDB-AEA4-AF64B83D78AB}");
pub const IID_ISHELL_ITEM: GUID = parse("{43826D1E-E718-42EE-BC55-A1E261C37BFE}");

/// Class/interface pair for the dialog kind.
pub const fn dialog_ids(save: bool) -> (&'static GUID, &'static GUID) {
    if save {
        (&CLSID_FILE_SAVE_DIALOG, &IID_IFILE_SAVE_DIALOG)
    } else {
        (&CLSID_FILE_OPEN_DIALOG, &IID_IFILE_OPEN_DIALOG)
    }
}

/// Parses `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`, optionally wrapped in braces.
///
/// Panics on malformed input. In a `const` item that panic surfaces at compile time.
pub const fn parse(s: &str) -> GUID {
    let bytes = s.as_bytes();
    let (start, end) = if !bytes.is_empty() && bytes[0] == b'{' {
        if bytes[bytes.len() - 1] != b'}' {
            panic!("GUID: unbalanced braces");
        }
        (1, bytes.len() - 1)
    } else {
        (0, bytes.len())
    };

    if end - start != 36 {
        panic!("GUID: expected 36 characters between braces");
    }
    let mut i = start;
    while i < end {
        let rel = i - start;
        let is_dash = rel == 8 || rel == 13 || rel == 18 || rel == 23;
        if is_dash && bytes[i] != b'-' {
            panic!("GUID: misplaced hyphen");
        }
        i += 1;
    }

    let data1 = hex_field(bytes, start, 8) as u32;
    let data2 = hex_field(bytes, start + 9, 4) as u16;
    let data3 = hex_field(bytes, start + 14, 4) as u16;

    let mut data4 = [0u8; 8];
    data4[0] = hex_field(bytes, start + 19, 2) as u8;
    data4[1] = hex_field(bytes, start + 21, 2) as u8;
    let mut k = 0;
    while k < 6 {
        data4[2 + k] = hex_field(bytes, start + 24 + k * 2, 2) as u8;
        k += 1;
    }

    GUID { data1, data2, data3, data4 }
}

const fn hex_field(bytes: &[u8], at: usize, len: usize) -> u64 {
    let mut value = 0u64;
    let mut i = 0;
    while i < len {
        let nibble = match bytes[at + i] {
            c @ b'0'..=b'9' => c - b'0',
            c @ b'a'..=b'f' => c - b'a' + 10,
            c @ b'A'..=b'F' => c - b'A' + 10,
            _ => panic!("GUID: invalid hex digit"),
        };
        value = (value << 4) | nibble as u64;
        i += 1;
    }
    value
}

/// Log-friendly formatting for GUIDs.
pub trait GuidExt {
    /// `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}` upper-case with braces.
    fn to_braced_upper(&self) -> String;
}

impl GuidExt for GUID {
    fn to_braced_upper(&self) -> String {
        format!(
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7]
        )
    }
}

/// Compares two GUIDs field by field.
pub fn guid_eq(a: &GUID, b: &GUID) -> bool {
    a.data1 == b.data1 && a.data2 == b.data2 && a.data3 == b.data3 && a.data4 == b.data4
}
