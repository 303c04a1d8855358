//! `FILEOPENDIALOGOPTIONS` (`FOS_*`) bitset.
//!
//! See <https://learn.microsoft.com/en-us/windows/win32/api/shobjidl_core/ne-shobjidl_core-_fileopendialogoptions>

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, BitAndAssign};

#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fos(pub u32);

impl Fos {
    pub const NONE: Fos = Fos(0);
    pub const OVERWRITEPROMPT: Fos = Fos(0x2);
    pub const STRICTFILETYPES: Fos = Fos(0x4);
    pub const NOCHANGEDIR: Fos = Fos(0x8);
    pub const PICKFOLDERS: Fos = Fos(0x20);
    pub const FORCEFILESYSTEM: Fos = Fos(0x40);
    pub const ALLNONSTORAGEITEMS: Fos = Fos(0x80);
    pub const NOVALIDATE: Fos = Fos(0x100);
    pub const ALLOWMULTISELECT: Fos = Fos(0x200);
    pub const PATHMUSTEXIST: Fos = Fos(0x800);
    pub const FILEMUSTEXIST: Fos = Fos(0x1000);
    pub const CREATEPROMPT: Fos = Fos(0x2000);
    pub const SHAREAWARE: Fos = Fos(0x4000);
    pub const NOREADONLYRETURN: Fos = Fos(0x8000);
    pub const NOTESTFILECREATE: Fos = Fos(0x10000);
    pub const HIDEMRUPLACES: Fos = Fos(0x20000);
    pub const HIDEPINNEDPLACES: Fos = Fos(0x40000);
    pub const NODEREFERENCELINKS: Fos = Fos(0x100000);
    pub const OKBUTTONNEEDSINTERACTION: Fos = Fos(0x200000);
    pub const DONTADDTORECENT: Fos = Fos(0x2000000);
    pub const FORCESHOWHIDDEN: Fos = Fos(0x10000000);
    pub const DEFAULTNOMINIMODE: Fos = Fos(0x20000000);
    pub const FORCEPREVIEWPANEON: Fos = Fos(0x40000000);
    pub const SUPPORTSTREAMABLEITEMS: Fos = Fos(0x80000000);

    /// Flags every session sets on top of the dialog's own defaults.
    pub const BASELINE: Fos = Fos(Self::FORCEFILESYSTEM.0 | Self::PATHMUSTEXIST.0 | Self::FILEMUSTEXIST.0);

    const NAMES: [(Fos, &'static str); 23] = [
        (Self::OVERWRITEPROMPT, "OVERWRITEPROMPT"),
        (Self::STRICTFILETYPES, "STRICTFILETYPES"),
        (Self::NOCHANGEDIR, "NOCHANGEDIR"),
        (Self::PICKFOLDERS, "PICKFOLDERS"),
        (Self::FORCEFILESYSTEM, "FORCEFILESYSTEM"),
        (Self::ALLNONSTORAGEITEMS, "ALLNONSTORAGEITEMS"),
        (Self::NOVALIDATE, "NOVALIDATE"),
        (Self::ALLOWMULTISELECT, "ALLOWMULTISELECT"),
        (Self::PATHMUSTEXIST, "PATHMUSTEXIST"),
        (Self::FILEMUSTEXIST, "FILEMUSTEXIST"),
        (Self::CREATEPROMPT, "CREATEPROMPT"),
        (Self::SHAREAWARE, "SHAREAWARE"),
        (Self::NOREADONLYRETURN, "NOREADONLYRETURN"),
        (Self::NOTESTFILECREATE, "NOTESTFILECREATE"),
        (Self::HIDEMRUPLACES, "HIDEMRUPLACES"),
        (Self::HIDEPINNEDPLACES, "HIDEPINNEDPLACES"),
        (Self::NODEREFERENCELINKS, "NODEREFERENCELINKS"),
        (Self::OKBUTTONNEEDSINTERACTION, "OKBUTTONNEEDSINTERACTION"),
        (Self::DONTADDTORECENT, "DONTADDTORECENT"),
        (Self::FORCESHOWHIDDEN, "FORCESHOWHIDDEN"),
        (Self::DEFAULTNOMINIMODE, "DEFAULTNOMINIMODE"),
        (Self::FORCEPREVIEWPANEON, "FORCEPREVIEWPANEON"),
        (Self::SUPPORTSTREAMABLEITEMS, "SUPPORTSTREAMABLEITEMS"),
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Fos) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Composes the options written back to the dialog.
    ///
    /// `current` is what the dialog reported through `GetOptions`; its bits are kept.
    pub const fn compose(current: Fos, multiselect: bool, extra: Fos) -> Fos {
        let mut bits = current.0 | Self::BASELINE.0 | extra.0;
        if multiselect {
            bits |= Self::ALLOWMULTISELECT.0;
        }
        Fos(bits)
    }
}

impl BitOr for Fos {
    type Output = Fos;
    fn bitor(self, rhs: Fos) -> Fos {
        Fos(self.0 | rhs.0)
    }
}

impl BitOrAssign for Fos {
    fn bitor_assign(&mut self, rhs: Fos) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Fos {
    type Output = Fos;
    fn bitand(self, rhs: Fos) -> Fos {
        Fos(self.0 & rhs.0)
    }
}

impl BitAndAssign for Fos {
    fn bitand_assign(&mut self, rhs: Fos) {
        self.0 &= rhs.0;
    }
}

impl Not for Fos {
    type Output = Fos;
    fn not(self) -> Fos {
        Fos(!self.0)
    }
}

impl From<u32> for Fos {
    fn from(bits: u32) -> Self {
        Fos(bits)
    }
}

impl fmt::Debug for Fos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "Fos(NONE)");
        }
        write!(f, "Fos(")?;
        let mut rest = self.0;
        let mut first = true;
        for (flag, name) in Self::NAMES.iter() {
            if self.contains(*flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                rest &= !flag.0;
                first = false;
            }
        }
        if rest != 0 {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "{:#x}", rest)?;
        }
        write!(f, ")")
    }
}
