//! Core type definitions shared by the authoring pipeline.
//!
//! This module defines the small value types every layer agrees on: the
//! two-letter menu language code, the remote-control entry types a program
//! chain can answer, and the role a group of program chains plays on disc.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Two-letter, lower-cased menu language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LangCode([u8; 2]);

impl LangCode {
    /// Parse a language code, folding it to lower case.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(Error::InvalidLanguage(s.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_lowercase(),
            bytes[1].to_ascii_lowercase(),
        ]))
    }

    /// Raw bytes as stored on disc.
    pub fn bytes(&self) -> [u8; 2] {
        self.0
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl TryFrom<String> for LangCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LangCode> for String {
    fn from(code: LangCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote-control "go to" target a program chain can satisfy.
///
/// The discriminant is the entry id used on disc; the bit in an
/// [`EntryTypes`] mask is `1 << id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum EntryType {
    /// Title menu (Video Manager only).
    Title = 2,
    /// Root menu of a titleset.
    Root = 3,
    /// Subtitle selection menu.
    Subtitle = 4,
    /// Audio selection menu.
    Audio = 5,
    /// Angle selection menu.
    Angle = 6,
    /// Chapter (part-of-title) menu.
    Ptt = 7,
}

impl EntryType {
    pub const ALL: [EntryType; 6] = [
        Self::Title,
        Self::Root,
        Self::Subtitle,
        Self::Audio,
        Self::Angle,
        Self::Ptt,
    ];

    /// Entry id as written into a program chain search pointer.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn bit(self) -> u8 {
        1 << self.id()
    }

    /// Flag in the menu-existence byte of a language unit.
    pub fn existence_flag(self) -> u8 {
        match self {
            Self::Title | Self::Root => 0x80,
            Self::Subtitle => 0x40,
            Self::Audio => 0x20,
            Self::Angle => 0x10,
            Self::Ptt => 0x08,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Root => write!(f, "root"),
            Self::Subtitle => write!(f, "subtitle"),
            Self::Audio => write!(f, "audio"),
            Self::Angle => write!(f, "angle"),
            Self::Ptt => write!(f, "ptt"),
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_input(format!("unknown entry type '{s}'")))
    }
}

/// Bit mask of [`EntryType`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct EntryTypes(u8);

impl EntryTypes {
    pub const NONE: Self = Self(0);

    /// Bits 0 and 1 name no entry type.
    const VALID_BITS: u8 = 0xfc;

    /// Mask from raw bits, dropping bits that name no entry type.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::VALID_BITS)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, entry: EntryType) -> bool {
        self.0 & entry.bit() != 0
    }

    pub fn insert(&mut self, entry: EntryType) {
        self.0 |= entry.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of distinct entry types in the mask.
    pub fn len(self) -> usize {
        self.iter().count()
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Entry types in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = EntryType> {
        EntryType::ALL.into_iter().filter(move |e| self.contains(*e))
    }

    /// Combined menu-existence byte for a language unit.
    pub fn existence_flags(self) -> u8 {
        self.iter().fold(0, |acc, e| acc | e.existence_flag())
    }
}

impl From<EntryType> for EntryTypes {
    fn from(entry: EntryType) -> Self {
        Self(entry.bit())
    }
}

impl FromIterator<EntryType> for EntryTypes {
    fn from_iter<I: IntoIterator<Item = EntryType>>(iter: I) -> Self {
        let mut mask = Self::NONE;
        for e in iter {
            mask.insert(e);
        }
        mask
    }
}

impl std::ops::BitOr for EntryTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EntryTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Role of a group of program chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    /// Titles of a titleset.
    Titles,
    /// Menus of a titleset.
    TitlesetMenu,
    /// Menus of the Video Manager.
    VideoManagerMenu,
}

impl GroupRole {
    /// Entry types a program chain in this role may claim.
    pub fn allowed_entries(self) -> EntryTypes {
        match self {
            Self::TitlesetMenu => EntryTypes::from_bits(0xf8),
            Self::VideoManagerMenu => EntryType::Title.into(),
            Self::Titles => EntryTypes::NONE,
        }
    }

    pub fn is_menu(self) -> bool {
        !matches!(self, Self::Titles)
    }
}

impl From<u8> for EntryTypes {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<EntryTypes> for u8 {
    fn from(mask: EntryTypes) -> Self {
        mask.bits()
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Titles => write!(f, "VTS"),
            Self::TitlesetMenu => write!(f, "VTSM"),
            Self::VideoManagerMenu => write!(f, "VMGM"),
        }
    }
}
