use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub(crate) const SKU_LEN: usize = 6;

pub(crate) const SHELF_FIRST: u8 = b'a';
pub(crate) const SHELF_LAST: u8 = b't';
pub(crate) const TRAY_FIRST: u8 = 1;
pub(crate) const TRAY_LAST: u8 = 4;
pub(crate) const BIN_FIRST: u8 = b'a';
pub(crate) const BIN_LAST: u8 = b'o';
pub(crate) const ITEM_FIRST: u8 = 1;
pub(crate) const ITEM_LAST: u8 = 5;

/// A validated 6-character storage location code.
///
/// The code reads `[rack][shelf][tray][bin][item]`, most significant first:
///
/// | field | alphabet                 |
/// |-------|--------------------------|
/// | rack  | `0-9`, `A-Z`, `a-z`      |
/// | shelf | `a-t`                    |
/// | tray  | `1-4`                    |
/// | bin   | `a-o`                    |
/// | item  | `01-05`                  |
///
/// `Aa1a01` is rack `A`, shelf `a`, tray 1, bin `a`, item 1.
///
/// Ordering compares the fields in declaration order: rack and shelf and bin by
/// character code, tray and item by value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sku {
    rack: u8,
    shelf: u8,
    tray: u8,
    bin: u8,
    item: u8,
}

pub(crate) fn is_rack(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}

impl Sku {
    /// The first location handed out when nothing has been assigned yet.
    pub const STARTING: Sku = Sku {
        rack: b'A',
        shelf: SHELF_FIRST,
        tray: TRAY_FIRST,
        bin: BIN_FIRST,
        item: ITEM_FIRST,
    };

    /// Builds a SKU from its fields, rejecting any field outside its alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use lodestone_sku::Sku;
    ///
    /// let sku = Sku::new('B', 'c', 2, 'd', 4).unwrap();
    /// assert_eq!(sku.to_string(), "Bc2d04");
    /// ```
    pub fn new(rack: char, shelf: char, tray: u8, bin: char, item: u8) -> Result<Self, Error> {
        let invalid = || {
            Error::invalid_format(format!("{rack}{shelf}{tray}{bin}{item:02}"))
        };

        let byte = |c: char| u8::try_from(c).map_err(|_| invalid());
        let sku = Sku {
            rack: byte(rack)?,
            shelf: byte(shelf)?,
            tray,
            bin: byte(bin)?,
            item,
        };

        if sku.is_well_formed() {
            Ok(sku)
        } else {
            Err(invalid())
        }
    }

    /// Rebuilds a SKU from raw field values, re-checking every field.
    pub(crate) fn from_parts(rack: u8, shelf: u8, tray: u8, bin: u8, item: u8) -> Option<Self> {
        let sku = Sku {
            rack,
            shelf,
            tray,
            bin,
            item,
        };
        sku.is_well_formed().then_some(sku)
    }

    fn is_well_formed(&self) -> bool {
        is_rack(self.rack)
            && (SHELF_FIRST..=SHELF_LAST).contains(&self.shelf)
            && (TRAY_FIRST..=TRAY_LAST).contains(&self.tray)
            && (BIN_FIRST..=BIN_LAST).contains(&self.bin)
            && (ITEM_FIRST..=ITEM_LAST).contains(&self.item)
    }

    pub fn rack(&self) -> char {
        char::from(self.rack)
    }

    pub fn shelf(&self) -> char {
        char::from(self.shelf)
    }

    pub fn tray(&self) -> u8 {
        self.tray
    }

    pub fn bin(&self) -> char {
        char::from(self.bin)
    }

    pub fn item(&self) -> u8 {
        self.item
    }

    pub(crate) fn parts(&self) -> (u8, u8, u8, u8, u8) {
        (self.rack, self.shelf, self.tray, self.bin, self.item)
    }
}

impl FromStr for Sku {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::invalid_format(code);

        let bytes: [u8; SKU_LEN] = code.as_bytes().try_into().map_err(|_| invalid())?;
        let [rack, shelf, tray, bin, tens, ones] = bytes;

        // The item must be spelled with exactly two digits: "1" or "001" never reach here,
        // and "00" or "06" fail the range check below.
        if !tray.is_ascii_digit() || !tens.is_ascii_digit() || !ones.is_ascii_digit() {
            return Err(invalid());
        }
        let item = (tens - b'0') * 10 + (ones - b'0');

        Sku::from_parts(rack, shelf, tray - b'0', bin, item).ok_or_else(invalid)
    }
}

impl TryFrom<&str> for Sku {
    type Error = Error;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{:02}",
            self.rack(),
            self.shelf(),
            self.tray,
            self.bin(),
            self.item
        )
    }
}

impl fmt::Debug for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sku").field(&self.to_string()).finish()
    }
}

impl Serialize for Sku {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sku {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
