use crate::error::Error;
use crate::sku::{
    is_rack, Sku, BIN_FIRST, BIN_LAST, ITEM_FIRST, ITEM_LAST, SHELF_FIRST, SHELF_LAST,
    TRAY_FIRST, TRAY_LAST,
};
use typed_builder::TypedBuilder;

/// Last rack in active use when nothing else is configured.
pub const DEFAULT_LAST_RACK: char = 'B';

/// Rack that can never carry further, whatever the configured last rack is.
const EXHAUSTED_RACK: u8 = b'9';

/// Configures how far an [`Odometer`] may advance the rack field.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct OdometerSettings {
    /// Highest rack the odometer may carry into, in `0-9, A-Z, a-z` order.
    #[builder(default = DEFAULT_LAST_RACK)]
    pub last_rack: char,
}

impl Default for OdometerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Mixed-radix successor over the SKU code space.
///
/// The item field turns fastest; a wrap carries into bin, then tray, then
/// shelf, then rack. The odometer holds no state besides its settings, so one
/// instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Odometer {
    last_rack: u8,
}

impl Default for Odometer {
    fn default() -> Self {
        Self {
            last_rack: DEFAULT_LAST_RACK as u8,
        }
    }
}

impl Odometer {
    /// Creates an odometer, rejecting a last rack outside the rack alphabet.
    pub fn new(settings: OdometerSettings) -> Result<Self, Error> {
        let rack = settings.last_rack;
        match u8::try_from(rack) {
            Ok(byte) if is_rack(byte) => Ok(Self { last_rack: byte }),
            _ => Err(Error::InvalidLastRack { rack }),
        }
    }

    pub fn last_rack(&self) -> char {
        char::from(self.last_rack)
    }

    /// The highest code this odometer can produce.
    pub fn last(&self) -> Sku {
        Sku::from_parts(self.last_rack, SHELF_LAST, TRAY_LAST, BIN_LAST, ITEM_LAST)
            .unwrap_or(Sku::STARTING)
    }

    /// Returns the location immediately after `current`.
    ///
    /// Fails with [`Error::StorageFull`] when the carry would have to move the
    /// rack past the last rack, past `'9'`, or past `'z'`. The result is never
    /// wrapped around to the start.
    ///
    /// # Examples
    ///
    /// ```
    /// use lodestone_sku::{Odometer, Sku};
    ///
    /// let odometer = Odometer::default();
    /// let sku: Sku = "Aa1a05".parse().unwrap();
    /// assert_eq!(odometer.next(&sku).unwrap().to_string(), "Aa1b01");
    /// ```
    pub fn next(&self, current: &Sku) -> Result<Sku, Error> {
        let (mut rack, mut shelf, mut tray, mut bin, mut item) = current.parts();

        let carry_into_rack = turn(&mut item, ITEM_FIRST, ITEM_LAST)
            && turn(&mut bin, BIN_FIRST, BIN_LAST)
            && turn(&mut tray, TRAY_FIRST, TRAY_LAST)
            && turn(&mut shelf, SHELF_FIRST, SHELF_LAST);

        if carry_into_rack {
            rack = self
                .next_rack(rack)
                .ok_or(Error::StorageFull { last: *current })?;
        }

        Sku::from_parts(rack, shelf, tray, bin, item).ok_or_else(|| Error::GeneratedInvalid {
            code: format!(
                "{}{}{}{}{:02}",
                char::from(rack),
                char::from(shelf),
                tray,
                char::from(bin),
                item
            ),
        })
    }

    fn next_rack(&self, rack: u8) -> Option<u8> {
        if rack == EXHAUSTED_RACK || rack >= self.last_rack {
            return None;
        }
        match rack {
            b'Z' => Some(b'a'),
            b'z' => None,
            other => Some(other + 1),
        }
    }
}

/// Advances one wheel; returns `true` when it wrapped and must carry.
fn turn(wheel: &mut u8, first: u8, last: u8) -> bool {
    if *wheel < last {
        *wheel += 1;
        false
    } else {
        *wheel = first;
        true
    }
}
