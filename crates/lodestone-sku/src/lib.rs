//! Storage location codes (SKUs) for the Lodestone inventory.
//!
//! A SKU is a 6-character address `[rack][shelf][tray][bin][item]` read as a
//! mixed-radix counter. This crate is pure: it validates codes, orders them,
//! and computes successors. Persisting which codes are taken is the caller's
//! job, and two callers asking for the successor of the same code get the same
//! answer.
//!
//! ```
//! let next = lodestone_sku::next("At4o05").unwrap();
//! assert_eq!(next.to_string(), "Ba1a01");
//! assert!(lodestone_sku::next("Bt4o05").is_err());
//! ```

pub mod error;
mod odometer;
mod sku;

use std::cmp::Ordering;

pub use error::Error;
pub use odometer::{Odometer, OdometerSettings, DEFAULT_LAST_RACK};
pub use sku::Sku;

pub type Result<T> = std::result::Result<T, Error>;

/// Returns `true` if `code` is a well-formed SKU.
pub fn validate(code: &str) -> bool {
    code.parse::<Sku>().is_ok()
}

/// Computes the successor of `code` with the default [`Odometer`].
pub fn next(code: &str) -> Result<Sku> {
    let current: Sku = code.parse()?;
    Odometer::default().next(&current)
}

/// Compares two codes by location magnitude.
pub fn compare(a: &str, b: &str) -> Result<Ordering> {
    let a: Sku = a.parse()?;
    let b: Sku = b.parse()?;
    Ok(a.cmp(&b))
}

/// Returns the highest valid code, ignoring anything that does not parse.
pub fn find_highest<I>(codes: I) -> Option<Sku>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|code| code.as_ref().parse::<Sku>().ok())
        .max()
}

/// The code to hand out when none has been assigned yet.
pub const fn starting() -> Sku {
    Sku::STARTING
}
