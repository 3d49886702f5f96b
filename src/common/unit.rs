//! Unit conversion utilities.
//!
//! All deck geometry is expressed in EMUs (English Metric Units,
//! 914400 EMU = 1 inch), the native unit of OOXML drawing coordinates.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_PT: i64 = 12_700;

/// Convert inches to EMUs.
#[inline]
pub fn inches(value: f64) -> i64 {
    (value * EMUS_PER_INCH as f64) as i64
}

/// Convert points to EMUs.
#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64) as i64
}

/// Convert EMUs to points.
#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

/// Font size in points to the hundredths-of-a-point value used by `sz` attributes.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0) as u32
}
