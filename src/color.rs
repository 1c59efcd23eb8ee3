//! Colour palette and helpers.
//!
//! Palette entries are authored as sRGB hex strings and converted to linear
//! RGB once, at construction. All blending and saturation work happens in
//! linear space; the sRGB surface format handles the final encode.

use glam::Vec3;

/// Rec. 709 luma weights, matching the foliage shader.
pub const LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Deep green used for balls and gifts.
pub const EMERALD: &str = "#0a3d1c";
/// Ornament gold, also the star.
pub const GOLD: &str = "#ffd700";
/// Ornament red.
pub const LUXURY_RED: &str = "#d32f2f";
/// Ornament green, brighter than [`EMERALD`].
pub const LUXURY_GREEN: &str = "#115e2e";
/// Warm white for fairy lights.
pub const WARM_WHITE: &str = "#fff5e6";

/// Darkest needle green.
pub const FOLIAGE_BASE: &str = "#041a0a";
/// Middle needle green.
pub const FOLIAGE_MID: &str = "#0a3d1c";
/// Lightest needle green.
pub const FOLIAGE_TIP: &str = "#145a32";
/// Brownish tint mixed into needles deep inside the cone.
pub const DRYNESS_TINT: &str = "#3d2b1f";
/// Bright green mixed into needles on the outer shell.
pub const NEW_GROWTH_TINT: &str = "#58d68d";
/// Trunk bark.
pub const TRUNK: &str = "#1a0f00";
/// Pedestal under the trunk.
pub const PEDESTAL: &str = "#0a0500";

/// Ball and gift colours.
pub const ORNAMENT_PALETTE: [&str; 4] = [LUXURY_RED, GOLD, LUXURY_GREEN, EMERALD];
/// Fairy light colours.
pub const LIGHT_PALETTE: [&str; 4] = [WARM_WHITE, GOLD, LUXURY_RED, LUXURY_GREEN];

/// Convert one sRGB channel in [0, 1] to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Parse `#rrggbb` (leading `#` optional) into linear RGB.
///
/// Malformed input yields black rather than an error; palette strings are
/// compile-time constants.
pub fn hex(code: &str) -> Vec3 {
    let digits = code.trim_start_matches('#');
    let value = if digits.len() == 6 {
        u32::from_str_radix(digits, 16).unwrap_or(0)
    } else {
        0
    };
    let channel = |shift: u32| srgb_to_linear(((value >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Linear blend from `a` towards `b`.
#[inline]
pub fn blend(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t)
}

/// Push a colour away from (or towards) its grey value.
///
/// `amount = 1` leaves the colour unchanged, `0` returns pure luma and values
/// above one oversaturate.
#[inline]
pub fn saturate(rgb: Vec3, amount: f32) -> Vec3 {
    let grey = Vec3::splat(rgb.dot(LUMA));
    grey.lerp(rgb, amount)
}
