//! Color math for light requests.
//!
//! Request colors use `0xAARRGGBB`. Only the low 24 bits select the LED color;
//! the alpha byte is a brightness scale that the notification zone applies
//! before storing its request.

use rgb::RGB8;

/// Reference full-scale brightness of a request color channel.
pub const MAX_CHANNEL: u32 = 255;

const RGB_MASK: u32 = 0x00FF_FFFF;

/// Split the RGB part of `color` into channel bytes. Alpha is ignored.
pub fn rgb_of(color: u32) -> RGB8 {
    RGB8 {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack channel bytes into `0x00RRGGBB`.
pub fn pack_rgb(rgb: RGB8) -> u32 {
    (u32::from(rgb.r) << 16) | (u32::from(rgb.g) << 8) | u32::from(rgb.b)
}

pub fn alpha_of(color: u32) -> u8 {
    (color >> 24) as u8
}

/// A color lights the LED iff any RGB bit is set.
pub fn is_lit(color: u32) -> bool {
    color & RGB_MASK != 0
}

/// Perceptual luma of the RGB part, `(77 R + 150 G + 29 B) / 256`, in `0..=255`.
pub fn luma(color: u32) -> u32 {
    let RGB8 { r, g, b } = rgb_of(color);
    (77 * u32::from(r) + 150 * u32::from(g) + 29 * u32::from(b)) >> 8
}

/// Linearly rescale a `0..=255` brightness onto a panel whose maximum is `panel_max`.
pub fn scale_to_panel(brightness: u32, panel_max: u32) -> u32 {
    if panel_max == MAX_CHANNEL {
        brightness
    } else {
        // Computed in u64: with brightness clamped to 255 the result fits in `0..=panel_max`.
        let scaled = u64::from(brightness.min(MAX_CHANNEL)) * u64::from(panel_max);
        (scaled / u64::from(MAX_CHANNEL)) as u32
    }
}

/// Apply the alpha byte of `color` as a brightness scale to its RGB channels.
///
/// Alpha 0 and 255 leave the color untouched. Anything in between scales each
/// channel by `alpha / 255` (truncating) and returns a color with alpha cleared.
pub fn apply_alpha_brightness(color: u32) -> u32 {
    let alpha = u32::from(alpha_of(color));
    if alpha == 0 || alpha == MAX_CHANNEL {
        return color;
    }
    let scale = |c: u8| (u32::from(c) * alpha / MAX_CHANNEL) as u8;
    let rgb = rgb_of(color);
    pack_rgb(RGB8 {
        r: scale(rgb.r),
        g: scale(rgb.g),
        b: scale(rgb.b),
    })
}

/// Parse a color string into `0xAARRGGBB`.
///
/// Accepts:
/// - `#AARRGGBB` / `AARRGGBB`
/// - `#RRGGBB` / `RRGGBB` (alpha set to `FF`)
/// - Named: `red`, `green`, `blue`, `white`, `orange`, `yellow`, `purple`, `cyan`, `off`/`black`
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(0xFFFF_FFFF),
        "orange" => return Ok(0xFFFF_8000),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        "off" | "black" => return Ok(0x0000_0000),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 && hex.len() != 8 {
        return Err(crate::LightdError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::LightdError::Color(format!("Invalid hex color: {s}")))?;
    if hex.len() == 6 {
        Ok(0xFF00_0000 | val)
    } else {
        Ok(val)
    }
}

/// Format a request color as `#AARRGGBB`.
pub fn format_color(color: u32) -> String {
    format!("#{color:08X}")
}
