//! Thermal color ramp for component surfaces.
//!
//! A surface is colored by how far its temperature sits from the air
//! temperature. Colors are interpolated linearly in sRGB space:
//!
//! ```text
//!   d = T - Tref
//!   ..-10 | -10..-2      | -2..2          | 2..10      | 10..
//!   cold  | cold -> cool | cool -> neutral| warm -> hot| hot
//! ```
//!
//! The warm band starts at its own base color, so there is a visible step at
//! `d = 2` between "about air temperature" and "warmer than the air".

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

pub const COLD: Color = Color::srgb(0.13, 0.25, 0.78);
pub const COOL: Color = Color::srgb(0.55, 0.75, 0.95);
pub const NEUTRAL: Color = Color::srgb(0.92, 0.92, 0.86);
pub const WARM: Color = Color::srgb(1.0, 0.72, 0.30);
pub const HOT: Color = Color::srgb(0.85, 0.12, 0.08);

/// Returned whenever either temperature is missing or not a number.
pub const ABSENT_GRAY: Color = Color::srgb(0.5, 0.5, 0.5);

/// Band edges in kelvin relative to the reference temperature.
const COLD_EDGE: f32 = -10.0;
const COOL_EDGE: f32 = -2.0;
const WARM_EDGE: f32 = 2.0;
const HOT_EDGE: f32 = 10.0;

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Linearly interpolate between two sRGB colors.
pub fn color_lerp(a: Color, b: Color, t: f32) -> Color {
    let a = a.to_srgba();
    let b = b.to_srgba();
    let t = t.clamp(0.0, 1.0);
    Color::srgb(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}

/// Color for a surface at `temperature` relative to `reference`.
pub fn color_for(temperature: Option<f32>, reference: Option<f32>) -> Color {
    let (Some(t), Some(tref)) = (temperature, reference) else {
        return ABSENT_GRAY;
    };
    let d = t - tref;
    if d.is_nan() {
        return ABSENT_GRAY;
    }

    if d < COLD_EDGE {
        COLD
    } else if d < COOL_EDGE {
        color_lerp(COLD, COOL, (d - COLD_EDGE) / (COOL_EDGE - COLD_EDGE))
    } else if d < WARM_EDGE {
        color_lerp(COOL, NEUTRAL, (d - COOL_EDGE) / (WARM_EDGE - COOL_EDGE))
    } else if d < HOT_EDGE {
        color_lerp(WARM, HOT, (d - WARM_EDGE) / (HOT_EDGE - WARM_EDGE))
    } else {
        HOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        let a = a.to_srgba();
        let b = b.to_srgba();
        (a.red - b.red).abs() < 1e-4
            && (a.green - b.green).abs() < 1e-4
            && (a.blue - b.blue).abs() < 1e-4
    }

    #[test]
    fn test_solid_ends() {
        assert!(close(color_for(Some(250.0), Some(300.0)), COLD));
        assert!(close(color_for(Some(350.0), Some(300.0)), HOT));
        assert!(close(color_for(Some(310.0), Some(300.0)), HOT));
        assert!(close(color_for(Some(-1e30), Some(0.0)), COLD));
        assert!(close(color_for(Some(f32::INFINITY), Some(0.0)), HOT));
    }

    #[test]
    fn test_band_starts() {
        assert!(close(color_for(Some(290.0), Some(300.0)), COLD));
        assert!(close(color_for(Some(298.0), Some(300.0)), COOL));
        assert!(close(color_for(Some(302.0), Some(300.0)), WARM));
    }

    #[test]
    fn test_midpoints_interpolate() {
        let mid = color_for(Some(300.0), Some(300.0));
        assert!(close(mid, color_lerp(COOL, NEUTRAL, 0.5)));
        let warm_mid = color_for(Some(306.0), Some(300.0));
        assert!(close(warm_mid, color_lerp(WARM, HOT, 0.5)));
    }

    #[test]
    fn test_jump_at_warm_edge() {
        let below = color_for(Some(301.999), Some(300.0));
        let at = color_for(Some(302.0), Some(300.0));
        assert!(!close(below, at), "neutral end and warm base must differ");
    }

    #[test]
    fn test_absent_inputs_are_gray() {
        assert!(close(color_for(None, Some(300.0)), ABSENT_GRAY));
        assert!(close(color_for(Some(300.0), None), ABSENT_GRAY));
        assert!(close(color_for(None, None), ABSENT_GRAY));
        assert!(close(color_for(Some(f32::NAN), Some(300.0)), ABSENT_GRAY));
        assert!(close(
            color_for(Some(f32::INFINITY), Some(f32::INFINITY)),
            ABSENT_GRAY
        ));
    }

    #[test]
    fn test_total_over_samples() {
        let mut d = -50.0_f32;
        while d <= 50.0 {
            let c = color_for(Some(300.0 + d), Some(300.0)).to_srgba();
            assert!((0.0..=1.0).contains(&c.red), "d={d}");
            assert!((0.0..=1.0).contains(&c.green), "d={d}");
            assert!((0.0..=1.0).contains(&c.blue), "d={d}");
            d += 0.25;
        }
    }
}
