//! BCD playback times.

use crate::attributes::FrameRate;
use crate::model::Pts;

/// Frames per second counted by a playback time and its rate flag bits.
fn frame_basis(rate: FrameRate) -> (i64, u8) {
    match rate {
        FrameRate::Pal | FrameRate::PalField => (25, 0x40),
        _ => (30, 0xc0),
    }
}

/// Number of displayed frames in `ticks` at `rate`.
pub fn ticks_to_frames(ticks: Pts, rate: FrameRate) -> i64 {
    let (fps, _) = frame_basis(rate);
    ticks.max(0) * fps / i64::from(rate.denominator())
}

fn bcd(v: i64) -> u32 {
    let v = v.clamp(0, 99) as u32;
    ((v / 10) << 4) | (v % 10)
}

/// `hh:mm:ss:ff` as four BCD bytes, the frame byte carrying the rate flag.
pub fn encode_frames(frames: i64, rate: FrameRate) -> u32 {
    let (fps, flag) = frame_basis(rate);
    let frames = frames.max(0);
    let ff = frames % fps;
    let secs = frames / fps;
    (bcd(secs / 3600) << 24)
        | (bcd(secs / 60 % 60) << 16)
        | (bcd(secs % 60) << 8)
        | u32::from(flag)
        | bcd(ff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pal_time() {
        // 1h 2m 3s and 4 frames at 25 fps.
        let frames = ((3600 + 2 * 60 + 3) * 25) + 4;
        assert_eq!(encode_frames(frames, FrameRate::Pal), 0x01_02_03_44);
    }

    #[test]
    fn test_ntsc_time() {
        assert_eq!(encode_frames(29, FrameRate::Ntsc), 0x00_00_00_c0 | 0x29);
        assert_eq!(ticks_to_frames(90_090, FrameRate::Ntsc), 30);
        assert_eq!(ticks_to_frames(90_000, FrameRate::Pal), 25);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(ticks_to_frames(-5, FrameRate::Pal), 0);
        assert_eq!(encode_frames(-1, FrameRate::Pal), 0x40);
    }
}
