use image::{Rgba, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

/// How sprite alpha is applied to the square underneath.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    /// Any pixel with alpha > 0 replaces the background pixel.
    #[default]
    Overwrite,
    /// Alpha-weighted mix of sprite and background on every channel.
    Blend,
}

/// Pastes `sprite` onto `background` at the origin, clipped to the background.
/// Pixels with zero alpha never touch the background.
pub fn composite(background: &mut RgbaImage, sprite: &RgbaImage, mode: AlphaMode) {
    if sprite.dimensions() != background.dimensions() {
        debug!(
            "sprite {:?} pasted onto square {:?}",
            sprite.dimensions(),
            background.dimensions()
        );
    }

    let w = background.width().min(sprite.width());
    let h = background.height().min(sprite.height());
    for y in 0..h {
        for x in 0..w {
            let fg = *sprite.get_pixel(x, y);
            let a = fg.0[3];
            if a == 0 {
                continue;
            }
            let out = match mode {
                AlphaMode::Overwrite => fg,
                AlphaMode::Blend => blend(fg, *background.get_pixel(x, y)),
            };
            background.put_pixel(x, y, out);
        }
    }
}

fn blend(fg: Rgba<u8>, bg: Rgba<u8>) -> Rgba<u8> {
    let a = fg.0[3] as u32;
    let mix = |f: u8, b: u8| ((f as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
    Rgba([
        mix(fg.0[0], bg.0[0]),
        mix(fg.0[1], bg.0[1]),
        mix(fg.0[2], bg.0[2]),
        mix(fg.0[3], bg.0[3]),
    ])
}
