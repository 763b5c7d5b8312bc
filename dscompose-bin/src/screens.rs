//! Screen images fed to the compositor.

use std::path::Path;

use dscompose::{H_RES, V_RES, Screen};

/// Load a raw dump of one screen: 256x192 little-endian XRGB8888 pixels.
pub fn load_screen(path: &Path) -> Vec<u32> {
    let bytes = std::fs::read(path).unwrap_or_else(|e| panic!("couldn't read {}: {}", path.display(), e));
    if bytes.len() != H_RES * V_RES * 4 {
        panic!("{} is {} bytes, expected {}", path.display(), bytes.len(), H_RES * V_RES * 4);
    }
    bytes.chunks_exact(4)
        .map(|p| u32::from_le_bytes([p[0], p[1], p[2], p[3]]))
        .collect()
}

/// Something to look at when no dumps are given.
///
/// The top screen is a colour gradient, the bottom a checkerboard.
pub fn test_pattern(screen: Screen) -> Vec<u32> {
    (0..V_RES).flat_map(|y| (0..H_RES).map(move |x| {
        match screen {
            Screen::Top => {
                let r = x as u32;
                let g = ((y * 256) / V_RES) as u32;
                (r << 16) | (g << 8) | 0x80
            },
            Screen::Bottom => if ((x / 16) + (y / 16)) % 2 == 0 {
                0x00C0_C0C0
            } else {
                0x0040_4040
            },
        }
    })).collect()
}
