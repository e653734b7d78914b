use image::imageops::FilterType;
use image::RgbaImage;

/// Number of levels in a full chain for a `width` x `height` image, down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Builds every mip level of `base`, largest first; level 0 is `base` itself.
///
/// Each level halves both dimensions (rounding down, never below 1).
pub fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(base.width(), base.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base);

    while levels.len() < count {
        let prev = &levels[levels.len() - 1];
        let w = (prev.width() / 2).max(1);
        let h = (prev.height() / 2).max(1);
        let next = image::imageops::resize(prev, w, h, FilterType::Triangle);
        levels.push(next);
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_count_covers_down_to_one_pixel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(640, 480), 10);
        assert_eq!(mip_level_count(1, 300), 9);
    }

    #[test]
    fn chain_ends_at_one_by_one() {
        let base = RgbaImage::from_pixel(20, 6, image::Rgba([255, 0, 0, 255]));
        let chain = mip_chain(base);

        let sizes: Vec<_> = chain.iter().map(|l| l.dimensions()).collect();
        assert_eq!(sizes, [(20, 6), (10, 3), (5, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn uniform_color_survives_downsampling() {
        let px = image::Rgba([10, 200, 30, 255]);
        let chain = mip_chain(RgbaImage::from_pixel(8, 8, px));
        let last = chain.last().unwrap();
        assert_eq!(last.dimensions(), (1, 1));
        assert_eq!(*last.get_pixel(0, 0), px);
    }
}
