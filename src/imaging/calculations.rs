//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the largest size that fits inside `bounds` while preserving the
/// aspect ratio of `source`. Images already inside the box keep their size
/// (no upscaling).
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (width, height)
///
/// # Returns
/// * `(width, height)` - Output dimensions, each at least 1
///
/// # Examples
/// ```
/// # use album_maker::imaging::fit_within;
/// // Landscape 1000x500 into 240x240 → width-limited
/// assert_eq!(fit_within((1000, 500), (240, 240)), (240, 120));
///
/// // Already small enough → unchanged
/// assert_eq!(fit_within((200, 100), (240, 240)), (200, 100));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 {
        return (src_w.max(1), src_h.max(1));
    }
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the limiting edge
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w, h.clamp(1, max_h))
    } else {
        // Height is the limiting edge
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.clamp(1, max_w), max_h)
    }
}
