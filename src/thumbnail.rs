use eframe::egui::ColorImage;

/// Downloads and decodes a preview image.
pub fn fetch_thumbnail(image_url: &str) -> Option<ColorImage> {
    // Blocking GET; callers run this on the blocking pool
    let resp = match reqwest::blocking::get(image_url).and_then(|r| r.error_for_status()) {
        Ok(resp) => resp.bytes().ok()?,
        Err(e) => {
            tracing::warn!(%image_url, error = %e, "thumbnail fetch failed");
            return None;
        }
    };
    // Decode whatever format the host served and convert to RGBA8
    let img = image::load_from_memory(&resp).ok()?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, &img))
}
