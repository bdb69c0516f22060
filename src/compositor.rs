//! Export: flatten the photo and its overlays into a PNG at native resolution.
//!
//! DESIGN
//! ======
//! Placements are stored relative to the fitted on-screen photo. Positions
//! scale directly to native pixels through the ratios, but sizes are fractions
//! of the shorter *display* edge, so they are multiplied by
//! `native_width / display_width` to land at the same apparent size.
//!
//! Overlays are loaded one at a time through [`AssetSource`] and drawn in
//! sequence order, so later placements cover earlier ones regardless of which
//! one is selected on screen. A missing or undecodable overlay is logged and
//! skipped; only a failure of the whole raster aborts the export.

#[cfg(test)]
#[path = "compositor_test.rs"]
mod compositor_test;

use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, ImageEncoder, RgbaImage};

use crate::doc::Placement;
use crate::geometry::DisplayGeometry;

/// Overlays larger than this on either edge are skipped instead of allocated.
pub const MAX_OVERLAY_EDGE_PX: f64 = 16_384.0;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("display geometry is not ready")]
    NoDisplayGeometry,
    #[error("source image is empty")]
    EmptySource,
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to deliver download: {0}")]
    Download(String),
}

/// Loads overlay images by URL.
#[async_trait(?Send)]
pub trait AssetSource {
    /// Fetch and decode the image at `url`.
    async fn load(&self, url: &str) -> Result<DynamicImage, AssetError>;
}

/// Owned snapshot of everything an export needs from the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub placements: Vec<Placement>,
    /// Display geometry the placements were edited against.
    pub display: DisplayGeometry,
    pub filename: String,
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub filename: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Placement indices whose overlay could not be drawn.
    pub skipped: Vec<usize>,
}

/// Where an overlay lands on the native raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Ratio between native resolution and the fitted on-screen width.
#[must_use]
pub fn scale_factor(native_width: u32, display: &DisplayGeometry) -> f64 {
    f64::from(native_width) / display.width
}

/// Overlay edge length on the native raster.
#[must_use]
pub fn draw_size(size_ratio: f64, display: &DisplayGeometry, scale: f64) -> f64 {
    size_ratio * display.min_dimension() * scale
}

/// Native-space box for one overlay, centered on its ratio position.
///
/// Width is the draw size; height follows the overlay's own aspect ratio.
#[must_use]
pub fn overlay_rect(
    placement: &Placement,
    native_width: u32,
    native_height: u32,
    display: &DisplayGeometry,
    overlay_aspect: f64,
) -> DrawRect {
    let center_x = placement.x_ratio * f64::from(native_width);
    let center_y = placement.y_ratio * f64::from(native_height);
    let width = draw_size(placement.size_ratio, display, scale_factor(native_width, display));
    let height = width / overlay_aspect;
    DrawRect { x: center_x - width / 2.0, y: center_y - height / 2.0, width, height }
}

// =============================================================================
// RENDER
// =============================================================================

/// Decode fetched overlay bytes.
///
/// # Errors
///
/// Returns `Decode` when the bytes are not a supported image.
pub fn decode_asset(url: &str, bytes: &[u8]) -> Result<DynamicImage, AssetError> {
    image::load_from_memory(bytes).map_err(|source| AssetError::Decode { url: url.to_string(), source })
}

/// Draw the photo and every overlay onto a native-size raster.
///
/// Returns the raster and the indices of overlays that were skipped.
///
/// # Errors
///
/// Returns `NoDisplayGeometry` when the request was made before the photo was
/// fitted, and `EmptySource` for a zero-sized photo.
pub async fn composite(
    source: &DynamicImage,
    request: &ExportRequest,
    assets: &dyn AssetSource,
) -> Result<(RgbaImage, Vec<usize>), ExportError> {
    if !request.display.is_ready() {
        return Err(ExportError::NoDisplayGeometry);
    }
    let mut canvas = source.to_rgba8();
    let (native_width, native_height) = canvas.dimensions();
    if native_width == 0 || native_height == 0 {
        return Err(ExportError::EmptySource);
    }

    let mut skipped = Vec::new();
    for (index, placement) in request.placements.iter().enumerate() {
        let overlay = match assets.load(&placement.monke_image_no_bg).await {
            Ok(overlay) => overlay,
            Err(err) => {
                log::warn!("skipping overlay {index}: {err}");
                skipped.push(index);
                continue;
            }
        };
        if overlay.height() == 0 || overlay.width() == 0 {
            log::warn!("skipping overlay {index}: {} is empty", placement.monke_image_no_bg);
            skipped.push(index);
            continue;
        }
        let aspect = f64::from(overlay.width()) / f64::from(overlay.height());
        let rect = overlay_rect(placement, native_width, native_height, &request.display, aspect);
        if !draw_overlay(&mut canvas, &overlay, rect) {
            log::warn!("skipping overlay {index}: draw size {}x{} out of range", rect.width, rect.height);
            skipped.push(index);
        }
    }
    Ok((canvas, skipped))
}

/// Scale an overlay into `rect` and alpha-blend it onto the raster.
///
/// Returns `false` when the rect rounds to nothing or is too large to allocate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_overlay(canvas: &mut RgbaImage, overlay: &DynamicImage, rect: DrawRect) -> bool {
    let width = rect.width.round();
    let height = rect.height.round();
    if !(width >= 1.0 && height >= 1.0) || width > MAX_OVERLAY_EDGE_PX || height > MAX_OVERLAY_EDGE_PX {
        return false;
    }
    let scaled = imageops::resize(&overlay.to_rgba8(), width as u32, height as u32, FilterType::Triangle);
    imageops::overlay(canvas, &scaled, rect.x.round() as i64, rect.y.round() as i64);
    true
}

/// Encode a raster as PNG.
///
/// # Errors
///
/// Returns `Encode` if the encoder rejects the buffer.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(raster.as_raw(), raster.width(), raster.height(), ColorType::Rgba8)?;
    Ok(bytes)
}

/// Composite and encode in one step.
///
/// # Errors
///
/// Propagates [`composite`] and [`encode_png`] failures. Per-overlay load
/// failures are not errors; they show up in [`ExportedImage::skipped`].
pub async fn export(
    source: &DynamicImage,
    request: &ExportRequest,
    assets: &dyn AssetSource,
) -> Result<ExportedImage, ExportError> {
    let (raster, skipped) = composite(source, request, assets).await?;
    let png = encode_png(&raster)?;
    log::debug!("exported {}x{} PNG ({} bytes)", raster.width(), raster.height(), png.len());
    Ok(ExportedImage { filename: request.filename.clone(), png, width: raster.width(), height: raster.height(), skipped })
}
