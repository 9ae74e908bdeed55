//! Terminal implementations of the export sinks.
//!
//! The clipboard goes through the OSC 52 escape sequence, which most modern
//! terminals (and tmux with `set-clipboard on`) forward to the system
//! clipboard. Screenshots are produced without a display: the card grid is
//! drawn into an off-screen ratatui [`Buffer`] with the live widget code, then
//! every cell is rasterized with an 8×8 bitmap font.

use crate::app_core::export::{ClipboardSink, ExportError, RegionCapture, ResultsRegion};
use crate::app_core::workflow::ApiError;
use crate::model::VehicleRecord;
use crate::theme::ThemeConfig;
use crate::ui;
use base64::Engine;
use font8x8::{BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, LATIN_FONTS, UnicodeFonts};
use foldhash::HashMap;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier};
use std::io::{Cursor, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pixel size of one terminal cell in the screenshot.
pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;
pub const DEFAULT_SCALE: f32 = 1.5;

/// Flag size in the thumbnail slot, in cells.
const FLAG_CELLS: (u32, u32) = (3, 1);

/// Writes clipboard text as an OSC 52 sequence.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        let payload = base64::engine::general_purpose::STANDARD.encode(text);
        write!(self.out, "\x1b]52;c;{payload}\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Fetches site-relative asset paths such as `images/flags/country_usa.avif`.
pub trait AssetSource {
    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError>;
}

/// Cache of decoded card images. Failures are cached too, so an asset that
/// cannot be fetched or decoded is tried once per session.
#[derive(Default)]
pub struct AssetLoader {
    images: HashMap<String, Option<DynamicImage>>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the decoded image for `path`, fetching it on first use.
    ///
    /// Paths this build cannot decode are never fetched.
    pub fn load(&mut self, source: &dyn AssetSource, path: &str) -> Option<&DynamicImage> {
        if !self.images.contains_key(path) {
            let image = if is_decodable(path) {
                fetch_image(source, path)
            } else {
                debug!(path, "skipping card image without a decoder");
                None
            };
            self.images.insert(path.to_string(), image);
        }
        self.images.get(path).and_then(Option::as_ref)
    }

    /// Resolves the flag and thumbnail of every record. Returns how many
    /// images are available.
    pub fn load_all(&mut self, source: &dyn AssetSource, records: &[VehicleRecord]) -> usize {
        let mut loaded = 0;
        for record in records {
            for path in [record.flag_path(), record.thumbnail_path()] {
                if self.load(source, &path).is_some() {
                    loaded += 1;
                }
            }
        }
        loaded
    }

    fn get(&self, path: &str) -> Option<&DynamicImage> {
        self.images.get(path).and_then(Option::as_ref)
    }
}

/// AVIF decoding needs the `avif` feature (libdav1d). `image` reports AVIF as
/// readable whenever its encoder is compiled in, so it is checked separately.
pub fn is_decodable(path: &str) -> bool {
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Avif) => cfg!(feature = "avif"),
        Ok(format) => format.reading_enabled(),
        Err(_) => false,
    }
}

fn fetch_image(source: &dyn AssetSource, path: &str) -> Option<DynamicImage> {
    let bytes = match source.fetch_bytes(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path, error = %err, "failed to fetch card image");
            return None;
        }
    };
    match image::load_from_memory(&bytes) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(path, error = %err, "failed to decode card image");
            None
        }
    }
}

/// [`RegionCapture`] producing a PNG of the card grid.
pub struct PngCapture<S: AssetSource> {
    source: Arc<S>,
    assets: AssetLoader,
    theme: ThemeConfig,
    scale: f32,
}

impl<S: AssetSource> PngCapture<S> {
    pub fn new(source: Arc<S>, theme: ThemeConfig, scale: f32) -> Self {
        Self {
            source,
            assets: AssetLoader::new(),
            theme,
            scale,
        }
    }

    /// Draws the flag and vehicle image over each card's thumbnail slot, the
    /// vehicle on top. Missing images leave the text badge visible.
    fn composite_thumbnails(&self, image: &mut RgbaImage, records: &[VehicleRecord], area: Rect) {
        for (record, card) in records.iter().zip(ui::card_rects(area, records.len())) {
            let slot = ui::card_layout(card).thumb;
            let (x0, y0) = (slot.x as u32 * CELL_WIDTH, slot.y as u32 * CELL_HEIGHT);
            let (width, height) = (slot.width as u32 * CELL_WIDTH, slot.height as u32 * CELL_HEIGHT);
            if width == 0 || height == 0 {
                continue;
            }
            let vehicle = self.assets.get(&record.thumbnail_path());

            if vehicle.is_some() {
                let fill = to_rgba(self.theme.cards.colors(record.card_style()).fill, BLACK);
                for y in y0..y0 + height {
                    for x in x0..x0 + width {
                        image.put_pixel(x, y, fill);
                    }
                }
            }

            if let Some(flag) = self.assets.get(&record.flag_path()) {
                let flag = flag
                    .resize_to_fill(
                        (FLAG_CELLS.0 * CELL_WIDTH).min(width),
                        (FLAG_CELLS.1 * CELL_HEIGHT).min(height),
                        FilterType::Triangle,
                    )
                    .to_rgba8();
                imageops::overlay(image, &flag, x0 as i64, y0 as i64);
            }

            let Some(vehicle) = vehicle else {
                continue;
            };
            let thumb = vehicle.resize(width, height, FilterType::Triangle).to_rgba8();
            let offset_x = x0 + (width - thumb.width()) / 2;
            let offset_y = y0 + (height - thumb.height()) / 2;
            imageops::overlay(image, &thumb, offset_x as i64, offset_y as i64);
        }
    }
}

impl<S: AssetSource> RegionCapture for PngCapture<S> {
    fn capture_region(&mut self, region: &ResultsRegion<'_>) -> Result<Vec<u8>, ExportError> {
        let height = ui::grid_height(region.width, region.records.len());
        if region.width == 0 || height == 0 {
            return Err(ExportError::Encode("results region is empty".to_string()));
        }

        let loaded = self.assets.load_all(self.source.as_ref(), region.records);
        debug!(loaded, "card images resolved");

        let area = Rect::new(0, 0, region.width, height);
        let mut buf = Buffer::empty(area);
        ui::render_grid(&mut buf, area, region.records, &self.theme);

        let mut image = rasterize(&buf, to_rgba(self.theme.background, BLACK));
        self.composite_thumbnails(&mut image, region.records, area);
        let image = scale_image(image, self.scale);

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        info!(
            width = region.width,
            cards = region.records.len(),
            "screenshot rendered"
        );
        Ok(bytes)
    }
}

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Draws every cell of `buf` into an RGBA image, [`CELL_WIDTH`]×[`CELL_HEIGHT`]
/// pixels per cell. `Color::Reset` backgrounds use `background`.
pub fn rasterize(buf: &Buffer, background: Rgba<u8>) -> RgbaImage {
    let area = buf.area;
    let mut image = RgbaImage::from_pixel(
        area.width as u32 * CELL_WIDTH,
        area.height as u32 * CELL_HEIGHT,
        background,
    );

    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let Some(cell) = buf.cell((x, y)) else {
                continue;
            };
            let px = (x - area.x) as u32 * CELL_WIDTH;
            let py = (y - area.y) as u32 * CELL_HEIGHT;

            let bg = to_rgba(cell.bg, background);
            if bg != background {
                for dy in 0..CELL_HEIGHT {
                    for dx in 0..CELL_WIDTH {
                        image.put_pixel(px + dx, py + dy, bg);
                    }
                }
            }

            let Some(glyph) = cell.symbol().chars().next().and_then(glyph_for) else {
                continue;
            };
            let mut fg = to_rgba(cell.fg, WHITE);
            if cell.modifier.contains(Modifier::DIM) {
                fg = blend(fg, bg);
            }
            let bold = cell.modifier.contains(Modifier::BOLD);
            draw_glyph(&mut image, px, py, &glyph, fg, bold);
        }
    }
    image
}

fn glyph_for(c: char) -> Option<[u8; 8]> {
    if c == ' ' {
        return None;
    }
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
}

/// Each font row is drawn twice to fill the 8×16 cell. Bit 0 is the leftmost pixel.
fn draw_glyph(image: &mut RgbaImage, px: u32, py: u32, glyph: &[u8; 8], fg: Rgba<u8>, bold: bool) {
    for (row, bits) in glyph.iter().enumerate() {
        let bits = if bold { bits | (bits << 1) } else { *bits };
        for col in 0..CELL_WIDTH {
            if bits & (1 << col) == 0 {
                continue;
            }
            let y = py + row as u32 * 2;
            image.put_pixel(px + col, y, fg);
            image.put_pixel(px + col, y + 1, fg);
        }
    }
}

fn blend(a: Rgba<u8>, b: Rgba<u8>) -> Rgba<u8> {
    let mix = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}

fn scale_image(image: RgbaImage, scale: f32) -> RgbaImage {
    if !scale.is_finite() || scale <= 0.0 || (scale - 1.0).abs() < f32::EPSILON {
        return image;
    }
    let width = ((image.width() as f32 * scale).round() as u32).max(1);
    let height = ((image.height() as f32 * scale).round() as u32).max(1);
    imageops::resize(&image, width, height, FilterType::Nearest)
}

/// Maps a terminal color to RGBA, with xterm values for the named and
/// indexed palettes.
pub fn to_rgba(color: Color, reset: Rgba<u8>) -> Rgba<u8> {
    let (r, g, b) = match color {
        Color::Reset => return reset,
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (205, 0, 0),
        Color::Green => (0, 205, 0),
        Color::Yellow => (205, 205, 0),
        Color::Blue => (0, 0, 238),
        Color::Magenta => (205, 0, 205),
        Color::Cyan => (0, 205, 205),
        Color::Gray => (229, 229, 229),
        Color::DarkGray => (127, 127, 127),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (92, 92, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        Color::Indexed(i) => indexed_rgb(i),
    };
    Rgba([r, g, b, 255])
}

fn indexed_rgb(i: u8) -> (u8, u8, u8) {
    const ANSI: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::Gray,
        Color::DarkGray,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightCyan,
        Color::White,
    ];
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    match i {
        0..16 => {
            let Rgba([r, g, b, _]) = to_rgba(ANSI[i as usize], BLACK);
            (r, g, b)
        }
        16..232 => {
            let n = i - 16;
            (
                LEVELS[(n / 36) as usize],
                LEVELS[(n / 6 % 6) as usize],
                LEVELS[(n % 6) as usize],
            )
        }
        _ => {
            let gray = 8 + 10 * (i - 232);
            (gray, gray, gray)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::vehicle;
    use crate::theme::Theme;
    use ratatui::style::Style;
    use std::sync::Mutex;

    /// Serves a fixed image for vehicle thumbnails and fails everything else.
    struct FakeAssets {
        thumbnail: Option<Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeAssets {
        fn new(thumbnail: Option<Vec<u8>>) -> Self {
            Self {
                thumbnail,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl AssetSource for FakeAssets {
        fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
            self.requests.lock().unwrap().push(path.to_string());
            match &self.thumbnail {
                Some(bytes) if path.starts_with("images/vehicles/") => Ok(bytes.clone()),
                _ => Err(ApiError::Status {
                    status: 404,
                    url: path.to_string(),
                }),
            }
        }
    }

    fn red_png() -> Vec<u8> {
        let image = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn solid(color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, color))
    }

    fn capture_with(
        source: Arc<FakeAssets>,
        scale: f32,
        width: u16,
        preloaded: &[(String, DynamicImage)],
    ) -> RgbaImage {
        let records = vec![vehicle("m4a1", "M4A1", 2, 3.3)];
        let mut capture = PngCapture::new(source, Theme::Dracula.config(), scale);
        for (path, image) in preloaded {
            capture.assets.images.insert(path.clone(), Some(image.clone()));
        }
        let region = ResultsRegion {
            records: &records,
            width,
        };
        let bytes = capture.capture_region(&region).unwrap();
        image::load_from_memory(&bytes).unwrap().to_rgba8()
    }

    fn capture(source: Arc<FakeAssets>, scale: f32, width: u16) -> RgbaImage {
        capture_with(source, scale, width, &[])
    }

    #[test]
    fn test_osc52_clipboard_sequence() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.write_text("M4A1 | T-34").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, "\x1b]52;c;TTRBMSB8IFQtMzQ=\x07");
    }

    #[test]
    fn test_to_rgba_palettes() {
        assert_eq!(to_rgba(Color::Rgb(1, 2, 3), BLACK), Rgba([1, 2, 3, 255]));
        assert_eq!(to_rgba(Color::Reset, WHITE), WHITE);
        assert_eq!(to_rgba(Color::Indexed(196), BLACK), Rgba([255, 0, 0, 255]));
        assert_eq!(to_rgba(Color::Indexed(244), BLACK), Rgba([128, 128, 128, 255]));
        assert_eq!(to_rgba(Color::Indexed(1), BLACK), to_rgba(Color::Red, BLACK));
    }

    #[test]
    fn test_rasterize_draws_glyphs_and_backgrounds() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        buf.set_string(
            0,
            0,
            "A",
            Style::default()
                .fg(Color::Rgb(255, 255, 255))
                .bg(Color::Rgb(0, 0, 255)),
        );

        let image = rasterize(&buf, BLACK);

        assert_eq!(image.dimensions(), (2 * CELL_WIDTH, CELL_HEIGHT));
        let first_cell: Vec<_> = (0..CELL_HEIGHT)
            .flat_map(|y| (0..CELL_WIDTH).map(move |x| (x, y)))
            .map(|(x, y)| *image.get_pixel(x, y))
            .collect();
        assert!(first_cell.contains(&WHITE));
        assert!(first_cell.contains(&Rgba([0, 0, 255, 255])));
        assert!(
            (CELL_WIDTH..2 * CELL_WIDTH)
                .all(|x| (0..CELL_HEIGHT).all(|y| *image.get_pixel(x, y) == BLACK))
        );
    }

    #[test]
    fn test_capture_without_images_keeps_text_cards() {
        let source = Arc::new(FakeAssets::new(None));
        let image = capture(source.clone(), 1.0, 40);

        assert_eq!(
            image.dimensions(),
            (40 * CELL_WIDTH, ui::CARD_HEIGHT as u32 * CELL_HEIGHT)
        );
        let expected = if cfg!(feature = "avif") { 2 } else { 0 };
        assert_eq!(source.request_count(), expected);
    }

    #[test]
    fn test_capture_scales_output() {
        let image = capture(Arc::new(FakeAssets::new(None)), 1.5, 40);
        assert_eq!(
            image.dimensions(),
            (480, (ui::CARD_HEIGHT as f32 * CELL_HEIGHT as f32 * 1.5) as u32)
        );
    }

    #[test]
    fn test_capture_composites_vehicle_thumbnail() {
        let record = vehicle("m4a1", "M4A1", 2, 3.3);
        let image = capture_with(
            Arc::new(FakeAssets::new(None)),
            1.0,
            40,
            &[(record.thumbnail_path(), solid(Rgba([255, 0, 0, 255])))],
        );
        // Thumbnail slot spans cells (1,1)..(39,4); the square image is centered.
        let Rgba([r, g, b, _]) = *image.get_pixel(160, 40);
        assert!(r > 200 && g < 50 && b < 50, "expected red, got {r},{g},{b}");
    }

    #[test]
    fn test_capture_draws_flag_without_vehicle_thumbnail() {
        let record = vehicle("m4a1", "M4A1", 2, 3.3);
        let image = capture_with(
            Arc::new(FakeAssets::new(None)),
            1.0,
            40,
            &[(record.flag_path(), solid(Rgba([0, 0, 255, 255])))],
        );
        // The flag covers the top-left 3x1 cells of the slot starting at cell (1,1).
        let Rgba([r, g, b, _]) = *image.get_pixel(CELL_WIDTH + 12, CELL_HEIGHT + 8);
        assert!(r < 50 && g < 50 && b > 200, "expected blue, got {r},{g},{b}");
        // The rest of the slot keeps the text badge background.
        let fill = to_rgba(
            Theme::Dracula.config().cards.colors(record.card_style()).fill,
            BLACK,
        );
        assert_eq!(*image.get_pixel(CELL_WIDTH * 30, CELL_HEIGHT * 3 + 1), fill);
    }

    #[test]
    fn test_load_decodes_jpeg_asset() {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(6, 3, image::Rgb([0, 0, 255])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        let source = FakeAssets::new(Some(bytes));
        let mut loader = AssetLoader::new();

        let image = loader.load(&source, "images/vehicles/t_34.jpg").unwrap();
        assert_eq!((image.width(), image.height()), (6, 3));
        assert_eq!(source.request_count(), 1);
    }

    #[test]
    fn test_load_rejects_bytes_that_do_not_decode() {
        let source = FakeAssets::new(Some(b"not an image".to_vec()));
        let mut loader = AssetLoader::new();
        assert!(loader.load(&source, "images/vehicles/t_34.png").is_none());
        assert_eq!(source.request_count(), 1);
    }

    #[test]
    fn test_is_decodable() {
        assert!(is_decodable("images/vehicles/t_34.png"));
        assert!(is_decodable("images/vehicles/t_34.webp"));
        assert!(!is_decodable("images/vehicles/t_34"));
        assert_eq!(
            is_decodable("images/vehicles/t_34.avif"),
            cfg!(feature = "avif")
        );
    }

    #[cfg(not(feature = "avif"))]
    #[test]
    fn test_avif_assets_are_not_fetched_without_decoder() {
        let source = FakeAssets::new(Some(red_png()));
        let mut loader = AssetLoader::new();
        let records = vec![vehicle("a", "A", 1, 1.0)];

        assert_eq!(loader.load_all(&source, &records), 0);
        assert_eq!(source.request_count(), 0);
    }

    #[test]
    fn test_asset_loader_caches_failures() {
        let source = FakeAssets::new(None);
        let mut loader = AssetLoader::new();

        assert!(loader.load(&source, "images/flags/country_ussr.png").is_none());
        assert!(loader.load(&source, "images/flags/country_ussr.png").is_none());
        assert!(loader.load(&source, "images/vehicles/t_34.png").is_none());
        assert_eq!(source.request_count(), 2);
    }

    #[test]
    fn test_capture_rejects_empty_region() {
        let mut capture = PngCapture::new(
            Arc::new(FakeAssets::new(None)),
            Theme::Dracula.config(),
            1.0,
        );
        let region = ResultsRegion {
            records: &[],
            width: 40,
        };
        assert!(matches!(
            capture.capture_region(&region),
            Err(ExportError::Encode(_))
        ));
    }
}
