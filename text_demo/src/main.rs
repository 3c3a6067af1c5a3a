//! Text demo application
//!
//! Drives the batched text context for a few frames against the headless
//! backend and logs the render objects each frame produces.
//!
//! Usage: `RUST_LOG=info text_demo [config.toml|config.ron]`

use text_engine::config::{Config, ConfigError, TextConfig};
use text_engine::foundation::logging;
use text_engine::foundation::math::{Mat4, Mat4Ext, Vec4};
use text_engine::render::systems::text::{
    get_text_metrics, DrawTextParams, FontError, FontMapHandle, FontMapParams, FontMaps, Glyph,
    TextContext, SHADOW_OFFSET,
};
use text_engine::render::{HeadlessBackend, RenderError, RenderQueue};

/// Monospace cell size of the generated atlas
const CELL_WIDTH: u32 = 8;
const CELL_HEIGHT: u32 = 12;
const ATLAS_COLUMNS: u32 = 16;

const FRAME_COUNT: u32 = 3;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Font map covering printable ASCII laid out on a fixed grid
fn build_ascii_font() -> FontMapParams {
    let rows = (128 - 32) / ATLAS_COLUMNS;
    let glyphs = (32u32..128)
        .map(|c| {
            let cell = c - 32;
            let x = (cell % ATLAS_COLUMNS) * CELL_WIDTH;
            let y = (cell / ATLAS_COLUMNS) * CELL_HEIGHT + 9;
            let width = if c == ' ' as u32 { 0.0 } else { 7.0 };
            Glyph::new(c, width, CELL_WIDTH as f32)
                .with_vertical(9.0, 3.0)
                .with_atlas_position(x as i32, y as i32)
        })
        .collect();

    let texture_width = ATLAS_COLUMNS * CELL_WIDTH;
    let texture_height = rows * CELL_HEIGHT;
    FontMapParams {
        glyphs,
        texture_width,
        texture_height,
        texture_data: vec![0xFF; (texture_width * texture_height * 3) as usize],
        shadow_x: 1.0,
        shadow_y: -1.0,
        max_ascent: 9.0,
        max_descent: 3.0,
    }
}

struct TextDemoApp {
    backend: HeadlessBackend,
    fonts: FontMaps,
    font: FontMapHandle,
    text: TextContext,
    queue: RenderQueue,
    uploads: usize,
}

impl TextDemoApp {
    fn new(config: &TextConfig) -> Result<Self, DemoError> {
        log::info!("Creating text demo with {} characters per frame", config.max_characters);
        let mut backend = HeadlessBackend::new();
        let mut fonts = FontMaps::new();
        let font = fonts.create(&mut backend, &build_ascii_font())?;
        let text = TextContext::new(&mut backend, config)?;

        if let Some(font_map) = fonts.get(font) {
            let offset = font_map.shadow_offset();
            log::info!("Font shadow '{}' = ({}, {})", SHADOW_OFFSET, offset.x, offset.y);
        }

        Ok(Self {
            backend,
            fonts,
            font,
            text,
            queue: RenderQueue::new(),
            uploads: 0,
        })
    }

    fn frame(&mut self, frame: u32) -> Result<(), DemoError> {
        let white = Vec4::new(1.0, 1.0, 1.0, 1.0);
        let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let shadow = Vec4::new(0.0, 0.0, 0.0, 0.5);

        let title = DrawTextParams::new("RUSTEROIDS")
            .with_transform(Mat4::translation(320.0, 440.0, 0.0))
            .with_colors(white, black, shadow)
            .with_depth(1);
        self.text.draw_text(self.font, &title);

        let score = format!("Score: {}", frame * 250);
        let score_params = DrawTextParams::new(&score)
            .with_transform(Mat4::translation(16.0, 460.0, 0.0))
            .with_colors(white, black, shadow)
            .with_depth(1);
        self.text.draw_text(self.font, &score_params);

        let help = DrawTextParams::new("Arrow keys steer the ship. Space fires. Escape pauses the game.")
            .with_transform(Mat4::translation(16.0, 120.0, 0.0))
            .with_colors(white, black, shadow)
            .with_wrap_width(200.0);
        self.text.draw_text(self.font, &help);

        if let Some(font_map) = self.fonts.get(self.font) {
            let metrics = get_text_metrics(font_map, help.text, help.width, help.line_break);
            log::debug!(
                "Help text: {} px wide, ascent {}, descent {}",
                metrics.width,
                metrics.max_ascent,
                metrics.max_descent
            );
        }

        log::debug!(
            "Frame {}: {} entries in {} batches, {} text bytes",
            frame,
            self.text.entry_count(),
            self.text.pending_batches(),
            self.text.text_buffer_len()
        );

        self.text.flush_texts(&mut self.backend, &self.fonts, &mut self.queue)?;
        self.queue.sort();

        for ro in self.queue.render_objects() {
            log::info!(
                "Frame {}: depth {} draws vertices {}..{}",
                frame,
                ro.render_key.depth,
                ro.vertex_start,
                ro.vertex_start + ro.vertex_count
            );
        }
        self.queue.clear();

        self.uploads += self.backend.uploads().len();
        self.backend.clear_uploads();
        Ok(())
    }

    fn run(&mut self) -> Result<(), DemoError> {
        for frame in 0..FRAME_COUNT {
            self.frame(frame)?;
        }
        log::info!("Uploaded {} vertex buffer updates", self.uploads);
        Ok(())
    }

    fn shutdown(self) {
        let Self {
            mut backend,
            mut fonts,
            font,
            text,
            ..
        } = self;
        text.finalize(&mut backend);
        if let Err(e) = fonts.delete(font, &mut backend) {
            log::warn!("Failed to delete font map: {}", e);
        }
        log::info!(
            "Shutdown: {} textures, {} vertex buffers left",
            backend.texture_count(),
            backend.vertex_buffer_count()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting text demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading text config from {}", path);
            TextConfig::load_from_file(&path).map_err(DemoError::from)?
        }
        None => TextConfig::default(),
    };

    let mut app = TextDemoApp::new(&config)?;
    app.run()?;
    app.shutdown();

    log::info!("Text demo finished");
    Ok(())
}
