// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front end for the capture screen
//!
//! Renders the live preview and the captured photo to the terminal using
//! Unicode half-block characters for improved vertical resolution.

use crate::backends::Services;
use crate::backends::camera::CameraFrame;
use crate::backends::navigation::Router;
use crate::config::Config;
use crate::constants::timing;
use crate::features::{self, FeatureOutcome};
use crate::fl;
use crate::screen::{
    CaptureMode, CaptureOutcome, CaptureScreen, Control, FeatureTarget, ImageLocator,
    OverlayGuide, Route, ScreenLayout, ScreenToken, UploadOutcome, workflow,
};
use crate::storage;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    style::Style, widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Longest side of the photo kept in memory for terminal rendering
const PREVIEW_MAX_DIMENSION: u32 = 480;

/// Run the capture screen in the terminal
pub fn run(feature: Option<FeatureTarget>) -> Result<(), Box<dyn std::error::Error>> {
    let (_, config) = Config::load();
    storage::prepare_cache(timing::CACHE_MAX_AGE);
    let feature = feature.unwrap_or(config.default_feature);
    let services = Services::from_config(&config);
    let runtime = tokio::runtime::Runtime::new()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TerminalApp::new(services, config, feature, runtime);
    let result = app.run_loop(&mut terminal);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Results of background work, tagged with what they belong to
enum WorkResult {
    Capture(ScreenToken, CaptureOutcome),
    Upload(ScreenToken, UploadOutcome),
    Feature(Route, Result<FeatureOutcome, String>),
}

/// Which screen the terminal is showing
enum Page {
    Capture,
    Feature {
        route: Route,
        result: Option<Result<FeatureOutcome, String>>,
    },
}

struct TerminalApp {
    services: Services,
    config: Config,
    screen: CaptureScreen,
    router: Router,
    page: Page,
    runtime: tokio::runtime::Runtime,
    sender: mpsc::UnboundedSender<WorkResult>,
    receiver: mpsc::UnboundedReceiver<WorkResult>,
    frame_widget: FrameWidget,
    /// Photo shown in preview, keyed by its locator
    photo: Option<(ImageLocator, CameraFrame)>,
    preview_running: bool,
    status_message: Option<String>,
}

impl TerminalApp {
    fn new(
        services: Services,
        config: Config,
        feature: FeatureTarget,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let camera_available = services.camera.is_available();
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut app = Self {
            services,
            config,
            screen: CaptureScreen::new(feature, camera_available),
            router: Router::new(),
            page: Page::Capture,
            runtime,
            sender,
            receiver,
            frame_widget: FrameWidget::new(),
            photo: None,
            preview_running: false,
            status_message: None,
        };
        app.mount_screen();
        app
    }

    fn mount_screen(&mut self) {
        self.stop_preview();
        self.photo = None;
        self.page = Page::Capture;
        let token = self.screen.mount(
            Arc::clone(&self.services.speech),
            &self.config.voice_settings(),
        );
        if !self.screen.camera_available() {
            warn!("No camera device, showing static notice");
            return;
        }
        let status = self.services.camera.request_permission();
        self.screen.record_permission(token, status);
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            while let Ok(result) = self.receiver.try_recv() {
                self.apply(result);
            }

            if self.preview_running
                && let Some(frame) = self.services.camera.latest_frame()
            {
                self.frame_widget.update_frame(frame);
            }

            terminal.draw(|f| self.draw(f.area(), f.buffer_mut()))?;

            // Handle input with timeout for frame updates
            if event::poll(timing::PREVIEW_POLL)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                if key.code == KeyCode::Char('q') {
                    break;
                }
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        if let Page::Feature { .. } = self.page {
            if matches!(code, KeyCode::Char('b') | KeyCode::Esc) {
                self.router.back();
                self.mount_screen();
            }
            return;
        }

        match code {
            KeyCode::Char('t') => self.take_photo(),
            KeyCode::Char('u') => self.upload_photo(),
            KeyCode::Char(' ') | KeyCode::Char('c') => self.capture(),
            KeyCode::Char('r') => {
                if self.screen.layout().controls().contains(&Control::Retake)
                    && self.screen.retake()
                {
                    self.photo = None;
                }
            }
            KeyCode::Enter => self.use_photo(),
            _ => {}
        }
    }

    fn take_photo(&mut self) {
        if !self.screen.enter_camera() {
            debug!(mode = ?self.screen.mode(), "Ignoring take photo");
            return;
        }
        match self.services.camera.start_preview() {
            Ok(()) => {
                self.preview_running = true;
                self.status_message = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to start preview");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    fn capture(&mut self) {
        let Some(token) = self.screen.begin_capture() else {
            return;
        };
        let camera = Arc::clone(&self.services.camera);
        let dimensions = Arc::clone(&self.services.dimensions);
        let transform = Arc::clone(&self.services.transform);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let outcome = workflow::capture_and_crop(camera, dimensions, transform).await;
            let _ = sender.send(WorkResult::Capture(token, outcome));
        });
    }

    fn upload_photo(&mut self) {
        let Some(token) = self.screen.begin_upload() else {
            return;
        };
        let picker = Arc::clone(&self.services.picker);
        let dimensions = Arc::clone(&self.services.dimensions);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let outcome = workflow::pick_from_library(picker, dimensions).await;
            let _ = sender.send(WorkResult::Upload(token, outcome));
        });
    }

    fn use_photo(&mut self) {
        let Some(route) = self.screen.confirm(&mut self.router) else {
            return;
        };
        self.stop_preview();
        info!(screen = %route.screen, "Opening feature screen");

        let sender = self.sender.clone();
        let request = route.clone();
        self.runtime.spawn(async move {
            let result = features::open_route(request.clone())
                .await
                .map_err(|e| e.to_string());
            let _ = sender.send(WorkResult::Feature(request, result));
        });
        self.page = Page::Feature {
            route,
            result: None,
        };
    }

    fn apply(&mut self, result: WorkResult) {
        match result {
            WorkResult::Capture(token, outcome) => {
                if let CaptureOutcome::Failed(reason) = &outcome {
                    self.status_message = Some(format!("Error: {}", reason));
                }
                if self.screen.finish_capture(token, outcome)
                    && self.screen.mode() == CaptureMode::Preview
                {
                    self.stop_preview();
                    self.load_photo();
                }
            }
            WorkResult::Upload(token, outcome) => {
                if self.screen.finish_upload(token, outcome)
                    && self.screen.mode() == CaptureMode::Preview
                {
                    self.load_photo();
                }
            }
            WorkResult::Feature(route, outcome) => {
                if let Page::Feature {
                    route: current,
                    result,
                } = &mut self.page
                    && *current == route
                {
                    *result = Some(outcome);
                }
            }
        }
    }

    /// Decode the preview photo into a frame the widget can draw
    fn load_photo(&mut self) {
        let locator = self.screen.image().locator.clone();
        let Some(path) = locator.to_path() else {
            self.photo = None;
            return;
        };
        match image::open(&path) {
            Ok(img) => {
                let img = if img.width().max(img.height()) > PREVIEW_MAX_DIMENSION {
                    img.thumbnail(PREVIEW_MAX_DIMENSION, PREVIEW_MAX_DIMENSION)
                } else {
                    img
                };
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                self.photo = Some((
                    locator,
                    CameraFrame::from_rgba(width, height, rgba.into_raw()),
                ));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load photo for preview");
                self.photo = None;
            }
        }
    }

    fn stop_preview(&mut self) {
        if self.preview_running {
            self.services.camera.stop_preview();
            self.preview_running = false;
        }
        self.frame_widget = FrameWidget::new();
    }

    fn shutdown(&mut self) {
        self.stop_preview();
        self.screen.unmount();
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        // Reserve bottom line for status
        let content_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let status_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1.min(area.height),
        };

        let status = match &self.page {
            Page::Capture => {
                let layout = self.screen.layout();
                self.draw_capture(&layout, content_area, buf);
                build_status_message(&layout, self.status_message.as_deref())
            }
            Page::Feature { route, result } => {
                draw_feature(route, result.as_ref(), content_area, buf);
                format!("{} | 'b' {} | 'q' quit", route.screen, fl!("back"))
            }
        };

        StatusBar { message: &status }.render(status_area, buf);
    }

    fn draw_capture(&self, layout: &ScreenLayout, area: Rect, buf: &mut Buffer) {
        match layout {
            ScreenLayout::CameraUnavailable => {
                centered_text(&fl!("camera-not-available"), area, buf);
            }
            ScreenLayout::CameraActive { guide, .. } => {
                let placeholder = match self.screen.permission() {
                    Some(status) if !status.is_granted() => fl!("permission-denied"),
                    _ => fl!("camera-starting"),
                };
                self.frame_widget.render_or(&placeholder, area, buf);
                let viewport = self
                    .frame_widget
                    .frame
                    .as_ref()
                    .map(|frame| fit_rect(area, frame.width, frame.height))
                    .unwrap_or(area);
                GuideWidget { guide: *guide }.render(viewport, buf);
            }
            ScreenLayout::Chooser { picking: true } => {
                centered_text(&fl!("choosing"), area, buf);
            }
            ScreenLayout::Chooser { picking: false } => {}
            ScreenLayout::Preview { image, .. } => match &self.photo {
                Some((locator, frame)) if *locator == image.locator => {
                    draw_frame(frame, area, buf);
                }
                _ => centered_text(image.locator.as_str(), area, buf),
            },
        }
    }
}

fn draw_feature(
    route: &Route,
    result: Option<&Result<FeatureOutcome, String>>,
    area: Rect,
    buf: &mut Buffer,
) {
    let text = match result {
        None => fl!("feature-analyzing"),
        Some(Err(error)) => fl!("feature-error", error = error.as_str()),
        Some(Ok(FeatureOutcome::Text(text))) if text.is_empty() => fl!("feature-no-text"),
        Some(Ok(FeatureOutcome::QrCodes(codes))) if codes.is_empty() => fl!("feature-no-qr"),
        Some(Ok(FeatureOutcome::Color(report))) => fl!(
            "feature-color",
            name = report.name,
            hex = report.hex(),
            coverage = report.coverage_percent
        ),
        Some(Ok(outcome)) => outcome.to_string(),
    };

    let title = route.params.image_path.as_str();
    buf.set_string(area.x, area.y, truncate(title, area.width), Style::default());
    for (row, line) in text.lines().enumerate() {
        let y = area.y + 2 + row as u16;
        if y >= area.y + area.height {
            break;
        }
        buf.set_string(area.x, y, truncate(line, area.width), Style::default());
    }
}

fn build_status_message(layout: &ScreenLayout, notice: Option<&str>) -> String {
    let capturing = matches!(
        layout,
        ScreenLayout::CameraActive {
            capturing: true,
            ..
        }
    );
    let mut parts: Vec<String> = layout
        .controls()
        .iter()
        .map(|control| match control {
            Control::TakePhoto => format!("'t' {}", fl!("take-photo")),
            Control::UploadPhoto => format!("'u' {}", fl!("upload-photo")),
            Control::Capture if capturing => fl!("capturing"),
            Control::Capture => format!("'space' {}", fl!("capture")),
            Control::Retake => format!("'r' {}", fl!("retake")),
            Control::UsePhoto => format!("'enter' {}", fl!("use-photo")),
        })
        .collect();
    parts.push("'q' quit".to_string());
    if let Some(notice) = notice {
        parts.insert(0, notice.to_string());
    }
    parts.join(" | ")
}

fn truncate(text: &str, width: u16) -> &str {
    match text.char_indices().nth(width as usize) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn centered_text(msg: &str, area: Rect, buf: &mut Buffer) {
    let msg = truncate(msg, area.width);
    let x = area.x + (area.width.saturating_sub(msg.chars().count() as u16)) / 2;
    let y = area.y + area.height / 2;
    if y < area.y + area.height && x < area.x + area.width {
        buf.set_string(x, y, msg, Style::default());
    }
}

/// Cell rectangle that shows a `width` x `height` image at its aspect ratio
///
/// Each terminal cell displays 2 vertical pixels using half-block characters.
fn fit_rect(area: Rect, width: u32, height: u32) -> Rect {
    if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
        return Rect { width: 0, height: 0, ..area };
    }
    let frame_aspect = width as f64 / height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height * 2) as f64;

    let (display_width, display_height) = if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let w = term_height * frame_aspect;
        (w as u16, area.height)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / frame_aspect;
        (area.width, (h / 2.0) as u16)
    };

    Rect {
        x: area.x + (area.width.saturating_sub(display_width)) / 2,
        y: area.y + (area.height.saturating_sub(display_height)) / 2,
        width: display_width.max(1),
        height: display_height.max(1),
    }
}

/// Draw a frame into `area` using half-block characters
fn draw_frame(frame: &CameraFrame, area: Rect, buf: &mut Buffer) {
    let target = fit_rect(area, frame.width, frame.height);
    if target.width == 0 || target.height == 0 {
        return;
    }

    let x_scale = frame.width as f64 / target.width as f64;
    let y_scale = frame.height as f64 / (target.height * 2) as f64;

    // Upper half (▀) colored with fg, lower half with bg
    for ty in 0..target.height {
        for tx in 0..target.width {
            let src_x = (tx as f64 * x_scale) as u32;
            let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
            let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

            let (r, g, b) = frame.pixel_rgb(src_x, src_y_top);
            let (br, bg, bb) = frame.pixel_rgb(src_x, src_y_bottom);

            if let Some(cell) = buf.cell_mut((target.x + tx, target.y + ty)) {
                cell.set_char('▀');
                cell.set_fg(Color::Rgb(r, g, b));
                cell.set_bg(Color::Rgb(br, bg, bb));
            }
        }
    }
}

/// Widget that renders the live camera frame
struct FrameWidget {
    frame: Option<Arc<CameraFrame>>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: Arc<CameraFrame>) {
        self.frame = Some(frame);
    }

    /// Render the frame, or `placeholder` until the first one arrives
    fn render_or(&self, placeholder: &str, area: Rect, buf: &mut Buffer) {
        match &self.frame {
            Some(frame) => draw_frame(frame, area, buf),
            None => centered_text(placeholder, area, buf),
        }
    }
}

/// Dashed capture guide drawn over the preview
struct GuideWidget {
    guide: OverlayGuide,
}

impl Widget for GuideWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (x, y, width, height) = self.guide.rect_in(area.width, area.height);
        if width < 2 || height < 2 {
            return;
        }
        let left = area.x + x;
        let top = area.y + y;
        let right = left + width - 1;
        let bottom = top + height - 1;

        let mut mark = |cx: u16, cy: u16, ch: char| {
            if let Some(cell) = buf.cell_mut((cx, cy)) {
                cell.set_char(ch);
                cell.set_fg(Color::White);
            }
        };

        for cx in left..=right {
            let ch = if (cx - left) % 2 == 0 { '─' } else { ' ' };
            mark(cx, top, ch);
            mark(cx, bottom, ch);
        }
        for cy in top..=bottom {
            let ch = if (cy - top) % 2 == 0 { '│' } else { ' ' };
            mark(left, cy, ch);
            mark(right, cy, ch);
        }
        mark(left, top, '┌');
        mark(right, top, '┐');
        mark(left, bottom, '└');
        mark(right, bottom, '┘');
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_string(
            area.x,
            area.y,
            truncate(self.message, area.width),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_keeps_aspect() {
        let area = Rect::new(0, 0, 80, 20);
        // 4:3 frame in 80x40 half-block pixels is height bound
        let rect = fit_rect(area, 640, 480);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.width, 53);
        assert_eq!(rect.x, 13);
    }

    #[test]
    fn test_fit_rect_empty_frame() {
        let rect = fit_rect(Rect::new(0, 0, 10, 10), 0, 0);
        assert_eq!(rect.width, 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hi", 10), "hi");
        assert_eq!(truncate("héllo", 2), "hé");
    }

    #[test]
    fn test_guide_draws_corners() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        GuideWidget {
            guide: OverlayGuide::default(),
        }
        .render(area, &mut buf);
        // 10% of 20 = 2, 30% of 10 = 3, 80% of 20 = 16, 40% of 10 = 4
        assert_eq!(buf[(2, 3)].symbol(), "┌");
        assert_eq!(buf[(17, 3)].symbol(), "┐");
        assert_eq!(buf[(2, 6)].symbol(), "└");
        assert_eq!(buf[(17, 6)].symbol(), "┘");
    }

    #[test]
    fn test_status_lists_chooser_keys() {
        let msg = build_status_message(&ScreenLayout::Chooser { picking: false }, None);
        assert!(msg.contains("'t'"));
        assert!(msg.contains("'u'"));
        assert!(msg.ends_with("'q' quit"));
    }
}
