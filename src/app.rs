use std::cell::Cell;
use std::rc::Rc;

use eframe::egui;
use strip_label::{AnnotationSession, Error, SessionState};

pub const TITLE: &str = "Manual Training Data Selection";

/// Height reserved below the image for the status line.
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

const ACCEPTED_BAND: egui::Color32 = egui::Color32::from_rgb(0, 200, 80);
const REJECTED_BAND: egui::Color32 = egui::Color32::from_rgb(230, 40, 40);

// ── App ─────────────────────────────────────────────────────────────────────

pub struct SelectionApp {
    session: AnnotationSession,
    display_width: f32,
    texture: Option<egui::TextureHandle>,
    /// Catalog index the texture was built from.
    texture_index: Option<usize>,
    status: String,
    failed: Rc<Cell<bool>>,
}

impl SelectionApp {
    pub fn new(session: AnnotationSession, display_width: u32, failed: Rc<Cell<bool>>) -> Self {
        Self {
            session,
            display_width: display_width as f32,
            texture: None,
            texture_index: None,
            status: "Click to mark points, Space to commit".to_string(),
            failed,
        }
    }

    /// Upload the current image once per catalog position and fit the window to it.
    fn ensure_texture(&mut self, ctx: &egui::Context) {
        let (index, _) = self.session.position();
        if self.texture_index == Some(index) {
            return;
        }
        let Some(img) = self.session.current_display_bitmap() else {
            return;
        };
        let size = [img.width() as usize, img.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, img.as_raw());
        self.texture = Some(ctx.load_texture(
            "current-image",
            color_image,
            egui::TextureOptions::NEAREST,
        ));
        self.texture_index = Some(index);

        if let Some((_, h)) = self.session.display_size() {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                self.display_width,
                h as f32 + STATUS_BAR_HEIGHT,
            )));
        }
    }

    fn image_rect_on_screen(&self, canvas_rect: egui::Rect) -> Option<egui::Rect> {
        let (w, h) = self.session.display_size()?;
        Some(egui::Rect::from_min_size(
            canvas_rect.min,
            egui::vec2(w as f32, h as f32),
        ))
    }

    /// Crosshair on each marked point plus the outline of the strip it will produce.
    fn draw_points(&self, painter: &egui::Painter, image_rect: egui::Rect) {
        let Some(img) = self.session.current_display_bitmap() else {
            return;
        };
        let s = self.session.scaling();
        let scale = s.get() as f32;
        let extractor = self.session.extractor();

        for point in self.session.points() {
            let screen = s.native_to_screen(*point);
            let center = image_rect.min
                + egui::vec2(screen.x as f32 + scale * 0.5, screen.y as f32 + scale * 0.5);

            let color = if extractor.fits(point.y, img.height()) {
                ACCEPTED_BAND
            } else {
                REJECTED_BAND
            };
            let rows = extractor.window(point.y);
            let band = egui::Rect::from_min_max(
                egui::pos2(image_rect.left(), image_rect.top() + rows.start as f32 * scale),
                egui::pos2(image_rect.right(), image_rect.top() + rows.end as f32 * scale),
            )
            .intersect(image_rect);
            painter.rect_stroke(
                band,
                0.0,
                egui::Stroke::new(1.0, color),
                egui::StrokeKind::Inside,
            );

            let arm = (scale * 3.0).max(6.0);
            let stroke = egui::Stroke::new(2.0, color);
            painter.line_segment([center - egui::vec2(arm, 0.0), center + egui::vec2(arm, 0.0)], stroke);
            painter.line_segment([center - egui::vec2(0.0, arm), center + egui::vec2(0.0, arm)], stroke);
        }
    }

    fn commit(&mut self, ctx: &egui::Context) {
        match self.session.on_commit_key() {
            Ok(summary) => {
                self.status = format!(
                    "Saved {} strips, rejected {} near the edge",
                    summary.written.len(),
                    summary.rejected.len()
                );
            }
            Err(e @ Error::Write { .. }) => {
                log::error!("{e}");
                self.status = format!("Commit stopped: {e}");
                show_error("Could not save strip", &e.to_string());
            }
            Err(e) => {
                log::error!("{e}");
                show_error("Cannot continue", &e.to_string());
                self.failed.set(true);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

/// Screen pixel under `pos`, relative to the image's top-left corner.
///
/// `None` outside `[min, max)` on either axis, so the far edges never map
/// one pixel past the image.
fn screen_pixel(image_rect: egui::Rect, pos: egui::Pos2) -> Option<(u32, u32)> {
    let inside = pos.x >= image_rect.min.x
        && pos.y >= image_rect.min.y
        && pos.x < image_rect.max.x
        && pos.y < image_rect.max.y;
    if !inside {
        return None;
    }
    let rel = pos - image_rect.min;
    Some((rel.x as u32, rel.y as u32))
}

fn show_error(title: &str, description: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for SelectionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.session.state() != SessionState::AwaitingInput {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        self.ensure_texture(ctx);

        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.commit(ctx);
            if self.session.state() != SessionState::AwaitingInput {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
            self.ensure_texture(ctx);
        }

        egui::TopBottomPanel::bottom("status")
            .exact_height(STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (index, total) = self.session.position();
                    ui.label(format!("Image {}/{}", index + 1, total));
                    ui.separator();
                    ui.label(format!("{} points", self.session.points().len()));
                    ui.separator();
                    ui.label(&self.status);
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click());
                let canvas_rect = response.rect;
                painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

                let Some(image_rect) = self.image_rect_on_screen(canvas_rect) else {
                    return;
                };
                if let Some(ref tex) = self.texture {
                    painter.image(
                        tex.id(),
                        image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }

                let pressed = ctx.input(|i| {
                    if i.pointer.primary_pressed() {
                        i.pointer.interact_pos()
                    } else {
                        None
                    }
                });
                if let Some((x, y)) = pressed.and_then(|pos| screen_pixel(image_rect, pos)) {
                    if let Some(point) = self.session.on_pointer_press(x, y) {
                        log::debug!("Marked ({}, {})", point.x, point.y);
                    }
                }

                self.draw_points(&painter, image_rect);
            });
    }
}
