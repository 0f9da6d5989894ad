use egui::{Color32, PointerButton, Rect, Sense, pos2, vec2};

use crate::app::EraserApp;

const CHECKER_SIZE: f32 = 16.0;

pub fn central_panel(app: &mut EraserApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let canvas_rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(canvas_rect, Sense::click_and_drag());

        let Some((width, height)) = app.session.current_buffer().map(|b| (b.width(), b.height())) else {
            ui.painter().text(
                canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Drop an image here or enter a path to open",
                egui::FontId::proportional(20.0),
                ui.visuals().weak_text_color(),
            );
            return;
        };
        let image_size = vec2(width as f32, height as f32);

        if app.fit_pending {
            app.view.fit(image_size, canvas_rect.size());
            app.fit_pending = false;
        }

        handle_view_input(app, ui, &response);
        let image_rect = app.view.image_rect(canvas_rect, image_size);
        handle_pointer(app, ui, &response, image_rect);

        let painter = ui.painter_at(canvas_rect);
        paint_checkerboard(&painter, image_rect.intersect(canvas_rect));

        let texture = if app.comparing {
            app.session
                .original_buffer()
                .map(|b| app.textures.get_or_create_texture(b, ctx))
        } else if app.session.state().is_drawing() {
            app.session
                .current_buffer()
                .map(|b| app.textures.upload_live(b, ctx))
        } else {
            app.session
                .current_buffer()
                .map(|b| app.textures.get_or_create_texture(b, ctx))
        };
        if let Some(texture) = texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture, image_rect, uv, Color32::WHITE);
        }

        if app.session.is_busy() {
            let spinner_rect = Rect::from_center_size(canvas_rect.center(), vec2(48.0, 48.0));
            ui.put(spinner_rect, egui::Spinner::new().size(48.0));
        }
    });
}

/// Wheel zoom, middle-button or space+drag pan
fn handle_view_input(app: &mut EraserApp, ui: &egui::Ui, response: &egui::Response) {
    let (scroll, space_down) = ui.input(|i| (i.raw_scroll_delta.y, i.key_down(egui::Key::Space)));
    if response.hovered() && scroll != 0.0 {
        app.zoom(scroll.signum());
    }
    if response.dragged_by(PointerButton::Middle) || (space_down && response.dragged_by(PointerButton::Primary)) {
        app.view.pan(response.drag_delta());
    }
}

/// Brush strokes and wand clicks
fn handle_pointer(app: &mut EraserApp, ui: &egui::Ui, response: &egui::Response, image_rect: Rect) {
    let (pressed, down, released, moved, pos, space_down) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.primary_released(),
            i.pointer.is_moving(),
            i.pointer.interact_pos(),
            i.key_down(egui::Key::Space),
        )
    });
    let Some(pos) = pos else {
        return;
    };
    let image_pos = app.view.screen_to_image(pos, image_rect);

    if pressed && response.hovered() && !space_down && !app.comparing {
        app.pointer_pressed(image_pos.x, image_pos.y);
    } else if down && moved && app.session.state().is_drawing() {
        app.session.brush_move(image_pos.x, image_pos.y);
    }

    if released && app.session.state().is_drawing() {
        app.session.brush_up();
    }
}

fn paint_checkerboard(painter: &egui::Painter, rect: Rect) {
    if !rect.is_positive() {
        return;
    }
    painter.rect_filled(rect, 0.0, Color32::from_gray(200));
    let cols = (rect.width() / CHECKER_SIZE).ceil() as usize;
    let rows = (rect.height() / CHECKER_SIZE).ceil() as usize;
    for row in 0..rows {
        for col in (row % 2..cols).step_by(2) {
            let min = rect.min + vec2(col as f32, row as f32) * CHECKER_SIZE;
            let cell = Rect::from_min_size(min, vec2(CHECKER_SIZE, CHECKER_SIZE)).intersect(rect);
            painter.rect_filled(cell, 0.0, Color32::from_gray(160));
        }
    }
}
