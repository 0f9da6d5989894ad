use std::path::PathBuf;

use crate::app::{EraserApp, Status};
use crate::settings::{BrushSettings, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, ToolKind};

pub fn tools_panel(app: &mut EraserApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Background Eraser");
            ui.separator();

            file_section(app, ui);
            ui.separator();

            let has_image = app.session.has_image();
            ui.add_enabled_ui(has_image, |ui| {
                tool_section(app, ui);
                ui.separator();
                history_section(app, ui);
                ui.separator();
                view_section(app, ui);
            });

            ui.separator();
            if ui.button("Settings…").clicked() {
                app.capacity_input = app.session.history().capacity();
                app.show_settings = true;
            }

            match &app.status {
                Some(Status::Info(text)) => {
                    ui.label(text);
                }
                Some(Status::Error(text)) => {
                    ui.colored_label(egui::Color32::LIGHT_RED, text);
                }
                None => {}
            }
        });
}

fn file_section(app: &mut EraserApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut app.open_path);
        if ui.button("Open").clicked() && !app.open_path.is_empty() {
            let path = PathBuf::from(app.open_path.trim());
            app.open_file(&path);
        }
    });

    let has_image = app.session.has_image();
    ui.add_enabled_ui(has_image, |ui| {
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut app.export_path);
            if ui.button("Save PNG").clicked() {
                app.export();
            }
        });
        if ui.button("Close image").clicked() {
            app.close_image();
        }
    });
}

fn tool_section(app: &mut EraserApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        for tool in [ToolKind::Brush, ToolKind::MagicWand] {
            let is_selected = app.session.tool() == tool;
            if ui.selectable_label(is_selected, tool.name()).clicked() && !is_selected {
                log::info!("Tool selected from UI: {}", tool.name());
                app.set_tool(tool);
            }
        }
    });

    match app.session.tool() {
        ToolKind::Brush => {
            let mut brush: BrushSettings = app.session.brush();
            let mut feather = (brush.feather * 100.0).round() as u32;
            let mut opacity = (brush.opacity * 100.0).round() as u32;

            let mut changed = ui
                .add(egui::Slider::new(&mut brush.size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).text("Size").suffix("px"))
                .changed();
            changed |= ui.add(egui::Slider::new(&mut feather, 0..=100).text("Feather").suffix("%")).changed();
            changed |= ui.add(egui::Slider::new(&mut opacity, 0..=100).text("Opacity").suffix("%")).changed();

            if changed {
                brush.feather = feather as f32 / 100.0;
                brush.opacity = opacity as f32 / 100.0;
                app.session.set_brush(brush);
            }
        }
        ToolKind::MagicWand => {
            let mut params = app.session.params();
            let mut opacity = (params.opacity * 100.0).round() as u32;

            let mut changed = ui
                .add(egui::Slider::new(&mut params.tolerance, 0..=100).text("Tolerance"))
                .changed();
            changed |= ui.add(egui::Slider::new(&mut opacity, 0..=100).text("Opacity").suffix("%")).changed();
            changed |= ui
                .add(egui::Slider::new(&mut params.smoothness, 0..=100).text("Smoothness"))
                .changed();

            if changed {
                params.opacity = opacity as f32 / 100.0;
                app.set_params(params);
            }

            if app.session.live_selection().is_some() {
                ui.weak("Adjusting the last selection");
            } else {
                ui.weak("Click the background to erase it");
            }
        }
    }
}

fn history_section(app: &mut EraserApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        if ui.add_enabled(app.session.can_undo(), egui::Button::new("Undo")).clicked() {
            app.undo();
        }
        if ui.add_enabled(app.session.can_redo(), egui::Button::new("Redo")).clicked() {
            app.redo();
        }
        if ui.button("Reset").clicked() {
            app.reset_to_original();
        }
    });

    let history = app.session.history();
    if !history.is_empty() {
        ui.label(format!(
            "Step {} of {} (max {})",
            history.cursor() + 1,
            history.len(),
            history.capacity()
        ));
    }
}

fn view_section(app: &mut EraserApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        if ui.button("−").clicked() {
            app.zoom(-1.0);
        }
        ui.label(format!("{}%", app.view.zoom_percent()));
        if ui.button("+").clicked() {
            app.zoom(1.0);
        }
        if ui.button("Fit").clicked() {
            app.fit_pending = true;
        }
    });

    let compare = ui.button("Hold to compare");
    app.comparing = compare.is_pointer_button_down_on();
}
