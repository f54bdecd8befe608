use egui::{Color32, Context, RichText, Ui};

use crate::scene::SceneContext;
use crate::scene::material::Color;
use crate::ui::bindings::{BINDINGS, Binding, Control, Field, KNOT_FOLDER, Value};
use crate::ui::theme::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelEvent {
    pub field: Field,
    pub value: Value,
}

/// Draws the debug panel from the binding table and returns the edits made
/// this frame. Nothing is written to `scene` here.
pub fn draw_debug_panel(ctx: &Context, scene: &SceneContext) -> Vec<PanelEvent> {
    let mut events = Vec::new();

    egui::SidePanel::right("debug_panel")
        .resizable(false)
        .exact_width(280.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(10.0))
        .show(ctx, |ui| {
            ui.label(RichText::new("Controls").color(TEXT_MUTED).size(11.0).strong());
            ui.add_space(4.0);

            binding_grid(ui, "root_bindings", scene, None, &mut events);
            ui.add_space(6.0);

            egui::CollapsingHeader::new(RichText::new(KNOT_FOLDER).color(TEXT_BRIGHT))
                .default_open(true)
                .show(ui, |ui| {
                    binding_grid(ui, "knot_bindings", scene, Some(KNOT_FOLDER), &mut events);
                });
        });

    events
}

fn binding_grid(
    ui: &mut Ui,
    id: &str,
    scene: &SceneContext,
    folder: Option<&str>,
    events: &mut Vec<PanelEvent>,
) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([10.0, 6.0])
        .min_col_width(90.0)
        .show(ui, |ui| {
            for binding in BINDINGS.iter().filter(|b| b.folder == folder) {
                ui.label(RichText::new(binding.label).color(TEXT_PRIMARY));
                if let Some(value) = binding_widget(ui, binding, scene.read(binding.field)) {
                    events.push(PanelEvent {
                        field: binding.field,
                        value,
                    });
                }
                ui.end_row();
            }
        });
}

fn binding_widget(ui: &mut Ui, binding: &Binding, current: Value) -> Option<Value> {
    match (binding.control, current) {
        (Control::Checkbox, Value::Bool(mut checked)) => ui
            .checkbox(&mut checked, "")
            .changed()
            .then_some(Value::Bool(checked)),
        (Control::ColorPicker, Value::Color(color)) => {
            let mut rgb = color.to_array();
            let changed = ui.color_edit_button_srgb(&mut rgb).changed();
            changed.then(|| Value::Color(Color::from_array(rgb)))
        }
        (Control::Button, _) => ui
            .add(egui::Button::new(RichText::new(binding.label).color(TEXT_BRIGHT)).fill(ACCENT))
            .clicked()
            .then_some(Value::Trigger),
        (Control::Slider { min, max, step }, Value::Number(mut number)) => ui
            .add(egui::Slider::new(&mut number, min..=max).step_by(step as f64))
            .changed()
            .then_some(Value::Number(number)),
        _ => None,
    }
}

pub fn draw_help_overlay(ctx: &Context, distance: f32, fps: f32) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id =
                        Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(
                        RichText::new("LMB+Drag - Orbit | RMB+Drag - Pan | Scroll - Zoom")
                            .color(TEXT_MUTED),
                    );
                    ui.label(
                        RichText::new(format!("Distance: {distance:.1} | {fps:.0} fps"))
                            .color(TEXT_MUTED),
                    );
                });
        });
}
