use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(31, 31, 31);
pub const BG_WIDGET: Color32 = Color32::from_rgb(66, 66, 66);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(79, 79, 79);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(89, 89, 89);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(235, 235, 235);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(140, 140, 140);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(47, 161, 214);

/// Compact dark look for the debug panel.
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_WIDGET;
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.6);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.slider_trailing_fill = true;

    for (widget, fill) in [
        (&mut visuals.widgets.inactive, BG_WIDGET),
        (&mut visuals.widgets.hovered, BG_WIDGET_HOVER),
        (&mut visuals.widgets.active, BG_WIDGET_ACTIVE),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.rounding = Rounding::same(2.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);

    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.slider_width = 120.0;
    style.spacing.interact_size.y = 20.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(10.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(11.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
