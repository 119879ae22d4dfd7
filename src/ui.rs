// ui.rs — 左上角的灯光预设按钮

use crate::preset::Preset;
use egui::{Color32, Rounding, Stroke};

const ANCHOR: egui::Pos2 = egui::Pos2 { x: 15.0, y: 15.0 };
const GAP: f32 = 10.0;
const TEXT: Color32 = Color32::from_rgb(0x11, 0x11, 0x11);

/// 悬停时稍微放大
const HOVER_EXPANSION: f32 = 1.5;

/// Base and hover looks for the preset buttons. egui picks the variant from
/// pointer position each frame, so nothing is remembered between frames.
pub fn apply_button_style(style: &mut egui::Style) {
    style.spacing.item_spacing.y = GAP;
    style.spacing.button_padding = egui::vec2(14.0, 8.0);

    let base_fill = Color32::from_rgba_unmultiplied(0xff, 0xff, 0xff, 0xaa);
    let widgets = &mut style.visuals.widgets;
    for (visuals, fill, expansion) in [
        (&mut widgets.inactive, base_fill, 0.0),
        (&mut widgets.hovered, Color32::WHITE, HOVER_EXPANSION),
        (&mut widgets.active, Color32::WHITE, HOVER_EXPANSION),
    ] {
        visuals.weak_bg_fill = fill;
        visuals.bg_fill = fill;
        visuals.bg_stroke = Stroke::NONE;
        visuals.fg_stroke = Stroke::new(1.0, TEXT);
        visuals.rounding = Rounding::same(6.0);
        visuals.expansion = expansion;
    }
}

/// Draws the preset column. Returns the preset whose button was clicked this frame.
pub fn preset_bar(ctx: &egui::Context) -> Option<Preset> {
    let mut clicked = None;
    egui::Area::new("preset_bar")
        .fixed_pos(ANCHOR)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            apply_button_style(ui.style_mut());
            ui.vertical(|ui| {
                for preset in Preset::ALL {
                    let label = crate::i18n::tr_or(&format!("preset.{}", preset.name()), preset.label());
                    let text = egui::RichText::new(label).strong().color(TEXT);
                    if ui.button(text).clicked() {
                        clicked = Some(preset);
                    }
                }
            });
        });
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_variant_is_lighter_and_larger() {
        let mut style = egui::Style::default();
        apply_button_style(&mut style);
        let w = &style.visuals.widgets;

        assert_eq!(w.inactive.weak_bg_fill.a(), 0xaa);
        assert_eq!(w.hovered.weak_bg_fill, Color32::WHITE);
        assert_eq!(w.inactive.expansion, 0.0);
        assert!(w.hovered.expansion > 0.0);
        assert_eq!(w.inactive.bg_stroke, Stroke::NONE);
        assert_eq!(style.spacing.item_spacing.y, GAP);
    }

    #[test]
    fn bar_without_input_selects_nothing() {
        let ctx = egui::Context::default();
        for _ in 0..2 {
            let mut clicked = Some(Preset::Studio);
            let _ = ctx.run(egui::RawInput::default(), |ctx| clicked = preset_bar(ctx));
            assert_eq!(clicked, None);
        }
    }
}
