//! Summary cards; clicking one applies its preset filter

use egui::{RichText, Ui};

use eudr_core::{Command, Counters, StatCard};
use eudr_ui::theme::{accent_color, category_color, muted_color};
use eudr_core::detail::TypeCategory;

/// Cards in display order with their caption and count
pub fn cards(counters: &Counters) -> [(StatCard, &'static str, usize); 4] {
    [
        (StatCard::Total, "Total restrictions", counters.total),
        (StatCard::Eudr, "EUDR relevant", counters.eudr),
        (StatCard::Environmental, "Environmental", counters.environmental),
        (StatCard::Water, "Water", counters.water),
    ]
}

fn card_color(card: StatCard) -> egui::Color32 {
    match card {
        StatCard::Total => accent_color(),
        StatCard::Eudr => egui::Color32::from_rgb(142, 36, 170),
        StatCard::Environmental => category_color(TypeCategory::Environmental),
        StatCard::Water => category_color(TypeCategory::Water),
    }
}

pub fn stat_cards(ui: &mut Ui, counters: &Counters, commands: &mut Vec<Command>) {
    ui.columns(4, |columns| {
        for (ui, (card, caption, count)) in columns.iter_mut().zip(cards(counters)) {
            let color = card_color(card);
            let response = egui::Frame::none()
                .fill(color.linear_multiply(0.15))
                .stroke(egui::Stroke::new(1.0, color))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(count.to_string()).size(26.0).strong().color(color));
                        ui.label(RichText::new(caption).color(muted_color()));
                    });
                })
                .response
                .interact(egui::Sense::click())
                .on_hover_text("Show these restrictions in the table");

            if response.clicked() {
                commands.push(Command::StatCard(card));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_follow_counters() {
        let counters = Counters {
            total: 3,
            eudr: 1,
            environmental: 1,
            water: 2,
        };
        let counts: Vec<usize> = cards(&counters).iter().map(|(_, _, n)| *n).collect();
        assert_eq!(counts, vec![3, 1, 1, 2]);
        assert_eq!(cards(&counters)[1].0, StatCard::Eudr);
    }
}
