//! Plain-text rendering of the panel model.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use domain_panel_core::types::{DomainCard, PanelView};
use domain_panel_core::urgency::StatusIndicator;

const BAR_WIDTH: usize = 20;

pub fn render_panel(view: &PanelView, total: usize, updated_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let updated = updated_at.map_or_else(
        || "never".to_string(),
        |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    let layout = match view {
        PanelView::Hidden => {
            let _ = writeln!(out, "Domains: {total}  (nothing to show, updated {updated})");
            return out;
        }
        PanelView::Inline(_) => "inline",
        PanelView::Grid(_) => "grid",
    };
    let _ = writeln!(out, "Domains: {total}  [{layout}]  updated {updated}");

    for card in view.cards() {
        match view {
            PanelView::Grid(_) => render_grid_card(&mut out, card),
            _ => render_inline_card(&mut out, card),
        }
    }
    out
}

/// The panel model as pretty-printed JSON.
pub fn render_json(view: &PanelView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

fn render_inline_card(out: &mut String, card: &DomainCard) {
    let dot = match card.indicator {
        StatusIndicator::Red => "(!)",
        StatusIndicator::Yellow => "(~)",
        StatusIndicator::Green => "( )",
    };
    let _ = writeln!(
        out,
        "{dot} {:<32} {:<18} exp {:<10} {:<10} {}",
        card.name, card.registrar, card.end_date, card.renewal_price, card.days_label
    );
    render_tags(out, card);
}

fn render_grid_card(out: &mut String, card: &DomainCard) {
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  <{}>", card.name, card.link);
    let _ = writeln!(out, "  {:<24} {}", card.registrar, card.end_date);
    let _ = writeln!(
        out,
        "  {:<10} {} {}",
        card.renewal_price,
        progress_bar(card.urgency.progress),
        card.days_label
    );
    render_tags(out, card);
}

fn render_tags(out: &mut String, card: &DomainCard) {
    if card.note_tags.is_empty() {
        return;
    }
    let tags: Vec<String> = card
        .note_tags
        .iter()
        .map(|tag| format!("#{}", tag.label))
        .collect();
    let _ = writeln!(out, "      {}", tags.join(" "));
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn progress_bar(progress: Option<f64>) -> String {
    let Some(ratio) = progress else {
        return format!("[{}]", " ".repeat(BAR_WIDTH));
    };
    let filled = ((ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).max(1);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
