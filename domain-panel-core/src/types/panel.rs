use serde::Serialize;

use crate::urgency::{StatusIndicator, Urgency};

/// 缺失字段的占位文本
pub const PLACEHOLDER: &str = "N/A";

/// 卡片模式下注册商缺失时的占位文本
pub const UNKNOWN_REGISTRAR: &str = "Unknown registrar";

/// Note tag palette, assigned by position and cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Blue,
    Green,
    Purple,
    Red,
    Gray,
}

impl TagColor {
    pub const PALETTE: [Self; 5] = [Self::Blue, Self::Green, Self::Purple, Self::Red, Self::Gray];

    #[must_use]
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteTag {
    pub label: String,
    pub color: TagColor,
}

/// What a layout renders for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCard {
    pub id: u64,
    pub name: String,
    /// `https://{name}`
    pub link: String,
    pub registrar: String,
    pub renewal_price: String,
    /// `YYYY-MM-DD` or placeholder.
    pub end_date: String,
    /// `"{d} days"` or placeholder.
    pub days_label: String,
    pub urgency: Urgency,
    pub indicator: StatusIndicator,
    pub note_tags: Vec<NoteTag>,
    /// Card sits on a custom background image.
    pub translucent: bool,
}

/// Panel output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", content = "cards", rename_all = "lowercase")]
pub enum PanelView {
    /// Nothing to show: loading, failed, or no eligible domains.
    Hidden,
    Inline(Vec<DomainCard>),
    Grid(Vec<DomainCard>),
}

impl PanelView {
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    #[must_use]
    pub fn cards(&self) -> &[DomainCard] {
        match self {
            Self::Hidden => &[],
            Self::Inline(cards) | Self::Grid(cards) => cards,
        }
    }
}
