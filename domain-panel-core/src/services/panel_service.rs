//! 面板展示模型
//!
//! 把缓存状态和视图模式转换为各布局需要渲染的数据，不涉及任何标记或样式。

use std::sync::Arc;

use crate::services::ServiceContext;
use crate::types::{
    DomainCard, DomainRecord, FetchState, NoteTag, PanelView, TagColor, ViewMode, PLACEHOLDER,
    UNKNOWN_REGISTRAR,
};
use crate::urgency::{derive_urgency, status_indicator};

/// 面板展示服务
pub struct PanelService {
    ctx: Arc<ServiceContext>,
}

impl PanelService {
    /// 创建面板展示服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Build what the panel shows for a cache state and view mode.
    ///
    /// Errors, a first load in progress, and an empty eligible set all hide
    /// the panel.
    pub fn view(&self, state: &FetchState<Vec<DomainRecord>>, mode: ViewMode) -> PanelView {
        if state.error.is_some() || state.is_initial_load() {
            return PanelView::Hidden;
        }
        let Some(records) = state.data.as_deref() else {
            return PanelView::Hidden;
        };

        let cards: Vec<DomainCard> = eligible(records)
            .map(|record| self.card(record, mode))
            .collect();
        if cards.is_empty() {
            return PanelView::Hidden;
        }

        match mode {
            ViewMode::Inline => PanelView::Inline(cards),
            ViewMode::Grid => PanelView::Grid(cards),
        }
    }

    /// Card for one record.
    pub fn card(&self, record: &DomainRecord, mode: ViewMode) -> DomainCard {
        let registrar_placeholder = match mode {
            ViewMode::Inline => PLACEHOLDER,
            ViewMode::Grid => UNKNOWN_REGISTRAR,
        };

        DomainCard {
            id: record.id,
            name: record.name.clone(),
            link: record.link_url(),
            registrar: text_or(record.registrar(), registrar_placeholder),
            renewal_price: text_or(record.renewal_price(), PLACEHOLDER),
            end_date: record.end_date().map_or_else(
                || PLACEHOLDER.to_string(),
                |date| date.format("%Y-%m-%d").to_string(),
            ),
            days_label: record
                .expires_in_days
                .map_or_else(|| PLACEHOLDER.to_string(), |d| format!("{d} days")),
            urgency: derive_urgency(record.expires_in_days),
            indicator: status_indicator(record.expires_in_days),
            note_tags: record
                .note_tags()
                .into_iter()
                .enumerate()
                .map(|(i, label)| NoteTag {
                    label: label.to_string(),
                    color: TagColor::for_index(i),
                })
                .collect(),
            translucent: self.ctx.overrides.translucent_cards(),
        }
    }

    /// Number of eligible domains, for the overview tile.
    pub fn eligible_count(state: &FetchState<Vec<DomainRecord>>) -> usize {
        state
            .data
            .as_deref()
            .map_or(0, |records| eligible(records).count())
    }
}

/// Records that are displayed and counted.
pub fn eligible(records: &[DomainRecord]) -> impl Iterator<Item = &DomainRecord> + '_ {
    records.iter().filter(|r| r.is_eligible())
}

fn text_or(value: Option<&str>, placeholder: &str) -> String {
    value.unwrap_or(placeholder).to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain_panel_provider::normalizer::normalize_body;

    use super::*;
    use crate::config::ShellOverrides;
    use crate::error::CoreError;
    use crate::test_utils::{context, context_with, http_error, record, MockDomainApi};
    use crate::traits::InMemoryPreferenceStore;
    use crate::types::{BillingInfo, DomainStatus};
    use crate::urgency::{StatusIndicator, UrgencyTier};

    fn service() -> PanelService {
        PanelService::new(context(MockDomainApi::new(Vec::new())).ctx)
    }

    fn ready(records: Vec<DomainRecord>) -> FetchState<Vec<DomainRecord>> {
        FetchState {
            data: Some(records),
            ..FetchState::default()
        }
    }

    #[test]
    fn wrapped_verified_record_is_critical() {
        let records = normalize_body(
            r#"{"data":[{"ID":1,"Domain":"a.com","Status":"verified","expires_in_days":5}]}"#,
            "test",
        )
        .unwrap();
        let state = ready(records);

        assert_eq!(PanelService::eligible_count(&state), 1);
        let view = service().view(&state, ViewMode::Grid);
        let cards = view.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].urgency.tier, UrgencyTier::Critical);
        assert_eq!(cards[0].link, "https://a.com");
    }

    #[test]
    fn pending_only_hides_panel() {
        let records = normalize_body(
            r#"[{"ID":2,"Domain":"b.com","Status":"pending","expires_in_days":5}]"#,
            "test",
        )
        .unwrap();
        let state = ready(records);

        assert_eq!(PanelService::eligible_count(&state), 0);
        assert!(service().view(&state, ViewMode::Inline).is_hidden());
    }

    #[test]
    fn error_or_first_load_hides_panel() {
        let svc = service();

        let loading = FetchState::<Vec<DomainRecord>> {
            is_loading: true,
            ..FetchState::default()
        };
        assert!(svc.view(&loading, ViewMode::Grid).is_hidden());
        assert!(svc.view(&FetchState::default(), ViewMode::Grid).is_hidden());

        let mut failed = ready(vec![record(1, "a.com", DomainStatus::Verified, Some(5))]);
        failed.error = Some(CoreError::from(http_error(500)));
        assert!(svc.view(&failed, ViewMode::Grid).is_hidden());
        // 出错时仍保留数据，计数不受影响
        assert_eq!(PanelService::eligible_count(&failed), 1);
    }

    #[test]
    fn expired_is_shown_unknown_is_not() {
        let state = ready(vec![
            record(1, "gone.com", DomainStatus::Expired, Some(-3)),
            record(2, "odd.com", DomainStatus::Unknown, Some(40)),
            record(3, "wait.com", DomainStatus::Pending, Some(40)),
        ]);
        let view = service().view(&state, ViewMode::Inline);
        assert!(matches!(view, PanelView::Inline(_)));
        let names: Vec<_> = view.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["gone.com"]);
        assert_eq!(view.cards()[0].indicator, StatusIndicator::Red);
    }

    #[test]
    fn missing_expiry_still_renders_with_placeholders() {
        let state = ready(vec![record(1, "a.com", DomainStatus::Verified, None)]);
        let svc = service();

        let grid = svc.view(&state, ViewMode::Grid);
        let card = &grid.cards()[0];
        assert_eq!(card.urgency.tier, UrgencyTier::Unknown);
        assert_eq!(card.urgency.progress, None);
        assert_eq!(card.days_label, "N/A");
        assert_eq!(card.registrar, "Unknown registrar");
        assert_eq!(card.renewal_price, "N/A");
        assert_eq!(card.end_date, "N/A");
        assert!(card.note_tags.is_empty());

        let inline = svc.view(&state, ViewMode::Inline);
        assert_eq!(inline.cards()[0].registrar, "N/A");
        assert_eq!(inline.cards()[0].indicator, StatusIndicator::Green);
    }

    #[test]
    fn billing_fields_and_tags() {
        let mut rec = record(7, "shop.dev", DomainStatus::Verified, Some(42));
        rec.billing_info = Some(BillingInfo {
            registrar: Some("Porkbun".to_string()),
            renewal_price: Some("$10.87".to_string()),
            end_date: Some("2026-03-01T00:00:00Z".to_string()),
            notes: Some("main; ; shop;cdn;mail;dns;legacy".to_string()),
        });

        let card = service().card(&rec, ViewMode::Grid);
        assert_eq!(card.registrar, "Porkbun");
        assert_eq!(card.renewal_price, "$10.87");
        assert_eq!(card.end_date, "2026-03-01");
        assert_eq!(card.days_label, "42 days");
        assert_eq!(card.urgency.tier, UrgencyTier::Warning);
        assert_eq!(card.indicator, StatusIndicator::Green);

        let tags: Vec<_> = card
            .note_tags
            .iter()
            .map(|t| (t.label.as_str(), t.color))
            .collect();
        assert_eq!(
            tags,
            [
                ("main", TagColor::Blue),
                ("shop", TagColor::Green),
                ("cdn", TagColor::Purple),
                ("mail", TagColor::Red),
                ("dns", TagColor::Gray),
                ("legacy", TagColor::Blue),
            ]
        );
    }

    #[test]
    fn background_image_makes_cards_translucent() {
        let overrides = ShellOverrides {
            custom_background_image: Some("/bg.jpg".to_string()),
            ..ShellOverrides::default()
        };
        let t = context_with(
            MockDomainApi::new(Vec::new()),
            Arc::new(InMemoryPreferenceStore::new()),
            1280,
            overrides,
        );
        let svc = PanelService::new(t.ctx);
        let rec = record(1, "a.com", DomainStatus::Verified, Some(200));
        assert!(svc.card(&rec, ViewMode::Grid).translucent);
        assert!(!service().card(&rec, ViewMode::Grid).translucent);
    }
}
