use super::fake_browser::{BrowserState, FakeLauncher};
use crate::config::{SandboxLocators, StructureExpectations};
use crate::error::{DriverError, PageError};
use crate::pages::{InteractiveScenario, PageObject};
use serde_json::json;
use std::time::Duration;

const URL: &str = "https://sandbox.test/";

fn expectations() -> StructureExpectations {
    StructureExpectations {
        title: "Automation Sandbox".to_string(),
        section_count: 2,
        section_prefix: "page_section".to_string(),
        link_count: None,
    }
}

fn scenario(state: BrowserState) -> InteractiveScenario<FakeLauncher> {
    InteractiveScenario::new(
        URL,
        FakeLauncher::new(state),
        SandboxLocators::default(),
        Duration::from_secs(2),
        expectations(),
    )
    .unwrap()
}

fn choices_state(first_checked: bool, second_checked: bool) -> BrowserState {
    let loc = SandboxLocators::default();
    let mut state = BrowserState::default();
    state.visible.extend(loc.checkboxes.iter().cloned());
    state.visible.extend(loc.radio_buttons.iter().cloned());
    state.checked.insert(loc.radio_buttons[0].clone(), first_checked);
    state.checked.insert(loc.radio_buttons[1].clone(), second_checked);
    state.values.insert(loc.radio_buttons[0].clone(), "Si".to_string());
    state.values.insert(loc.radio_buttons[1].clone(), "No".to_string());
    state.texts.insert(loc.first_checkbox_label.clone(), "Pasta 🍝".to_string());
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dynamic_reveal_returns_hidden_text() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.reveal_button, &loc.hidden_element]);
        state
            .texts
            .insert(loc.hidden_element.clone(), "OMG, aparezco después de 3 segundos".to_string());
        let page = scenario(state);

        let text = page.dynamic_reveal().await.unwrap();
        assert_eq!(text, "OMG, aparezco después de 3 segundos");

        let state = page_state(&page);
        assert_eq!(state.navigations, vec![URL.to_string()]);
        assert_eq!(state.clicks, vec![loc.reveal_button.clone()]);
        assert_eq!(state.launches, 1);
        assert_eq!(state.closes, 1);
    }

    #[tokio::test]
    async fn test_dynamic_reveal_never_visible() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.reveal_button]);
        let page = scenario(state);

        let err = page.dynamic_reveal().await.unwrap_err();
        assert!(matches!(err, PageError::Visibility(ref sel) if *sel == loc.hidden_element));
        assert_eq!(page_state(&page).closes, 1);
    }

    fn short_deadline(state: BrowserState, wait: Duration) -> InteractiveScenario<FakeLauncher> {
        InteractiveScenario::new(
            URL,
            FakeLauncher::new(state),
            SandboxLocators::default(),
            Duration::from_millis(500),
            expectations(),
        )
        .unwrap()
        .with_wait(wait)
    }

    #[tokio::test]
    async fn test_hidden_element_wait_ends_before_deadline() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.reveal_button]);
        let page = short_deadline(state, Duration::from_millis(100));

        let err = page.dynamic_reveal().await.unwrap_err();
        assert!(
            matches!(err, PageError::Visibility(ref sel) if *sel == loc.hidden_element),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_step_wait_is_capped_by_deadline() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.reveal_button]);
        let page = short_deadline(state, Duration::from_secs(10));

        let err = page.dynamic_reveal().await.unwrap_err();
        assert!(
            matches!(err, PageError::Visibility(_)),
            "unexpected error: {err:?}"
        );
        assert_eq!(page_state(&page).closes, 1);
    }

    #[tokio::test]
    async fn test_missing_element_reports_step_wait() {
        let page = short_deadline(BrowserState::default(), Duration::from_millis(100));

        let err = page.enter_text("x").await.unwrap_err();
        match err {
            PageError::Interaction {
                operation,
                source: DriverError::NotVisible { selector, waited },
            } => {
                assert_eq!(operation, "text entry");
                assert_eq!(selector, SandboxLocators::default().text_field);
                assert_eq!(waited, Duration::from_millis(100));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_trigger_is_interaction_error() {
        let page = scenario(BrowserState::default());
        let err = page.dynamic_reveal().await.unwrap_err();
        match err {
            PageError::Interaction { operation, source } => {
                assert_eq!(operation, "dynamic reveal");
                assert!(matches!(source, DriverError::NotVisible { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_enter_text_echoes_value() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.text_field]);
        let page = scenario(state);

        let echoed = page.enter_text("Texto de prueba").await.unwrap();
        assert_eq!(echoed, "Texto de prueba");
    }

    #[tokio::test]
    async fn test_probe_choices_second_radio_wins() {
        let page = scenario(choices_state(false, true));
        let probe = page.probe_choices().await.unwrap();
        assert_eq!(probe.radio_value, "No");
        assert_eq!(probe.checkbox_label, "Pasta 🍝");

        let loc = SandboxLocators::default();
        let clicks = page_state(&page).clicks.clone();
        assert_eq!(clicks.len(), loc.checkboxes.len() + 2);
        assert_eq!(clicks.last(), Some(&loc.radio_buttons[1]));
    }

    #[tokio::test]
    async fn test_probe_choices_both_checked_is_ambiguous() {
        let page = scenario(choices_state(true, true));
        let err = page.probe_choices().await.unwrap_err();
        assert!(matches!(err, PageError::AmbiguousSelection));
        assert_eq!(page_state(&page).closes, 1);
    }

    #[tokio::test]
    async fn test_probe_choices_none_checked_gives_empty_value() {
        let page = scenario(choices_state(false, false));
        let probe = page.probe_choices().await.unwrap();
        assert_eq!(probe.radio_value, "");
    }

    #[tokio::test]
    async fn test_select_dropdowns() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[
            &loc.select,
            &loc.menu_button,
            &loc.menu,
            &loc.menu_option,
            &loc.submit_button,
        ]);
        state.texts.insert(loc.menu_option.clone(), "Martes".to_string());
        let page = scenario(state);

        let selection = page.select_dropdowns().await.unwrap();
        assert_eq!(selection.select_value, "Fútbol");
        assert_eq!(selection.menu_value, "Martes");
        assert_eq!(
            page_state(&page).clicks,
            vec![
                loc.menu_button.clone(),
                loc.menu_option.clone(),
                loc.submit_button.clone()
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_popup_captures_and_closes() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.popup_button, &loc.modal, &loc.modal_close]);
        state
            .texts
            .insert(loc.modal_body.clone(), "¿Viste? ¡Apareció un Pop-up!".to_string());
        let page = scenario(state);

        let text = page.handle_popup().await.unwrap();
        assert_eq!(text, "¿Viste? ¡Apareció un Pop-up!");
        assert_eq!(page_state(&page).clicks.last(), Some(&loc.modal_close));
    }

    #[tokio::test]
    async fn test_shadow_content() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.shadow_host]);
        state.shadow = json!({ "html": "<p>Este es un ejemplo de Shadow DOM</p>", "missing": null });
        let page = scenario(state);

        let html = page.shadow_content().await.unwrap();
        assert_eq!(html, "<p>Este es un ejemplo de Shadow DOM</p>");
    }

    #[tokio::test]
    async fn test_shadow_content_missing_element_is_empty() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.shadow_host]);
        state.shadow = json!({ "html": null, "missing": "shadow element" });
        let page = scenario(state);

        assert_eq!(page.shadow_content().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_table_snapshot_reads_across_reload() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.dynamic_table, &loc.static_table]);
        state.tables.insert(
            loc.dynamic_table.clone(),
            vec!["41".to_string(), "87".to_string()],
        );
        state.tables.insert(
            loc.static_table.clone(),
            vec!["Messi".to_string(), "Messi".to_string()],
        );
        let page = scenario(state);

        let snapshot = page.table_snapshot().await.unwrap();
        assert_eq!(snapshot.dynamic_before, "41");
        assert_eq!(snapshot.dynamic_after, "87");
        assert_eq!(snapshot.static_before, "Messi");
        assert_eq!(snapshot.static_after, "Messi");
        assert!(snapshot.dynamic_changed());
        assert!(snapshot.static_unchanged());
        assert_eq!(page_state(&page).reloads, 1);
    }

    #[tokio::test]
    async fn test_timeout_closes_session() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.hang_on = Some(loc.text_field.clone());
        let page = InteractiveScenario::new(
            URL,
            FakeLauncher::new(state),
            loc,
            Duration::from_millis(100),
            expectations(),
        )
        .unwrap();

        let err = page.enter_text("x").await.unwrap_err();
        assert!(matches!(
            err,
            PageError::Interaction {
                operation: "text entry",
                source: DriverError::Timeout(_)
            }
        ));
        assert_eq!(page_state(&page).closes, 1);
    }

    #[tokio::test]
    async fn test_launch_failure_is_interaction_error() {
        let mut launcher = FakeLauncher::new(BrowserState::default());
        launcher.refuse = true;
        let page = InteractiveScenario::new(
            URL,
            launcher,
            SandboxLocators::default(),
            Duration::from_secs(1),
            expectations(),
        )
        .unwrap();

        let err = page.handle_popup().await.unwrap_err();
        assert!(matches!(
            err,
            PageError::Interaction {
                source: DriverError::Connect { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_every_operation_uses_a_new_session() {
        let loc = SandboxLocators::default();
        let mut state = BrowserState::default();
        state.show(&[&loc.text_field]);
        let page = scenario(state);

        page.enter_text("a").await.unwrap();
        page.enter_text("b").await.unwrap();

        let state = page_state(&page);
        assert_eq!(state.launches, 2);
        assert_eq!(state.closes, 2);
        assert_eq!(state.navigations.len(), 2);
    }

    #[tokio::test]
    async fn test_structure_from_page_source() {
        let mut state = BrowserState::default();
        state.source = r#"<html><head><title> Automation Sandbox </title></head><body>
            <div id="page_section_1">one</div>
            <div id="page_section_2">two</div>
            <a href="https://x">x</a>
        </body></html>"#
            .to_string();
        let page = scenario(state);

        assert_eq!(page.title().await.unwrap(), "Automation Sandbox");
        assert_eq!(page.sections().await.unwrap().len(), 2);
        assert!(page.verify_structure().await.unwrap());
        // title + sections + verify (title, sections, links)
        assert_eq!(page_state(&page).launches, 5);
    }

    fn page_state(
        page: &InteractiveScenario<FakeLauncher>,
    ) -> std::sync::MutexGuard<'_, BrowserState> {
        page.launcher().state()
    }
}
