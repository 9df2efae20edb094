#[cfg(test)]
mod tests {
    use super::super::app_state::*;
    use super::super::commands::Command;
    use super::super::events::Message;
    use crate::ViewerOptions;
    use crate::interactive_ratatui::constants::{LOAD_OLDER_DELAY_MS, MESSAGE_CLEAR_DELAY_MS};
    use crate::interactive_ratatui::domain::models::{FetchKind, FetchRequest};
    use crate::source::{FetchError, ResourceId};
    use crate::viewer::Projection;
    use std::time::Duration;

    const APP_LOG: &str = "/var/log/app.log";

    fn options(chunk_size: usize, follow: bool) -> ViewerOptions {
        ViewerOptions {
            chunk_size,
            poll_interval: Duration::ZERO,
            follow,
            ..ViewerOptions::default()
        }
    }

    fn numbered_log(count: usize) -> String {
        (0..count)
            .map(|i| format!("2024-01-01 10:00:{i:02}.000 [main] INFO app.Main - entry {i}\n"))
            .collect()
    }

    fn expect_fetch(command: Command) -> FetchRequest {
        match command {
            Command::Fetch(request) => request,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    fn layout(state: &mut AppState, viewport_height: usize) {
        let content_height = state.content_height();
        state.update(Message::Layout {
            content_height,
            viewport_height,
        });
    }

    fn loaded_state(text: &str, chunk_size: usize, viewport_height: usize) -> AppState {
        let mut state = AppState::new(&options(chunk_size, true), Vec::new());
        let request = expect_fetch(state.update(Message::SelectResource(ResourceId::new(APP_LOG))));
        state.update(Message::FetchCompleted {
            generation: request.generation,
            kind: FetchKind::Initial,
            text: text.to_string(),
        });
        layout(&mut state, viewport_height);
        state
    }

    fn tail(state: &mut AppState, text: &str) {
        let request = expect_fetch(state.update(Message::TailTick));
        assert_eq!(request.kind, FetchKind::Tail);
        state.update(Message::FetchCompleted {
            generation: request.generation,
            kind: FetchKind::Tail,
            text: text.to_string(),
        });
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::default();

        assert_eq!(state.mode, Mode::Viewer);
        assert!(state.selected_resource().is_none());
        assert!(!state.resources.is_loading);
        assert!(!state.tailing.is_enabled());
        assert!(state.view.controller.window().is_empty());
    }

    #[test]
    fn test_select_resource_issues_initial_fetch() {
        let mut state = AppState::new(&options(500, false), Vec::new());

        let request = expect_fetch(state.update(Message::SelectResource(ResourceId::new(APP_LOG))));

        assert_eq!(request.kind, FetchKind::Initial);
        assert_eq!(request.generation, 1);
        assert_eq!(request.resource, ResourceId::new(APP_LOG));
        assert!(state.resources.is_loading);
        assert_eq!(state.resources.list.len(), 1);
    }

    #[test]
    fn test_initial_load_shows_last_chunk_at_bottom() {
        let state = loaded_state(&numbered_log(6), 2, 10);

        assert!(!state.resources.is_loading);
        assert_eq!(state.view.controller.window().len(), 2);
        assert_eq!(state.view.projection.visible(), &[0, 1]);
        assert_eq!(state.first_line_number(), 5);
        assert!(state.view.scroll.is_at_bottom());
    }

    #[test]
    fn test_fetch_failure_then_success() {
        let mut state = AppState::new(&options(500, false), Vec::new());
        let request = expect_fetch(state.update(Message::SelectResource(ResourceId::new(APP_LOG))));

        state.update(Message::FetchFailed {
            generation: request.generation,
            kind: FetchKind::Initial,
            error: FetchError::NotFound {
                path: APP_LOG.to_string(),
            },
        });

        assert_eq!(
            state.resources.error.as_deref(),
            Some("Log file not found: /var/log/app.log")
        );
        assert!(state.view.controller.window().is_empty());
        assert!(state.view.controller.store().is_empty());
        assert_eq!(state.content_height(), 0);
        assert!(!state.resources.is_loading);

        let retry = expect_fetch(state.update(Message::Reload));
        assert_eq!(retry.generation, 2);
        // The error stays visible until a fetch succeeds
        assert!(state.resources.error.is_some());

        state.update(Message::FetchCompleted {
            generation: retry.generation,
            kind: FetchKind::Initial,
            text: "2024-01-01 10:00:00.000 [main] INFO app.Main - recovered\n".to_string(),
        });

        assert!(state.resources.error.is_none());
        assert_eq!(state.view.controller.window().len(), 1);
    }

    #[test]
    fn test_stale_initial_response_is_discarded() {
        let mut state = AppState::new(
            &options(500, false),
            vec![ResourceId::new("/tmp/a.log"), ResourceId::new("/tmp/b.log")],
        );
        let first = expect_fetch(state.update(Message::SelectResource(ResourceId::new("/tmp/a.log"))));
        let second = expect_fetch(state.update(Message::NextResource));
        assert_eq!(second.resource, ResourceId::new("/tmp/b.log"));

        state.update(Message::FetchCompleted {
            generation: first.generation,
            kind: FetchKind::Initial,
            text: numbered_log(3),
        });

        assert!(state.view.controller.window().is_empty());
        assert!(state.resources.is_loading);
    }

    #[test]
    fn test_reload_ignored_while_loading() {
        let mut state = AppState::new(&options(500, false), Vec::new());
        state.update(Message::SelectResource(ResourceId::new(APP_LOG)));

        assert!(matches!(state.update(Message::Reload), Command::None));
        assert_eq!(state.resources.generation, 1);
    }

    #[test]
    fn test_cycle_resources_wraps() {
        let mut state = AppState::new(
            &options(500, false),
            vec![ResourceId::new("/tmp/a.log"), ResourceId::new("/tmp/b.log")],
        );
        state.update(Message::SelectResource(ResourceId::new("/tmp/a.log")));

        let previous = expect_fetch(state.update(Message::PreviousResource));
        assert_eq!(previous.resource, ResourceId::new("/tmp/b.log"));
        assert_eq!(state.resources.selected, Some(1));

        let next = expect_fetch(state.update(Message::NextResource));
        assert_eq!(next.resource, ResourceId::new("/tmp/a.log"));
    }

    #[test]
    fn test_tail_appends_and_follows_bottom() {
        let mut state = loaded_state(&numbered_log(6), 2, 3);

        tail(&mut state, &numbered_log(8));

        assert_eq!(state.view.controller.window().len(), 4);
        assert_eq!(state.view.controller.store().len(), 8);
        layout(&mut state, 3);
        assert_eq!(state.view.scroll.offset(), 1);
        assert!(state.view.scroll.is_at_bottom());
    }

    #[test]
    fn test_tail_while_scrolled_up_keeps_position() {
        let mut state = loaded_state(&numbered_log(10), 10, 3);
        assert_eq!(state.view.scroll.offset(), 7);

        state.update(Message::ScrollUp(2));
        tail(&mut state, &numbered_log(12));
        layout(&mut state, 3);

        assert_eq!(state.view.controller.window().len(), 12);
        assert_eq!(state.view.scroll.offset(), 5);
        assert!(!state.view.scroll.is_at_bottom());
    }

    #[test]
    fn test_unchanged_tail_adds_nothing() {
        let mut state = loaded_state(&numbered_log(4), 10, 3);

        tail(&mut state, &numbered_log(4));

        assert_eq!(state.view.controller.window().len(), 4);
        assert!(!state.tailing.is_in_flight());
    }

    #[test]
    fn test_tail_failure_keeps_state() {
        let mut state = loaded_state(&numbered_log(4), 10, 3);
        let request = expect_fetch(state.update(Message::TailTick));

        state.update(Message::FetchFailed {
            generation: request.generation,
            kind: FetchKind::Tail,
            error: FetchError::NotFound {
                path: APP_LOG.to_string(),
            },
        });

        assert!(state.resources.error.is_none());
        assert_eq!(state.view.controller.window().len(), 4);
        assert!(!state.tailing.is_in_flight());
    }

    #[test]
    fn test_tail_tick_ignored_when_tailing_disabled() {
        let mut state = loaded_state(&numbered_log(4), 10, 3);
        state.update(Message::ToggleTailing);

        assert!(matches!(state.update(Message::TailTick), Command::None));
    }

    #[test]
    fn test_toggle_tailing_schedules_status_clear() {
        let mut state = AppState::new(&options(500, false), Vec::new());

        let command = state.update(Message::ToggleTailing);

        assert!(state.tailing.is_enabled());
        assert_eq!(state.ui.message.as_deref(), Some("Live tailing on"));
        assert!(matches!(command, Command::ScheduleClearMessage(MESSAGE_CLEAR_DELAY_MS)));
    }

    #[test]
    fn test_scroll_to_top_loads_older_and_restores_position() {
        let mut state = loaded_state(&numbered_log(6), 2, 1);
        assert_eq!(state.view.scroll.offset(), 1);

        let command = state.update(Message::ScrollToTop);
        assert!(matches!(
            command,
            Command::ScheduleLoadOlder { generation: 1, delay_ms: LOAD_OLDER_DELAY_MS }
        ));
        assert!(state.is_loading_older());

        // A second trigger while the first is pending is a no-op
        assert!(matches!(state.update(Message::ScrollUp(1)), Command::None));

        state.update(Message::LoadOlderReady(1));
        assert_eq!(state.view.controller.window().len(), 4);
        assert!(state.view.scroll.has_pending_restore());

        layout(&mut state, 1);
        // Entry 4 was the top row before the prepend; it still is
        assert_eq!(state.view.scroll.offset(), 2);
        assert!(!state.is_loading_older());
        assert_eq!(state.first_line_number(), 3);
    }

    #[test]
    fn test_load_older_at_start_is_noop() {
        let mut state = loaded_state(&numbered_log(3), 10, 10);

        assert!(matches!(state.update(Message::ScrollToTop), Command::None));
        assert!(!state.is_loading_older());
    }

    #[test]
    fn test_stale_load_older_is_ignored() {
        let mut state = loaded_state(&numbered_log(6), 2, 1);
        state.update(Message::ScrollToTop);
        let reload = expect_fetch(state.update(Message::Reload));

        state.update(Message::LoadOlderReady(1));
        assert_eq!(state.view.controller.window().len(), 2);
        assert!(!state.view.scroll.has_pending_restore());

        state.update(Message::FetchCompleted {
            generation: reload.generation,
            kind: FetchKind::Initial,
            text: numbered_log(6),
        });
        assert!(!state.is_loading_older());
    }

    #[test]
    fn test_tail_deferred_until_restore() {
        let mut state = loaded_state(&numbered_log(6), 2, 1);
        state.update(Message::ScrollToTop);
        state.update(Message::LoadOlderReady(1));
        assert!(state.view.scroll.has_pending_restore());

        tail(&mut state, &numbered_log(7));
        assert_eq!(state.view.controller.window().len(), 4);
        assert_eq!(state.view.deferred_tail.len(), 1);

        // Deferred lines count as known; the same text yields nothing new
        tail(&mut state, &numbered_log(7));
        assert_eq!(state.view.deferred_tail.len(), 1);

        layout(&mut state, 1);
        assert!(state.view.deferred_tail.is_empty());
        assert_eq!(state.view.controller.window().len(), 5);
        assert_eq!(state.view.controller.store().len(), 7);
        assert_eq!(state.view.scroll.offset(), 2);
    }

    #[test]
    fn test_reload_does_not_load_older_before_layout() {
        let mut state = loaded_state(&numbered_log(6), 2, 1);
        let reload = expect_fetch(state.update(Message::Reload));
        state.update(Message::FetchCompleted {
            generation: reload.generation,
            kind: FetchKind::Initial,
            text: numbered_log(6),
        });

        // The fresh view sits at offset 0 until the bottom request is laid out
        assert!(matches!(state.update(Message::ScrollUp(1)), Command::None));
        assert!(!state.is_loading_older());

        layout(&mut state, 1);
        assert_eq!(state.view.scroll.offset(), 1);
        assert!(matches!(
            state.update(Message::ScrollToTop),
            Command::ScheduleLoadOlder { .. }
        ));
    }

    #[test]
    fn test_toggle_expand_ignored_during_restore() {
        let text: String = (0..6)
            .map(|i| {
                format!(
                    "2024-01-01 10:00:{i:02}.000 [main] ERROR app.Main - failed {i}\n  at app.Db.connect(Db.java:42)\n  at app.Main.run(Main.java:7)\n"
                )
            })
            .collect();
        let mut state = loaded_state(&text, 2, 1);
        assert_eq!(state.content_height(), 4);

        state.update(Message::ScrollToTop);
        state.update(Message::LoadOlderReady(1));
        assert!(state.view.scroll.has_pending_restore());

        state.update(Message::ToggleExpand);
        assert!(!state.view.expanded);

        layout(&mut state, 1);
        // The former first entry starts at row 4 of the collapsed rows
        assert_eq!(state.view.scroll.offset(), 4);
        assert!(!state.view.scroll.has_pending_restore());

        state.update(Message::ToggleExpand);
        assert!(state.view.expanded);
        assert_eq!(state.content_height(), 12);
    }

    #[test]
    fn test_unfinished_last_line_completed_by_tail() {
        let mut state = loaded_state(
            "2024-01-01 10:00:00.000 [main] INFO app.Main - started\n2024-01-01 10:00:01.000 [main] INFO app.Main - conn",
            10,
            10,
        );
        assert_eq!(state.view.controller.window().len(), 2);
        assert_eq!(state.view.controller.store().raw_line_count(), 1);

        // A poll that still sees the same partial line changes nothing
        tail(
            &mut state,
            "2024-01-01 10:00:00.000 [main] INFO app.Main - started\n2024-01-01 10:00:01.000 [main] INFO app.Main - connec",
        );
        assert_eq!(state.view.controller.window().len(), 2);

        tail(
            &mut state,
            "2024-01-01 10:00:00.000 [main] INFO app.Main - started\n2024-01-01 10:00:01.000 [main] INFO app.Main - connected ok\n2024-01-01 10:00:02.000 [main] INFO app.Main - ready\n",
        );

        let mains: Vec<&str> = state
            .view
            .controller
            .window()
            .iter()
            .map(|entry| entry.main_line.as_str())
            .collect();
        assert_eq!(
            mains,
            vec![
                "2024-01-01 10:00:00.000 [main] INFO app.Main - started",
                "2024-01-01 10:00:01.000 [main] INFO app.Main - connected ok",
                "2024-01-01 10:00:02.000 [main] INFO app.Main - ready",
            ]
        );
        assert_eq!(state.view.projection.visible(), &[0, 1, 2]);
        assert_eq!(state.content_height(), 3);
        assert_eq!(state.view.controller.store().raw_line_count(), 3);
    }

    #[test]
    fn test_tail_extends_projection_in_place() {
        let mut state = loaded_state(&numbered_log(4), 20, 3);
        state.update(Message::EnterSearch);
        state.update(Message::QueryChanged("entry 1".to_string()));
        state.update(Message::ConfirmSearch);
        assert_eq!(state.view.projection.visible(), &[1]);

        tail(&mut state, &numbered_log(12));

        let view = &state.view;
        let mut rebuilt = Projection::new();
        rebuilt.rebuild(view.controller.window(), &view.filter, view.expanded);
        assert_eq!(view.projection, rebuilt);
        assert_eq!(view.projection.visible(), &[1, 10, 11]);
        assert_eq!(state.content_height(), 3);
    }

    #[test]
    fn test_search_filters_window_projection() {
        let text = "\
2024-01-01 10:00:00.000 [main] INFO app.Main - started
2024-01-01 10:00:01.000 [main] ERROR app.Main - failed
  at app.Db.connect(Db.java:42)
2024-01-01 10:00:02.000 [main] INFO app.Main - retrying
";
        let mut state = loaded_state(text, 10, 10);

        state.update(Message::EnterSearch);
        assert_eq!(state.mode, Mode::Search);

        state.update(Message::QueryChanged("db.java".to_string()));
        assert_eq!(state.view.projection.visible(), &[1]);
        // The window itself is untouched
        assert_eq!(state.view.controller.window().len(), 3);

        state.update(Message::ConfirmSearch);
        assert_eq!(state.mode, Mode::Viewer);
        assert_eq!(state.view.projection.visible(), &[1]);

        state.update(Message::EnterSearch);
        state.update(Message::CancelSearch);
        assert_eq!(state.view.projection.visible(), &[0, 1, 2]);
        assert!(!state.view.filter.is_active());
    }

    #[test]
    fn test_toggle_expand_changes_row_count() {
        let text = "\
2024-01-01 10:00:01.000 [main] ERROR app.Main - failed
  at app.Db.connect(Db.java:42)
  at app.Main.run(Main.java:7)
  at app.Main.main(Main.java:3)
";
        let mut state = loaded_state(text, 10, 10);
        assert_eq!(state.content_height(), 2);

        state.update(Message::ToggleExpand);
        assert!(state.view.expanded);
        assert_eq!(state.content_height(), 4);
    }

    #[test]
    fn test_help_mode_round_trip() {
        let mut state = AppState::default();

        state.update(Message::ShowHelp);
        assert_eq!(state.mode, Mode::Help);

        state.update(Message::CloseHelp);
        assert_eq!(state.mode, Mode::Viewer);
    }
}
