use divot_core::shell::{is_submit_key, PanelId, ShellAction, ShellState};

#[test]
fn opening_an_overlay_replaces_the_previous_one() {
    let mut s = ShellState::default();
    s.apply(ShellAction::OpenInfo(PanelId::Topology));
    s.apply(ShellAction::OpenInfo(PanelId::Leakage));
    assert!(s.is_info_open(PanelId::Leakage));
    assert!(!s.is_info_open(PanelId::Topology));
    s.apply(ShellAction::CloseInfo);
    assert_eq!(s.active_info, None);
}

#[test]
fn escape_closes_overlay_before_chat() {
    let mut s = ShellState::default();
    s.apply(ShellAction::ToggleChat);
    s.apply(ShellAction::OpenInfo(PanelId::Engram));
    let esc = ShellAction::for_key("Escape").unwrap();
    s.apply(esc);
    assert_eq!(s.active_info, None);
    assert!(s.chat_open);
    s.apply(esc);
    assert!(!s.chat_open);
}

#[test]
fn chat_toggles() {
    let mut s = ShellState::default();
    s.apply(ShellAction::ToggleChat);
    assert!(s.chat_open);
    s.apply(ShellAction::ToggleChat);
    assert!(!s.chat_open);
    s.apply(ShellAction::CloseChat);
    assert!(!s.chat_open);
}

#[test]
fn digit_keys_open_matching_panels() {
    assert_eq!(
        ShellAction::for_key("1"),
        Some(ShellAction::OpenInfo(PanelId::Topology))
    );
    assert_eq!(
        ShellAction::for_key("4"),
        Some(ShellAction::OpenInfo(PanelId::Engram))
    );
    assert_eq!(ShellAction::for_key("5"), None);
    assert_eq!(ShellAction::for_key("a"), None);
}

#[test]
fn panel_letters_round_trip() {
    for p in PanelId::ALL {
        assert_eq!(PanelId::from_letter(p.letter()), Some(p));
        assert_eq!(
            PanelId::from_letter(p.letter().to_ascii_uppercase()),
            Some(p)
        );
    }
    assert_eq!(PanelId::from_letter('z'), None);
}

#[test]
fn every_panel_has_info_content() {
    for p in PanelId::ALL {
        let info = p.info();
        assert!(!info.title.is_empty());
        assert!(info.text.len() > 100);
        assert!(p.heading().contains(&format!("({})", p.letter().to_ascii_uppercase())));
    }
}

#[test]
fn enter_submits_unless_shifted() {
    assert!(is_submit_key("Enter", false));
    assert!(!is_submit_key("Enter", true));
    assert!(!is_submit_key("a", false));
}
