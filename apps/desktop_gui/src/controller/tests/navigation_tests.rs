use super::*;

#[test]
fn parses_known_paths() {
    assert_eq!(Route::from_path("/login"), Route::Login);
    assert_eq!(Route::from_path("/templates"), Route::Templates);
    assert_eq!(Route::from_path("/templates/"), Route::Templates);
    assert_eq!(
        Route::from_path("/templates/abc-123"),
        Route::TemplateDetail(TemplateId::from("abc-123"))
    );
    assert_eq!(Route::from_path("/settings"), Route::Settings);
}

#[test]
fn unknown_paths_fall_back_to_dashboard() {
    assert_eq!(Route::from_path("/"), Route::Dashboard);
    assert_eq!(Route::from_path("/nope"), Route::Dashboard);
    assert_eq!(Route::from_path("/templates/a/b"), Route::Dashboard);
}

#[test]
fn route_paths_round_trip() {
    for route in [
        Route::Dashboard,
        Route::Articles,
        Route::Templates,
        Route::TemplateDetail(TemplateId::from("x1")),
        Route::Calendar,
        Route::Settings,
        Route::Login,
    ] {
        assert_eq!(Route::from_path(&route.path()), route);
    }
}

#[test]
fn tab_selection_uses_exact_or_prefix_match() {
    assert_eq!(Tab::for_path("/templates"), Tab::Templates);
    assert_eq!(Tab::for_path("/templates/42"), Tab::Templates);
    assert_eq!(Tab::for_path("/settings"), Tab::Settings);
    assert_eq!(Tab::for_path("/dashboard"), Tab::Dashboard);
    assert_eq!(Tab::for_path("/dashboard/extra"), Tab::Dashboard);
    assert_eq!(Tab::for_path("/unknown"), Tab::Dashboard);
}

#[test]
fn detail_route_highlights_templates_tab() {
    let route = Route::TemplateDetail(TemplateId::from("t"));
    assert_eq!(route.active_tab(), Some(Tab::Templates));
    assert_eq!(Route::Login.active_tab(), None);
    assert!(!Route::Login.requires_session());
}

#[test]
fn compact_below_breakpoint_or_on_touch() {
    assert_eq!(FormFactor::detect(390.0, false), FormFactor::Compact);
    assert_eq!(FormFactor::detect(767.9, false), FormFactor::Compact);
    assert_eq!(FormFactor::detect(768.0, false), FormFactor::Wide);
    assert_eq!(FormFactor::detect(1280.0, true), FormFactor::Compact);
}
