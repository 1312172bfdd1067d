//! User-level scenarios for the unit-value stepper.

use unitkit_core::event::KeyCode;
use unitkit_harness::{QueryError, Screen};
use unitkit_render::Role;
use unitkit_widgets::UnitValue;
use unitkit_widgets::config::WidgetConfig;
use web_time::Duration;

type Result = std::result::Result<(), QueryError>;

fn mount() -> Screen<UnitValue> {
    Screen::render(UnitValue::new())
}

/// Focus the field, replace its text, and blur.
fn commit(screen: &mut Screen<UnitValue>, text: &str) -> std::result::Result<String, QueryError> {
    let input = screen.textbox()?;
    screen.focus(input)?;
    screen.change(input, text)?;
    screen.blur();
    Ok(screen.value(input)?.to_string())
}

#[test]
fn renders_default_values() -> Result {
    let screen = mount();
    let percent = screen.get_by_text("%")?;
    assert!(screen.is_selected(percent)?);
    let px = screen.get_by_text("px")?;
    assert!(!screen.is_selected(px)?);
    assert_eq!(screen.value(screen.textbox()?)?, "1");
    Ok(())
}

#[test]
fn switches_units() -> Result {
    let mut screen = mount();
    let px = screen.get_by_text("px")?;
    screen.click(px)?;
    assert!(screen.is_selected(screen.get_by_text("px")?)?);
    assert!(!screen.is_selected(screen.get_by_text("%")?)?);
    Ok(())
}

#[test]
fn increments_and_decrements_via_buttons() -> Result {
    let mut screen = mount();
    let input = screen.textbox()?;
    let increase = screen.get_by_name(Role::Button, "Increase value")?;
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;

    screen.click(increase)?;
    assert_eq!(screen.value(input)?, "1.1");
    screen.click(decrease)?;
    assert_eq!(screen.value(input)?, "1");
    Ok(())
}

#[test]
fn replaces_comma_with_dot() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "12,3")?, "12.3");
    Ok(())
}

#[test]
fn trailing_garbage_over_max_reverts() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "15")?, "15");
    // "123a" parses as 123, which is above the percent maximum.
    assert_eq!(commit(&mut screen, "123a")?, "15");
    Ok(())
}

#[test]
fn embedded_garbage_keeps_prefix() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "12a3")?, "12");
    Ok(())
}

#[test]
fn non_numeric_input_reverts() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "10")?, "10");
    assert_eq!(commit(&mut screen, "a123")?, "10");
    Ok(())
}

#[test]
fn second_dot_ends_the_number() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "12.4.5")?, "12.4");
    Ok(())
}

#[test]
fn negative_clamps_to_zero() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "-5")?, "0");
    Ok(())
}

#[test]
fn over_max_percent_reverts() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "50")?, "50");
    assert_eq!(commit(&mut screen, "150")?, "50");
    Ok(())
}

#[test]
fn pixel_allows_over_hundred() -> Result {
    let mut screen = mount();
    let px = screen.get_by_text("px")?;
    screen.click(px)?;
    assert_eq!(commit(&mut screen, "150")?, "150");
    Ok(())
}

#[test]
fn switching_to_percent_clamps_to_max() -> Result {
    let mut screen = mount();
    let px = screen.get_by_text("px")?;
    screen.click(px)?;
    assert_eq!(commit(&mut screen, "150")?, "150");

    let percent = screen.get_by_text("%")?;
    screen.click(percent)?;
    assert_eq!(screen.value(screen.textbox()?)?, "100");
    Ok(())
}

#[test]
fn canonical_text_after_commit() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "15")?, "15");
    assert_eq!(commit(&mut screen, "15.0")?, "15");
    assert_eq!(commit(&mut screen, "007.50")?, "7.5");
    assert_eq!(commit(&mut screen, "1e1")?, "10");
    Ok(())
}

#[test]
fn selecting_active_unit_twice_changes_nothing() -> Result {
    let mut screen = mount();
    let before = screen.snapshot();
    let percent = screen.get_by_text("%")?;
    screen.click(percent)?;
    screen.click(percent)?;
    screen.blur();
    assert_eq!(screen.snapshot(), before);
    Ok(())
}

#[test]
fn boundaries_are_no_ops() -> Result {
    let mut screen = mount();
    assert_eq!(commit(&mut screen, "0")?, "0");
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    assert!(screen.is_disabled(decrease)?);
    assert!(!screen.click(decrease)?);
    assert_eq!(screen.value(screen.textbox()?)?, "0");

    assert_eq!(commit(&mut screen, "100")?, "100");
    let increase = screen.get_by_name(Role::Button, "Increase value")?;
    assert!(screen.is_disabled(increase)?);
    assert!(!screen.click(increase)?);
    assert_eq!(screen.value(screen.textbox()?)?, "100");
    Ok(())
}

#[test]
fn decrease_tooltip_at_zero() -> Result {
    let mut screen = mount();
    commit(&mut screen, "0")?;
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    assert!(screen.is_disabled(decrease)?);

    screen.pointer_enter(decrease)?;
    screen.advance_timers(Duration::from_millis(199));
    assert!(screen.query_by_text("Value must greater than 0").is_none());
    screen.advance_timers(Duration::from_millis(1));
    let tip = screen.get_by_text("Value must greater than 0")?;
    assert_eq!(screen.node(tip)?.role, Role::Tooltip);

    screen.pointer_leave(decrease)?;
    assert!(screen.query_by_text("Value must greater than 0").is_none());
    Ok(())
}

#[test]
fn increase_tooltip_at_hundred() -> Result {
    let mut screen = mount();
    commit(&mut screen, "100")?;
    let increase = screen.get_by_name(Role::Button, "Increase value")?;
    assert!(screen.is_disabled(increase)?);

    screen.pointer_enter(increase)?;
    screen.advance_timers(Duration::from_millis(200));
    screen.get_by_text("Value must smaller than 100")?;
    Ok(())
}

#[test]
fn enabled_button_never_shows_tooltip() -> Result {
    let mut screen = mount();
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    screen.pointer_enter(decrease)?;
    screen.advance_timers(Duration::from_secs(1));
    assert!(screen.query_by_text("Value must greater than 0").is_none());
    assert_eq!(screen.scene().overlays().count(), 0);
    Ok(())
}

#[test]
fn tooltip_hides_when_button_becomes_enabled() -> Result {
    let mut screen = mount();
    commit(&mut screen, "0")?;
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    screen.pointer_enter(decrease)?;
    screen.advance_timers(Duration::from_millis(200));
    screen.get_by_text("Value must greater than 0")?;

    let increase = screen.get_by_name(Role::Button, "Increase value")?;
    screen.click(increase)?;
    assert_eq!(screen.value(screen.textbox()?)?, "0.1");
    assert!(screen.query_by_text("Value must greater than 0").is_none());
    assert!(!screen.component().decrement_tooltip_state().is_tracking());
    Ok(())
}

#[test]
fn typing_edits_only_while_focused() -> Result {
    let mut screen = mount();
    let input = screen.textbox()?;
    screen.clear(input)?;
    assert!(screen.is_focused(input)?);
    screen.type_text(input, "12,34")?;
    screen.press(KeyCode::Backspace);
    assert_eq!(screen.value(input)?, "12,3");
    screen.blur();
    assert!(!screen.is_focused(input)?);
    assert_eq!(screen.value(input)?, "12.3");

    // Not focused: a change event is ignored.
    assert!(!screen.change(input, "99")?);
    assert_eq!(screen.value(input)?, "12.3");
    Ok(())
}

#[test]
fn clicking_a_unit_commits_the_edit() -> Result {
    let mut screen = mount();
    let input = screen.textbox()?;
    screen.type_text(input, "00")?;
    assert_eq!(screen.value(input)?, "100");
    let percent = screen.get_by_name(Role::Button, "%")?;
    screen.click(percent)?;
    assert!(screen.is_selected(percent)?);
    assert_eq!(screen.value(input)?, "100");
    assert!(!screen.is_focused(input)?);
    Ok(())
}

#[test]
fn paste_inserts_at_cursor() -> Result {
    let mut screen = mount();
    let input = screen.textbox()?;
    screen.clear(input)?;
    screen.paste("2");
    screen.press(KeyCode::Home);
    screen.paste("1");
    assert_eq!(screen.value(input)?, "12");
    screen.blur();
    assert_eq!(screen.value(input)?, "12");
    Ok(())
}

#[test]
fn configured_stepper() -> Result {
    let config = WidgetConfig::from_toml_str(
        r#"
        [tooltip]
        delay_ms = 500

        [stepper]
        step = 5.0
        initial_unit = "pixel"
        initial_value = 20.0
        min_message = "Already at zero"
        "#,
    )
    .expect("valid config");
    let mut screen = Screen::render(UnitValue::from_config(&config));
    assert!(screen.is_selected(screen.get_by_text("px")?)?);
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    for _ in 0..4 {
        screen.click(decrease)?;
    }
    assert_eq!(screen.value(screen.textbox()?)?, "0");

    screen.pointer_enter(decrease)?;
    screen.advance_timers(Duration::from_millis(200));
    assert!(screen.query_by_text("Already at zero").is_none());
    screen.advance_timers(Duration::from_millis(300));
    screen.get_by_text("Already at zero")?;
    Ok(())
}

#[test]
fn snapshot_of_default_mount() {
    let screen = mount();
    let expected = "\
group \"Unit value\" @0,0 288x120
  label \"Unit\" @16,16 80x36
  group @96,16 160x36
    button \"%\" [selected] @98,18 77x32
    button \"px\" @177,18 77x32
  label \"Value\" @16,68 80x36
  group @96,68 160x36
    button \"Decrease value\" @96,68 36x36
    textbox \"Value\" value=\"1\" @132,68 88x36
    button \"Increase value\" @220,68 36x36
";
    assert_eq!(screen.snapshot(), expected);
}

#[test]
fn unmount_cancels_pending_tooltips() -> Result {
    let mut screen = mount();
    commit(&mut screen, "0")?;
    let decrease = screen.get_by_name(Role::Button, "Decrease value")?;
    screen.pointer_enter(decrease)?;
    assert!(screen.component().decrement_tooltip_state().is_pending());

    let widget = screen.unmount();
    assert!(!widget.decrement_tooltip_state().is_pending());
    assert!(!widget.decrement_tooltip_state().is_tracking());
    Ok(())
}

#[test]
fn click_by_coordinates() -> Result {
    let mut screen = mount();
    // Center of the increase button.
    screen.click_at(238.0, 86.0)?;
    assert_eq!(screen.value(screen.textbox()?)?, "1.1");

    // Labels are not interactive.
    assert!(screen.click_at(30.0, 30.0).is_err());

    // Scrolled: the same button is now 50px higher in client space.
    screen.scroll_to(0.0, 50.0);
    screen.click_at(238.0, 36.0)?;
    assert_eq!(screen.value(screen.textbox()?)?, "1.2");
    Ok(())
}
