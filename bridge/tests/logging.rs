use st_bridge::logging::console_message;

#[test]
fn formatted_event_drops_trailing_newline() {
    let line = b" WARN st_bridge: localStorage unavailable\n";
    assert_eq!(console_message(line).as_deref(), Some(" WARN st_bridge: localStorage unavailable"));
}

#[test]
fn blank_output_is_not_logged() {
    assert_eq!(console_message(b""), None);
    assert_eq!(console_message(b"\n"), None);
}

#[test]
fn invalid_utf8_is_replaced() {
    assert_eq!(console_message(b"bad \xff byte\n").as_deref(), Some("bad \u{fffd} byte"));
}
