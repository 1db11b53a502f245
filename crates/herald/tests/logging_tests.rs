use herald::*;

#[test]
fn test_level_functions_do_not_panic() {
  info("analysis started");
  warn("competitor lookup dropped");
  error("backend unreachable");
  debug("payload: {}");
  success("analysis complete");
  verbose("raw response follows");
}

#[test]
fn test_multiline_messages() {
  let message = "first line\nsecond line\nthird line";
  info(message);
  emit(Level::Warn, message);
  banner(message, 20, '=');
}

#[test]
fn test_macros_expand() {
  herald::info!("from macro");
  herald::success!(&format!("{} results", 3));
}
