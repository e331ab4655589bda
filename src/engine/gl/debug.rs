use glow::HasContext;

/// Routes driver debug messages into the log. Must run before the
/// context is shared, since glow needs `&mut` to install the callback.
pub fn install_debug_output(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        log::warn!("gl: debug output unavailable on this context");
        return;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(debug_message_handler);
    }
    log::debug!("gl: debug output installed");
}

fn debug_message_handler(source: u32, kind: u32, id: u32, severity: u32, message: &str) {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => {
            log::error!("gl[{source:#x}/{kind:#x}/{id}]: {message}");
        }
        glow::DEBUG_SEVERITY_MEDIUM => {
            log::warn!("gl[{source:#x}/{kind:#x}/{id}]: {message}");
        }
        _ => log::debug!("gl: {message}"),
    }
}
