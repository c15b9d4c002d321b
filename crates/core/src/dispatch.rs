//! Listener dispatch guard shared by the event bus and the state container.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run one listener invocation, containing a panic to this call.
///
/// Returns false if the listener panicked; the panic is logged and swallowed so
/// delivery to the remaining listeners continues.
pub(crate) fn guarded<F: FnOnce()>(site: &str, name: &str, f: F) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            tracing::error!(
                site,
                name,
                message = panic_message(payload.as_ref()),
                "listener panicked"
            );
            false
        }
    }
}

/// Send panic reports to the log instead of stderr.
///
/// stderr is the screen the terminal front end draws on. Install once, after
/// the tracing subscriber is set up.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_default();
        tracing::error!(
            %location,
            message = panic_message(info.payload()),
            "panicked"
        );
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
