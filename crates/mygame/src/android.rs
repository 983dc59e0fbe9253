//! Android entry point.

use mygame_core::logging::{Severity, log};
use winit::event_loop::EventLoop;
use winit::platform::android::EventLoopBuilderExtAndroid;
use winit::platform::android::activity::AndroidApp;

use crate::application::ActivityBuilder;

// Safety: android_activity looks this symbol up by name; nothing else in the
// library declares it.
#[unsafe(no_mangle)]
fn android_main(app: AndroidApp) {
    mygame_core::logging::init();

    let event_loop = match EventLoop::builder().with_android_app(app).build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log(Severity::Error, &format!("failed to create event loop: {}", err));
            return;
        }
    };

    if let Err(err) = ActivityBuilder::new().run_on(event_loop) {
        log(Severity::Error, &err.to_string());
    }
}
