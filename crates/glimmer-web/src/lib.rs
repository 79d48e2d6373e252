pub mod runner;

pub use runner::ExperienceRunner;

// Re-exported so the generated exports resolve engine types through this crate.
pub use glimmer_engine;

/// Generate all `#[wasm_bindgen]` exports for an experience.
///
/// Generates:
/// - `thread_local!` storage for the ExperienceRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input handlers, buffer accessors, dispose)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod experience;
/// use experience::MyExperience;
///
/// glimmer_web::export_experience!(MyExperience, "my-experience");
/// ```
///
/// # Arguments
///
/// - `$experience_type`: a type implementing `glimmer_engine::Experience` with a `new()` constructor
/// - `$experience_name`: a string literal used in the initialization log message
#[macro_export]
macro_rules! export_experience {
    ($experience_type:ty, $experience_name:literal) => {
        use std::cell::RefCell;
        use $crate::glimmer_engine::{InputEvent, MotionSupport, TargetId};

        thread_local! {
            static RUNNER: RefCell<Option<$crate::ExperienceRunner<$experience_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::ExperienceRunner<$experience_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Experience not created. Call experience_create() first.");
                f(runner)
            })
        }

        /// Create the runner. `experience_load_config` may follow before `experience_init`.
        #[wasm_bindgen]
        pub fn experience_create() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let runner = $crate::ExperienceRunner::new(<$experience_type>::new());
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
        }

        #[wasm_bindgen]
        pub fn experience_init() {
            let created = RUNNER.with(|cell| cell.borrow().is_some());
            if !created {
                experience_create();
            }
            with_runner(|r| r.init());
            log::info!("{}: initialized", $experience_name);
        }

        #[wasm_bindgen]
        pub fn experience_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn experience_load_config(json: &str) {
            with_runner(|r| r.load_config(json));
        }

        #[wasm_bindgen]
        pub fn experience_dispose() {
            with_runner(|r| r.dispose());
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn experience_pointer_down(target: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { target: TargetId(target), x, y }));
        }

        #[wasm_bindgen]
        pub fn experience_pointer_move(target: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { target: TargetId(target), x, y }));
        }

        #[wasm_bindgen]
        pub fn experience_pointer_up(target: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { target: TargetId(target), x, y }));
        }

        #[wasm_bindgen]
        pub fn experience_pointer_leave(target: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerLeave { target: TargetId(target) }));
        }

        #[wasm_bindgen]
        pub fn experience_tap(target: u32) {
            with_runner(|r| r.push_input(InputEvent::Tap { target: TargetId(target) }));
        }

        #[wasm_bindgen]
        pub fn experience_motion(x: f32, y: f32, z: f32) {
            with_runner(|r| r.push_input(InputEvent::Motion { x, y, z }));
        }

        #[wasm_bindgen]
        pub fn experience_motion_support(available: bool) {
            let support = if available {
                MotionSupport::Available
            } else {
                MotionSupport::Unavailable
            };
            with_runner(|r| r.set_motion_support(support));
        }

        #[wasm_bindgen]
        pub fn experience_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_buffer_ptr() -> *const f32 {
            with_runner(|r| r.frame_buffer_ptr())
        }

        #[wasm_bindgen]
        pub fn get_targets_ptr() -> *const f32 {
            with_runner(|r| r.targets_ptr())
        }

        #[wasm_bindgen]
        pub fn get_target_count() -> u32 {
            with_runner(|r| r.target_count())
        }

        #[wasm_bindgen]
        pub fn get_events_ptr() -> *const f32 {
            with_runner(|r| r.events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_event_count() -> u32 {
            with_runner(|r| r.event_count())
        }

        #[wasm_bindgen]
        pub fn get_revealed_count() -> u32 {
            with_runner(|r| r.revealed_count())
        }

        #[wasm_bindgen]
        pub fn get_visible_text(target: u32) -> String {
            with_runner(|r| r.visible_text(TargetId(target)))
        }

        #[wasm_bindgen]
        pub fn get_now_ms() -> f64 {
            with_runner(|r| r.now_ms())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_targets() -> u32 {
            with_runner(|r| r.max_targets())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
