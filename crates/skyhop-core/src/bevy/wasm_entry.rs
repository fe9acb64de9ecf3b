//! WASM entry points for the skyhop scene.
//!
//! Provides JavaScript-callable functions to start the app and interact
//! with the running scene.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;
use bevy::winit::{UpdateMode, WinitSettings};
use parking_lot::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;

use crate::bevy::SkyhopPlugin;
use crate::config::SceneConfig;
use crate::scene::SceneHandle;

// ============================================================================
// Global State
// ============================================================================

/// Atomic flag for signaling app shutdown (checked every frame by Bevy system).
static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);

/// In WASM, the EventLoop can only be created once.
static APP_STARTED: AtomicBool = AtomicBool::new(false);

static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Handle of the running scene, set by the scene-ready hook.
static SCENE_HANDLE: Mutex<Option<SceneHandle>> = Mutex::new(None);

fn scene_handle() -> Result<SceneHandle, JsValue> {
    SCENE_HANDLE
        .lock()
        .clone()
        .ok_or_else(|| JsValue::from_str("Scene is not ready"))
}

fn init_tracing() {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let filter = EnvFilter::new("info,wgpu=error,naga=warn");

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Request the app to exit. Called before page unload.
#[wasm_bindgen]
pub fn request_app_exit() {
    tracing::info!("[skyhop] request_app_exit called - signaling app to exit");
    SHOULD_EXIT.store(true, Ordering::SeqCst);
    *SCENE_HANDLE.lock() = None;
}

/// Bevy system that checks if exit was requested and sends `AppExit`.
pub fn check_exit_system(mut exit: MessageWriter<bevy::app::AppExit>) {
    if SHOULD_EXIT.load(Ordering::SeqCst) {
        tracing::info!("[skyhop] check_exit_system: sending AppExit");
        exit.write(bevy::app::AppExit::Success);
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Starts the Bevy app on the given canvas with a JSON scene configuration.
#[wasm_bindgen]
pub fn start_app(canvas_id: &str, config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_tracing();

    tracing::info!("[skyhop] start_app called");

    if APP_STARTED.load(Ordering::SeqCst) {
        tracing::info!("[skyhop] App already running, skipping creation");
        return Ok(());
    }

    let config = SceneConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {e}")))?;

    SHOULD_EXIT.store(false, Ordering::SeqCst);

    tracing::info!("[skyhop] creating Bevy app for canvas: #{}", canvas_id);

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{canvas_id}")),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: true,
                    ..default()
                }),
                ..default()
            })
            .disable::<bevy::log::LogPlugin>(),
    );

    app.insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::Continuous,
    });

    app.add_plugins(SkyhopPlugin::new(
        config,
        Arc::new(|handle| {
            *SCENE_HANDLE.lock() = Some(handle);
        }),
    ));

    APP_STARTED.store(true, Ordering::SeqCst);

    tracing::info!("[skyhop] calling app.run()");
    app.run();

    Ok(())
}

// ============================================================================
// Scene access
// ============================================================================

/// Whether the scene has been built and the app is not shutting down.
#[wasm_bindgen]
pub fn is_scene_ready() -> bool {
    SCENE_HANDLE.lock().is_some() && !SHOULD_EXIT.load(Ordering::SeqCst)
}

/// Queues a collectible at a world position.
#[wasm_bindgen]
pub fn spawn_collectible(x: f32, y: f32) -> Result<(), JsValue> {
    scene_handle()?.spawn_collectible(x, y);
    Ok(())
}

/// Queues a collectible at a random position.
#[wasm_bindgen]
pub fn spawn_random_collectible() -> Result<(), JsValue> {
    scene_handle()?.spawn_random_collectible();
    Ok(())
}

/// Latest player diagnostics, or `null` before the first tick.
#[wasm_bindgen]
pub fn get_player_state() -> JsValue {
    SCENE_HANDLE
        .lock()
        .as_ref()
        .and_then(SceneHandle::player)
        .and_then(|snapshot| serde_wasm_bindgen::to_value(&snapshot).ok())
        .unwrap_or(JsValue::NULL)
}
