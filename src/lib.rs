#![cfg(target_arch = "wasm32")]
use divot_core::{
    ChartPanel, DashboardConfig, SpherePointSet, SphereRenderer, SurfaceRenderer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod charts;
mod chat;
mod constants;
mod dom;
mod events;
mod frame;
mod gemini;
mod overlay;
mod render;

use constants::{
    CONFIG_SCRIPT_ID, CORRELATION_CANVAS_ID, ENGRAM_CANVAS_ID, LEAKAGE_CANVAS_ID,
    TOPOLOGY_CANVAS_ID,
};

/// Everything that must be released when the dashboard goes away.
struct Dashboard {
    renderers: Vec<frame::MountedRenderer>,
    charts: Vec<charts::MountedChart>,
}

thread_local! {
    static DASHBOARD: RefCell<Option<Dashboard>> = const { RefCell::new(None) };
}

/// Read the optional JSON block embedded in the page.
fn load_config(document: Option<&web::Document>) -> (DashboardConfig, Option<String>) {
    let json = document
        .and_then(|d| d.get_element_by_id(CONFIG_SCRIPT_ID))
        .and_then(|el| el.text_content())
        .unwrap_or_default();
    let (config, err) = match DashboardConfig::from_json(&json) {
        Ok(c) => (c, None),
        Err(e) => (DashboardConfig::default(), Some(e.to_string())),
    };
    (config.with_fallback_api_key(option_env!("DIVOT_API_KEY")), err)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let (config, config_err) = load_config(dom::window_document().as_ref());
    let level = config.log_level().unwrap_or(log::Level::Info);
    console_log::init_with_level(level).ok();
    if let Some(e) = config_err {
        log::warn!("[config] {}; using defaults", e);
    }
    log::info!("divot-web starting");

    spawn_local(async move {
        if let Err(e) = init(config).await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop every animation loop and chart listener. Safe to call more than once.
#[wasm_bindgen]
pub fn unmount() {
    let dashboard = DASHBOARD.with(|d| d.borrow_mut().take());
    if let Some(d) = dashboard {
        log::info!(
            "[dashboard] unmounting {} renderers, {} charts",
            d.renderers.len(),
            d.charts.len()
        );
        drop(d);
    }
}

async fn init(config: DashboardConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    overlay::populate(&document);

    let mut renderers = Vec::new();
    if let Some(canvas) = dom::by_id(&document, TOPOLOGY_CANVAS_ID) {
        let surface = SurfaceRenderer::new(config.surface.clone());
        renderers.extend(frame::mount("topology", canvas, surface));
    }
    if let Some(canvas) = dom::by_id(&document, ENGRAM_CANVAS_ID) {
        let mut rng = StdRng::from_entropy();
        let points = SpherePointSet::generate(&mut rng, &config.sphere);
        log::info!("[sphere] generated {} points", points.len());
        let sphere = SphereRenderer::new(config.sphere.clone(), points);
        renderers.extend(frame::mount("engram", canvas, sphere));
    }

    let mut mounted_charts = Vec::new();
    for (id, panel) in [
        (CORRELATION_CANVAS_ID, ChartPanel::Correlation),
        (LEAKAGE_CANVAS_ID, ChartPanel::Leakage),
    ] {
        if let Some(canvas) = dom::by_id(&document, id) {
            mounted_charts.extend(charts::mount(panel, canvas));
        }
    }

    let client = gemini::GeminiClient::new(config.completion.clone());
    let chat = chat::mount(&document, &config.greeting, client);
    if chat.is_none() {
        log::warn!("[chat] chat elements missing; drawer disabled");
    }

    let shell = overlay::Shell::new(&document, chat);
    overlay::wire_buttons(&shell);
    events::keyboard::wire_global_keydown(shell);

    DASHBOARD.with(|d| {
        *d.borrow_mut() = Some(Dashboard {
            renderers,
            charts: mounted_charts,
        })
    });
    log::info!("[dashboard] ready");
    Ok(())
}
