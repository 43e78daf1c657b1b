/// Page contract and presentation constants for the web frontend.
///
/// Element ids here must match `index.html`. The values are plain data so
/// host tests can check them without a browser.
// Visualization canvases
pub const TOPOLOGY_CANVAS_ID: &str = "topology-canvas";
pub const CORRELATION_CANVAS_ID: &str = "correlation-canvas";
pub const LEAKAGE_CANVAS_ID: &str = "leakage-canvas";
pub const ENGRAM_CANVAS_ID: &str = "engram-canvas";

// Chat drawer
pub const CHAT_DRAWER_ID: &str = "chat-drawer";
pub const CHAT_TOGGLE_ID: &str = "chat-toggle";
pub const CHAT_CLOSE_ID: &str = "chat-close";
pub const CHAT_MESSAGES_ID: &str = "chat-messages";
pub const CHAT_INPUT_ID: &str = "chat-input";
pub const CHAT_SEND_ID: &str = "chat-send";
pub const CHAT_INDICATOR_ID: &str = "chat-indicator";

// Optional JSON config block
pub const CONFIG_SCRIPT_ID: &str = "divot-config";

// Classes toggled from Rust
pub const HIDDEN_CLASS: &str = "hidden";
pub const OPEN_CLASS: &str = "open";
pub const USER_BUBBLE_CLASS: &str = "msg msg-user";
pub const ASSISTANT_BUBBLE_CLASS: &str = "msg msg-assistant";

// Canvas text
pub const LABEL_FONT_FAMILY: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";

// Backing store scale is capped so 4K/retina panels stay cheap to redraw
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// `panel-title-a`, `panel-title-b`, ...
pub fn panel_title_id(letter: char) -> String {
    format!("panel-title-{letter}")
}

pub fn panel_subtitle_id(letter: char) -> String {
    format!("panel-subtitle-{letter}")
}

pub fn info_overlay_id(letter: char) -> String {
    format!("info-overlay-{letter}")
}

pub fn info_button_id(letter: char) -> String {
    format!("info-button-{letter}")
}

pub fn info_close_id(letter: char) -> String {
    format!("info-close-{letter}")
}

/// Clamp the reported device pixel ratio into [1, MAX_DEVICE_PIXEL_RATIO].
pub fn effective_pixel_ratio(reported: f64) -> f64 {
    if reported.is_finite() {
        reported.clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    }
}
