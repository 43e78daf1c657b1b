//! Platform-independent core of the Divot dashboard.
//!
//! Nothing here touches browser APIs; the web frontend supplies a [`Canvas`],
//! a [`FrameScheduler`] and a [`CompletionService`] and drives these types.

pub mod canvas;
pub mod charts;
pub mod chat;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod gemini;
pub mod projection;
pub mod shell;
pub mod sphere;
pub mod sse;
pub mod surface;

pub use canvas::{Canvas, Glow, Rect, Rgba, Stroke, TextAlign, TextStyle, Viewport};
pub use charts::{ChartPanel, Tooltip};
pub use chat::{
    ChatMessage, ChatSession, CompletionService, FragmentStream, SendOutcome, Sender,
    TranscriptUpdate,
};
pub use config::{CompletionConfig, DashboardConfig};
pub use error::{CompletionError, ConfigError};
pub use frame_loop::{FrameHandle, FrameScheduler, LoopState, RenderLoop, Renderer};
pub use projection::{Projected, Projector, Rotation};
pub use shell::{PanelId, ShellAction, ShellState};
pub use sphere::{SphereParams, SpherePointSet, SphereRenderer};
pub use surface::{SurfaceParams, SurfaceRenderer};
