//! Dashboard shell state: which info overlay is open, whether the chat drawer
//! is visible, and how keys map onto those.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelId {
    Topology,
    Correlation,
    Leakage,
    Engram,
}

pub struct InfoContent {
    pub title: &'static str,
    pub text: &'static str,
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [
        PanelId::Topology,
        PanelId::Correlation,
        PanelId::Leakage,
        PanelId::Engram,
    ];

    /// Lowercase letter used in element ids (`panel-a`, `info-overlay-a`, ...).
    pub fn letter(self) -> char {
        match self {
            PanelId::Topology => 'a',
            PanelId::Correlation => 'b',
            PanelId::Leakage => 'c',
            PanelId::Engram => 'd',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.letter() == c.to_ascii_lowercase())
    }

    pub fn heading(self) -> &'static str {
        match self {
            PanelId::Topology => "(A) \"Tiled Valley\" Topology",
            PanelId::Correlation => "(B) The \"Goldilocks\" Zone",
            PanelId::Leakage => "(C) Paternal Leakage Collapse",
            PanelId::Engram => "(D) Memory Self-Organization",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            PanelId::Topology => "QUANTUM PHASE FIELD",
            PanelId::Correlation => "OPTIMAL ρ=0.5",
            PanelId::Leakage => "CLUSTER STABILITY METRIC",
            PanelId::Engram => "ATTRACTOR BASIN FORMATION",
        }
    }

    pub fn info(self) -> InfoContent {
        match self {
            PanelId::Topology => InfoContent {
                title: "Quantum Phase Field",
                text: "This visualization renders the 'Tiled Valley' topology of memory formation. The geometric structure illustrates the thermodynamic energy landscape where memory engrams settle. The peaks (lighter meshes) represent high-entropy states of instability, while the valleys (darker regions) act as low-energy Attractor Basins where memories stabilize. The z-axis modulation (z = sin(3x)cos(3y)) simulates the dynamic interference patterns of neural oscillations during the encoding phase.",
            },
            PanelId::Correlation => InfoContent {
                title: "Criticality Hypothesis",
                text: "This graph demonstrates the 'Goldilocks Zone' in neural networks. Efficient memory systems require a balance between order and chaos. The curve peaks at ρ ≈ 0.5, the Criticality Point. Below this threshold (ρ < 0.2), the system is too stochastic to retain structure. Above it (ρ > 0.8), the system becomes rigidly locked (seizure-like). The chart highlights that maximum information integration occurs exactly at the phase transition between these two states.",
            },
            PanelId::Leakage => InfoContent {
                title: "Cluster Stability Metric",
                text: "This metric analyzes stability against 'Paternal Leakage', the intrusion of external noise into established memory traces. As leakage increases (x-axis), the number of viable memory clusters (bars) collapses. The Green Zone represents healthy segregation. The Red Zone indicates a catastrophic phase transition where distinct memories merge into indistinguishable noise, modeling the entropic decay observed in neurodegenerative conditions.",
            },
            PanelId::Engram => InfoContent {
                title: "Engram Self-Organization",
                text: "The Engram Sphere visualizes the physical formation of a memory trace in 3D neural space. The central Lime Node represents the primary engram seed. The surrounding Cyan Nodes depict associated neural connections. The rotating projection demonstrates the network's self-organization around new information, minimizing free energy. As the system evolves, connections stabilize into a cohesive manifold, illustrating the physical architecture of a 'thought'.",
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellAction {
    OpenInfo(PanelId),
    CloseInfo,
    ToggleChat,
    CloseChat,
    /// Escape: innermost layer first.
    Dismiss,
}

impl ShellAction {
    /// Global shortcut for `key` (a `KeyboardEvent.key` value). Text inputs
    /// handle their own keys and never reach this.
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(ShellAction::Dismiss),
            "1" => Some(ShellAction::OpenInfo(PanelId::Topology)),
            "2" => Some(ShellAction::OpenInfo(PanelId::Correlation)),
            "3" => Some(ShellAction::OpenInfo(PanelId::Leakage)),
            "4" => Some(ShellAction::OpenInfo(PanelId::Engram)),
            _ => None,
        }
    }
}

/// `Enter` without `Shift` submits the chat input.
pub fn is_submit_key(key: &str, shift: bool) -> bool {
    key == "Enter" && !shift
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShellState {
    pub active_info: Option<PanelId>,
    pub chat_open: bool,
}

impl ShellState {
    pub fn apply(&mut self, action: ShellAction) {
        match action {
            ShellAction::OpenInfo(p) => self.active_info = Some(p),
            ShellAction::CloseInfo => self.active_info = None,
            ShellAction::ToggleChat => self.chat_open = !self.chat_open,
            ShellAction::CloseChat => self.chat_open = false,
            ShellAction::Dismiss => {
                if self.active_info.is_some() {
                    self.active_info = None;
                } else {
                    self.chat_open = false;
                }
            }
        }
    }

    pub fn is_info_open(&self, panel: PanelId) -> bool {
        self.active_info == Some(panel)
    }
}
