// Tool Detectors Module

mod codex;
mod node;

pub use codex::CodeXDetector;
pub use node::NodeRuntimeDetector;
