//! Overlay state shown on top of a dragged card.

use serde::{Deserialize, Serialize};

/// Which overlay variant is showing, following the drag direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayMode {
    #[default]
    None,
    Left,
    Right,
}
