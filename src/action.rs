use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{app::Mode, components::editor::EditorAction};

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum GlobalAction {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    Help,
    SwitchMode(Mode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Global(GlobalAction),
    Editor(EditorAction),
}

impl From<GlobalAction> for AppAction {
    fn from(action: GlobalAction) -> Self {
        AppAction::Global(action)
    }
}

impl From<EditorAction> for AppAction {
    fn from(action: EditorAction) -> Self {
        AppAction::Editor(action)
    }
}
