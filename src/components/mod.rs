pub mod editor;

use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    Frame,
    layout::{Rect, Size},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{action::AppAction, config::Config, terminal::events::TermEvent};

/// A visual and interactive unit of the application. Components receive
/// terminal events and actions from the main loop and draw into a frame.
pub trait Component {
    fn register_action_handler(&mut self, tx: UnboundedSender<AppAction>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        let _ = config;
        Ok(())
    }

    fn init(&mut self, area: Size) -> Result<()> {
        let _ = area;
        Ok(())
    }

    fn handle_event(&mut self, event: Option<&TermEvent>) -> Result<Option<AppAction>> {
        let action = match event {
            Some(TermEvent::Key(key)) => self.handle_key_event(*key)?,
            Some(TermEvent::Mouse(mouse)) => self.handle_mouse_event(*mouse)?,
            Some(TermEvent::Paste(text)) => self.handle_paste(text)?,
            _ => None,
        };
        Ok(action)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<AppAction>> {
        let _ = key;
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<AppAction>> {
        let _ = mouse;
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<AppAction>> {
        let _ = text;
        Ok(None)
    }

    fn update(&mut self, action: AppAction) -> Result<Option<AppAction>> {
        let _ = action;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
