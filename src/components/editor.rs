use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, HighlightSpacing, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::Component;
use crate::{
    action::{AppAction, GlobalAction},
    app::Mode,
    config::Config,
    requirement::{IconVariant, Requirement},
};

const ADD_BUTTON_WIDTH: u16 = 9;
/// Every row is rendered one indent level deep, like the listings the tool
/// is meant to reproduce.
const ROW_INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// The add trigger fired, either as the commit key inside the name
    /// input or as an activation of the add button. Both arrive here.
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputFocus {
    #[default]
    Name,
    AddButton,
}

/// A single-line text field. The cursor is a char offset, not a byte one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.value.len())
    }

    fn insert(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor += 1;
    }

    fn insert_str(&mut self, s: &str) {
        let index = self.byte_index();
        self.value.insert_str(index, s);
        self.cursor += s.chars().count();
    }

    fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let index = self.byte_index();
        self.value.remove(index);
    }

    fn delete_forward(&mut self) {
        if self.cursor < self.value.chars().count() {
            let index = self.byte_index();
            self.value.remove(index);
        }
    }

    fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

/// The requirements editor: a name input with an add button on top, the
/// listing below. Appends a row per submit; rows can be renamed in place
/// but their icon keeps the variant chosen when the row was created.
#[derive(Default)]
pub struct Editor {
    command_tx: Option<UnboundedSender<AppAction>>,
    config: Config,
    mode: Mode,
    focus: InputFocus,
    name_input: InputField,
    requirements: Vec<Requirement>,
    list_state: ListState,
    row_edit: Option<InputField>,
    show_help: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row for the current input value. An empty value is a
    /// silent no-op. The value is taken verbatim, untrimmed, and the input
    /// keeps it after the append.
    fn add_requirement(&mut self) {
        let raw = self.name_input.value.as_str();
        if raw.is_empty() {
            return;
        }
        let requirement = Requirement::new(raw);
        debug!("appending {:?}", requirement);
        self.requirements.push(requirement);
    }

    fn selected_index(&self) -> Option<usize> {
        if self.requirements.is_empty() {
            return None;
        }
        // select_next can run past the end between renders
        self.list_state
            .selected()
            .map(|index| index.min(self.requirements.len() - 1))
    }

    fn switch_mode(&mut self, mode: Mode) {
        if mode == Mode::List {
            if self.requirements.is_empty() {
                return;
            }
            if self.selected_index().is_none() {
                self.list_state.select(Some(0));
            }
        }
        self.mode = mode;
        self.send(GlobalAction::SwitchMode(mode));
    }

    fn begin_edit(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        self.list_state.select(Some(index));
        self.row_edit = Some(InputField::with_value(self.requirements[index].name()));
        self.switch_mode(Mode::Edit);
    }

    fn commit_edit(&mut self) {
        if let Some(field) = self.row_edit.take()
            && let Some(index) = self.selected_index()
        {
            // rename only, the icon variant is frozen at creation
            self.requirements[index].rename(field.value);
        }
        self.switch_mode(Mode::List);
    }

    fn cancel_edit(&mut self) {
        self.row_edit = None;
        self.switch_mode(Mode::List);
    }

    fn send(&self, action: impl Into<AppAction>) {
        if let Some(tx) = &self.command_tx
            && let Err(err) = tx.send(action.into())
        {
            debug!("failed to send action: {err:?}");
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Enter => return Some(EditorAction::Submit.into()),
            KeyCode::Char(' ') if self.focus == InputFocus::AddButton => {
                return Some(EditorAction::Submit.into());
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    InputFocus::Name => InputFocus::AddButton,
                    InputFocus::AddButton => InputFocus::Name,
                };
            }
            KeyCode::Down => self.switch_mode(Mode::List),
            KeyCode::Char(c)
                if self.focus == InputFocus::Name
                    && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.name_input.insert(c)
            }
            KeyCode::Backspace if self.focus == InputFocus::Name => self.name_input.delete_back(),
            KeyCode::Delete if self.focus == InputFocus::Name => self.name_input.delete_forward(),
            KeyCode::Left if self.focus == InputFocus::Name => self.name_input.move_left(),
            KeyCode::Right if self.focus == InputFocus::Name => self.name_input.move_right(),
            KeyCode::Home if self.focus == InputFocus::Name => self.name_input.move_home(),
            KeyCode::End if self.focus == InputFocus::Name => self.name_input.move_end(),
            _ => {}
        }
        None
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
            KeyCode::Char('g') => self.list_state.select_first(),
            KeyCode::Char('G') => self.list_state.select_last(),
            KeyCode::Enter | KeyCode::Char('i') => self.begin_edit(),
            KeyCode::Tab | KeyCode::Esc => self.switch_mode(Mode::Input),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(field) = self.row_edit.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.insert(c),
            KeyCode::Backspace => field.delete_back(),
            KeyCode::Delete => field.delete_forward(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            _ => {}
        }
    }

    fn style(&self, key: &str) -> Style {
        self.config
            .styles
            .get(&self.mode)
            .and_then(|styles| styles.get(key))
            .copied()
            .unwrap_or_default()
    }

    fn render_name_input(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.mode == Mode::Input && self.focus == InputFocus::Name;
        let border_style = if focused {
            self.style("border_focused")
        } else {
            self.style("border")
        };
        let input = Paragraph::new(self.name_input.value.as_str()).block(
            Block::bordered()
                .border_style(border_style)
                .title("New requirement"),
        );
        frame.render_widget(input, area);

        if focused {
            let x = area.x + 1 + self.name_input.cursor as u16;
            frame.set_cursor_position(Position::new(
                x.min(area.right().saturating_sub(2)),
                area.y + 1,
            ));
        }
    }

    fn render_add_button(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.mode == Mode::Input && self.focus == InputFocus::AddButton;
        let label_style = if focused {
            self.style("button_active")
        } else {
            self.style("button")
        };
        let border_style = if focused {
            self.style("border_focused")
        } else {
            self.style("border")
        };
        let button = Paragraph::new(Line::styled(" Add ", label_style))
            .centered()
            .block(Block::bordered().border_style(border_style));
        frame.render_widget(button, area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let focused = matches!(self.mode, Mode::List | Mode::Edit);
        let border_style = if focused {
            self.style("border_focused")
        } else {
            self.style("border")
        };
        let block = Block::bordered()
            .border_style(border_style)
            .title("Requirements");

        let editing = (self.mode == Mode::Edit)
            .then(|| self.selected_index())
            .flatten();
        let items: Vec<ListItem> = self
            .requirements
            .iter()
            .enumerate()
            .map(|(index, requirement)| {
                let icon_style = match requirement.variant() {
                    IconVariant::File => self.style("file_icon"),
                    IconVariant::Folder => self.style("folder_icon"),
                };
                let name = if editing == Some(index) {
                    let value = self
                        .row_edit
                        .as_ref()
                        .map(|field| field.value.clone())
                        .unwrap_or_default();
                    Span::styled(value, self.style("selected_row"))
                } else {
                    Span::raw(requirement.name().to_string())
                };
                ListItem::new(Line::from(vec![
                    Span::raw(ROW_INDENT),
                    Span::styled(requirement.variant().glyph(), icon_style),
                    Span::raw(" "),
                    name,
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.style("selected_row"))
            .highlight_symbol(">")
            .highlight_spacing(HighlightSpacing::Always);
        frame.render_stateful_widget(list, area, &mut self.list_state);

        // put the cursor inside the row field being edited
        if let (Some(index), Some(field)) = (editing, self.row_edit.as_ref()) {
            let offset = self.list_state.offset();
            if index >= offset {
                let y = area.y + 1 + (index - offset) as u16;
                let border = 1u16;
                let highlight = 1u16;
                let icon_and_separator = 2u16;
                let x = area.x
                    + border
                    + highlight
                    + ROW_INDENT.len() as u16
                    + icon_and_separator
                    + field.cursor as u16;
                if y < area.bottom().saturating_sub(1) {
                    frame.set_cursor_position(Position::new(
                        x.min(area.right().saturating_sub(2)),
                        y,
                    ));
                }
            }
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect) {
        let text = if self.show_help {
            "Tab switches focus, Enter adds or edits, j/k move, g/G jump, Esc goes back, q quits"
        } else {
            match self.mode {
                Mode::Input => "Type a name, Enter adds it. Tab focuses [ Add ], ↓ moves to the list.",
                Mode::List => "Use ↓↑/j/k to move, Enter to edit, Tab for the input, ? for help.",
                Mode::Edit => "Enter saves the name, Esc cancels.",
            }
        };
        frame.render_widget(
            Paragraph::new(text).style(self.style("help")).centered(),
            area,
        );
    }
}

impl Component for Editor {
    fn register_action_handler(&mut self, tx: UnboundedSender<AppAction>) -> Result<()> {
        self.command_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<AppAction>> {
        let action = match self.mode {
            Mode::Input => self.handle_input_key(key),
            Mode::List => {
                self.handle_list_key(key);
                None
            }
            Mode::Edit => {
                self.handle_edit_key(key);
                None
            }
        };
        Ok(action)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<AppAction>> {
        match self.mode {
            Mode::Input if self.focus == InputFocus::Name => self.name_input.insert_str(text),
            Mode::Edit => {
                if let Some(field) = self.row_edit.as_mut() {
                    field.insert_str(text);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: AppAction) -> Result<Option<AppAction>> {
        match action {
            AppAction::Editor(EditorAction::Submit) => self.add_requirement(),
            AppAction::Global(GlobalAction::Help) => self.show_help = !self.show_help,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let [input_area, list_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let [name_area, button_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(ADD_BUTTON_WIDTH)])
                .areas(input_area);

        self.render_name_input(frame, name_area);
        self.render_add_button(frame, button_area);
        self.render_list(frame, list_area);
        self.render_footer(frame, footer_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn press(editor: &mut Editor, code: KeyCode) {
        let action = editor.handle_key_event(key(code)).unwrap();
        if let Some(action) = action {
            editor.update(action).unwrap();
        }
    }

    fn type_str(editor: &mut Editor, s: &str) {
        for c in s.chars() {
            press(editor, KeyCode::Char(c));
        }
    }

    /// Replaces the input value wholesale, like selecting it and typing over.
    fn set_input(editor: &mut Editor, value: &str) {
        editor.name_input = InputField::with_value(value);
    }

    #[test]
    fn commit_key_appends_one_classified_row() {
        let mut editor = Editor::new();
        type_str(&mut editor, "neopixel.mpy");
        press(&mut editor, KeyCode::Enter);

        assert_eq!(editor.requirements.len(), 1);
        assert_eq!(editor.requirements[0].name(), "neopixel.mpy");
        assert_eq!(editor.requirements[0].variant(), IconVariant::File);
    }

    #[test]
    fn button_activation_and_commit_key_are_equivalent() {
        let mut via_key = Editor::new();
        type_str(&mut via_key, "lib");
        press(&mut via_key, KeyCode::Enter);

        let mut via_button = Editor::new();
        type_str(&mut via_button, "lib");
        press(&mut via_button, KeyCode::Tab);
        press(&mut via_button, KeyCode::Enter);

        let mut via_space = Editor::new();
        type_str(&mut via_space, "lib");
        press(&mut via_space, KeyCode::Tab);
        press(&mut via_space, KeyCode::Char(' '));

        assert_eq!(via_key.requirements, via_button.requirements);
        assert_eq!(via_key.requirements, via_space.requirements);
    }

    #[test]
    fn empty_submit_is_a_silent_no_op_every_time() {
        let mut editor = Editor::new();
        for _ in 0..5 {
            press(&mut editor, KeyCode::Enter);
        }
        assert_eq!(editor.requirements, vec![]);
    }

    #[test]
    fn input_keeps_its_value_after_submit() {
        let mut editor = Editor::new();
        type_str(&mut editor, "font.bdf");
        press(&mut editor, KeyCode::Enter);
        assert_eq!(editor.name_input.value, "font.bdf");

        // a second submit without retyping appends a duplicate row
        press(&mut editor, KeyCode::Enter);
        assert_eq!(editor.requirements.len(), 2);
        assert_eq!(editor.requirements[0], editor.requirements[1]);
    }

    #[test]
    fn whitespace_only_value_still_submits() {
        let mut editor = Editor::new();
        type_str(&mut editor, "   ");
        press(&mut editor, KeyCode::Enter);

        assert_eq!(editor.requirements.len(), 1);
        assert_eq!(editor.requirements[0].name(), "   ");
        assert_eq!(editor.requirements[0].variant(), IconVariant::Folder);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut editor = Editor::new();
        for name in ["a", "b.py", "c"] {
            set_input(&mut editor, name);
            press(&mut editor, KeyCode::Enter);
        }

        let rows: Vec<(&str, IconVariant)> = editor
            .requirements
            .iter()
            .map(|requirement| (requirement.name(), requirement.variant()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("a", IconVariant::Folder),
                ("b.py", IconVariant::File),
                ("c", IconVariant::Folder),
            ]
        );
    }

    #[test]
    fn editing_a_row_keeps_its_icon() {
        let mut editor = Editor::new();
        type_str(&mut editor, "lib");
        press(&mut editor, KeyCode::Enter);

        press(&mut editor, KeyCode::Down);
        assert_eq!(editor.mode, Mode::List);
        press(&mut editor, KeyCode::Enter);
        assert_eq!(editor.mode, Mode::Edit);
        type_str(&mut editor, ".py");
        press(&mut editor, KeyCode::Enter);

        assert_eq!(editor.mode, Mode::List);
        assert_eq!(editor.requirements[0].name(), "lib.py");
        // still a folder, classification happened at creation
        assert_eq!(editor.requirements[0].variant(), IconVariant::Folder);
    }

    #[test]
    fn cancelled_edit_restores_the_name() {
        let mut editor = Editor::new();
        type_str(&mut editor, "code.py");
        press(&mut editor, KeyCode::Enter);

        press(&mut editor, KeyCode::Down);
        press(&mut editor, KeyCode::Enter);
        type_str(&mut editor, "-scratch");
        press(&mut editor, KeyCode::Esc);

        assert_eq!(editor.requirements[0].name(), "code.py");
        assert_eq!(editor.mode, Mode::List);
    }

    #[test]
    fn list_mode_is_unreachable_while_empty() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Down);
        assert_eq!(editor.mode, Mode::Input);
    }

    #[test]
    fn paste_goes_into_the_name_field() {
        let mut editor = Editor::new();
        editor.handle_paste("adafruit_requests.mpy").unwrap();
        press(&mut editor, KeyCode::Enter);

        assert_eq!(editor.requirements.len(), 1);
        assert_eq!(editor.requirements[0].variant(), IconVariant::File);
    }

    #[test]
    fn field_editing_is_char_aware() {
        let mut field = InputField::with_value("naïve");
        field.delete_back();
        assert_eq!(field.value, "naïv");
        field.move_home();
        field.delete_forward();
        assert_eq!(field.value, "aïv");
        field.insert('n');
        assert_eq!(field.value, "naïv");
        field.move_end();
        field.insert_str("e.py");
        assert_eq!(field.value, "naïve.py");
    }
}
