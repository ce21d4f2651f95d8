use crate::navigation::MoveDirection;

use super::keys::CellKey;

/// Interaction mode of a cell widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellMode {
    /// Focused, arrow keys navigate between cells.
    #[default]
    Selected,
    /// The cell's own editor owns the keyboard.
    Editing,
}

impl CellMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CellMode::Selected => "selected",
            CellMode::Editing => "editing",
        }
    }
}

/// Control the propagation of a keystroke after the machine has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    /// Not handled here; the widget's native behaviour applies.
    Continue,
    Consumed,
}

impl EventFlow {
    pub fn is_consumed(self) -> bool {
        self == EventFlow::Consumed
    }
}

/// Value and flag as they were right before the last destructive change.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoSlot<T> {
    pub value: T,
    pub is_just_focused: bool,
}

/// Request emitted by the machine (or a widget) for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum CellCommand<T> {
    Commit(T),
    Move(MoveDirection),
    ModeChanged(CellMode),
}

/// Collects commands emitted while a single event is processed.
#[derive(Debug)]
pub struct CellContext<T> {
    commands: Vec<CellCommand<T>>,
}

impl<T> Default for CellContext<T> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<T> CellContext<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, value: T) {
        self.commands.push(CellCommand::Commit(value));
    }

    pub fn request_move(&mut self, direction: MoveDirection) {
        self.commands.push(CellCommand::Move(direction));
    }

    pub fn mode_changed(&mut self, mode: CellMode) {
        self.commands.push(CellCommand::ModeChanged(mode));
    }

    pub fn commands(&self) -> &[CellCommand<T>] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Last committed value, if any.
    pub fn last_commit(&self) -> Option<&T> {
        self.commands.iter().rev().find_map(|command| match command {
            CellCommand::Commit(value) => Some(value),
            _ => None,
        })
    }

    pub fn into_commands(self) -> Vec<CellCommand<T>> {
        self.commands
    }
}

/// Mode, just-focused flag and undo slot of one cell widget.
///
/// The machine never owns the cell's value. Calls that may change it take the
/// value the host currently holds and emit [`CellCommand::Commit`]; the host
/// stores the commit and hands the new value back on the next event.
#[derive(Debug, Clone)]
pub struct CellMachine<T> {
    mode: CellMode,
    is_just_focused: bool,
    undo: Option<UndoSlot<T>>,
}

impl<T: Clone> Default for CellMachine<T> {
    fn default() -> Self {
        Self::new(CellMode::default())
    }
}

impl<T: Clone> CellMachine<T> {
    pub fn new(default_mode: CellMode) -> Self {
        Self {
            mode: default_mode,
            is_just_focused: false,
            undo: None,
        }
    }

    pub fn mode(&self) -> CellMode {
        self.mode
    }

    pub fn is_just_focused(&self) -> bool {
        self.is_just_focused
    }

    pub fn set_just_focused(&mut self, value: bool) {
        self.is_just_focused = value;
    }

    pub fn undo_slot(&self) -> Option<&UndoSlot<T>> {
        self.undo.as_ref()
    }

    pub fn set_undo_slot(&mut self, slot: Option<UndoSlot<T>>) {
        self.undo = slot;
    }

    fn change_mode(&mut self, mode: CellMode, ctx: &mut CellContext<T>) {
        if self.mode == mode {
            return;
        }
        match mode {
            CellMode::Editing => self.is_just_focused = false,
            CellMode::Selected => self.undo = None,
        }
        self.mode = mode;
        ctx.mode_changed(mode);
    }

    pub fn start_editing(&mut self, ctx: &mut CellContext<T>) {
        self.change_mode(CellMode::Editing, ctx);
    }

    pub fn stop_editing(&mut self, ctx: &mut CellContext<T>) {
        self.change_mode(CellMode::Selected, ctx);
    }

    pub fn handle_double_click(&mut self, ctx: &mut CellContext<T>) {
        self.start_editing(ctx);
    }

    /// Focus arrived from outside the cell.
    pub fn handle_focus(&mut self) {
        self.is_just_focused = true;
    }

    pub fn handle_blur(&mut self, ctx: &mut CellContext<T>) {
        self.change_mode(CellMode::Selected, ctx);
        self.is_just_focused = false;
        self.undo = None;
    }

    fn snapshot(&mut self, value: &T) {
        self.undo = Some(UndoSlot {
            value: value.clone(),
            is_just_focused: self.is_just_focused,
        });
    }

    /// Route a classified keystroke. `empty` produces the cleared value for
    /// a just-focused Delete/Backspace.
    pub fn handle_key<F>(
        &mut self,
        value: &T,
        key: CellKey,
        empty: F,
        ctx: &mut CellContext<T>,
    ) -> EventFlow
    where
        F: FnOnce() -> T,
    {
        match self.mode {
            CellMode::Selected => self.handle_selected_key(value, key, empty, ctx),
            CellMode::Editing => self.handle_editing_key(key, ctx),
        }
    }

    fn handle_selected_key<F>(
        &mut self,
        value: &T,
        key: CellKey,
        empty: F,
        ctx: &mut CellContext<T>,
    ) -> EventFlow
    where
        F: FnOnce() -> T,
    {
        if key == CellKey::F2 {
            self.start_editing(ctx);
            return EventFlow::Consumed;
        }

        if let Some(direction) = key.move_direction() {
            ctx.request_move(direction);
            return EventFlow::Consumed;
        }

        match key {
            CellKey::Delete | CellKey::Backspace if self.is_just_focused => {
                self.snapshot(value);
                self.is_just_focused = false;
                ctx.commit(empty());
                EventFlow::Consumed
            }
            CellKey::Undo => match self.undo.take() {
                Some(slot) => {
                    self.undo = Some(UndoSlot {
                        value: value.clone(),
                        is_just_focused: self.is_just_focused,
                    });
                    self.is_just_focused = slot.is_just_focused;
                    ctx.commit(slot.value);
                    EventFlow::Consumed
                }
                None => EventFlow::Continue,
            },
            _ => EventFlow::Continue,
        }
    }

    fn handle_editing_key(&mut self, key: CellKey, ctx: &mut CellContext<T>) -> EventFlow {
        match key {
            CellKey::Enter { .. } | CellKey::Tab { .. } => {
                self.stop_editing(ctx);
                if let Some(direction) = key.move_direction() {
                    ctx.request_move(direction);
                }
                EventFlow::Consumed
            }
            CellKey::Escape => {
                self.stop_editing(ctx);
                EventFlow::Consumed
            }
            _ => EventFlow::Continue,
        }
    }

    /// Printable input. `current_text` is the cell's text before the keystroke
    /// and `inserted` what was typed; `coerce` turns the resulting text into a
    /// value.
    ///
    /// The first keystroke after focus replaces the value instead of
    /// appending to it, and the replaced value goes into the undo slot.
    pub fn handle_input<F>(
        &mut self,
        value: &T,
        current_text: &str,
        inserted: &str,
        coerce: F,
        ctx: &mut CellContext<T>,
    ) -> EventFlow
    where
        F: FnOnce(&str) -> T,
    {
        if self.mode == CellMode::Selected && self.is_just_focused {
            self.snapshot(value);
            self.is_just_focused = false;
            ctx.commit(coerce(inserted));
            return EventFlow::Consumed;
        }

        self.is_just_focused = false;
        let mut text = String::with_capacity(current_text.len() + inserted.len());
        text.push_str(current_text);
        text.push_str(inserted);
        ctx.commit(coerce(&text));
        EventFlow::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> String {
        s.to_string()
    }

    fn focused_machine() -> CellMachine<String> {
        let mut machine = CellMachine::new(CellMode::Selected);
        machine.handle_focus();
        machine
    }

    #[test]
    fn defaults_to_selected_without_focus() {
        let machine: CellMachine<String> = CellMachine::default();
        assert_eq!(machine.mode(), CellMode::Selected);
        assert!(!machine.is_just_focused());
        assert!(machine.undo_slot().is_none());
    }

    #[test]
    fn first_keystroke_replaces_value() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        let flow = machine.handle_input(&text("42"), "42", "7", |s| s.to_string(), &mut ctx);

        assert_eq!(flow, EventFlow::Consumed);
        assert_eq!(ctx.last_commit(), Some(&text("7")));
        assert!(!machine.is_just_focused());
        assert_eq!(
            machine.undo_slot(),
            Some(&UndoSlot {
                value: text("42"),
                is_just_focused: true,
            })
        );
    }

    #[test]
    fn later_keystrokes_append() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.handle_input(&text("42"), "42", "7", |s| s.to_string(), &mut ctx);
        machine.handle_input(&text("7"), "7", "5", |s| s.to_string(), &mut ctx);
        assert_eq!(ctx.last_commit(), Some(&text("75")));
        // the slot still holds the pre-overwrite value
        assert_eq!(machine.undo_slot().unwrap().value, text("42"));
    }

    #[test]
    fn undo_toggles_between_two_values() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.handle_input(&text("42"), "42", "7", |s| s.to_string(), &mut ctx);

        let mut ctx = CellContext::new();
        let flow = machine.handle_key(&text("7"), CellKey::Undo, String::new, &mut ctx);
        assert_eq!(flow, EventFlow::Consumed);
        assert_eq!(ctx.last_commit(), Some(&text("42")));
        assert!(machine.is_just_focused());
        assert_eq!(
            machine.undo_slot(),
            Some(&UndoSlot {
                value: text("7"),
                is_just_focused: false,
            })
        );

        let mut ctx = CellContext::new();
        machine.handle_key(&text("42"), CellKey::Undo, String::new, &mut ctx);
        assert_eq!(ctx.last_commit(), Some(&text("7")));
        assert!(!machine.is_just_focused());
        assert_eq!(machine.undo_slot().unwrap().value, text("42"));
    }

    #[test]
    fn undo_with_empty_slot_is_ignored() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        let flow = machine.handle_key(&text("42"), CellKey::Undo, String::new, &mut ctx);
        assert_eq!(flow, EventFlow::Continue);
        assert!(ctx.is_empty());
        assert!(machine.is_just_focused());
    }

    #[test]
    fn just_focused_delete_clears_and_snapshots() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        let flow = machine.handle_key(&text("42"), CellKey::Delete, String::new, &mut ctx);
        assert_eq!(flow, EventFlow::Consumed);
        assert_eq!(ctx.last_commit(), Some(&String::new()));
        assert_eq!(
            machine.undo_slot(),
            Some(&UndoSlot {
                value: text("42"),
                is_just_focused: true,
            })
        );
        assert!(!machine.is_just_focused());
    }

    #[test]
    fn backspace_after_edit_is_left_to_the_widget() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.handle_input(&text("42"), "42", "7", |s| s.to_string(), &mut ctx);
        let slot_before = machine.undo_slot().cloned();

        let mut ctx = CellContext::new();
        let flow = machine.handle_key(&text("7"), CellKey::Backspace, String::new, &mut ctx);
        assert_eq!(flow, EventFlow::Continue);
        assert!(ctx.is_empty());
        assert_eq!(machine.undo_slot().cloned(), slot_before);
    }

    #[test]
    fn backspace_without_focus_does_nothing() {
        let mut machine: CellMachine<String> = CellMachine::default();
        let mut ctx = CellContext::new();
        let flow = machine.handle_key(&text("42"), CellKey::Backspace, String::new, &mut ctx);
        assert_eq!(flow, EventFlow::Continue);
        assert!(ctx.is_empty());
        assert!(machine.undo_slot().is_none());
    }

    #[test]
    fn selected_navigation_keys_request_moves() {
        let mut machine = focused_machine();
        let cases = [
            (CellKey::Arrow(MoveDirection::Left), MoveDirection::Left),
            (CellKey::Enter { shift: false }, MoveDirection::Down),
            (CellKey::Enter { shift: true }, MoveDirection::Up),
            (CellKey::Tab { shift: false }, MoveDirection::Right),
            (CellKey::Tab { shift: true }, MoveDirection::Left),
        ];
        for (key, direction) in cases {
            let mut ctx = CellContext::new();
            let flow = machine.handle_key(&text("1"), key, String::new, &mut ctx);
            assert_eq!(flow, EventFlow::Consumed);
            assert_eq!(ctx.commands(), &[CellCommand::Move(direction)]);
        }
        assert!(machine.is_just_focused());
    }

    #[test]
    fn f2_enters_editing_and_arrows_pass_through() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.handle_key(&text("1"), CellKey::F2, String::new, &mut ctx);
        assert_eq!(machine.mode(), CellMode::Editing);
        assert_eq!(ctx.commands(), &[CellCommand::ModeChanged(CellMode::Editing)]);
        assert!(!machine.is_just_focused());

        let mut ctx = CellContext::new();
        let flow = machine.handle_key(&text("1"), CellKey::Arrow(MoveDirection::Up), String::new, &mut ctx);
        assert_eq!(flow, EventFlow::Continue);
        assert!(ctx.is_empty());
    }

    #[test]
    fn editing_enter_and_tab_leave_and_move() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.start_editing(&mut ctx);

        let mut ctx = CellContext::new();
        machine.handle_key(&text("1"), CellKey::Enter { shift: true }, String::new, &mut ctx);
        assert_eq!(
            ctx.into_commands(),
            vec![
                CellCommand::ModeChanged(CellMode::Selected),
                CellCommand::Move(MoveDirection::Up),
            ]
        );

        let mut ctx = CellContext::new();
        machine.start_editing(&mut ctx);
        let mut ctx = CellContext::new();
        machine.handle_key(&text("1"), CellKey::Tab { shift: false }, String::new, &mut ctx);
        assert_eq!(ctx.commands()[1], CellCommand::Move(MoveDirection::Right));
        assert_eq!(machine.mode(), CellMode::Selected);
    }

    #[test]
    fn escape_leaves_editing_without_moving() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.handle_double_click(&mut ctx);
        assert_eq!(machine.mode(), CellMode::Editing);

        let mut ctx = CellContext::new();
        machine.handle_key(&text("1"), CellKey::Escape, String::new, &mut ctx);
        assert_eq!(ctx.into_commands(), vec![CellCommand::ModeChanged(CellMode::Selected)]);
    }

    #[test]
    fn editing_input_appends_without_undo() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.start_editing(&mut ctx);

        let mut ctx = CellContext::new();
        machine.handle_input(&text("42"), "42", "7", |s| s.to_string(), &mut ctx);
        assert_eq!(ctx.last_commit(), Some(&text("427")));
        assert!(machine.undo_slot().is_none());
    }

    #[test]
    fn leaving_editing_clears_undo() {
        let mut machine = focused_machine();
        machine.set_undo_slot(Some(UndoSlot {
            value: text("old"),
            is_just_focused: true,
        }));
        let mut ctx = CellContext::new();
        machine.start_editing(&mut ctx);
        machine.stop_editing(&mut ctx);
        assert!(machine.undo_slot().is_none());
    }

    #[test]
    fn blur_clears_flag_and_slot() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.handle_input(&text("42"), "42", "7", |s| s.to_string(), &mut ctx);
        machine.set_just_focused(true);

        let mut ctx = CellContext::new();
        machine.handle_blur(&mut ctx);
        assert!(!machine.is_just_focused());
        assert!(machine.undo_slot().is_none());
        assert!(ctx.is_empty());
    }

    #[test]
    fn blur_while_editing_returns_to_selected() {
        let mut machine = focused_machine();
        let mut ctx = CellContext::new();
        machine.start_editing(&mut ctx);

        let mut ctx = CellContext::new();
        machine.handle_blur(&mut ctx);
        assert_eq!(machine.mode(), CellMode::Selected);
        assert_eq!(ctx.into_commands(), vec![CellCommand::ModeChanged(CellMode::Selected)]);
    }

    #[test]
    fn editing_default_mode_is_honoured() {
        let machine: CellMachine<String> = CellMachine::new(CellMode::Editing);
        assert_eq!(machine.mode(), CellMode::Editing);
    }
}
