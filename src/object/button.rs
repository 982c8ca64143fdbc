use std::collections::BTreeMap;

use log::warn;

use crate::error::{ParseErrorKind, ParseResult};
use crate::io::ByteReader;
use crate::schema::Handler;
use crate::tag::{Tag, read_string, unpack};

/// Interaction states a button can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonState {
    Base,
    FocusIn,
    Push,
    Up,
}

impl ButtonState {
    /// Element name in LRS.
    pub fn lrs_name(self) -> &'static str {
        match self {
            ButtonState::Base => "BaseButton",
            ButtonState::FocusIn => "FocusinButton",
            ButtonState::Push => "PushButton",
            ButtonState::Up => "UpButton",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    JumpTo { page: u32, object: u32 },
    SendMessage { kind: u16, first: String, second: String },
    CloseWindow,
    SoundStop,
    Run { kind: u16, object: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonStateData {
    pub refimage: Option<u32>,
    pub actions: Vec<ButtonAction>,
}

/// A clickable area: per-state images and actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Button {
    pub flags: u16,
    pub states: BTreeMap<ButtonState, ButtonStateData>,
    current: Option<ButtonState>,
}

impl Button {
    pub fn state(&self, state: ButtonState) -> Option<&ButtonStateData> {
        self.states.get(&state)
    }

    /// First jump target of the push state, the one a reader follows.
    pub fn jump_target(&self) -> Option<(u32, u32)> {
        self.state(ButtonState::Push)?
            .actions
            .iter()
            .find_map(|action| match action {
                ButtonAction::JumpTo { page, object } => Some((*page, *object)),
                _ => None,
            })
    }

    fn current(&mut self) -> &mut ButtonStateData {
        let state = *self.current.get_or_insert_with(|| {
            warn!("button data outside a state block, filed under the base state");
            ButtonState::Base
        });
        self.states.entry(state).or_default()
    }

    pub(crate) fn handle(
        &mut self,
        handler: Handler,
        tag: &Tag<'_>,
        reader: &mut ByteReader<'_>,
    ) -> ParseResult<()> {
        match handler {
            Handler::ButtonFlags => self.flags = tag.word()?,
            Handler::ButtonStateStart(state) => {
                self.current = Some(state);
                self.states.entry(state).or_default();
            }
            Handler::ButtonStateEnd => self.current = None,
            Handler::ActionsStart | Handler::ActionsEnd => {}
            Handler::ButtonRefImage => {
                let id = tag.dword()?;
                self.current().refimage = Some(id);
            }
            Handler::JumpTo => {
                let v = unpack(tag.fixed(8)?, "II");
                self.current().actions.push(ButtonAction::JumpTo {
                    page: v[0],
                    object: v[1],
                });
            }
            Handler::SendMessage => {
                let kind = tag.word()?;
                let first = read_string(reader)?;
                let second = read_string(reader)?;
                self.current().actions.push(ButtonAction::SendMessage {
                    kind,
                    first,
                    second,
                });
            }
            Handler::CloseWindow => self.current().actions.push(ButtonAction::CloseWindow),
            Handler::SoundStop => self.current().actions.push(ButtonAction::SoundStop),
            Handler::Run => {
                let v = unpack(tag.fixed(6)?, "HI");
                self.current().actions.push(ButtonAction::Run {
                    kind: v[0] as u16,
                    object: v[1],
                });
            }
            _ => return Err(tag.error(ParseErrorKind::UnexpectedTag("Button"))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::encode_utf16le;

    fn feed(button: &mut Button, handler: Handler, bytes: &[u8]) {
        let mut reader = ByteReader::new(bytes);
        let tag = Tag::read(&mut reader).unwrap();
        button.handle(handler, &tag, &mut reader).unwrap();
    }

    #[test]
    fn test_push_button_with_jump() {
        let mut button = Button::default();
        feed(&mut button, Handler::ButtonFlags, &[0x61, 0xF5, 0x10, 0x00]);
        feed(&mut button, Handler::ButtonStateStart(ButtonState::Push), &[0x66, 0xF5]);
        feed(&mut button, Handler::ButtonRefImage, &[0x03, 0xF5, 9, 0, 0, 0]);
        feed(&mut button, Handler::ActionsStart, &[0x6A, 0xF5]);
        feed(
            &mut button,
            Handler::JumpTo,
            &[0x6C, 0xF5, 4, 0, 0, 0, 5, 0, 0, 0],
        );
        feed(&mut button, Handler::ActionsEnd, &[0x6B, 0xF5]);
        feed(&mut button, Handler::ButtonStateEnd, &[0x67, 0xF5]);

        assert_eq!(button.flags, 0x10);
        let push = button.state(ButtonState::Push).unwrap();
        assert_eq!(push.refimage, Some(9));
        assert_eq!(button.jump_target(), Some((4, 5)));
    }

    #[test]
    fn test_send_message_reads_two_strings() {
        let mut bytes = vec![0x6D, 0xF5, 0x02, 0x00];
        for s in ["open", "file.txt"] {
            let encoded = encode_utf16le(s);
            bytes.extend((encoded.len() as u16).to_le_bytes());
            bytes.extend(encoded);
        }
        let mut button = Button::default();
        feed(&mut button, Handler::ButtonStateStart(ButtonState::Base), &[0x62, 0xF5]);
        feed(&mut button, Handler::SendMessage, &bytes);
        assert_eq!(
            button.state(ButtonState::Base).unwrap().actions,
            vec![ButtonAction::SendMessage {
                kind: 2,
                first: "open".into(),
                second: "file.txt".into()
            }]
        );
    }

    #[test]
    fn test_action_outside_state_goes_to_base() {
        let mut button = Button::default();
        feed(&mut button, Handler::CloseWindow, &[0x6E, 0xF5]);
        assert_eq!(
            button.state(ButtonState::Base).unwrap().actions,
            vec![ButtonAction::CloseWindow]
        );
    }
}
