//! Communication action syntax.
//!
//! A communication action starts with a marker and names a channel followed
//! by a direction mark: `_c!expr` sends, `_c?x` receives into `x`. A matched
//! pair is written `send|receive`.

/// Direction of a communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Send,
    Receive,
}

impl Direction {
    pub fn complement(self) -> Direction {
        match self {
            Direction::Send => Direction::Receive,
            Direction::Receive => Direction::Send,
        }
    }
}

/// A classified communication action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Communication<'a> {
    pub channel: &'a str,
    pub direction: Direction,
    /// Sent expression or receiving variable; may be empty for pure sync.
    pub operand: &'a str,
}

/// The characters that make up communication syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSyntax {
    pub marker: char,
    pub send: char,
    pub receive: char,
    pub separator: char,
}

impl Default for ChannelSyntax {
    fn default() -> Self {
        Self {
            marker: '_',
            send: '!',
            receive: '?',
            separator: '|',
        }
    }
}

impl ChannelSyntax {
    /// Whether `action` is written as a communication, i.e. starts with
    /// the marker.
    pub fn is_communication(&self, action: &str) -> bool {
        action.trim_start().starts_with(self.marker)
    }

    /// Split a communication action into channel, direction and operand.
    ///
    /// Returns `None` only for ordinary actions. A marked action is a
    /// receive if it contains the receive mark, and a send otherwise; a
    /// send without a send mark is a pure synchronization on the whole
    /// marked name.
    pub fn classify<'a>(&self, action: &'a str) -> Option<Communication<'a>> {
        let body = action.trim().strip_prefix(self.marker)?;
        let (direction, split) = match body.find(self.receive) {
            Some(i) => (Direction::Receive, Some((i, self.receive))),
            None => (Direction::Send, body.find(self.send).map(|i| (i, self.send))),
        };
        let (channel, operand) = match split {
            Some((idx, mark)) => (&body[..idx], &body[idx + mark.len_utf8()..]),
            None => (body, ""),
        };
        Some(Communication {
            channel: channel.trim(),
            direction,
            operand: operand.trim(),
        })
    }

    /// The synthesized action label for a matched pair.
    pub fn pair(&self, send: &str, receive: &str) -> String {
        format!("{}{}{}", send.trim(), self.separator, receive.trim())
    }

    /// Inverse of [`ChannelSyntax::pair`].
    pub fn split_pair<'a>(&self, action: &'a str) -> Option<(&'a str, &'a str)> {
        action
            .split_once(self.separator)
            .map(|(send, receive)| (send.trim(), receive.trim()))
    }
}
