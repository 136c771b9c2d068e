//! Enumerations shared by the input and output packet views.

/// Player side. The board carries one button cluster per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    pub const fn label(self) -> &'static str {
        match self {
            Player::One => "p1",
            Player::Two => "p2",
        }
    }
}

/// One of the four menu buttons in a player's cluster.
///
/// Every button carries its own lamp. The input and output bytes order the
/// sides and buttons differently (see [`Button::input_mask`] and
/// [`Button::light_mask`]); the two mask tables are independent on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Back,
    Left,
    Right,
    Start,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Back, Button::Left, Button::Right, Button::Start];

    /// Switch bit within input byte 0. Player 1 occupies the low nibble
    /// (back, left, right, start from bit 0), player 2 the high nibble in
    /// the same order.
    pub const fn input_mask(self, side: Player) -> u8 {
        let low = match self {
            Button::Back => 0x01,
            Button::Left => 0x02,
            Button::Right => 0x04,
            Button::Start => 0x08,
        };
        match side {
            Player::One => low,
            Player::Two => low << 4,
        }
    }

    /// Lamp bit within output byte 0. Player 2 occupies the low nibble
    /// (start, right, left, back from bit 0), player 1 the high nibble in
    /// the same order.
    pub const fn light_mask(self, side: Player) -> u8 {
        let low = match self {
            Button::Start => 0x01,
            Button::Right => 0x02,
            Button::Left => 0x04,
            Button::Back => 0x08,
        };
        match side {
            Player::One => low << 4,
            Player::Two => low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Button::Back => "back",
            Button::Left => "left",
            Button::Right => "right",
            Button::Start => "start",
        }
    }
}
