//! Enumerations shared by the input and output packet views.

/// One of the four multiplexed sensor groups.
///
/// The discriminant is the wire value written into the 2-bit sensor-select
/// field, and simultaneously the slot index inside an
/// [`InputBatch`](crate::InputBatch). The acquisition cycle walks
/// [`SensorGroup::ALL`] in declaration order; the slots of a batch are not
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorGroup {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl SensorGroup {
    /// Number of sensor groups, equal to the sub-polls per acquisition cycle.
    pub const COUNT: usize = 4;

    /// All groups in sensor-select order.
    pub const ALL: [SensorGroup; SensorGroup::COUNT] = [
        SensorGroup::Up,
        SensorGroup::Down,
        SensorGroup::Left,
        SensorGroup::Right,
    ];

    /// Slot index of this group inside an input batch.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire value for the sensor-select field.
    pub const fn select_bits(self) -> u8 {
        self as u8
    }

    /// Decode a sensor-select field value. Only the low two bits are
    /// significant; callers pass the raw select byte unmasked.
    pub const fn from_select_bits(bits: u8) -> SensorGroup {
        match bits & 0x03 {
            0 => SensorGroup::Up,
            1 => SensorGroup::Down,
            2 => SensorGroup::Left,
            _ => SensorGroup::Right,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SensorGroup::Up => "up",
            SensorGroup::Down => "down",
            SensorGroup::Left => "left",
            SensorGroup::Right => "right",
        }
    }
}

/// Player side. The board carries one pad per side.
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

/// The five pad panels of a Pump It Up cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiuPanel {
    UpLeft,
    UpRight,
    Center,
    DownLeft,
    DownRight,
}

impl PiuPanel {
    pub const ALL: [PiuPanel; 5] = [
        PiuPanel::UpLeft,
        PiuPanel::UpRight,
        PiuPanel::Center,
        PiuPanel::DownLeft,
        PiuPanel::DownRight,
    ];

    /// Lamp bit within the player's output byte (bits 2..=6; bits 0-1 hold
    /// the sensor-select field).
    pub const fn lamp_mask(self) -> u8 {
        match self {
            PiuPanel::UpLeft => 0x04,
            PiuPanel::UpRight => 0x08,
            PiuPanel::Center => 0x10,
            PiuPanel::DownLeft => 0x20,
            PiuPanel::DownRight => 0x40,
        }
    }

    /// Sensor bit within the player's input byte (bits 0..=4).
    pub const fn sensor_mask(self) -> u8 {
        match self {
            PiuPanel::UpLeft => 0x01,
            PiuPanel::UpRight => 0x02,
            PiuPanel::Center => 0x04,
            PiuPanel::DownLeft => 0x08,
            PiuPanel::DownRight => 0x10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PiuPanel::UpLeft => "up-left",
            PiuPanel::UpRight => "up-right",
            PiuPanel::Center => "center",
            PiuPanel::DownLeft => "down-left",
            PiuPanel::DownRight => "down-right",
        }
    }
}

/// The four pad arrows of an In The Groove cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItgArrow {
    Up,
    Down,
    Left,
    Right,
}

impl ItgArrow {
    pub const ALL: [ItgArrow; 4] = [
        ItgArrow::Up,
        ItgArrow::Down,
        ItgArrow::Left,
        ItgArrow::Right,
    ];

    /// Lamp bit within the player's output byte (bits 2..=5).
    pub const fn lamp_mask(self) -> u8 {
        match self {
            ItgArrow::Up => 0x04,
            ItgArrow::Down => 0x08,
            ItgArrow::Left => 0x10,
            ItgArrow::Right => 0x20,
        }
    }

    /// Sensor bit within the player's input byte (bits 0..=3).
    pub const fn sensor_mask(self) -> u8 {
        match self {
            ItgArrow::Up => 0x01,
            ItgArrow::Down => 0x02,
            ItgArrow::Left => 0x04,
            ItgArrow::Right => 0x08,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ItgArrow::Up => "up",
            ItgArrow::Down => "down",
            ItgArrow::Left => "left",
            ItgArrow::Right => "right",
        }
    }
}

/// Cabinet menu buttons present on ITG cabinets (PIU cabinets navigate with
/// the pad itself and have none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItgMenuButton {
    Left,
    Right,
    Start,
    Back,
}

impl ItgMenuButton {
    pub const ALL: [ItgMenuButton; 4] = [
        ItgMenuButton::Left,
        ItgMenuButton::Right,
        ItgMenuButton::Start,
        ItgMenuButton::Back,
    ];

    /// Button bit within the player's input byte (bits 4..=7, above the
    /// arrow sensors).
    pub const fn mask(self) -> u8 {
        match self {
            ItgMenuButton::Left => 0x10,
            ItgMenuButton::Right => 0x20,
            ItgMenuButton::Start => 0x40,
            ItgMenuButton::Back => 0x80,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ItgMenuButton::Left => "menu-left",
            ItgMenuButton::Right => "menu-right",
            ItgMenuButton::Start => "menu-start",
            ItgMenuButton::Back => "menu-back",
        }
    }
}

/// The four marquee lamps across the top of the cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopLamp {
    Left1,
    Left2,
    Right1,
    Right2,
}

impl TopLamp {
    pub const ALL: [TopLamp; 4] = [
        TopLamp::Left1,
        TopLamp::Left2,
        TopLamp::Right1,
        TopLamp::Right2,
    ];

    /// Lamp bit within the top-lamp output byte (bits 2..=5).
    pub const fn mask(self) -> u8 {
        match self {
            TopLamp::Right2 => 0x04,
            TopLamp::Right1 => 0x08,
            TopLamp::Left2 => 0x10,
            TopLamp::Left1 => 0x20,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TopLamp::Left1 => "top-l1",
            TopLamp::Left2 => "top-l2",
            TopLamp::Right1 => "top-r1",
            TopLamp::Right2 => "top-r2",
        }
    }
}

/// Mechanical coin counters. ITG cabinets wire only the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinCounter {
    One,
    Two,
}

impl CoinCounter {
    /// Pulse bit within the coin-counter output byte.
    pub const fn mask(self) -> u8 {
        match self {
            CoinCounter::One => 0x01,
            CoinCounter::Two => 0x02,
        }
    }
}
