//! Render modes for the poll loop.
//!
//! Renderers are pure consumers of one polled cycle: they never touch the
//! output packet that goes to the board. The pad views merge the four
//! sensor slots into a single lamp echo for display, which can swallow a
//! press/release edge that flips between sub-polls but is good enough for
//! eyeballing a pad. The text rows print the slots unmerged, one column
//! per sensor slot.

use std::time::Duration;

use piuio_protocol::{
    CoinCounter, InputBatch, InputPacket, ItgArrow, ItgMenuButton, OutputPacket, PiuPanel, Player,
    SensorGroup, TopLamp,
};
use piubtn_protocol as piubtn;

use crate::{Game, Mode};

/// ANSI clear plus cursor home, the in-place redraw used by every mode
/// except raw.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Sensor slot column order used by the text rows.
const TEXT_COLUMNS: [SensorGroup; SensorGroup::COUNT] = [
    SensorGroup::Right,
    SensorGroup::Left,
    SensorGroup::Down,
    SensorGroup::Up,
];

const GRID_RULE: &str = "+-----+-----+-----+-----+-----+-----+\n";

/// Loop-owned frame counter and latency statistics, fed one cycle at a
/// time. The renderers read it; only [`advance`](RenderState::advance)
/// writes it.
#[derive(Debug, Default)]
pub struct RenderState {
    frames: u64,
    latest_secs: f64,
    total_secs: f64,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed cycles so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fold one cycle's I/O time in and return this frame's 0-based index.
    fn advance(&mut self, io_time: Duration) -> u64 {
        let frame = self.frames;
        self.frames += 1;
        self.latest_secs = io_time.as_secs_f64();
        self.total_secs += self.latest_secs;
        frame
    }

    fn average_secs(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_secs / self.frames as f64
        }
    }
}

/// Render one multiplexed pad cycle to stdout.
pub fn render_pad(
    mode: Mode,
    game: Game,
    output: &OutputPacket,
    batch: &InputBatch,
    io_time: Duration,
    state: &mut RenderState,
) {
    let frame = state.advance(io_time);
    match mode {
        Mode::Raw => print!("{}", raw_pad_frame(output, batch)),
        Mode::Text => {
            let body = match game {
                Game::Piu => text_piu_frame(batch, frame, state.latest_secs),
                Game::Itg => text_itg_frame(batch, frame, state.latest_secs),
            };
            print!("{CLEAR_SCREEN}{body}");
        }
        Mode::Tui => {
            let body = match game {
                Game::Piu => tui_piu_frame(output, batch, frame, state.latest_secs),
                Game::Itg => tui_itg_frame(output, batch, frame, state.latest_secs),
            };
            print!("{CLEAR_SCREEN}{body}");
        }
        Mode::Benchmark => print!("{CLEAR_SCREEN}{}", benchmark_frame(state)),
    }
}

/// Render one button board cycle to stdout.
pub fn render_buttons(
    mode: Mode,
    output: &piubtn::OutputPacket,
    input: &piubtn::InputPacket,
    io_time: Duration,
    state: &mut RenderState,
) {
    let frame = state.advance(io_time);
    match mode {
        Mode::Raw => print!("{}", raw_button_frame(output, input)),
        Mode::Text => {
            let body = text_button_frame(input, frame, state.latest_secs);
            print!("{CLEAR_SCREEN}{body}");
        }
        Mode::Tui => {
            let body = tui_button_frame(input, frame, state.latest_secs);
            print!("{CLEAR_SCREEN}{body}");
        }
        Mode::Benchmark => print!("{CLEAR_SCREEN}{}", benchmark_frame(state)),
    }
}

const fn bit(on: bool) -> u8 {
    if on { 1 } else { 0 }
}

fn push_hex(line: &mut String, bytes: &[u8]) {
    for byte in bytes {
        line.push_str(&format!("{byte:02X} "));
    }
}

// --- raw ------------------------------------------------------------------

fn raw_pad_frame(output: &OutputPacket, batch: &InputBatch) -> String {
    let mut line = String::new();
    push_hex(&mut line, output.as_bytes());
    for (_, input) in batch.iter() {
        push_hex(&mut line, input.as_bytes());
    }
    line.push('\n');
    line
}

fn raw_button_frame(output: &piubtn::OutputPacket, input: &piubtn::InputPacket) -> String {
    let mut line = String::new();
    push_hex(&mut line, output.as_bytes());
    push_hex(&mut line, input.as_bytes());
    line.push('\n');
    line
}

// --- text -----------------------------------------------------------------

const fn piu_code(panel: PiuPanel) -> &'static str {
    match panel {
        PiuPanel::UpLeft => "lu",
        PiuPanel::UpRight => "ru",
        PiuPanel::Center => "cn",
        PiuPanel::DownLeft => "ld",
        PiuPanel::DownRight => "rd",
    }
}

const fn itg_code(arrow: ItgArrow) -> &'static str {
    match arrow {
        ItgArrow::Up => "u",
        ItgArrow::Down => "d",
        ItgArrow::Left => "l",
        ItgArrow::Right => "r",
    }
}

/// The four slots of one signal as `r|l|d|u` columns.
fn slot_columns(batch: &InputBatch, probe: impl Fn(&InputPacket) -> bool) -> String {
    let cells: Vec<String> = TEXT_COLUMNS
        .iter()
        .map(|&group| bit(probe(batch.get(group))).to_string())
        .collect();
    cells.join("|")
}

/// True if the signal is active in any of the four slots.
fn merged(batch: &InputBatch, probe: impl Fn(&InputPacket) -> bool) -> bool {
    batch.iter().any(|(_, input)| probe(input))
}

fn text_piu_frame(batch: &InputBatch, frame: u64, io_secs: f64) -> String {
    let mut text = format!("{frame} - I/O time: {io_secs:.5} secs\n");
    for side in Player::ALL {
        for panel in PiuPanel::ALL {
            let columns = slot_columns(batch, |input| input.piu_sensor(side, panel));
            text.push_str(&format!("{}_{}: {columns}\n", side.label(), piu_code(panel)));
        }
    }
    text.push_str(&format!(
        "Test {}, Service {}, Coin1 {}, Coin2 {}, Clear {}\n",
        bit(merged(batch, InputPacket::test_switch)),
        bit(merged(batch, InputPacket::service_switch)),
        bit(merged(batch, InputPacket::coin_1)),
        bit(merged(batch, InputPacket::coin_2)),
        bit(merged(batch, InputPacket::clear_switch)),
    ));
    text
}

fn text_itg_frame(batch: &InputBatch, frame: u64, io_secs: f64) -> String {
    let mut text = format!("{frame} - I/O time: {io_secs:.5} secs\n");
    for side in Player::ALL {
        for arrow in ItgArrow::ALL {
            let columns = slot_columns(batch, |input| input.itg_sensor(side, arrow));
            text.push_str(&format!("{}_{}: {columns}\n", side.label(), itg_code(arrow)));
        }
    }
    text.push_str(&format!(
        "Test {}, Service {}, Coin {}, Clear {}\n",
        bit(merged(batch, InputPacket::test_switch)),
        bit(merged(batch, InputPacket::service_switch)),
        bit(merged(batch, InputPacket::coin_1)),
        bit(merged(batch, InputPacket::clear_switch)),
    ));
    text
}

fn text_button_frame(input: &piubtn::InputPacket, frame: u64, io_secs: f64) -> String {
    let mut text = format!("{frame} - I/O time: {io_secs:.5} secs\n");
    for side in piubtn::Player::ALL {
        for button in piubtn::Button::ALL {
            text.push_str(&format!(
                "{}_{}: {}\n",
                side.label(),
                button.label(),
                bit(input.pressed(side, button)),
            ));
        }
    }
    text
}

// --- tui ------------------------------------------------------------------

/// One pad panel in the TUI grid: the four sensor slots drawn around the
/// merged lamp echo.
#[derive(Clone, Copy)]
struct PanelCell {
    up: u8,
    left: u8,
    lamp: u8,
    right: u8,
    down: u8,
}

fn piu_cell(batch: &InputBatch, side: Player, panel: PiuPanel) -> PanelCell {
    PanelCell {
        up: bit(batch.get(SensorGroup::Up).piu_sensor(side, panel)),
        left: bit(batch.get(SensorGroup::Left).piu_sensor(side, panel)),
        lamp: bit(merged(batch, |input| input.piu_sensor(side, panel))),
        right: bit(batch.get(SensorGroup::Right).piu_sensor(side, panel)),
        down: bit(batch.get(SensorGroup::Down).piu_sensor(side, panel)),
    }
}

fn itg_cell(batch: &InputBatch, side: Player, arrow: ItgArrow) -> PanelCell {
    PanelCell {
        up: bit(batch.get(SensorGroup::Up).itg_sensor(side, arrow)),
        left: bit(batch.get(SensorGroup::Left).itg_sensor(side, arrow)),
        lamp: bit(merged(batch, |input| input.itg_sensor(side, arrow))),
        right: bit(batch.get(SensorGroup::Right).itg_sensor(side, arrow)),
        down: bit(batch.get(SensorGroup::Down).itg_sensor(side, arrow)),
    }
}

/// Three text lines of one grid row, six panel-wide columns plus the rule
/// underneath. Empty columns stay blank.
fn pad_band(cells: [Option<PanelCell>; 6]) -> String {
    let mut band = String::new();
    for cell in &cells {
        match cell {
            Some(c) => band.push_str(&format!("|  {}  ", c.up)),
            None => band.push_str("|     "),
        }
    }
    band.push_str("|\n");
    for cell in &cells {
        match cell {
            Some(c) => band.push_str(&format!("|{} {} {}", c.left, c.lamp, c.right)),
            None => band.push_str("|     "),
        }
    }
    band.push_str("|\n");
    for cell in &cells {
        match cell {
            Some(c) => band.push_str(&format!("|  {}  ", c.down)),
            None => band.push_str("|     "),
        }
    }
    band.push_str("|\n");
    band.push_str(GRID_RULE);
    band
}

fn tui_piu_frame(output: &OutputPacket, batch: &InputBatch, frame: u64, io_secs: f64) -> String {
    let l1 = bit(output.top_lamp(TopLamp::Left1));
    let l2 = bit(output.top_lamp(TopLamp::Left2));
    let r1 = bit(output.top_lamp(TopLamp::Right1));
    let r2 = bit(output.top_lamp(TopLamp::Right2));
    let neon = bit(output.bass_neon());
    let cc1 = bit(output.coin_counter(CoinCounter::One));
    let cc2 = bit(output.coin_counter(CoinCounter::Two));

    let svc = bit(merged(batch, InputPacket::service_switch));
    let tst = bit(merged(batch, InputPacket::test_switch));
    let cn1 = bit(merged(batch, InputPacket::coin_1));
    let cn2 = bit(merged(batch, InputPacket::coin_2));
    let clr = bit(merged(batch, InputPacket::clear_switch));

    let mut text = format!("Press CTRL + C to stop\n{frame} - I/O time: {io_secs:.5} secs\n");
    text.push_str(&format!("             {l1}  {l2}  {r1}  {r2}\n"));
    text.push_str("          +---------------+\n");
    text.push_str("          +--+---------+--+\n");
    text.push_str("             |         |\n");
    text.push_str("           +-+---------+-+\n");
    text.push_str("           |             |\n");
    text.push_str("           |             |\n");
    text.push_str("           |             |\n");
    text.push_str("           |             |\n");
    text.push_str("        +--+---+-----+---+--+\n");
    text.push_str(&format!("        |      |SVC {svc}|      |\n"));
    text.push_str(&format!("        |      |TST {tst}|      |\n"));
    text.push_str(&format!("        |  {neon}   |CN1 {cn1}|  {neon}   |\n"));
    text.push_str(&format!("        |      |CN2 {cn2}|      |\n"));
    text.push_str(&format!("        |CC1 {cc1} |CLR {clr}|CC2 {cc2} |\n"));
    text.push_str("        +------+-----+------+\n");
    text.push_str(GRID_RULE);
    text.push_str(&pad_band([
        Some(piu_cell(batch, Player::One, PiuPanel::UpLeft)),
        None,
        Some(piu_cell(batch, Player::One, PiuPanel::UpRight)),
        Some(piu_cell(batch, Player::Two, PiuPanel::UpLeft)),
        None,
        Some(piu_cell(batch, Player::Two, PiuPanel::UpRight)),
    ]));
    text.push_str(&pad_band([
        None,
        Some(piu_cell(batch, Player::One, PiuPanel::Center)),
        None,
        None,
        Some(piu_cell(batch, Player::Two, PiuPanel::Center)),
        None,
    ]));
    text.push_str(&pad_band([
        Some(piu_cell(batch, Player::One, PiuPanel::DownLeft)),
        None,
        Some(piu_cell(batch, Player::One, PiuPanel::DownRight)),
        Some(piu_cell(batch, Player::Two, PiuPanel::DownLeft)),
        None,
        Some(piu_cell(batch, Player::Two, PiuPanel::DownRight)),
    ]));
    text
}

fn tui_itg_frame(output: &OutputPacket, batch: &InputBatch, frame: u64, io_secs: f64) -> String {
    let l1 = bit(output.top_lamp(TopLamp::Left1));
    let l2 = bit(output.top_lamp(TopLamp::Left2));
    let r1 = bit(output.top_lamp(TopLamp::Right1));
    let r2 = bit(output.top_lamp(TopLamp::Right2));
    let neon = bit(output.bass_neon());
    let cc = bit(output.coin_counter(CoinCounter::One));

    let menu = |side: Player, button: ItgMenuButton| {
        bit(merged(batch, |input| input.itg_menu(side, button)))
    };
    let p1_start = menu(Player::One, ItgMenuButton::Start);
    let p1_left = menu(Player::One, ItgMenuButton::Left);
    let p1_right = menu(Player::One, ItgMenuButton::Right);
    let p1_back = menu(Player::One, ItgMenuButton::Back);
    let p2_start = menu(Player::Two, ItgMenuButton::Start);
    let p2_left = menu(Player::Two, ItgMenuButton::Left);
    let p2_right = menu(Player::Two, ItgMenuButton::Right);
    let p2_back = menu(Player::Two, ItgMenuButton::Back);

    let svc = bit(merged(batch, InputPacket::service_switch));
    let tst = bit(merged(batch, InputPacket::test_switch));
    let coin = bit(merged(batch, InputPacket::coin_1));
    let clr = bit(merged(batch, InputPacket::clear_switch));

    let mut text = format!("Press CTRL + C to stop\n{frame} - I/O time: {io_secs:.5} secs\n");
    text.push_str(&format!("         {l1}+---------------+{r1}\n"));
    text.push_str("          |               |\n");
    text.push_str(&format!("         {l2}+--+---------+--+{r2}\n"));
    text.push_str("             |         |\n");
    text.push_str("           +-+---------+-+\n");
    text.push_str("           |             |\n");
    text.push_str(&format!("           |  {p1_start}       {p2_start}  |\n"));
    text.push_str(&format!("           |{p1_left}   {p1_right}   {p2_left}   {p2_right}|\n"));
    text.push_str(&format!("           |  {p1_back}       {p2_back}  |\n"));
    text.push_str("        +--+---+-----+---+--+\n");
    text.push_str(&format!("        |      |SVC {svc}|      |\n"));
    text.push_str(&format!("        |      |TST {tst}|      |\n"));
    text.push_str(&format!("        |  {neon}   |CN  {coin}|  {neon}   |\n"));
    text.push_str(&format!("        |      |CC  {cc}|      |\n"));
    text.push_str(&format!("        |      |CLR {clr}|      |\n"));
    text.push_str("        +------+-----+------+\n");
    text.push_str(GRID_RULE);
    text.push_str(&pad_band([
        None,
        Some(itg_cell(batch, Player::One, ItgArrow::Up)),
        None,
        None,
        Some(itg_cell(batch, Player::Two, ItgArrow::Up)),
        None,
    ]));
    text.push_str(&pad_band([
        Some(itg_cell(batch, Player::One, ItgArrow::Left)),
        None,
        Some(itg_cell(batch, Player::One, ItgArrow::Right)),
        Some(itg_cell(batch, Player::Two, ItgArrow::Left)),
        None,
        Some(itg_cell(batch, Player::Two, ItgArrow::Right)),
    ]));
    text.push_str(&pad_band([
        None,
        Some(itg_cell(batch, Player::One, ItgArrow::Down)),
        None,
        None,
        Some(itg_cell(batch, Player::Two, ItgArrow::Down)),
        None,
    ]));
    text
}

/// Button cluster view. The lamp cells mirror the pressed buttons; the
/// mirror never reaches the board.
fn tui_button_frame(input: &piubtn::InputPacket, frame: u64, io_secs: f64) -> String {
    let pressed = |side: piubtn::Player, button: piubtn::Button| bit(input.pressed(side, button));

    let p1_back = pressed(piubtn::Player::One, piubtn::Button::Back);
    let p1_left = pressed(piubtn::Player::One, piubtn::Button::Left);
    let p1_right = pressed(piubtn::Player::One, piubtn::Button::Right);
    let p1_start = pressed(piubtn::Player::One, piubtn::Button::Start);
    let p2_back = pressed(piubtn::Player::Two, piubtn::Button::Back);
    let p2_left = pressed(piubtn::Player::Two, piubtn::Button::Left);
    let p2_right = pressed(piubtn::Player::Two, piubtn::Button::Right);
    let p2_start = pressed(piubtn::Player::Two, piubtn::Button::Start);

    let mut text = format!("Press CTRL + C to stop\n{frame} - I/O time: {io_secs:.5} secs\n");
    text.push_str("+--------------------+\n");
    text.push_str(&format!("|    {p1_back}          {p2_back}    |\n"));
    text.push_str("|  +---+      +---+  |\n");
    text.push_str(&format!("|  | {p1_back} |      | {p2_back} |  |\n"));
    text.push_str(&format!(
        "| {p1_left}|{p1_left}+{p1_right}|{p1_right}    {p2_left}|{p2_left}+{p2_right}|{p2_right} |\n"
    ));
    text.push_str(&format!("|  | {p1_start} |      | {p2_start} |  |\n"));
    text.push_str("|  +---+      +---+  |\n");
    text.push_str(&format!("|    {p1_start}          {p2_start}    |\n"));
    text.push_str("+--------------------+\n");
    text
}

// --- benchmark --------------------------------------------------------------

fn benchmark_frame(state: &RenderState) -> String {
    format!(
        "Samples: {}\nLatest time: {:.5} secs\nAverage time: {:.5} secs\n",
        state.frames,
        state.latest_secs,
        state.average_secs()
    )
}

#[cfg(test)]
mod tests {
    use piuio_protocol::PACKET_SIZE;

    use super::*;

    fn decoded(byte0: u8, byte1: u8, byte2: u8, byte3: u8) -> InputPacket {
        let mut raw = [0u8; PACKET_SIZE];
        raw[0] = byte0;
        raw[1] = byte1;
        raw[2] = byte2;
        raw[3] = byte3;
        InputPacket::from_decoded(raw)
    }

    fn batch_with_slot(group: SensorGroup, packet: InputPacket) -> InputBatch {
        let mut slots = [InputPacket::default(); SensorGroup::COUNT];
        slots[group.index()] = packet;
        InputBatch::new(slots)
    }

    #[test]
    fn advance_counts_frames_and_averages_io_time() {
        let mut state = RenderState::new();
        assert_eq!(state.advance(Duration::from_millis(10)), 0);
        assert_eq!(state.advance(Duration::from_millis(30)), 1);
        assert_eq!(state.frames(), 2);
        assert!((state.latest_secs - 0.030).abs() < 1e-9);
        assert!((state.average_secs() - 0.020).abs() < 1e-9);
    }

    #[test]
    fn average_of_empty_state_is_zero() {
        let state = RenderState::new();
        assert!(state.average_secs().abs() < f64::EPSILON);
    }

    #[test]
    fn raw_pad_frame_dumps_output_then_all_four_slots() {
        let mut output = OutputPacket::new();
        output.set_piu_pad_lamp(Player::One, PiuPanel::UpLeft, true);
        let batch = batch_with_slot(SensorGroup::Up, decoded(0x01, 0, 0, 0));

        let line = raw_pad_frame(&output, &batch);
        // 5 packets of 8 bytes, 3 characters per byte, one newline.
        assert_eq!(line.len(), 5 * PACKET_SIZE * 3 + 1);
        assert!(line.starts_with("04 00 00 00 00 00 00 00 01 00 "));
        assert!(line.ends_with(" \n"));
    }

    #[test]
    fn raw_button_frame_dumps_output_then_input() {
        let mut output = piubtn_protocol::OutputPacket::new();
        output.set_light(piubtn::Player::Two, piubtn::Button::Start, true);
        let input = piubtn_protocol::InputPacket::from_decoded([0x01, 0, 0, 0, 0, 0, 0, 0]);

        let line = raw_button_frame(&output, &input);
        assert_eq!(line.len(), 2 * PACKET_SIZE * 3 + 1);
        assert!(line.starts_with("01 00 00 00 00 00 00 00 01 00 "));
    }

    #[test]
    fn text_piu_frame_orders_columns_right_left_down_up() {
        let packet = decoded(PiuPanel::Center.sensor_mask(), 0, 0, 0);
        let batch = batch_with_slot(SensorGroup::Left, packet);

        let text = text_piu_frame(&batch, 7, 0.001);
        assert!(text.starts_with("7 - I/O time: 0.00100 secs\n"));
        assert!(text.contains("p1_cn: 0|1|0|0\n"));
        assert!(text.contains("p1_lu: 0|0|0|0\n"));
        assert!(text.contains("p2_cn: 0|0|0|0\n"));
    }

    #[test]
    fn text_piu_frame_merges_cabinet_switches_across_slots() {
        // Test switch seen in the down slot only.
        let batch = batch_with_slot(SensorGroup::Down, decoded(0, 0x01, 0, 0));
        let text = text_piu_frame(&batch, 0, 0.0);
        assert!(text.contains("Test 1, Service 0, Coin1 0, Coin2 0, Clear 0\n"));
    }

    #[test]
    fn text_itg_frame_reports_one_coin_line() {
        let packet = decoded(ItgArrow::Left.sensor_mask(), 0x02, 0, 0);
        let batch = batch_with_slot(SensorGroup::Up, packet);

        let text = text_itg_frame(&batch, 0, 0.0);
        assert!(text.contains("p1_l: 0|0|0|1\n"));
        assert!(text.contains("Test 0, Service 0, Coin 1, Clear 0\n"));
        assert!(!text.contains("Coin1"));
    }

    #[test]
    fn text_button_frame_lists_clusters_in_order() {
        // P1 left is input bit 1.
        let input = piubtn_protocol::InputPacket::from_decoded([0x02, 0, 0, 0, 0, 0, 0, 0]);
        let text = text_button_frame(&input, 3, 0.002);
        assert!(text.starts_with("3 - I/O time: 0.00200 secs\n"));
        assert!(text.contains("p1_back: 0\np1_left: 1\np1_right: 0\np1_start: 0\n"));
        assert!(text.contains("p2_back: 0\np2_left: 0\np2_right: 0\np2_start: 0\n"));
    }

    #[test]
    fn tui_piu_frame_merges_slots_into_the_lamp_echo() {
        // P1 center pressed in the right slot only: its cell shows the
        // right column and the merged lamp, nothing else.
        let packet = decoded(PiuPanel::Center.sensor_mask(), 0, 0, 0);
        let batch = batch_with_slot(SensorGroup::Right, packet);

        let text = tui_piu_frame(&OutputPacket::new(), &batch, 0, 0.0);
        assert!(text.contains("|     |0 1 1|     |     |0 0 0|     |\n"));
    }

    #[test]
    fn tui_piu_frame_shows_output_lamps_in_the_marquee_row() {
        let mut output = OutputPacket::new();
        output.set_top_lamp(TopLamp::Left1, true);
        output.set_top_lamp(TopLamp::Right2, true);
        output.set_bass_neon(true);

        let text = tui_piu_frame(&output, &InputBatch::default(), 0, 0.0);
        assert!(text.contains("             1  0  0  1\n"));
        assert!(text.contains("|  1   |CN1 0|  1   |\n"));
    }

    #[test]
    fn tui_itg_frame_merges_menu_buttons() {
        let packet = decoded(ItgMenuButton::Start.mask(), 0, 0, 0);
        let batch = batch_with_slot(SensorGroup::Up, packet);

        let text = tui_itg_frame(&OutputPacket::new(), &batch, 0, 0.0);
        assert!(text.contains("           |  1       0  |\n"));
    }

    #[test]
    fn tui_button_frame_mirrors_pressed_buttons_into_lamps() {
        // P1 back is input bit 0.
        let input = piubtn_protocol::InputPacket::from_decoded([0x01, 0, 0, 0, 0, 0, 0, 0]);
        let text = tui_button_frame(&input, 0, 0.0);
        assert!(text.contains("|    1          0    |\n"));
        assert!(text.contains("|  | 1 |      | 0 |  |\n"));
    }

    #[test]
    fn benchmark_frame_reports_samples_latest_and_average() {
        let mut state = RenderState::new();
        state.advance(Duration::from_millis(10));
        state.advance(Duration::from_millis(30));
        assert_eq!(
            benchmark_frame(&state),
            "Samples: 2\nLatest time: 0.03000 secs\nAverage time: 0.02000 secs\n"
        );
    }
}
